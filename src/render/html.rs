//! Interactive HTML renderer (vis-network page)

use super::{
    write_artifact, ArtifactFormat, GraphRenderer, RenderArtifact, RenderConfig, RenderError,
    RenderPayload,
};

/// File name used when no output path is configured
pub const DEFAULT_FILE_NAME: &str = "papergraph-graph.html";

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>papergraph</title>
<script src="https://unpkg.com/vis-network@9.1.9/standalone/umd/vis-network.min.js"></script>
<style>
  body { margin: 0; }
  #graph { height: __HEIGHT__; width: __WIDTH__; background-color: __BACKGROUND__; }
</style>
</head>
<body>
<div id="graph"></div>
<script>
  var nodes = new vis.DataSet(__NODES__);
  var edges = new vis.DataSet(__EDGES__);
  var options = {
    nodes: { shape: "dot", size: 16, font: { color: "__FONT_COLOR__" } },
    edges: { color: { inherit: false } },
    physics: { stabilization: { iterations: 200 } },
    interaction: { hover: true, tooltipDelay: 100 }
  };
  new vis.Network(document.getElementById("graph"), { nodes: nodes, edges: edges }, options);
</script>
</body>
</html>
"#;

/// Writes a self-contained interactive page.
///
/// The page goes to `config.output`, or to [`DEFAULT_FILE_NAME`] in the
/// system temp directory. It is a transient file for display.
#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        Self
    }

    pub fn page(payload: &RenderPayload, config: &RenderConfig) -> Result<String, RenderError> {
        let nodes = script_json(&serde_json::to_string(&payload.nodes)?);
        let edges = script_json(&serde_json::to_string(&payload.edges)?);
        Ok(fill_template(
            PAGE_TEMPLATE,
            &[
                ("__HEIGHT__", css_value(&config.height).as_str()),
                ("__WIDTH__", css_value(&config.width).as_str()),
                ("__BACKGROUND__", css_value(&config.background).as_str()),
                ("__FONT_COLOR__", css_value(&config.font_color).as_str()),
                ("__NODES__", nodes.as_str()),
                ("__EDGES__", edges.as_str()),
            ],
        ))
    }
}

/// Substitute markers in one pass over `template`.
///
/// Inserted values are never scanned, so marker text inside node labels
/// stays literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut page = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = values
            .iter()
            .filter_map(|(marker, value)| rest.find(marker).map(|at| (at, *marker, *value)))
            .min_by_key(|(at, _, _)| *at);
        match next {
            Some((at, marker, value)) => {
                page.push_str(&rest[..at]);
                page.push_str(value);
                rest = &rest[at + marker.len()..];
            }
            None => {
                page.push_str(rest);
                return page;
            }
        }
    }
}

impl GraphRenderer for HtmlRenderer {
    fn render(
        &self,
        payload: &RenderPayload,
        config: &RenderConfig,
    ) -> Result<RenderArtifact, RenderError> {
        let content = Self::page(payload, config)?;
        let path = config
            .output
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_FILE_NAME));
        write_artifact(&path, &content)?;
        tracing::info!(path = %path.display(), "graph page written");
        Ok(RenderArtifact {
            format: ArtifactFormat::Html,
            path: Some(path),
            content,
        })
    }
}

/// JSON is embedded in a `<script>` block; `</` must not close it early.
fn script_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// Keep style values from breaking out of their declaration.
fn css_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ';' | '{' | '}' | '<' | '>' | '"'))
        .collect()
}
