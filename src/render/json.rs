//! JSON renderer: the payload itself, for external viewers

use super::{
    write_artifact, ArtifactFormat, GraphRenderer, RenderArtifact, RenderConfig, RenderError,
    RenderPayload,
};

/// Emits the render payload as pretty JSON, written to `config.output` if set.
#[derive(Debug, Clone, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl GraphRenderer for JsonRenderer {
    fn render(
        &self,
        payload: &RenderPayload,
        config: &RenderConfig,
    ) -> Result<RenderArtifact, RenderError> {
        let content = serde_json::to_string_pretty(payload)?;
        if let Some(path) = &config.output {
            write_artifact(path, &content)?;
        }
        Ok(RenderArtifact {
            format: ArtifactFormat::Json,
            path: config.output.clone(),
            content,
        })
    }
}
