//! Papergraph CLI: search papers, summarize them, draw the concept graph.
//!
//! Usage:
//!   papergraph search <query> [--max-results N] [--sort ORDER] [--format html|json] [--output PATH]
//!   papergraph extract [--file PATH]
//!   papergraph mcp

use clap::{Parser, Subcommand, ValueEnum};
use papergraph::{
    render, Config, ExtractorConfig, FieldExtractor, GraphRenderer, HtmlRenderer, JsonRenderer,
    PaperSummary, ResearchPipeline, SearchRequest, SortBy,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "papergraph",
    version,
    about = "Search papers, summarize them into four fields, and graph shared concepts"
)]
struct Cli {
    /// Path to a YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Html,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, summarize each paper, and render the concept graph
    Search {
        /// Free-text query
        query: String,
        /// Number of papers to retrieve
        #[arg(long)]
        max_results: Option<usize>,
        /// Sort order: submitted, updated or relevance
        #[arg(long)]
        sort: Option<SortBy>,
        /// Graph artifact format
        #[arg(long, value_enum, default_value = "html")]
        format: OutputFormat,
        /// Where to write the graph artifact
        #[arg(long)]
        output: Option<PathBuf>,
        /// Longest node label before truncation
        #[arg(long)]
        max_label_length: Option<usize>,
    },
    /// Extract the four fields from one abstract (file or stdin)
    Extract {
        /// Read the abstract from this file instead of stdin
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Start the MCP (Model Context Protocol) server on stdio
    Mcp,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "papergraph=debug" } else { "papergraph=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn runtime() -> Result<tokio::runtime::Runtime, String> {
    tokio::runtime::Runtime::new().map_err(|e| format!("failed to create tokio runtime: {}", e))
}

fn print_summary(index: usize, summary: &PaperSummary) {
    println!("📄 Paper {}: {}", index, summary.title);
    if !summary.link.is_empty() {
        println!("🔗 {}", summary.link);
    }
    for (field, outcome) in summary.fields.iter() {
        println!("  {}: {}", field, outcome.text());
    }
    println!();
}

fn cmd_search(config: Config, request: SearchRequest, renderer: &dyn GraphRenderer) -> i32 {
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let pipeline = match ResearchPipeline::from_config(&config).await {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };

        let session = pipeline.run(&request).await;
        for warning in &session.warnings {
            eprintln!("Warning: {}", warning);
        }
        if session.summaries.is_empty() {
            println!("No papers found for '{}'", session.query);
        }
        for (i, summary) in session.summaries.iter().enumerate() {
            print_summary(i + 1, summary);
        }

        println!(
            "Graph: {} nodes, {} edges",
            session.graph.node_count(),
            session.graph.edge_count()
        );
        match render(&session.graph, &config.render, renderer) {
            Ok(artifact) => {
                match artifact.path {
                    Some(path) => println!("Graph written to {}", path.display()),
                    None => println!("{}", artifact.content),
                }
                0
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        }
    })
}

fn read_abstract(file: Option<&Path>) -> Result<String, String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {}", path.display(), e)),
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| format!("failed to read stdin: {}", e))?;
            Ok(text)
        }
    }
}

fn cmd_extract(config: Config, file: Option<&Path>) -> i32 {
    let text = match read_abstract(file) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let rt = match runtime() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    rt.block_on(async {
        let summarizer = match papergraph::summarizer::shared(&config.summarizer).await {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        };
        let extractor = FieldExtractor::new(summarizer)
            .with_config(ExtractorConfig::from(&config.summarizer));
        let fields = extractor.extract_fields(&text).await;
        for (field, outcome) in fields.iter() {
            println!("{}: {}", field, outcome.text());
        }
        0
    })
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Search {
            query,
            max_results,
            sort,
            format,
            output,
            max_label_length,
        } => {
            if let Some(max_results) = max_results {
                config.retrieval.max_results = max_results;
            }
            if let Some(sort) = sort {
                config.retrieval.sort_by = sort;
            }
            if let Some(limit) = max_label_length {
                config.render.max_label_length = limit;
            }
            if output.is_some() {
                config.render.output = output;
            }
            let request = SearchRequest::new(query)
                .with_max_results(config.retrieval.max_results)
                .with_sort(config.retrieval.sort_by);
            let renderer: Box<dyn GraphRenderer> = match format {
                OutputFormat::Html => Box::new(HtmlRenderer::new()),
                OutputFormat::Json => Box::new(JsonRenderer::new()),
            };
            cmd_search(config, request, renderer.as_ref())
        }
        Commands::Extract { file } => cmd_extract(config, file.as_deref()),
        Commands::Mcp => papergraph::mcp::run_mcp_server(config),
    };
    std::process::exit(code);
}
