use std::collections::HashSet;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use crate::config::resolve::load_config;
use crate::config::Config;
use crate::error::{DebgraphError, Result};
use crate::graph::builder::{BuildOptions, BuildSummary, GraphBuilder, ParseErrorPolicy};
use crate::graph::{ops, viz, PackageGraph};
use crate::query::dpkg::DpkgQuery;
use crate::util::progress::DiscoveryProgress;
use crate::util::{command, output};

#[derive(Parser, Debug)]
#[command(name = "debgraph", version)]
#[command(about = "Draw the dependency graph of Debian packages", long_about = None)]
pub struct Cli {
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,
    /// dot, json, tree, flat, or any Graphviz output format (svg, png, pdf, ...)
    #[arg(short = 'f', long)]
    pub format: Option<String>,
    /// Write to this file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Treat unparsable dependency declarations as empty instead of failing
    #[arg(short = 'k', long)]
    pub keep_going: bool,
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[arg(short, long)]
    pub quiet: bool,
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    Dot,
    Json,
    Tree,
    Flat,
    Graphviz(String),
}

pub fn run() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };
    if cli.no_color {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
    if let Err(err) = dispatch(cli) {
        output::error(&err.to_string());
        std::process::exit(1);
    }
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.clone())?;
    let format = parse_output_format(
        cli.format
            .as_deref()
            .unwrap_or(config.render.format.as_str()),
    )?;
    let verbose = cli.verbose > 0;

    let source = DpkgQuery::new(config.query.tool.as_str()).with_verbose(cli.verbose > 1);
    let options = BuildOptions {
        on_parse_error: if cli.keep_going {
            ParseErrorPolicy::Skip
        } else {
            ParseErrorPolicy::Abort
        },
    };
    let mut graph = PackageGraph::new();
    let mut progress = DiscoveryProgress::new(cli.quiet, verbose);
    let summary = {
        let mut builder = GraphBuilder::new(&source, &mut graph, options)?;
        let summary = builder.run(&cli.packages, &mut progress);
        progress.finish();
        summary?
    };

    if verbose {
        report_summary(&summary, &graph);
    }

    let roots = unique_seeds(&cli.packages);
    let bytes = render(&graph, &roots, &format, &config)?;
    write_output(cli.output.as_deref(), &bytes)
}

pub fn parse_output_format(input: &str) -> Result<OutputFormat> {
    let format = input.trim().to_ascii_lowercase();
    match format.as_str() {
        "dot" | "gv" => Ok(OutputFormat::Dot),
        "json" => Ok(OutputFormat::Json),
        "tree" => Ok(OutputFormat::Tree),
        "flat" => Ok(OutputFormat::Flat),
        other
            if !other.is_empty()
                && other
                    .chars()
                    .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, ':' | '_' | '-')) =>
        {
            Ok(OutputFormat::Graphviz(other.to_string()))
        }
        _ => Err(DebgraphError::UnknownFormat(input.to_string())),
    }
}

fn render(
    graph: &PackageGraph,
    roots: &[String],
    format: &OutputFormat,
    config: &Config,
) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Dot => Ok(viz::render_dot(graph, &config.colors).into_bytes()),
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&viz::graph_to_json(graph))
                .map_err(|err| DebgraphError::Other(anyhow::Error::new(err)))?;
            Ok(format!("{json}\n").into_bytes())
        }
        OutputFormat::Tree => {
            let tree = viz::render_tree(roots, &ops::adjacency(graph), &viz::text_labels(graph));
            Ok(tree.into_bytes())
        }
        OutputFormat::Flat => {
            let flat = viz::render_flat(roots, &ops::adjacency(graph), &viz::text_labels(graph));
            Ok(flat.into_bytes())
        }
        OutputFormat::Graphviz(target) => {
            let dot = viz::render_dot(graph, &config.colors);
            let tool = config.render.tool.as_str();
            command::pipe_through(tool, &[format!("-T{target}")], dot.as_bytes()).map_err(
                |err| DebgraphError::Render {
                    tool: tool.to_string(),
                    message: err.to_string(),
                },
            )
        }
    }
}

fn write_output(path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match path {
        Some(path) => {
            fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))?
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn unique_seeds(packages: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    packages
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

fn report_summary(summary: &BuildSummary, graph: &PackageGraph) {
    output::info(&format!(
        "{} packages, {} dependency edges",
        summary.packages,
        ops::unique_edges(graph).len()
    ));
    if summary.skipped > 0 {
        output::warn(&format!(
            "{} packages had unparsable dependencies",
            summary.skipped
        ));
    }
    for cycle in ops::find_cycles(graph) {
        output::debug(&format!("dependency cycle: {}", cycle.join(" -> ")));
    }
}
