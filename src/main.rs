use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use revfold::{DirectUpdates, FragmentManager, GitWalker, GraphRenderer};

#[derive(Parser)]
#[command(name = "revfold")]
#[command(about = "Commit graph viewer that folds linear history", long_about = None)]
struct Cli {
    /// Path to the repository
    #[arg(default_value = ".")]
    path: PathBuf,
    /// Number of commits to load
    #[arg(short, long, default_value = "200")]
    limit: usize,
    /// Print the raw graph without folding
    #[arg(long)]
    expanded: bool,
    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let walker = GitWalker::new(cli.path.to_str())?;
    let graph = walker.into_graph(Some(cli.limit))?;

    let stats = graph.stats();
    println!(
        "{} commits ({} merges), {} not loaded",
        stats.commit_nodes, stats.merge_commits, stats.not_loaded_nodes
    );
    println!();

    let mut manager = FragmentManager::new(Box::new(DirectUpdates));
    if !cli.expanded {
        manager.hide_all(&graph)?;
    }

    let renderer = GraphRenderer::new(72);
    print!("{}", renderer.render(&graph, &manager));

    Ok(())
}
