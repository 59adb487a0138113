//! ForumGraph — knowledge-graph enrichment for course discussion threads.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;

fn resolve_data_dir() -> PathBuf {
    std::env::var("FORUMGRAPH_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data"))
}

fn print_help() {
    println!("ForumGraph — knowledge graph for discussion threads");
    println!();
    println!("Usage: forumgraph <command> [args]");
    println!();
    println!("Commands:");
    println!("  process <thread.json>          Re-extract a whole thread and rewrite the file");
    println!("  reply <thread.json> <text>     Fold one new reply into the thread");
    println!("  summary <thread.json>          Regenerate the summary from stored entities");
    println!("  extract <course> <text>        Show candidates without touching the store");
    println!("  search <query> [limit]         Entities whose name contains <query>");
    println!("  top [limit]                    Most frequent entities");
    println!("  type <ENTITY_TYPE> [limit]     Entities of one type");
    println!("  related <entity-id>            Entities one hop away");
    println!("  stats                          Store counts");
    println!("  help                           Show this help message");
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_help();
        return Ok(());
    };
    if matches!(command, "help" | "--help" | "-h") {
        print_help();
        return Ok(());
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());
    let config = forumgraph_core::ForumGraphConfig::from_env(&data_dir)?;

    if let Err(e) = commands::run(&config, command, &args[1..]) {
        if let Some(usage) = e.downcast_ref::<commands::UsageError>() {
            eprintln!("{}", usage);
            eprintln!("Use 'forumgraph help' for usage.");
            std::process::exit(2);
        }
        return Err(e);
    }
    Ok(())
}
