//! Subcommand handlers. Every write runs inside one SQLite transaction.

use std::fmt;
use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tracing::info;

use forumgraph_core::{EntityId, EntityType, ForumGraphConfig, Reply, Thread};
use forumgraph_engine::{KnowledgeEngine, ProcessReport};
use forumgraph_store::{EntityQueries, SqliteEntityStore};

const DEFAULT_LIMIT: usize = 20;

/// Bad command line; reported with exit code 2.
#[derive(Debug)]
pub struct UsageError(pub String);

impl fmt::Display for UsageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

fn usage(msg: impl Into<String>) -> anyhow::Error {
    UsageError(msg.into()).into()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessOutput<'a> {
    report: &'a ProcessReport,
    knowledge_score: f64,
    ai_generated_summary: Option<&'a str>,
}

pub fn run(config: &ForumGraphConfig, command: &str, args: &[String]) -> anyhow::Result<()> {
    match command {
        "process" => {
            let path = required(args, 0, "Usage: forumgraph process <thread.json>")?;
            process(config, Path::new(path))
        }
        "reply" => {
            let path = required(args, 0, "Usage: forumgraph reply <thread.json> <text>")?;
            let text = args[1..].join(" ");
            reply(config, Path::new(path), &text)
        }
        "summary" => {
            let path = required(args, 0, "Usage: forumgraph summary <thread.json>")?;
            let store = open_store(config)?;
            let thread = load_thread(Path::new(path))?;
            let summary = KnowledgeEngine::new(config).generate_knowledge_summary(&store, &thread)?;
            println!("{}", summary);
            Ok(())
        }
        "extract" => {
            let course = required(args, 0, "Usage: forumgraph extract <course> <text>")?;
            let text = args[1..].join(" ");
            extract(config, course, &text)
        }
        "search" => {
            let query = required(args, 0, "Usage: forumgraph search <query> [limit]")?;
            let limit = parse_limit(args.get(1))?;
            print_json(&open_store(config)?.search_by_name(query, limit)?)
        }
        "top" => {
            let limit = parse_limit(args.first())?;
            print_json(&open_store(config)?.most_frequent(limit)?)
        }
        "type" => {
            let tag = required(args, 0, "Usage: forumgraph type <ENTITY_TYPE> [limit]")?;
            let limit = parse_limit(args.get(1))?;
            let entity_type = EntityType::from(tag.to_uppercase());
            print_json(&open_store(config)?.by_type(&entity_type, limit)?)
        }
        "related" => {
            let raw = required(args, 0, "Usage: forumgraph related <entity-id>")?;
            let id: EntityId = raw
                .parse()
                .map_err(|_| usage(format!("Invalid entity id: {}", raw)))?;
            print_json(&open_store(config)?.related_to(id)?)
        }
        "stats" => print_json(&open_store(config)?.stats()?),
        other => Err(usage(format!("Unknown command: {}", other))),
    }
}

fn process(config: &ForumGraphConfig, path: &Path) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let engine = KnowledgeEngine::new(config);
    let mut thread = load_thread(path)?;

    let report = store
        .transaction(|s| engine.process_full_thread(s, &mut thread))
        .with_context(|| format!("Failed to process thread {}", thread.id))?;

    save_thread(path, &thread)?;
    print_output(&report, &thread)
}

fn reply(config: &ForumGraphConfig, path: &Path, text: &str) -> anyhow::Result<()> {
    let store = open_store(config)?;
    let engine = KnowledgeEngine::new(config);
    let mut thread = load_thread(path)?;

    if !text.trim().is_empty() {
        thread.replies.push(Reply::new(text));
        thread.reply_count += 1;
    }
    let report = store
        .transaction(|s| engine.process_reply(s, &mut thread, Some(text)))
        .with_context(|| format!("Failed to process reply on thread {}", thread.id))?;

    save_thread(path, &thread)?;
    print_output(&report, &thread)
}

fn extract(config: &ForumGraphConfig, course: &str, text: &str) -> anyhow::Result<()> {
    let engine = KnowledgeEngine::new(config);
    let set = engine.extract_thread_candidates(text, course);
    info!("Extraction tier: {}, fallback used: {}", engine.tier(), set.fallback_used);
    print_json(&set.candidates)
}

fn open_store(config: &ForumGraphConfig) -> anyhow::Result<SqliteEntityStore> {
    SqliteEntityStore::open(&config.db_path)
        .with_context(|| format!("Failed to open store at {}", config.db_path.display()))
}

fn load_thread(path: &Path) -> anyhow::Result<Thread> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid thread JSON in {}", path.display()))
}

fn save_thread(path: &Path, thread: &Thread) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(thread)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))
}

fn print_output(report: &ProcessReport, thread: &Thread) -> anyhow::Result<()> {
    print_json(&ProcessOutput {
        report,
        knowledge_score: thread.knowledge_score,
        ai_generated_summary: thread.ai_generated_summary.as_deref(),
    })
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn required<'a>(args: &'a [String], index: usize, help: &str) -> anyhow::Result<&'a str> {
    args.get(index).map(String::as_str).ok_or_else(|| usage(help))
}

fn parse_limit(arg: Option<&String>) -> anyhow::Result<usize> {
    match arg {
        None => Ok(DEFAULT_LIMIT),
        Some(raw) => raw
            .parse()
            .map_err(|_| usage(format!("Invalid limit: {}", raw))),
    }
}
