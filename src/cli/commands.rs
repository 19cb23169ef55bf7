use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use walkdir::WalkDir;

use crate::importer::{import_transcript, import_transcript_with_title};
use crate::models::{ContentBlock, Conversation, MessageKind};
use crate::store::{ConversationStore, SqliteStore};
use crate::titles::FirstLineTitles;
use crate::utils::{default_db_path, format_path_with_tilde};

#[derive(Parser)]
#[command(name = "session-importer")]
#[command(version = "0.1.0")]
#[command(about = "Import Claude Code transcripts into a local conversation store", long_about = None)]
pub struct Cli {
    /// Database path (defaults to the platform data directory)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Import one or more transcript files (directories are walked for .jsonl)
    Import {
        paths: Vec<PathBuf>,
        /// Title new conversations from their first user message instead of
        /// the session identifier
        #[arg(long)]
        auto_title: bool,
    },
    /// List imported conversations
    List,
    /// Show the messages of one conversation
    Show { session_id: String },
    /// Rename a conversation
    Rename { session_id: String, title: String },
    /// Delete a conversation and all of its messages
    Delete { session_id: String },
    /// Show statistics about the store
    Stats,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let db_path = match cli.db {
        Some(path) => path,
        None => default_db_path()?,
    };
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("failed to open store at {}", db_path.display()))?;

    match cli.command {
        Commands::Import { paths, auto_title } => import_paths(&store, &paths, auto_title),
        Commands::List => list_conversations(&store),
        Commands::Show { session_id } => show_conversation(&store, &session_id),
        Commands::Rename { session_id, title } => {
            let conversation = require_conversation(&store, &session_id)?;
            store.rename_conversation(conversation.id, &title)?;
            println!("Renamed {} to {:?}", session_id, title);
            Ok(())
        }
        Commands::Delete { session_id } => {
            let conversation = require_conversation(&store, &session_id)?;
            store.delete_conversation(conversation.id)?;
            println!("Deleted {} ({} messages)", session_id, conversation.message_count);
            Ok(())
        }
        Commands::Stats => show_stats(&store),
    }
}

/// Expand directories into the .jsonl files they contain, pass files through.
fn expand_paths(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file()
                    && entry.path().extension().is_some_and(|ext| ext == "jsonl")
                {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }
    files
}

fn import_paths(store: &SqliteStore, paths: &[PathBuf], auto_title: bool) -> Result<()> {
    if paths.is_empty() {
        bail!("nothing to import: pass at least one transcript file or directory");
    }

    let files = expand_paths(paths);
    if files.is_empty() {
        bail!("no .jsonl files found under the given paths");
    }

    let titles = FirstLineTitles::default();
    let mut imported = 0;
    let mut failed = 0;
    for file in &files {
        let result = if auto_title {
            import_transcript_with_title(file, store, &titles)
        } else {
            import_transcript(file, store)
        };
        match result {
            Ok(conversation) => {
                imported += 1;
                println!(
                    "Imported {} ({} messages) from {}",
                    conversation.session_id,
                    conversation.message_count,
                    format_path_with_tilde(file)
                );
            }
            Err(e) => {
                failed += 1;
                eprintln!("Warning: failed to import {}: {}", file.display(), e);
            }
        }
    }

    if imported == 0 {
        bail!("all {} file(s) failed to import", failed);
    }
    if failed > 0 {
        eprintln!("Imported {} file(s), {} failed", imported, failed);
    }
    Ok(())
}

fn require_conversation(store: &SqliteStore, session_id: &str) -> Result<Conversation> {
    store
        .find_conversation(session_id)?
        .with_context(|| format!("no conversation with session id {session_id}"))
}

fn list_conversations(store: &SqliteStore) -> Result<()> {
    let conversations = store.list_conversations()?;
    if conversations.is_empty() {
        println!("No conversations imported yet");
        return Ok(());
    }
    for conversation in conversations {
        println!(
            "{}  {}  {} messages  {}",
            conversation.created_at.format("%Y-%m-%d %H:%M:%S"),
            conversation.session_id,
            conversation.message_count,
            conversation.title
        );
    }
    Ok(())
}

fn show_conversation(store: &SqliteStore, session_id: &str) -> Result<()> {
    let conversation = require_conversation(store, session_id)?;
    println!("{} ({})", conversation.title, conversation.session_id);
    println!("Created: {}", conversation.created_at.format("%Y-%m-%d %H:%M:%S"));
    if let Some(file_path) = &conversation.file_path {
        println!("Source: {}", format_path_with_tilde(Path::new(file_path)));
    }
    println!();

    for message in store.conversation_messages(conversation.id)? {
        let header = format!(
            "[{}] {}{}",
            message.timestamp.format("%Y-%m-%d %H:%M:%S"),
            message.kind.as_str(),
            message.model.as_deref().map(|m| format!(" ({m})")).unwrap_or_default()
        );
        println!("{header}");
        for block in message.content_blocks() {
            match &block {
                ContentBlock::Text { text: Some(text) } => println!("  {}", text),
                ContentBlock::Text { text: None } => {}
                ContentBlock::ToolUse { name, .. } => {
                    println!("  [tool use: {}]", name.as_deref().unwrap_or("?"));
                }
                ContentBlock::ToolResult { content, .. } => {
                    let preview: String = content
                        .as_deref()
                        .unwrap_or("")
                        .chars()
                        .take(120)
                        .collect();
                    println!("  [tool result] {}", preview.replace('\n', " "));
                }
                ContentBlock::Other { block_type } => println!("  [{}]", block_type),
            }
        }
    }
    Ok(())
}

fn show_stats(store: &SqliteStore) -> Result<()> {
    let conversations = store.list_conversations()?;
    let mut total_messages = 0i64;
    let mut by_kind = [0usize; 4];
    for conversation in &conversations {
        total_messages += conversation.message_count;
        for message in store.conversation_messages(conversation.id)? {
            let slot = match message.kind {
                MessageKind::User => 0,
                MessageKind::Assistant => 1,
                MessageKind::ToolResult => 2,
                MessageKind::System => 3,
            };
            by_kind[slot] += 1;
        }
    }

    println!("Conversation Store Statistics");
    println!("================================");
    println!("Conversations: {}", conversations.len());
    println!("Total messages: {}", total_messages);
    println!("  User: {}", by_kind[0]);
    println!("  Assistant: {}", by_kind[1]);
    println!("  Tool results: {}", by_kind[2]);
    println!("  System: {}", by_kind[3]);
    Ok(())
}
