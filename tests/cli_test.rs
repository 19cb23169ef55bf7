/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::process::Command;

use assert_cmd::prelude::*;
use common::{RecordBuilder, TranscriptBuilder};
use predicates::prelude::*;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_session-importer"))
}

#[test]
fn test_cli_import_and_list() {
    let transcript = TranscriptBuilder::new()
        .record(RecordBuilder::new("cli-session").user_text("u1", "hello"))
        .record(
            RecordBuilder::new("cli-session")
                .timestamp("2024-01-01T00:00:05.000Z")
                .assistant_text("u2", "hi"),
        );
    let path = transcript.write("session.jsonl");
    let db = transcript.dir().path().join("store.db3");

    bin()
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported cli-session (2 messages)"));

    bin()
        .arg("--db")
        .arg(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("cli-session"))
        .stdout(predicate::str::contains("2 messages"));
}

#[test]
fn test_cli_reimport_stays_deduplicated() {
    let transcript = TranscriptBuilder::new()
        .record(RecordBuilder::new("cli-session").user_text("u1", "hello"));
    let path = transcript.write("session.jsonl");
    let db = transcript.dir().path().join("store.db3");

    for _ in 0..2 {
        bin().arg("--db").arg(&db).arg("import").arg(&path).assert().success();
    }

    bin()
        .arg("--db")
        .arg(&db)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversations: 1"))
        .stdout(predicate::str::contains("Total messages: 1"));
}

#[test]
fn test_cli_show_renders_messages() {
    let transcript = TranscriptBuilder::new()
        .record(RecordBuilder::new("cli-session").user_text("u1", "show me"));
    let path = transcript.write("session.jsonl");
    let db = transcript.dir().path().join("store.db3");

    bin().arg("--db").arg(&db).arg("import").arg(&path).assert().success();
    bin()
        .arg("--db")
        .arg(&db)
        .arg("show")
        .arg("cli-session")
        .assert()
        .success()
        .stdout(predicate::str::contains("cli-session"))
        .stdout(predicate::str::contains("show me"));
}

#[test]
fn test_cli_rename_and_delete() {
    let transcript = TranscriptBuilder::new()
        .record(RecordBuilder::new("cli-session").user_text("u1", "hello"));
    let path = transcript.write("session.jsonl");
    let db = transcript.dir().path().join("store.db3");

    bin().arg("--db").arg(&db).arg("import").arg(&path).assert().success();
    bin()
        .arg("--db")
        .arg(&db)
        .args(["rename", "cli-session", "A better name"])
        .assert()
        .success();
    bin()
        .arg("--db")
        .arg(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("A better name"));

    bin().arg("--db").arg(&db).args(["delete", "cli-session"]).assert().success();
    bin()
        .arg("--db")
        .arg(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversations imported yet"));
}

#[test]
fn test_cli_import_directory_walks_jsonl_files() {
    let transcript = TranscriptBuilder::new()
        .record(RecordBuilder::new("dir-session").user_text("u1", "hello"));
    transcript.write("inner.jsonl");
    std::fs::write(transcript.dir().path().join("notes.txt"), "not a transcript").unwrap();
    let db_dir = tempfile::TempDir::new().unwrap();
    let db = db_dir.path().join("store.db3");

    bin()
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(transcript.dir().path())
        .assert()
        .success()
        .stdout(predicate::str::contains("dir-session"));
}

#[test]
fn test_cli_import_auto_title() {
    let transcript = TranscriptBuilder::new()
        .record(RecordBuilder::new("cli-session").user_text("u1", "fix the login page"));
    let path = transcript.write("session.jsonl");
    let db = transcript.dir().path().join("store.db3");

    bin()
        .arg("--db")
        .arg(&db)
        .args(["import", "--auto-title"])
        .arg(&path)
        .assert()
        .success();
    bin()
        .arg("--db")
        .arg(&db)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("fix the login page"));
}

#[test]
fn test_cli_import_invalid_file_fails_with_message() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.jsonl");
    std::fs::write(&path, "not a transcript\nat all").unwrap();
    let db = dir.path().join("store.db3");

    bin()
        .arg("--db")
        .arg(&db)
        .arg("import")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid transcript"));
}

#[test]
fn test_cli_show_unknown_session_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let db = dir.path().join("store.db3");

    bin()
        .arg("--db")
        .arg(&db)
        .args(["show", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no conversation with session id"));
}
