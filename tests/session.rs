use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::TempDir;

fn bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_todo"))
}

fn run_with_args(dir: &Path, args: &[&str], input: &str) -> Output {
    let mut child = bin()
        .current_dir(dir)
        .args(args)
        .env("RUST_LOG", "todo=info")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn todo");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(input.as_bytes())
        .expect("write requests");
    child.wait_with_output().expect("wait")
}

fn run(dir: &Path, input: &str) -> (String, String) {
    let out = run_with_args(dir, &[], input);
    assert!(out.status.success(), "todo failed: {:?}", out);
    (
        String::from_utf8(out.stdout).expect("utf8 stdout"),
        String::from_utf8(out.stderr).expect("utf8 stderr"),
    )
}

fn stored(dir: &Path) -> Vec<Value> {
    let raw = std::fs::read_to_string(dir.join("todo-list.json")).expect("read todo-list.json");
    serde_json::from_str(&raw).expect("json array")
}

#[test]
fn add_then_list_shows_task_block() {
    let dir = TempDir::new().expect("tempdir");
    let (stdout, _) = run(dir.path(), "add x -t Buy milk -dl 25/12/2030\nlist\nexit\n");
    assert_eq!(
        stdout,
        "Task 1 was added successfully\n\
         ############\n\
         Task 1\n\
         \"Buy milk\"\n\
         Deadline: 25/12/2030\n"
    );
}

#[test]
fn expired_tasks_are_listed_under_expired_only() {
    let dir = TempDir::new().expect("tempdir");
    let (stdout, _) = run(
        dir.path(),
        "add -t Old task -dl 01/01/2000\nlist done\nlist expired\nexit\n",
    );
    assert_eq!(
        stdout,
        "Task 1 was added successfully\n\
         ############\n\
         Task 1 (expired)\n\
         \"Old task\"\n\
         Deadline: 01/01/2000\n"
    );
}

#[test]
fn unknown_ids_and_bad_requests_are_reported() {
    let dir = TempDir::new().expect("tempdir");
    let (stdout, _) = run(
        dir.path(),
        "remove 1\ndone 2\nremove one\nfrobnicate\nadd -t a -t b\nlist\nexit\n",
    );
    assert_eq!(
        stdout,
        "No task with id 1\n\
         No task with id 2\n\
         Only id numbers expected in this request\n\
         Unsupported operation\n\
         Couldn't parse add request options: Ambiguous -t option\n"
    );
}

#[test]
fn done_then_remove_leaves_nothing() {
    let dir = TempDir::new().expect("tempdir");
    let (stdout, _) = run(dir.path(), "add -t Only\ndone 1\nremove 1\nlist all\nexit\n");
    assert_eq!(
        stdout,
        "Task 1 was added successfully\n\
         Task 1 was marked as done\n\
         Task 1 was removed successfully\n"
    );
    assert!(stored(dir.path()).is_empty());
}

#[test]
fn tasks_survive_a_restart() {
    let dir = TempDir::new().expect("tempdir");
    run(dir.path(), "add -t First -dt with details\nadd -t Second\ndone 2\nexit\n");

    let tasks = stored(dir.path());
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["title"], "First");
    assert_eq!(tasks[0]["details"], "with details");
    assert_eq!(tasks[1]["done"], true);

    let (stdout, _) = run(dir.path(), "list done\nexit\n");
    assert_eq!(stdout, "############\nTask 2 (done)\n\"Second\"\nDeadline: no\n");
}

#[test]
fn end_of_input_still_flushes() {
    let dir = TempDir::new().expect("tempdir");
    run(dir.path(), "add -t Unterminated");
    let tasks = stored(dir.path());
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Unterminated");
}

#[test]
fn load_appends_and_truncates_to_capacity() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(
        dir.path().join("extra.json"),
        r#"[
            {"id": 7, "title": "a", "done": false},
            {"id": 8, "title": "b", "done": true},
            {"id": 9, "title": "c", "done": false}
        ]"#,
    )
    .expect("write extra.json");

    let out = run_with_args(
        dir.path(),
        &["--max-tasks", "3"],
        "add -t mine\nload extra.json\nlist undone\nexit\n",
    );
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    let stderr = String::from_utf8(out.stderr).unwrap();

    assert!(stdout.contains("Loaded 2 task(s) from extra.json"), "{stdout}");
    assert!(stdout.contains("Task 1\n\"mine\""));
    assert!(!stdout.contains("\"b\""));
    assert!(stderr.contains("not all tasks were loaded"), "{stderr}");

    let titles: Vec<Value> = stored(dir.path()).iter().map(|t| t["title"].clone()).collect();
    assert_eq!(titles, vec!["mine", "a", "b"]);
}

#[test]
fn db_flag_selects_the_file() {
    let dir = TempDir::new().expect("tempdir");
    let out = run_with_args(dir.path(), &["--db", "work.json"], "add -t Elsewhere\nexit\n");
    assert!(out.status.success());
    assert!(dir.path().join("work.json").exists());
    assert!(!dir.path().join("todo-list.json").exists());
}

#[test]
fn completions_are_printed() {
    let dir = TempDir::new().expect("tempdir");
    let out = run_with_args(dir.path(), &["--completions", "bash"], "");
    assert!(out.status.success());
    assert!(String::from_utf8(out.stdout).unwrap().contains("todo"));
}

#[test]
fn loading_an_empty_file_warns() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("empty.json"), "[]").expect("write empty.json");
    let (stdout, stderr) = run(dir.path(), "load empty.json\nexit\n");
    assert_eq!(stdout, "Loaded 0 task(s) from empty.json\n");
    assert!(stderr.contains("empty.json does not contain tasks"), "{stderr}");
}
