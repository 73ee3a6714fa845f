//! Integration tests for `commitscope collect`
//!
//! Builds a throwaway git repository with known authors and dates, collects
//! its change log and feeds it back through `report`.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

fn git(repo: &Path, args: &[&str], author: &str, date: &str) {
    let status = Command::new("git")
        .args(args)
        .current_dir(repo)
        .env("GIT_AUTHOR_NAME", author)
        .env("GIT_AUTHOR_EMAIL", "dev@example.com")
        .env("GIT_COMMITTER_NAME", author)
        .env("GIT_COMMITTER_EMAIL", "dev@example.com")
        .env("GIT_AUTHOR_DATE", date)
        .env("GIT_COMMITTER_DATE", date)
        .status()
        .expect("git is installed");
    assert!(status.success(), "git {:?} failed", args);
}

/// Two commits: Ada writes index.html and style.css, Grace appends a line
/// to index.html and adds a binary file.
fn sample_repo() -> TempDir {
    let dir = TempDir::new().unwrap();
    let repo = dir.path();
    git(repo, &["init", "-q"], "Ada", "2024-03-01T09:00:00-05:00");

    std::fs::write(repo.join("index.html"), "<html>\n  <body>\n</html>\n").unwrap();
    std::fs::write(repo.join("style.css"), "body {\n    color: red;\n}\n").unwrap();
    git(repo, &["add", "."], "Ada", "2024-03-01T09:00:00-05:00");
    git(repo, &["commit", "-q", "-m", "first"], "Ada", "2024-03-01T09:00:00-05:00");

    std::fs::write(repo.join("index.html"), "<html>\n  <body>\n</html>\n<!-- end -->\n").unwrap();
    std::fs::write(repo.join("logo.png"), [0x89u8, b'P', b'N', b'G', 0, 0, 1, 2]).unwrap();
    git(repo, &["add", "."], "Grace", "2024-03-02T14:30:00-05:00");
    git(repo, &["commit", "-q", "-m", "second"], "Grace", "2024-03-02T14:30:00-05:00");

    // Uncommitted edits are ignored
    std::fs::write(repo.join("scratch.js"), "let x = 1;\n").unwrap();
    dir
}

fn commitscope(args: &[&str], config_dir: &Path) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_commitscope"))
        .args(args)
        .arg("--config")
        .arg(config_dir)
        .output()
        .expect("Failed to execute commitscope binary");
    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.code().unwrap_or(-1),
    )
}

#[test]
fn test_collect_blames_tracked_text_files() {
    let repo = sample_repo();
    let config = TempDir::new().unwrap();
    let (stdout, stderr, code) = commitscope(&["collect", repo.path().to_str().unwrap()], config.path());
    assert_eq!(code, 0, "collect failed: {}", stderr);

    let rows: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        rows[0],
        "file,type,line,depth,length,commit,author,date,time,timezone,datetime"
    );
    // 4 lines of index.html + 3 of style.css; no png, no untracked file
    assert_eq!(rows.len(), 1 + 7);
    assert!(rows[1].starts_with("index.html,html,1,0,6,"));
    assert!(rows[1].ends_with(",Ada,2024-03-01,09:00:00,-05:00,2024-03-01T09:00:00-05:00"));
    assert!(rows[2].starts_with("index.html,html,2,2,8,"));
    assert!(rows[4].contains(",Grace,2024-03-02,14:30:00,-05:00,"));
    assert!(rows[6].starts_with("style.css,css,2,4,15,"));
    assert!(!stdout.contains("logo.png"));
    assert!(!stdout.contains("scratch.js"));
}

#[test]
fn test_collected_log_feeds_report() {
    let repo = sample_repo();
    let config = TempDir::new().unwrap();
    let log = config.path().join("loc.csv");
    let (_, stderr, code) = commitscope(
        &["collect", repo.path().to_str().unwrap(), "-o", log.to_str().unwrap()],
        config.path(),
    );
    assert_eq!(code, 0, "collect failed: {}", stderr);

    let (stdout, stderr, code) = commitscope(&["report", log.to_str().unwrap(), "-f", "json"], config.path());
    assert_eq!(code, 0, "report failed: {}", stderr);
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["summary"]["commits"], 2);
    assert_eq!(json["summary"]["files"], 2);
    assert_eq!(json["summary"]["total_loc"], 7);
    assert_eq!(json["commits"][0]["author"], "Ada");
    assert_eq!(json["commits"][0]["hour_frac"], 9.0);
    assert_eq!(json["commits"][1]["total_lines"], 1);
}

#[test]
fn test_collect_outside_repository_fails() {
    let dir = TempDir::new().unwrap();
    let (_, stderr, code) = commitscope(&["collect", dir.path().to_str().unwrap()], dir.path());
    assert_ne!(code, 0);
    assert!(stderr.contains("git repository"), "stderr: {}", stderr);
}
