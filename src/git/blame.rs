//! Git blame integration for line-level change logs
//!
//! Blames every matching file of the HEAD tree and emits one
//! [`LineRecord`] per line, attributed to the commit that last touched it.

use crate::config::CollectConfig;
use crate::models::{start_of_day, LineRecord};
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset};
use git2::{Repository, Time};
use ignore::overrides::OverrideBuilder;
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Walks a repository and blames its files in parallel.
pub struct LogCollector {
    workdir: PathBuf,
    config: CollectConfig,
}

impl LogCollector {
    /// Open the repository containing `path`.
    pub fn open(path: &Path, config: CollectConfig) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Failed to open git repository at {:?}", path))?;
        let workdir = repo
            .workdir()
            .with_context(|| format!("Repository at {:?} has no working directory", repo.path()))?
            .to_path_buf();
        Ok(Self { workdir, config })
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Repository-relative paths of candidate files, `/`-separated and sorted.
    ///
    /// Honours .gitignore and the configured exclusion globs.
    pub fn candidate_files(&self) -> Result<Vec<String>> {
        let mut overrides = OverrideBuilder::new(&self.workdir);
        for pattern in &self.config.exclude {
            overrides
                .add(&format!("!{}", pattern))
                .with_context(|| format!("Invalid exclude pattern: {}", pattern))?;
        }
        let overrides = overrides.build().context("Failed to build exclude patterns")?;

        let walker = WalkBuilder::new(&self.workdir)
            .hidden(true)
            .git_ignore(true)
            .git_exclude(true)
            .require_git(false)
            .overrides(overrides)
            .build();

        let mut files = Vec::new();
        for entry in walker.flatten() {
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let path = entry.path();
            if !self.config.includes_extension(path) {
                continue;
            }
            let Ok(relative) = path.strip_prefix(&self.workdir) else {
                continue;
            };
            let relative: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            files.push(relative.join("/"));
        }
        files.sort();
        Ok(files)
    }

    /// Blame every candidate file. Rows are ordered by file, then line.
    pub fn collect(&self) -> Result<Vec<LineRecord>> {
        let files = self.candidate_files()?;
        info!("Blaming {} files in {}", files.len(), self.workdir.display());

        let workdir = &self.workdir;
        let per_file: Vec<Vec<LineRecord>> = files
            .par_iter()
            .map(|file| {
                // One handle per task: Repository is not Sync
                let repo = match Repository::open(workdir) {
                    Ok(repo) => repo,
                    Err(e) => {
                        debug!("Cannot open repository for {}: {}", file, e);
                        return Vec::new();
                    }
                };
                match blame_file_lines(&repo, file) {
                    Ok(rows) => rows,
                    Err(e) => {
                        debug!("Skipping {}: {:#}", file, e);
                        Vec::new()
                    }
                }
            })
            .collect();

        let mut rows: Vec<LineRecord> = per_file.into_iter().flatten().collect();
        rows.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        info!("Collected {} lines", rows.len());
        Ok(rows)
    }
}

/// Blame one file as committed at HEAD.
pub fn blame_file_lines(repo: &Repository, file: &str) -> Result<Vec<LineRecord>> {
    let tree = repo
        .head()
        .and_then(|head| head.peel_to_tree())
        .context("Repository has no HEAD commit")?;
    let entry = tree
        .get_path(Path::new(file))
        .with_context(|| format!("{} is not tracked at HEAD", file))?;
    let blob = repo
        .find_blob(entry.id())
        .with_context(|| format!("{} is not a file", file))?;
    if blob.is_binary() {
        anyhow::bail!("{} is binary", file);
    }
    let content = String::from_utf8_lossy(blob.content());
    let texts: Vec<&str> = content.lines().collect();

    let blame = repo
        .blame_file(Path::new(file), None)
        .with_context(|| format!("Failed to blame {}", file))?;

    let language = language_tag(file);
    let mut rows = Vec::with_capacity(texts.len());
    for hunk in blame.iter() {
        let commit_id = hunk.final_commit_id();
        // Uncommitted lines
        if commit_id.is_zero() {
            continue;
        }
        let sig = hunk.final_signature();
        let author = sig.name().unwrap_or("Unknown").to_string();
        let Some(datetime) = git_time_to_datetime(&sig.when()) else {
            debug!("Invalid timestamp on {} in {}", commit_id, file);
            continue;
        };
        let date = start_of_day(&datetime);
        let commit = commit_id.to_string();

        let start = hunk.final_start_line();
        for line_no in start..start + hunk.lines_in_hunk() {
            let Some(text) = texts.get(line_no - 1) else {
                continue;
            };
            rows.push(LineRecord {
                file: file.to_string(),
                language: language.clone(),
                line: line_no as u32,
                depth: indentation(text),
                length: text.chars().count() as u32,
                commit: commit.clone(),
                author: author.clone(),
                date,
                datetime,
            });
        }
    }
    Ok(rows)
}

/// Convert a git timestamp to a datetime in its recorded offset.
pub fn git_time_to_datetime(time: &Time) -> Option<DateTime<FixedOffset>> {
    let offset = FixedOffset::east_opt(time.offset_minutes() * 60)?;
    DateTime::from_timestamp(time.seconds(), 0).map(|utc| utc.with_timezone(&offset))
}

/// Lowercased extension, or the file name when there is none.
pub fn language_tag(file: &str) -> String {
    let path = Path::new(file);
    path.extension()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Number of leading whitespace characters.
pub fn indentation(text: &str) -> u32 {
    text.chars().take_while(|c| c.is_whitespace()).count() as u32
}
