//! Live revision source using `git` CLI commands.

use std::path::PathBuf;
use std::process::Command;

use tracing::debug;

use crate::ports::{RevisionSource, StatKind};
use crate::pull_request::safe_name;

/// Revision source that shells out to the `git` CLI.
#[derive(Debug, Clone, Default)]
pub struct LiveGitRevisions {
    git_dir: Option<PathBuf>,
}

impl LiveGitRevisions {
    /// Runs git in the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs git inside `dir`.
    #[must_use]
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            git_dir: Some(dir.into()),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new("git");
        if let Some(dir) = &self.git_dir {
            command.arg("-C").arg(dir);
        }
        command.args(args);
        command
    }

    fn git(&self, args: &[&str]) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        debug!(?args, "running git");
        let output = self.command(args).output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let command = args.join(" ");
            return Err(format!("git {command} failed: {}", stderr.trim()).into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn git_lines(
        &self,
        args: &[&str],
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        Ok(self
            .git(args)?
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(String::from)
            .collect())
    }
}

impl RevisionSource for LiveGitRevisions {
    fn file_at_revision(
        &self,
        revision: &str,
        path: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let listed = self.git(&["ls-tree", "--name-only", revision, "--", path])?;
        if listed.trim().is_empty() {
            debug!(revision, path, "file absent at revision");
            return Ok(String::new());
        }
        self.git(&["show", &format!("{revision}:{path}")])
    }

    fn changed_paths(
        &self,
        base: &str,
        to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let range = format!("{base}...{to}");
        self.git_lines(&["diff", "--name-only", &range])
    }

    fn commits(
        &self,
        base: &str,
        to: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        let range = format!("{base}...{to}");
        self.git_lines(&["log", "--oneline", &range])
    }

    fn short_revision(
        &self,
        reference: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let revision = self.git(&["rev-list", "--abbrev-commit", "-n1", reference])?;
        Ok(revision.trim().to_string())
    }

    fn reference(&self, name: &str) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let branch = safe_name(name);
        let tags = self.git_lines(&["tag", "--points-at", name])?;
        if let Some(tag) = tags.into_iter().find(|tag| tag.contains(branch)) {
            return Ok(tag);
        }
        let revision = self.git(&["rev-parse", "--short", name])?;
        Ok(revision.trim().to_string())
    }

    fn diff_stat(
        &self,
        base: &str,
        to: &str,
        kind: StatKind,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        let range = format!("{base}...{to}");
        match kind {
            StatKind::Dir => self.git(&["diff", "--dirstat=lines,cumulative", &range]),
            StatKind::Full => self.git(&["diff", "--stat", &range]),
        }
    }

    fn tags(&self) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.git_lines(&["tag", "-l"])
    }

    fn merge_files(
        &self,
        commit: &str,
    ) -> Result<Vec<String>, Box<dyn std::error::Error + Send + Sync>> {
        self.git_lines(&[
            "log",
            "-m",
            "-1",
            "--name-only",
            "--first-parent",
            "--pretty=format:",
            commit,
        ])
    }

    fn remote_url(&self) -> Result<Option<String>, Box<dyn std::error::Error + Send + Sync>> {
        let output = self
            .command(&["config", "--get", "remote.origin.url"])
            .output()?;
        // `git config --get` exits 1 when the key is unset.
        if output.status.code() == Some(1) {
            return Ok(None);
        }
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            let message = format!("git config --get remote.origin.url failed: {stderr}");
            return Err(message.into());
        }
        let url = String::from_utf8_lossy(&output.stdout).trim().to_string();
        Ok(Some(url).filter(|u| !u.is_empty()))
    }
}
