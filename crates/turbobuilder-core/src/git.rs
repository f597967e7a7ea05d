//! Git queries used for project versions and changelogs

use crate::config::{Tool, Toolchain};
use crate::runtime::ToolCommand;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Version used when the repository has no tags (or is not a repository)
pub const FALLBACK_VERSION: &str = "0.0.0";

const LOG_FORMAT: [&str; 3] = ["--oneline", "--pretty=format:%ad: %s%n%b", "--date=short"];
const SECTION_RULE: &str = "---------------------------------------------";

/// Git commands run against a project folder
#[derive(Debug, Clone)]
pub struct Git {
    program: String,
    repo: PathBuf,
}

impl Git {
    pub fn new(toolchain: &Toolchain, repo: &Path) -> Self {
        Self {
            program: toolchain.program(Tool::Git).to_string(),
            repo: repo.to_path_buf(),
        }
    }

    fn command(&self) -> ToolCommand {
        ToolCommand::new(&self.program).current_dir(&self.repo)
    }

    /// Most recent tag reachable from HEAD
    pub fn latest_tag(&self) -> Option<String> {
        let output = self
            .command()
            .args(["describe", "--abbrev=0", "--tags"])
            .output()
            .ok()?;
        let tag = output.stdout.trim();
        (output.success && !tag.is_empty()).then(|| tag.to_string())
    }

    pub fn count_commits_since_latest_tag(&self) -> usize {
        let Some(tag) = self.latest_tag() else {
            return 0;
        };
        self.command()
            .arg("rev-list")
            .arg(format!("{}..", tag))
            .arg("--count")
            .run()
            .ok()
            .and_then(|count| count.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Project version from the newest tag, optionally followed by ` +<n>` commits since it
    pub fn repo_semver(&self, include_commits: bool) -> String {
        let Some(tag) = self.latest_tag() else {
            return FALLBACK_VERSION.to_string();
        };
        let commits = if include_commits {
            self.count_commits_since_latest_tag()
        } else {
            0
        };
        if commits > 0 {
            format!("{} +{}", tag, commits)
        } else {
            tag
        }
    }

    /// Every tag, newest version first
    pub fn tags_newest_first(&self) -> Result<Vec<String>> {
        let output = self
            .command()
            .args(["tag", "--sort", "version:refname"])
            .run()?;
        Ok(output
            .lines()
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .rev()
            .map(String::from)
            .collect())
    }

    /// One line per commit in `range` (`date: subject` plus body)
    pub fn log(&self, range: &str) -> Result<String> {
        self.command().arg("log").arg(range).args(LOG_FORMAT).run()
    }

    /// Changelog with the unreleased commits and the newest `count` tagged versions
    pub fn changelog(&self, title: &str, count: usize) -> Result<String> {
        let tags = self.tags_newest_first()?;
        let unreleased = match tags.first() {
            Some(newest) => self.log(&format!("{}..HEAD", newest))?,
            None => self.log("HEAD")?,
        };

        let mut versions = Vec::new();
        for (i, tag) in tags.iter().take(count).enumerate() {
            let range = match tags.get(i + 1) {
                Some(previous) => format!("{}..{}", previous, tag),
                None => tag.clone(),
            };
            versions.push((tag.clone(), self.log(&range)?));
        }

        Ok(format_changelog(title, &unreleased, &versions))
    }
}

/// Lay out a changelog: the title, unreleased changes, then a section per version
pub fn format_changelog(title: &str, unreleased: &str, versions: &[(String, String)]) -> String {
    let mut contents = format!("{} CHANGELOG {}\n\n{}", title, SECTION_RULE, unreleased);
    for (tag, log) in versions {
        contents.push_str(&format!("\n\n\nVERSION: {} {}\n\n{}", tag, SECTION_RULE, log));
    }
    contents
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_changelog() {
        let versions = vec![
            ("1.1.0".to_string(), "2024-02-01: add feature".to_string()),
            ("1.0.0".to_string(), "2024-01-01: first".to_string()),
        ];
        let changelog = format_changelog("mylib-1.1.0", "2024-03-01: fix", &versions);

        assert!(changelog.starts_with("mylib-1.1.0 CHANGELOG ----"));
        assert!(changelog.contains("2024-03-01: fix"));
        let newer = changelog.find("VERSION: 1.1.0").unwrap();
        let older = changelog.find("VERSION: 1.0.0").unwrap();
        assert!(newer < older);
    }

    #[test]
    fn test_not_a_repository_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let git = Git::new(&Toolchain::default(), dir.path());

        assert!(git.latest_tag().is_none());
        assert_eq!(git.count_commits_since_latest_tag(), 0);
        assert_eq!(git.repo_semver(true), FALLBACK_VERSION);
    }

    #[test]
    fn test_missing_git_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let toolchain = Toolchain::default().with_program(Tool::Git, "turbobuilder-no-git");
        let git = Git::new(&toolchain, dir.path());

        assert_eq!(git.repo_semver(false), FALLBACK_VERSION);
        assert!(git.tags_newest_first().is_err());
    }
}
