//! Per-author and per-category statistics over a commit list.

use crate::models::CommitRecord;

/// Commit titles longer than this are cut and suffixed with `...`.
pub const MAX_TITLE_CHARS: usize = 120;

const FEATURE_KEYWORDS: &[&str] = &["feat", "add", "implement", "introduce", "support"];
const FIX_KEYWORDS: &[&str] = &["fix", "bug", "resolve", "patch", "hotfix", "issue"];
const DOCS_KEYWORDS: &[&str] = &["doc", "readme", "changelog", "comment"];
const REFACTOR_KEYWORDS: &[&str] = &["refactor", "clean", "optimi", "restructure", "rename", "simplif"];

/// Category a commit message falls into. Checked in declaration order; first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeCategory {
    Feature,
    Fix,
    Docs,
    Refactor,
    Other,
}

impl ChangeCategory {
    pub fn classify(message: &str) -> Self {
        let lower = message.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if hit(FEATURE_KEYWORDS) {
            ChangeCategory::Feature
        } else if hit(FIX_KEYWORDS) {
            ChangeCategory::Fix
        } else if hit(DOCS_KEYWORDS) {
            ChangeCategory::Docs
        } else if hit(REFACTOR_KEYWORDS) {
            ChangeCategory::Refactor
        } else {
            ChangeCategory::Other
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub features: usize,
    pub fixes: usize,
    pub docs: usize,
    pub refactor: usize,
    pub other: usize,
}

impl CategoryCounts {
    fn record(&mut self, category: ChangeCategory) {
        match category {
            ChangeCategory::Feature => self.features += 1,
            ChangeCategory::Fix => self.fixes += 1,
            ChangeCategory::Docs => self.docs += 1,
            ChangeCategory::Refactor => self.refactor += 1,
            ChangeCategory::Other => self.other += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.features + self.fixes + self.docs + self.refactor + self.other
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorStats {
    pub author: String,
    pub commit_count: usize,
    pub total_additions: u64,
    pub total_deletions: u64,
}

/// Result of [`aggregate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDigest {
    /// Authors in order of first appearance.
    pub authors: Vec<AuthorStats>,
    pub categories: CategoryCounts,
    /// One rendered line per considered commit, in input order.
    pub lines: Vec<String>,
}

impl CommitDigest {
    /// Authors ranked by commit count, ties kept in first-appearance order.
    pub fn top_contributors(&self, n: usize) -> Vec<&AuthorStats> {
        let mut ranked: Vec<&AuthorStats> = self.authors.iter().collect();
        // sort_by is stable
        ranked.sort_by(|a, b| b.commit_count.cmp(&a.commit_count));
        ranked.truncate(n);
        ranked
    }
}

/// Aggregate the first `limit` commits of `commits`.
pub fn aggregate(commits: &[CommitRecord], limit: usize) -> CommitDigest {
    let mut digest = CommitDigest::default();

    for commit in commits.iter().take(limit) {
        let author = if commit.author_name.trim().is_empty() {
            "Unknown"
        } else {
            commit.author_name.trim()
        };

        match digest.authors.iter_mut().find(|s| s.author == author) {
            Some(stats) => {
                stats.commit_count += 1;
                stats.total_additions += commit.additions;
                stats.total_deletions += commit.deletions;
            }
            None => digest.authors.push(AuthorStats {
                author: author.to_string(),
                commit_count: 1,
                total_additions: commit.additions,
                total_deletions: commit.deletions,
            }),
        }

        digest
            .categories
            .record(ChangeCategory::classify(&commit.message));

        digest.lines.push(format!(
            "- \"{title}\" by {author} (+{adds}/-{dels})",
            title = truncate_title(commit.title()),
            adds = commit.additions,
            dels = commit.deletions,
        ));
    }

    digest
}

/// Cut a title to [`MAX_TITLE_CHARS`] characters, appending `...` when cut.
pub fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }
    let mut out: String = title.chars().take(MAX_TITLE_CHARS).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit(message: &str, author: &str, additions: u64, deletions: u64) -> CommitRecord {
        CommitRecord {
            sha: format!("{:x}", message.len()),
            message: message.to_string(),
            author_name: author.to_string(),
            author_date: None,
            additions,
            deletions,
        }
    }

    fn sample() -> Vec<CommitRecord> {
        vec![
            commit("feat: Add user authentication system with JWT tokens", "Alice Johnson", 245, 12),
            commit("fix: Resolve memory leak in data processing pipeline", "Bob Smith", 23, 45),
            commit("docs: Update API documentation with new endpoints", "Carol Davis", 156, 8),
            commit("refactor: Optimize database query performance", "Alice Johnson", 89, 134),
            commit("chore: bump version", "Bob Smith", 1, 1),
        ]
    }

    #[test]
    fn classification_follows_precedence() {
        assert_eq!(ChangeCategory::classify("FEAT: new parser"), ChangeCategory::Feature);
        // mentions both a feature and a fix keyword
        assert_eq!(ChangeCategory::classify("Add fix for crash"), ChangeCategory::Feature);
        assert_eq!(ChangeCategory::classify("Fix typo in README"), ChangeCategory::Fix);
        assert_eq!(ChangeCategory::classify("Update README"), ChangeCategory::Docs);
        assert_eq!(ChangeCategory::classify("Rename module"), ChangeCategory::Refactor);
        assert_eq!(ChangeCategory::classify("bump deps"), ChangeCategory::Other);
    }

    #[test]
    fn counts_sum_to_considered_commits() {
        let commits = sample();
        let digest = aggregate(&commits, 20);
        assert_eq!(digest.categories.total(), commits.len());
        assert_eq!(
            digest.categories,
            CategoryCounts { features: 1, fixes: 1, docs: 1, refactor: 1, other: 1 }
        );

        let limited = aggregate(&commits, 3);
        assert_eq!(limited.categories.total(), 3);
        assert_eq!(limited.lines.len(), 3);
    }

    #[test]
    fn author_stats_accumulate() {
        let digest = aggregate(&sample(), 20);
        let alice = &digest.authors[0];
        assert_eq!(alice.author, "Alice Johnson");
        assert_eq!(alice.commit_count, 2);
        assert_eq!(alice.total_additions, 334);
        assert_eq!(alice.total_deletions, 146);
    }

    #[test]
    fn ranking_is_stable_on_ties() {
        let digest = aggregate(&sample(), 20);
        let names: Vec<&str> = digest
            .top_contributors(5)
            .iter()
            .map(|s| s.author.as_str())
            .collect();
        assert_eq!(names, vec!["Alice Johnson", "Bob Smith", "Carol Davis"]);
    }

    #[test]
    fn aggregation_is_deterministic() {
        let commits = sample();
        let first = aggregate(&commits, 25);
        for _ in 0..5 {
            assert_eq!(aggregate(&commits, 25), first);
        }
    }

    #[test]
    fn renders_line_with_change_deltas() {
        let digest = aggregate(&sample(), 1);
        assert_eq!(
            digest.lines[0],
            "- \"feat: Add user authentication system with JWT tokens\" by Alice Johnson (+245/-12)"
        );
    }

    #[test]
    fn long_titles_are_truncated() {
        let long = "x".repeat(130);
        let out = truncate_title(&long);
        assert_eq!(out.chars().count(), MAX_TITLE_CHARS + 3);
        assert!(out.ends_with("..."));
        assert!(long.starts_with(out.trim_end_matches("...")));

        let exact = "y".repeat(MAX_TITLE_CHARS);
        assert_eq!(truncate_title(&exact), exact);
    }

    #[test]
    fn blank_author_is_unknown() {
        let digest = aggregate(&[commit("misc", "  ", 0, 0)], 10);
        assert_eq!(digest.authors[0].author, "Unknown");
    }
}
