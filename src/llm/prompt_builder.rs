use crate::aggregate::{self, CommitDigest};
use crate::llm::prompts;
use crate::models::{CommitRecord, RepositorySnapshot, SummaryKind};

/// Commits shown in a weekly summary prompt.
pub const WEEKLY_COMMIT_LIMIT: usize = 20;
/// Commits shown in a detailed commit analysis prompt.
pub const DETAILED_COMMIT_LIMIT: usize = 25;
const TOP_CONTRIBUTORS: usize = 5;

const NO_DESCRIPTION: &str = "No description available";

/// Render the prompt for `kind`.
///
/// Activity kinds (`weekly`, `commits`) use `commits`; the rest ignore it.
pub fn build(
    repository: &RepositorySnapshot,
    commits: Option<&[CommitRecord]>,
    kind: SummaryKind,
) -> String {
    match kind {
        SummaryKind::Weekly | SummaryKind::Commits => {
            activity_prompt(repository, commits.unwrap_or(&[]), kind)
        }
        SummaryKind::Overview | SummaryKind::Technical | SummaryKind::Business => {
            repository_prompt(repository, kind)
        }
        SummaryKind::Default => generic_prompt(repository),
    }
}

fn description(repository: &RepositorySnapshot) -> &str {
    repository
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION)
}

fn language(repository: &RepositorySnapshot) -> &str {
    repository.primary_language.as_deref().unwrap_or("Unknown")
}

fn repository_prompt(repository: &RepositorySnapshot, kind: SummaryKind) -> String {
    let (intro, checklist, answer) = match kind {
        SummaryKind::Technical => (
            "Provide a technical analysis summary of this GitHub repository:",
            prompts::TECHNICAL,
            "Technical Analysis:",
        ),
        SummaryKind::Business => (
            "Provide a business-focused summary of this GitHub repository:",
            prompts::BUSINESS,
            "Business Analysis:",
        ),
        _ => (
            "Provide a comprehensive overview summary of this GitHub repository:",
            prompts::OVERVIEW,
            "Summary:",
        ),
    };

    let topics = if repository.topics.is_empty() {
        "None".to_string()
    } else {
        repository.topics.join(", ")
    };

    format!(
        "{intro}\n\n\
         Repository: {full_name}\n\
         Description: {description}\n\
         Primary Language: {language}\n\
         Stars: {stars}\n\
         Forks: {forks}\n\
         Topics: {topics}\n\
         License: {license}\n\n\
         {checklist}\n\n\
         {answer}",
        full_name = repository.full_name,
        description = description(repository),
        language = language(repository),
        stars = repository.stars_count,
        forks = repository.forks_count,
        license = repository.license_name.as_deref().unwrap_or("No license"),
    )
}

fn generic_prompt(repository: &RepositorySnapshot) -> String {
    format!(
        "Summarize this GitHub repository:\n\n\
         Repository: {full_name}\n\
         Description: {description}\n\n\
         {generic}\n\n\
         Summary:",
        full_name = repository.full_name,
        description = description(repository),
        generic = prompts::GENERIC,
    )
}

fn activity_prompt(
    repository: &RepositorySnapshot,
    commits: &[CommitRecord],
    kind: SummaryKind,
) -> String {
    let (limit, intro, format_block, answer) = if kind == SummaryKind::Commits {
        (
            DETAILED_COMMIT_LIMIT,
            "Analyze the recent commits for this GitHub repository.",
            prompts::COMMITS_FORMAT,
            "Analysis:",
        )
    } else {
        (
            WEEKLY_COMMIT_LIMIT,
            "Summarize the weekly development activity for this GitHub repository.",
            prompts::WEEKLY_FORMAT,
            "Summary:",
        )
    };

    let digest = aggregate::aggregate(commits, limit);

    let mut out = String::new();
    out.push_str(intro);
    out.push_str("\n\n");
    out.push_str(&format!(
        "Repository: {full_name}\nDescription: {description}\nPrimary Language: {language}\n\n",
        full_name = repository.full_name,
        description = description(repository),
        language = language(repository),
    ));

    out.push_str(&format!(
        "Commits from Last Week ({total} total",
        total = commits.len()
    ));
    if commits.len() > limit {
        out.push_str(&format!(", showing the {limit} most recent"));
    }
    out.push_str("):\n");
    if digest.lines.is_empty() {
        out.push_str("No commits found in the last week\n");
    } else {
        for line in &digest.lines {
            out.push_str(line);
            out.push('\n');
        }
    }

    out.push('\n');
    out.push_str(&render_contributors(&digest));
    out.push('\n');
    out.push_str(&render_categories(&digest));
    out.push('\n');
    out.push_str(prompts::ACTIVITY_RULES);
    out.push_str("\n\n");
    out.push_str(format_block);
    out.push_str("\n\n");
    out.push_str(answer);
    out
}

fn render_contributors(digest: &CommitDigest) -> String {
    let mut out = String::from("Top Contributors:\n");
    for stats in digest.top_contributors(TOP_CONTRIBUTORS) {
        let plural = if stats.commit_count == 1 { "" } else { "s" };
        out.push_str(&format!(
            "- {author}: {count} commit{plural} (+{adds}/-{dels})\n",
            author = stats.author,
            count = stats.commit_count,
            adds = stats.total_additions,
            dels = stats.total_deletions,
        ));
    }
    out
}

fn render_categories(digest: &CommitDigest) -> String {
    let c = &digest.categories;
    format!(
        "Change Categories:\n\
         - Features: {}\n\
         - Bug fixes: {}\n\
         - Documentation: {}\n\
         - Refactoring: {}\n\
         - Other: {}\n",
        c.features, c.fixes, c.docs, c.refactor, c.other
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [SummaryKind; 6] = [
        SummaryKind::Overview,
        SummaryKind::Technical,
        SummaryKind::Business,
        SummaryKind::Weekly,
        SummaryKind::Commits,
        SummaryKind::Default,
    ];

    fn repo() -> RepositorySnapshot {
        RepositorySnapshot {
            name: "awesome-project".into(),
            full_name: "microsoft/awesome-project".into(),
            description: Some("An awesome open-source project for developers".into()),
            primary_language: Some("Python".into()),
            stars_count: 1200,
            forks_count: 85,
            topics: vec!["cli".into(), "developer-tools".into()],
            license_name: Some("MIT".into()),
            owner_login: "microsoft".into(),
            ..Default::default()
        }
    }

    fn commits() -> Vec<CommitRecord> {
        let raw = [
            ("feat: Add user authentication system with JWT tokens", "Alice Johnson", 245, 12),
            ("fix: Resolve memory leak in data processing pipeline", "Bob Smith", 23, 45),
            ("docs: Update API documentation with new endpoints", "Carol Davis", 156, 8),
            ("refactor: Optimize database query performance", "Alice Johnson", 89, 134),
            ("feat: Implement real-time notifications feature", "David Wilson", 312, 5),
        ];
        raw.iter()
            .enumerate()
            .map(|(i, (msg, author, adds, dels))| CommitRecord {
                sha: format!("{i:040}"),
                message: format!("{msg}\n\nbody text"),
                author_name: author.to_string(),
                author_date: None,
                additions: *adds,
                deletions: *dels,
            })
            .collect()
    }

    #[test]
    fn every_kind_mentions_full_name() {
        let commits = commits();
        for kind in ALL_KINDS {
            let prompt = build(&repo(), Some(&commits), kind);
            assert!(!prompt.is_empty());
            assert!(prompt.contains("microsoft/awesome-project"), "{kind}");
        }
    }

    #[test]
    fn missing_description_uses_placeholder() {
        let repo = RepositorySnapshot {
            full_name: "octo/demo".into(),
            ..Default::default()
        };
        let prompt = build(&repo, None, SummaryKind::Overview);
        assert!(prompt.contains("octo/demo"));
        assert!(prompt.contains("Description: No description available"));
        assert!(prompt.contains("Topics: None"));
        assert!(prompt.contains("License: No license"));
        assert!(prompt.contains("Stars: 0"));
    }

    #[test]
    fn repository_kinds_have_distinct_checklists() {
        let overview = build(&repo(), None, SummaryKind::Overview);
        let technical = build(&repo(), None, SummaryKind::Technical);
        let business = build(&repo(), None, SummaryKind::Business);

        assert!(overview.contains("Potential use cases or target audience"));
        assert!(technical.contains("Architecture and design patterns"));
        assert!(business.contains("Commercial applications"));
        for prompt in [&overview, &technical, &business] {
            assert!(prompt.contains("Limit to 3-4 paragraphs"));
            assert!(prompt.contains("Topics: cli, developer-tools"));
        }
    }

    #[test]
    fn default_kind_is_generic() {
        let prompt = build(&repo(), None, SummaryKind::Default);
        assert!(prompt.starts_with("Summarize this GitHub repository:"));
        assert!(prompt.contains("Limit to 2-3 paragraphs"));
        assert!(!prompt.contains("Stars:"));
    }

    #[test]
    fn weekly_prompt_is_structured() {
        let prompt = build(&repo(), Some(&commits()), SummaryKind::Weekly);
        assert!(prompt.contains("Commits from Last Week (5 total):"));
        assert!(prompt.contains("\"feat: Add user authentication system with JWT tokens\""));
        assert!(prompt.contains("Alice Johnson"));
        assert!(prompt.contains("+245/-12"));
        assert!(prompt.contains("REQUIRED OUTPUT FORMAT"));
        assert!(prompt.contains("IMPORTANT INSTRUCTIONS"));
        assert!(prompt.contains("Top Contributors"));
        assert!(prompt.contains("Change Categories"));
        assert!(prompt.to_lowercase().contains("exact commit title"));
        assert!(!prompt.contains("body text"));
    }

    #[test]
    fn contributors_ranked_by_commit_count() {
        let prompt = build(&repo(), Some(&commits()), SummaryKind::Commits);
        let alice = prompt.find("- Alice Johnson: 2 commits").unwrap();
        let bob = prompt.find("- Bob Smith: 1 commit ").unwrap();
        let david = prompt.find("- David Wilson: 1 commit ").unwrap();
        assert!(alice < bob && bob < david);
        assert!(prompt.contains("- Features: 2"));
    }

    #[test]
    fn rendered_titles_come_from_input() {
        let mut commits = commits();
        commits[0].message = format!("feat: {}", "long ".repeat(40));
        let prompt = build(&repo(), Some(&commits), SummaryKind::Weekly);

        let titles: Vec<&str> = commits.iter().map(|c| c.title()).collect();
        let rendered = prompt
            .lines()
            .filter(|l| l.starts_with("- \"") && l.ends_with(')'));
        for line in rendered {
            let quoted = line.trim_start_matches("- \"");
            let title = &quoted[..quoted.find("\" by ").unwrap()];
            let title = title.trim_end_matches("...");
            assert!(titles.iter().any(|t| t.starts_with(title)), "{title}");
        }
    }

    #[test]
    fn caps_listed_commits_per_kind() {
        let many: Vec<CommitRecord> = (0..30)
            .map(|i| CommitRecord {
                sha: i.to_string(),
                message: format!("commit number {i}"),
                author_name: "Dana".into(),
                ..Default::default()
            })
            .collect();

        let weekly = build(&repo(), Some(&many), SummaryKind::Weekly);
        assert!(weekly.contains("(30 total, showing the 20 most recent)"));
        assert!(weekly.contains("\"commit number 19\""));
        assert!(!weekly.contains("\"commit number 20\""));

        let detailed = build(&repo(), Some(&many), SummaryKind::Commits);
        assert!(detailed.contains("\"commit number 24\""));
        assert!(!detailed.contains("\"commit number 25\""));
    }

    #[test]
    fn empty_commit_list_renders_without_panicking() {
        let prompt = build(&repo(), Some(&[]), SummaryKind::Weekly);
        assert!(prompt.contains("No commits found in the last week"));
        let prompt = build(&repo(), None, SummaryKind::Commits);
        assert!(prompt.contains("(0 total)"));
    }
}
