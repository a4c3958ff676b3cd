pub const OVERVIEW: &str = r#"Create a well-structured summary that includes:
1. What this repository is about
2. Key features and functionality
3. Technology stack and programming language
4. Community engagement (stars, forks)
5. Potential use cases or target audience

Keep the summary informative, concise, and professional. Limit to 3-4 paragraphs."#;

pub const TECHNICAL: &str = r#"Create a technical summary that includes:
1. Architecture and design patterns
2. Technology stack and dependencies
3. Code quality indicators
4. Development practices
5. Technical complexity assessment

Focus on technical aspects that would be valuable for developers. Limit to 3-4 paragraphs."#;

pub const BUSINESS: &str = r#"Create a business summary that includes:
1. Business value and market potential
2. Commercial applications
3. Competitive advantages
4. Community adoption and growth
5. Investment or partnership opportunities

Focus on business aspects and commercial viability. Limit to 3-4 paragraphs."#;

pub const GENERIC: &str = r#"Provide a clear and informative summary about what this repository does,
its key features, and why it might be useful. Limit to 2-3 paragraphs."#;

pub const ACTIVITY_RULES: &str = r#"IMPORTANT INSTRUCTIONS:
- Refer to commits by their exact commit title as listed above, in quotes.
- Use the author names exactly as listed above.
- Only use the commits, authors and numbers provided. Never invent commits, authors,
  features or statistics that are not in the data.
- If the data does not support a section, say so briefly instead of guessing."#;

pub const WEEKLY_FORMAT: &str = r#"REQUIRED OUTPUT FORMAT:
## Weekly Overview
<two or three sentences on the overall activity this week>

## Key Changes
- "<exact commit title>" by <author>: <what it changes>

## Top Contributors
- <author>: <number> commits, <what they worked on>

## Change Categories
<features, fixes, documentation, refactoring and other work, with counts>

## Development Momentum
<one short paragraph on direction and pace>"#;

pub const COMMITS_FORMAT: &str = r#"REQUIRED OUTPUT FORMAT:
## Commit Patterns
<frequency and size of commits>

## Notable Commits
- "<exact commit title>" by <author> (+<additions>/-<deletions>): <impact>

## Top Contributors
- <author>: <collaboration and focus areas>

## Change Categories
<breakdown with counts and what it says about the work>

## Quality Indicators
<what the commit messages and change sizes suggest about practices>"#;
