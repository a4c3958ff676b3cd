//! Heuristic 0-100 confidence score for generated text.
//!
//! Independent of whatever confidence the backend itself reports. Bonus and penalty
//! brackets are applied independently, so their arithmetic can overlap.

use std::collections::HashSet;

const BASE_SCORE: i32 = 50;
const QUALITY_KEYWORDS: &[&str] = &["repository", "project", "software", "application"];
const MIN_UNIQUE_WORD_RATIO: f64 = 0.7;

/// Score `content` after trimming. Lengths are in characters.
pub fn score(content: &str) -> u8 {
    let text = content.trim();
    let len = text.chars().count();
    let mut score = BASE_SCORE;

    if len > 100 {
        score += 20;
    } else if len > 50 {
        score += 10;
    }

    // more than two '.'-separated segments, empty ones included
    if text.split('.').count() > 2 {
        score += 15;
    }

    let lower = text.to_lowercase();
    if QUALITY_KEYWORDS.iter().any(|k| lower.contains(k)) {
        score += 10;
    }

    if len < 50 {
        score -= 30;
    } else if len > 2000 {
        score -= 20;
    }

    let words: Vec<&str> = lower.split_whitespace().collect();
    let unique: HashSet<&str> = words.iter().copied().collect();
    if (unique.len() as f64) < words.len() as f64 * MIN_UNIQUE_WORD_RATIO {
        score -= 15;
    }

    score.clamp(0, 100) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_base_minus_short_penalty() {
        assert_eq!(score(""), 20);
        assert_eq!(score("   \n "), 20);
    }

    #[test]
    fn ten_char_response_scores_twenty() {
        assert_eq!(score("Short one!"), 20);
    }

    #[test]
    fn medium_text_gets_partial_length_bonus() {
        // 59 chars, one sentence, no keywords, all words unique
        let text = "Alpha bravo charlie delta echo foxtrot golf hotel india jul";
        assert_eq!(text.chars().count(), 59);
        assert_eq!(score(text), 60);
    }

    #[test]
    fn rich_summary_hits_the_ceiling() {
        let text = "This repository hosts a command line tool for summarizing commits. \
                    It talks to several language model backends. \
                    Contributors focus on reliability and clear output.";
        assert_eq!(score(text), 95);
    }

    #[test]
    fn repetitive_text_is_penalized() {
        let text = "the the the the the the the the the the the the the the the the the";
        // len 67: +10, no sentences, no keywords, repeated words -15
        assert_eq!(score(text), 45);
    }

    #[test]
    fn very_long_text_is_penalized() {
        let text: String = (0..400).map(|i| format!("Project{i} word{i}. ")).collect();
        assert!(text.trim().chars().count() > 2000);
        // +20 length, +15 sentences, +10 keyword, -20 long, unique ratio ok
        assert_eq!(score(&text), 75);
    }

    #[test]
    fn never_leaves_range() {
        let long_words = "x ".repeat(5000);
        let long_sentences = "Software. ".repeat(300);
        for text in ["", ".", "a. b. c.", long_words.as_str(), long_sentences.as_str()] {
            let s = score(text);
            assert!(s <= 100);
        }
    }

    #[test]
    fn longer_text_does_not_score_lower_than_under_fifty() {
        let short = "Tiny reply here";
        let longer = "Tiny reply here with a few more distinct words to pass fifty";
        assert!(short.chars().count() < 50);
        assert!((51..=100).contains(&longer.chars().count()));
        assert!(score(longer) >= score(short));
    }
}
