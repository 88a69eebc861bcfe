//! Question -> topic resolution: alias phrases first, then word overlap.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Lowercase alias phrases and the topic each one names.
///
/// Order matters: the first alias found in a question wins.
pub const ALIASES: &[(&str, &str)] = &[
    ("pythagoras", "Pythagorean theorem"),
    ("pythagorean", "Pythagorean theorem"),
    ("right triangle", "Pythagorean theorem"),
    ("newton", "Newton's laws of motion"),
    ("laws of motion", "Newton's laws of motion"),
    ("photosynthesis", "Photosynthesis"),
    ("respiration", "Cellular respiration"),
];

fn word_pattern() -> &'static Regex {
    static WORDS: OnceLock<Regex> = OnceLock::new();
    WORDS.get_or_init(|| Regex::new(r"[a-zA-Z']+").expect("static word pattern"))
}

/// Lowercase letter/apostrophe runs of `text`, as a set.
pub fn tokenize(text: &str) -> HashSet<String> {
    let lowered = text.to_lowercase();
    word_pattern()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Resolves `question` to one of `topics` using the built-in [`ALIASES`].
pub fn match_topic<S: AsRef<str>>(question: &str, topics: &[S]) -> Option<String> {
    match_topic_with(ALIASES, question, topics)
}

/// Resolves `question` to one of `topics`.
///
/// An alias hit returns immediately if its target is among `topics`. Otherwise
/// each topic scores the number of title words shared with the question, plus
/// the title's word count when the whole title appears in the question. Ties
/// keep the earlier topic; a best score of zero means no match.
pub fn match_topic_with<S: AsRef<str>>(
    aliases: &[(&str, &str)],
    question: &str,
    topics: &[S],
) -> Option<String> {
    let normalized = question.to_lowercase();

    for (alias, topic) in aliases {
        if normalized.contains(alias) && topics.iter().any(|t| t.as_ref() == *topic) {
            return Some((*topic).to_string());
        }
    }

    let question_words = tokenize(&normalized);
    let mut best: Option<&str> = None;
    let mut best_score = 0usize;
    for topic in topics {
        let topic = topic.as_ref();
        let topic_words = tokenize(topic);
        let mut score = question_words.intersection(&topic_words).count();
        if normalized.contains(&topic.to_lowercase()) {
            score += topic_words.len();
        }
        if score > best_score {
            best_score = score;
            best = Some(topic);
        }
    }

    best.filter(|_| best_score > 0).map(str::to_string)
}
