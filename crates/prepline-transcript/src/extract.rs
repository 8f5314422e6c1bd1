use prepline_core::{
    ExtractionResult, InterviewType, Level, TechStack, Utterance, DEFAULT_AMOUNT, DEFAULT_ROLE,
    MAX_AMOUNT, MIN_AMOUNT,
};

use crate::tables::{
    BEHAVIORAL_MARKERS, COUNT_PATTERNS, JUNIOR_MARKERS, MIXED_MARKERS, NUMBER_WORDS,
    ROLE_KEYWORDS, SENIOR_MARKERS, TECH_KEYWORDS,
};

/// Lower-cased `"{role}: {content}"` lines of the transcript, newline-joined.
pub fn conversation_text(transcript: &[Utterance]) -> String {
    transcript
        .iter()
        .map(|u| format!("{}: {}", u.role, u.content))
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}

/// Derive an interview configuration from a conversation.
///
/// Best-effort keyword matching over the whole transcript. Total: every
/// field falls back to its default, and `amount` stays within
/// `[MIN_AMOUNT, MAX_AMOUNT]`.
pub fn extract(transcript: &[Utterance]) -> ExtractionResult {
    let text = conversation_text(transcript);

    let result = ExtractionResult {
        interview_type: detect_type(&text),
        role: detect_role(&text),
        level: detect_level(&text),
        techstack: detect_techstack(&text),
        amount: detect_amount(&text),
    };
    tracing::debug!(
        kind = %result.interview_type,
        role = %result.role,
        level = %result.level,
        techstack = %result.techstack.to_wire(),
        amount = result.amount,
        "extracted interview fields"
    );
    result
}

fn contains_any(text: &str, markers: &[&str]) -> bool {
    markers.iter().any(|m| text.contains(m))
}

fn detect_type(text: &str) -> InterviewType {
    let mut kind = InterviewType::Technical;
    if contains_any(text, BEHAVIORAL_MARKERS) {
        kind = InterviewType::Behavioral;
    }
    // Evaluated last: overrides a behavioral match.
    if contains_any(text, MIXED_MARKERS) {
        kind = InterviewType::Mixed;
    }
    kind
}

fn detect_role(text: &str) -> String {
    match ROLE_KEYWORDS.iter().find(|(kw, _)| text.contains(kw)) {
        Some((kw, role)) => {
            tracing::debug!(keyword = kw, role, "matched role keyword");
            role.to_string()
        }
        None => DEFAULT_ROLE.to_string(),
    }
}

fn detect_level(text: &str) -> Level {
    if contains_any(text, JUNIOR_MARKERS) {
        Level::Junior
    } else if contains_any(text, SENIOR_MARKERS) {
        Level::Senior
    } else {
        Level::Mid
    }
}

fn detect_techstack(text: &str) -> TechStack {
    let found: Vec<String> = TECH_KEYWORDS
        .iter()
        .filter(|kw| text.contains(*kw))
        .map(|kw| kw.to_string())
        .collect();
    tracing::debug!(?found, "matched technologies");
    if found.is_empty() {
        TechStack::fallback()
    } else {
        TechStack::new(found)
    }
}

/// Number captured by a count pattern: a digit run or a number word.
fn number_value(captured: &str) -> Option<u64> {
    NUMBER_WORDS
        .iter()
        .find(|(word, _)| *word == captured)
        .map(|(_, n)| *n)
        .or_else(|| captured.parse().ok())
}

fn detect_amount(text: &str) -> u8 {
    for pattern in COUNT_PATTERNS.iter() {
        // Only the first match of each pattern is considered.
        let Some(caps) = pattern.captures(text) else {
            continue;
        };
        let Some(n) = caps.get(1).and_then(|m| number_value(m.as_str())) else {
            continue;
        };
        if (u64::from(MIN_AMOUNT)..=u64::from(MAX_AMOUNT)).contains(&n) {
            tracing::debug!(amount = n, "matched question count");
            return n as u8;
        }
    }
    DEFAULT_AMOUNT
}
