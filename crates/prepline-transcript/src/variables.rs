use prepline_core::request::{lenient_text, parse_int_prefix};
use prepline_core::{clamp_amount, ExtractionResult, TechStack, DEFAULT_AMOUNT, DEFAULT_ROLE};
use serde::{Deserialize, Serialize};

use crate::tables::{VENDOR_COUNT_PATTERN, VENDOR_ROLE_PHRASES, VENDOR_TECH_KEYWORDS};

/// Structured variables reported by the voice-agent vendor for a call.
///
/// Every field is optional text; gaps are filled by [`resolve`](Self::resolve).
/// A field of the wrong JSON type reads as absent without discarding the rest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedVariables {
    #[serde(
        rename = "type",
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub interview_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub role: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub techstack: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<String>,
}

impl ExtractedVariables {
    pub fn is_empty(&self) -> bool {
        self.interview_type.is_none()
            && self.role.is_none()
            && self.level.is_none()
            && self.techstack.is_none()
            && self.amount.is_none()
    }

    /// Turn the variable bag into a complete result, defaulting any field
    /// that is absent, empty or unrecognized. A usable amount is clamped
    /// into range rather than discarded.
    pub fn resolve(&self) -> ExtractionResult {
        let defaults = ExtractionResult::default();

        let interview_type = self
            .interview_type
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.interview_type);
        let level = self
            .level
            .as_deref()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.level);
        let role = match self.role.as_deref().map(str::trim) {
            Some(r) if !r.is_empty() => r.to_string(),
            _ => DEFAULT_ROLE.to_string(),
        };
        let techstack = match self.techstack.as_deref().map(TechStack::parse) {
            Some(stack) if !stack.is_empty() => stack,
            _ => TechStack::fallback(),
        };
        let amount = match self.amount.as_deref().and_then(parse_int_prefix) {
            Some(0) | None => DEFAULT_AMOUNT,
            Some(n) => clamp_amount(n),
        };

        ExtractionResult {
            interview_type,
            role,
            level,
            techstack,
            amount,
        }
    }
}

/// Title-case each space-separated word: "devops engineer" -> "Devops Engineer".
fn title_case(phrase: &str) -> String {
    phrase
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pull variables out of a vendor's raw transcript string.
///
/// Narrower than [`crate::extract`]: fields are only set when an explicit
/// marker is present. Returns `None` when nothing was recognized.
pub fn parse_transcript_variables(raw: &str) -> Option<ExtractedVariables> {
    let text = raw.to_lowercase();
    let mut vars = ExtractedVariables::default();

    vars.interview_type = if text.contains("technical") {
        Some("Technical".to_string())
    } else if text.contains("behavioral") {
        Some("Behavioral".to_string())
    } else if text.contains("mixed") {
        Some("Mixed".to_string())
    } else {
        None
    };

    vars.role = VENDOR_ROLE_PHRASES
        .iter()
        .find(|phrase| text.contains(*phrase))
        .map(|phrase| title_case(phrase));

    vars.level = if text.contains("junior") {
        Some("Junior".to_string())
    } else if text.contains("senior") {
        Some("Senior".to_string())
    } else if text.contains("mid") {
        Some("Mid".to_string())
    } else {
        None
    };

    let found: Vec<&str> = VENDOR_TECH_KEYWORDS
        .iter()
        .copied()
        .filter(|kw| text.contains(kw))
        .collect();
    if !found.is_empty() {
        vars.techstack = Some(found.join(","));
    }

    vars.amount = VENDOR_COUNT_PATTERN
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    if vars.is_empty() {
        None
    } else {
        Some(vars)
    }
}
