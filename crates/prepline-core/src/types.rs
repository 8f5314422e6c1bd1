use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Role used when nothing in the conversation names one.
pub const DEFAULT_ROLE: &str = "Software Engineer";

/// Tech stack used when no known technology is mentioned.
pub const DEFAULT_TECHSTACK: [&str; 3] = ["JavaScript", "React", "Node.js"];

/// Question count used when no usable number is mentioned.
pub const DEFAULT_AMOUNT: u8 = 5;

/// Smallest question count an interview may ask for.
pub const MIN_AMOUNT: u8 = 3;

/// Largest question count an interview may ask for.
pub const MAX_AMOUNT: u8 = 10;

/// Who spoke an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeakerRole {
    User,
    System,
    Assistant,
}

impl SpeakerRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeakerRole::User => "user",
            SpeakerRole::System => "system",
            SpeakerRole::Assistant => "assistant",
        }
    }

    /// Parse a wire role name. Only the three lower-case names are accepted.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "user" => Some(SpeakerRole::User),
            "system" => Some(SpeakerRole::System),
            "assistant" => Some(SpeakerRole::Assistant),
            _ => None,
        }
    }
}

impl fmt::Display for SpeakerRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One speaker-tagged line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub role: SpeakerRole,
    pub content: String,
}

impl Utterance {
    pub fn new(role: SpeakerRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(SpeakerRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(SpeakerRole::Assistant, content)
    }
}

/// Focus of the interview.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewType {
    #[default]
    Technical,
    Behavioral,
    Mixed,
}

impl InterviewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "Technical",
            InterviewType::Behavioral => "Behavioral",
            InterviewType::Mixed => "Mixed",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewType {
    type Err = ();

    /// Case-insensitive match on the variant name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(InterviewType::Technical),
            "behavioral" => Ok(InterviewType::Behavioral),
            "mixed" => Ok(InterviewType::Mixed),
            _ => Err(()),
        }
    }
}

/// Seniority of the candidate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
    Junior,
    #[default]
    Mid,
    Senior,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Junior => "Junior",
            Level::Mid => "Mid",
            Level::Senior => "Senior",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "junior" => Ok(Level::Junior),
            "mid" => Ok(Level::Mid),
            "senior" => Ok(Level::Senior),
            _ => Err(()),
        }
    }
}

/// Ordered list of technology tags.
///
/// Travels as a single comma-joined string (`"react,docker"`) and is split
/// back into a list by whoever consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TechStack(Vec<String>);

impl TechStack {
    pub fn new(tags: Vec<String>) -> Self {
        Self(tags)
    }

    /// The stack used when nothing else is known.
    pub fn fallback() -> Self {
        Self(DEFAULT_TECHSTACK.iter().map(|s| s.to_string()).collect())
    }

    /// Split a comma-joined stack, trimming pieces and dropping empty ones.
    pub fn parse(text: &str) -> Self {
        Self(
            text.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn to_wire(&self) -> String {
        self.0.join(",")
    }

    pub fn tags(&self) -> &[String] {
        &self.0
    }

    pub fn into_tags(self) -> Vec<String> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }
}

impl Serialize for TechStack {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_wire())
    }
}

impl<'de> Deserialize<'de> for TechStack {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(TechStack::parse(&text))
    }
}

/// Structured interview configuration derived from a conversation.
///
/// Every field carries a default, so a value of this type is always complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub role: String,
    pub level: Level,
    pub techstack: TechStack,
    #[serde(deserialize_with = "clamped_amount")]
    pub amount: u8,
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self {
            interview_type: InterviewType::default(),
            role: DEFAULT_ROLE.to_string(),
            level: Level::default(),
            techstack: TechStack::fallback(),
            amount: DEFAULT_AMOUNT,
        }
    }
}

/// Clamp a question count into `[MIN_AMOUNT, MAX_AMOUNT]`.
pub fn clamp_amount(n: u64) -> u8 {
    n.clamp(MIN_AMOUNT as u64, MAX_AMOUNT as u64) as u8
}

fn clamped_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u8, D::Error> {
    u64::deserialize(deserializer).map(clamp_amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_result_wire_shape() {
        let v = serde_json::to_value(ExtractionResult::default()).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "type": "Technical",
                "role": "Software Engineer",
                "level": "Mid",
                "techstack": "JavaScript,React,Node.js",
                "amount": 5
            })
        );
    }

    #[test]
    fn techstack_parse_trims_and_skips_empty() {
        let stack = TechStack::parse(" react, ,docker ,");
        assert_eq!(stack.tags(), &["react".to_string(), "docker".to_string()]);
        assert_eq!(stack.to_wire(), "react,docker");
    }

    #[test]
    fn techstack_deserializes_from_joined_string() {
        let r: ExtractionResult = serde_json::from_str(
            r#"{"type":"Mixed","role":"QA Engineer","level":"Senior","techstack":"python,aws","amount":7}"#,
        )
        .unwrap();
        assert_eq!(r.interview_type, InterviewType::Mixed);
        assert!(r.techstack.contains("aws"));
        assert_eq!(r.amount, 7);
    }

    #[test]
    fn deserialized_amount_is_clamped() {
        let mut v = serde_json::to_value(ExtractionResult::default()).unwrap();
        v["amount"] = serde_json::json!(42);
        let r: ExtractionResult = serde_json::from_value(v.clone()).unwrap();
        assert_eq!(r.amount, 10);
        v["amount"] = serde_json::json!(0);
        let r: ExtractionResult = serde_json::from_value(v).unwrap();
        assert_eq!(r.amount, 3);
    }

    #[test]
    fn utterance_role_is_lowercase_on_wire() {
        let u = Utterance::assistant("hello");
        let v = serde_json::to_value(&u).unwrap();
        assert_eq!(v["role"], "assistant");
        let back: Utterance = serde_json::from_value(v).unwrap();
        assert_eq!(back, u);
    }

    #[test]
    fn enum_names_parse_case_insensitively() {
        assert_eq!("behavioral".parse::<InterviewType>(), Ok(InterviewType::Behavioral));
        assert_eq!(" MIXED ".parse::<InterviewType>(), Ok(InterviewType::Mixed));
        assert_eq!("senior".parse::<Level>(), Ok(Level::Senior));
        assert!("staff".parse::<Level>().is_err());
    }

    #[test]
    fn clamp_amount_bounds() {
        assert_eq!(clamp_amount(0), 3);
        assert_eq!(clamp_amount(7), 7);
        assert_eq!(clamp_amount(12), 10);
    }
}
