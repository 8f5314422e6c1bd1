use serde::{Deserialize, Deserializer, Serialize};

use crate::error::RequestError;
use crate::types::{ExtractionResult, TechStack};

/// Body accepted by the downstream "create interview" service.
///
/// Field names and the comma-joined `techstack` are part of the wire
/// contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewRequest {
    #[serde(rename = "type")]
    pub interview_type: String,
    pub role: String,
    pub level: String,
    pub techstack: String,
    pub amount: u32,
    pub userid: String,
}

impl InterviewRequest {
    pub fn from_extraction(result: &ExtractionResult, userid: impl Into<String>) -> Self {
        Self {
            interview_type: result.interview_type.to_string(),
            role: result.role.clone(),
            level: result.level.to_string(),
            techstack: result.techstack.to_wire(),
            amount: u32::from(result.amount),
            userid: userid.into(),
        }
    }
}

/// Loosely-typed incoming body; nothing is trusted until [`validate`](Self::validate).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateRequest {
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub interview_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub level: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub techstack: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub amount: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub userid: Option<String>,
}

impl GenerateRequest {
    /// Check that every required field is present and non-empty.
    ///
    /// Missing fields are reported together, in the order
    /// type, role, level, techstack, amount, userid.
    pub fn validate(&self) -> Result<InterviewRequest, RequestError> {
        fn present(v: &Option<String>) -> Option<&str> {
            v.as_deref().filter(|s| !s.is_empty())
        }

        let amount = self
            .amount
            .as_deref()
            .and_then(parse_int_prefix)
            .filter(|n| *n > 0)
            .map(|n| u32::try_from(n).unwrap_or(u32::MAX));

        let mut missing = Vec::new();
        let fields = [
            ("type", present(&self.interview_type).is_some()),
            ("role", present(&self.role).is_some()),
            ("level", present(&self.level).is_some()),
            ("techstack", present(&self.techstack).is_some()),
            ("amount", amount.is_some()),
            ("userid", present(&self.userid).is_some()),
        ];
        for (name, ok) in fields {
            if !ok {
                missing.push(name);
            }
        }

        match (
            present(&self.interview_type),
            present(&self.role),
            present(&self.level),
            present(&self.techstack),
            amount,
            present(&self.userid),
        ) {
            (Some(t), Some(role), Some(level), Some(stack), Some(amount), Some(userid)) => {
                Ok(InterviewRequest {
                    interview_type: t.to_string(),
                    role: role.to_string(),
                    level: level.to_string(),
                    techstack: stack.to_string(),
                    amount,
                    userid: userid.to_string(),
                })
            }
            _ => Err(RequestError::MissingFields(missing)),
        }
    }
}

/// Interview record as the downstream service stores it, before questions
/// are generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewDraft {
    pub role: String,
    #[serde(rename = "type")]
    pub interview_type: String,
    pub level: String,
    pub techstack: Vec<String>,
    #[serde(rename = "userId")]
    pub user_id: String,
    pub finalized: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl InterviewDraft {
    pub fn from_request(req: &InterviewRequest, created_at: impl Into<String>) -> Self {
        Self {
            role: req.role.clone(),
            interview_type: req.interview_type.clone(),
            level: req.level.clone(),
            techstack: TechStack::parse(&req.techstack).into_tags(),
            user_id: req.userid.clone(),
            finalized: true,
            created_at: created_at.into(),
        }
    }

    /// Build a draft stamped with the current UTC time.
    pub fn stamped_now(req: &InterviewRequest) -> Result<Self, RequestError> {
        let now = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Rfc3339)?;
        Ok(Self::from_request(req, now))
    }
}

/// Parse the leading integer of `s` (after leading whitespace).
///
/// `"7"`, `" +7 questions"` and `"7abc"` all give 7; text without leading
/// digits gives `None`. A negative number gives 0 and a digit run too long
/// for `u64` saturates to `u64::MAX`.
pub fn parse_int_prefix(s: &str) -> Option<u64> {
    let s = s.trim_start();
    let (negative, s) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = s
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    let digits = &s[..end];
    if digits.is_empty() {
        return None;
    }
    if negative {
        return Some(0);
    }
    Some(digits.parse().unwrap_or(u64::MAX))
}

/// Accept a field sent either as JSON text or as a number.
///
/// Any other JSON type reads as absent instead of failing the whole body.
pub fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let v = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match v {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(match n.as_u64() {
            Some(u) => u.to_string(),
            None => n.to_string(),
        }),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{InterviewType, Level};

    fn full_body() -> serde_json::Value {
        serde_json::json!({
            "type": "Technical",
            "role": "Backend Developer",
            "level": "Senior",
            "techstack": "typescript,docker",
            "amount": 7,
            "userid": "user-1"
        })
    }

    #[test]
    fn validate_accepts_complete_body() {
        let req: GenerateRequest = serde_json::from_value(full_body()).unwrap();
        let valid = req.validate().unwrap();
        assert_eq!(valid.amount, 7);
        assert_eq!(valid.techstack, "typescript,docker");
        assert_eq!(valid.userid, "user-1");
    }

    #[test]
    fn validate_accepts_amount_as_text() {
        let mut body = full_body();
        body["amount"] = serde_json::json!("4");
        let req: GenerateRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.validate().unwrap().amount, 4);
    }

    #[test]
    fn validate_reports_missing_in_field_order() {
        let req: GenerateRequest = serde_json::from_value(serde_json::json!({
            "role": "QA Engineer",
            "techstack": "",
            "amount": 0
        }))
        .unwrap();
        let err = req.validate().unwrap_err();
        assert!(err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Missing required fields: type, level, techstack, amount, userid"
        );
    }

    #[test]
    fn validate_empty_body_lists_everything() {
        let err = GenerateRequest::default().validate().unwrap_err();
        match err {
            RequestError::MissingFields(fields) => assert_eq!(
                fields,
                vec!["type", "role", "level", "techstack", "amount", "userid"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn request_from_extraction_matches_downstream_contract() {
        let result = ExtractionResult {
            interview_type: InterviewType::Behavioral,
            role: "Data Analyst".into(),
            level: Level::Junior,
            techstack: TechStack::parse("python,sql"),
            amount: 3,
        };
        let v = serde_json::to_value(InterviewRequest::from_extraction(&result, "u42")).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "type": "Behavioral",
                "role": "Data Analyst",
                "level": "Junior",
                "techstack": "python,sql",
                "amount": 3,
                "userid": "u42"
            })
        );
    }

    #[test]
    fn draft_splits_techstack_and_finalizes() {
        let req: GenerateRequest = serde_json::from_value(full_body()).unwrap();
        let draft = InterviewDraft::from_request(&req.validate().unwrap(), "2026-01-01T00:00:00Z");
        assert_eq!(draft.techstack, vec!["typescript", "docker"]);
        assert!(draft.finalized);
        let v = serde_json::to_value(&draft).unwrap();
        assert_eq!(v["userId"], "user-1");
        assert_eq!(v["createdAt"], "2026-01-01T00:00:00Z");
    }

    #[test]
    fn stamped_draft_has_rfc3339_time() {
        let req: GenerateRequest = serde_json::from_value(full_body()).unwrap();
        let draft = InterviewDraft::stamped_now(&req.validate().unwrap()).unwrap();
        assert!(time::OffsetDateTime::parse(
            &draft.created_at,
            &time::format_description::well_known::Rfc3339
        )
        .is_ok());
    }

    #[test]
    fn int_prefix_behaves_like_leading_digit_parse() {
        assert_eq!(parse_int_prefix("7"), Some(7));
        assert_eq!(parse_int_prefix("  12 questions"), Some(12));
        assert_eq!(parse_int_prefix("five"), None);
        assert_eq!(parse_int_prefix(""), None);
    }

    #[test]
    fn int_prefix_handles_sign_and_overflow() {
        assert_eq!(parse_int_prefix("+8"), Some(8));
        assert_eq!(parse_int_prefix("-3"), Some(0));
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999"), Some(u64::MAX));
    }

    #[test]
    fn validate_accepts_oversized_amount() {
        let mut body = full_body();
        body["amount"] = serde_json::json!("99999999999999999999");
        let req: GenerateRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.validate().unwrap().amount, u32::MAX);
    }

    #[test]
    fn validate_treats_negative_amount_as_missing() {
        let mut body = full_body();
        body["amount"] = serde_json::json!(-3);
        let req: GenerateRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.validate().unwrap_err().to_string(), "Missing required fields: amount");
    }

    #[test]
    fn mistyped_fields_read_as_text_or_absent() {
        let mut body = full_body();
        body["role"] = serde_json::json!(5);
        body["level"] = serde_json::json!(["Senior"]);
        let req: GenerateRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.role.as_deref(), Some("5"));
        assert_eq!(req.validate().unwrap_err().to_string(), "Missing required fields: level");
    }
}
