use std::collections::HashMap;
use std::path::Path;

use prepline_core::{SpeakerRole, Utterance};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::filter::{classify_message, MessageAction};
use crate::variables::ExtractedVariables;

const DEFAULT_MAX_BYTES: u64 = 4 * 1024 * 1024; // 4MB

#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("failed to read call log: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed call log: {0}")]
    Json(#[from] serde_json::Error),
    #[error("call log is {size} bytes, limit is {max}")]
    TooLarge { size: u64, max: u64 },
    #[error("unrecognized call log layout: {0}")]
    UnknownLayout(&'static str),
}

/// Everything known about one call: the ordered transcript plus whatever
/// the vendor reported on its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CallLog {
    pub utterances: Vec<Utterance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variables: Option<ExtractedVariables>,
    /// Raw transcript string as kept by the vendor, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
pub struct IngestStats {
    pub records_read: usize,
    pub records_kept: usize,
    pub records_dropped: usize,
    pub kept_by_action: HashMap<String, usize>,
}

impl IngestStats {
    fn record(&mut self, action: &MessageAction) {
        self.records_read += 1;
        if *action == MessageAction::Drop {
            self.records_dropped += 1;
        } else {
            self.records_kept += 1;
            *self
                .kept_by_action
                .entry(action.as_str().to_string())
                .or_insert(0) += 1;
        }
    }

    fn record_unparsable(&mut self) {
        self.records_read += 1;
        self.records_dropped += 1;
    }
}

/// Non-empty variable bag stored under `key`, if it parses.
fn variables_at(json: &Value, key: &str) -> Option<ExtractedVariables> {
    let raw = json.get(key)?;
    let vars: ExtractedVariables = serde_json::from_value(raw.clone()).ok()?;
    (!vars.is_empty()).then_some(vars)
}

impl CallLog {
    /// Apply one vendor message. Returns what was done with it; malformed
    /// messages come back as [`MessageAction::Drop`].
    pub fn push_message(&mut self, json: &Value) -> MessageAction {
        match classify_message(json) {
            MessageAction::Utterance => {
                let Some(role) = json
                    .get("role")
                    .and_then(|v| v.as_str())
                    .and_then(SpeakerRole::parse)
                else {
                    return MessageAction::Drop;
                };
                let text = ["content", "transcript"]
                    .iter()
                    .filter_map(|k| json.get(*k).and_then(|v| v.as_str()))
                    .find(|s| !s.is_empty())
                    .unwrap_or("");
                self.utterances.push(Utterance::new(role, text));
                MessageAction::Utterance
            }
            MessageAction::Variables => match variables_at(json, "variables") {
                Some(vars) => {
                    tracing::debug!(?vars, "vendor variable extraction");
                    self.variables = Some(vars);
                    MessageAction::Variables
                }
                None => MessageAction::Drop,
            },
            MessageAction::Completed => match variables_at(json, "extractedVariables") {
                Some(vars) => {
                    tracing::debug!(?vars, "vendor workflow completed");
                    self.variables = Some(vars);
                    MessageAction::Completed
                }
                None => MessageAction::Drop,
            },
            MessageAction::Drop => MessageAction::Drop,
        }
    }

    /// Build from a sequence of vendor messages.
    pub fn from_messages<'a>(messages: impl IntoIterator<Item = &'a Value>) -> (Self, IngestStats) {
        let mut log = Self::default();
        let mut stats = IngestStats::default();
        for msg in messages {
            let action = log.push_message(msg);
            stats.record(&action);
        }
        (log, stats)
    }

    /// Build from a call object: `{ messages, transcript?, extractedVariables? }`.
    ///
    /// Top-level `extractedVariables` take precedence over any variables
    /// carried inside the messages.
    pub fn from_call(call: &Value) -> (Self, IngestStats) {
        let messages = call
            .get("messages")
            .and_then(|v| v.as_array())
            .map(|a| a.as_slice())
            .unwrap_or(&[]);
        let (mut log, stats) = Self::from_messages(messages);

        if let Some(t) = call
            .get("transcript")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
        {
            log.transcript = Some(t.to_string());
        }
        if let Some(vars) = variables_at(call, "extractedVariables") {
            log.variables = Some(vars);
        }
        (log, stats)
    }
}

/// Load a call log from disk.
///
/// Accepts a JSON array of messages, a call object (`messages`,
/// `transcript` and/or `extractedVariables`), a single message object, or
/// JSONL with one message per line. Anything else is
/// [`TranscriptError::UnknownLayout`].
pub fn load_call_log(path: &Path) -> Result<(CallLog, IngestStats), TranscriptError> {
    let max_bytes: u64 = std::env::var("PREPLINE_TRANSCRIPT_MAX_BYTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_MAX_BYTES);
    load_call_log_with_limit(path, max_bytes)
}

pub(crate) fn load_call_log_with_limit(
    path: &Path,
    max_bytes: u64,
) -> Result<(CallLog, IngestStats), TranscriptError> {
    let size = std::fs::metadata(path)?.len();
    if size > max_bytes {
        return Err(TranscriptError::TooLarge {
            size,
            max: max_bytes,
        });
    }

    let content = std::fs::read_to_string(path)?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return Ok((CallLog::default(), IngestStats::default()));
    }

    if trimmed.starts_with('[') {
        let messages: Vec<Value> = serde_json::from_str(trimmed)?;
        return Ok(CallLog::from_messages(&messages));
    }

    if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
        return from_document(&value);
    }

    // JSONL: one message per line.
    let mut log = CallLog::default();
    let mut stats = IngestStats::default();
    let mut parsed_any = false;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(line) {
            Ok(msg) => {
                parsed_any = true;
                let action = log.push_message(&msg);
                stats.record(&action);
            }
            Err(_) => stats.record_unparsable(),
        }
    }
    if !parsed_any {
        return Err(TranscriptError::UnknownLayout("no line is a JSON message"));
    }
    Ok((log, stats))
}

/// Dispatch a file that parsed as one JSON document.
fn from_document(value: &Value) -> Result<(CallLog, IngestStats), TranscriptError> {
    let Some(obj) = value.as_object() else {
        return Err(TranscriptError::UnknownLayout("top level is not an array or object"));
    };
    if obj.get("messages").is_some_and(Value::is_array) || obj.contains_key("transcript") {
        return Ok(CallLog::from_call(value));
    }
    if obj.contains_key("role") || obj.contains_key("type") {
        return Ok(CallLog::from_messages([value]));
    }
    if obj.contains_key("extractedVariables") {
        return Ok(CallLog::from_call(value));
    }
    Err(TranscriptError::UnknownLayout(
        "object has no messages, transcript or extractedVariables",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn push_final_transcript_uses_transcript_field() {
        let mut log = CallLog::default();
        let action = log.push_message(&serde_json::json!({
            "type": "transcript", "transcriptType": "final",
            "role": "user", "transcript": "I want a frontend role"
        }));
        assert_eq!(action, MessageAction::Utterance);
        assert_eq!(log.utterances, vec![Utterance::user("I want a frontend role")]);
    }

    #[test]
    fn push_drops_unknown_role() {
        let mut log = CallLog::default();
        let action = log.push_message(&serde_json::json!({"role": "tool", "content": "x"}));
        assert_eq!(action, MessageAction::Drop);
        assert!(log.utterances.is_empty());
    }

    #[test]
    fn push_empty_variables_dropped() {
        let mut log = CallLog::default();
        let action =
            log.push_message(&serde_json::json!({"type": "variable-extraction", "variables": {}}));
        assert_eq!(action, MessageAction::Drop);
        assert!(log.variables.is_none());
    }

    #[test]
    fn load_jsonl_counts_and_orders() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "call.jsonl",
            concat!(
                r#"{"type":"transcript","transcriptType":"partial","role":"user","transcript":"sen"}"#,
                "\n",
                r#"{"type":"transcript","transcriptType":"final","role":"assistant","transcript":"What level?"}"#,
                "\n",
                "\n",
                "not json\n",
                r#"{"type":"transcript","transcriptType":"final","role":"user","transcript":"Senior"}"#,
                "\n",
                r#"{"type":"workflow-completed","extractedVariables":{"role":"QA Engineer","amount":"6"}}"#,
                "\n",
            ),
        );

        let (log, stats) = load_call_log(&path).unwrap();
        assert_eq!(log.utterances.len(), 2);
        assert_eq!(log.utterances[0].role, SpeakerRole::Assistant);
        assert_eq!(log.utterances[1].content, "Senior");
        assert_eq!(log.variables.as_ref().unwrap().role.as_deref(), Some("QA Engineer"));
        assert_eq!(stats.records_read, 5);
        assert_eq!(stats.records_kept, 3);
        assert_eq!(stats.records_dropped, 2);
        assert_eq!(stats.kept_by_action["utterance"], 2);
        assert_eq!(stats.kept_by_action["completed"], 1);
    }

    #[test]
    fn load_json_array_of_polled_messages() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "call.json",
            r#"[{"role":"assistant","content":"Hi"},{"role":"user","transcript":"backend please"}]"#,
        );
        let (log, stats) = load_call_log(&path).unwrap();
        assert_eq!(log.utterances[1].content, "backend please");
        assert_eq!(stats.records_kept, 2);
    }

    #[test]
    fn load_call_object_picks_up_transcript_and_variables() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "call.json",
            r#"{
                "id": "call_1",
                "messages": [{"role": "user", "content": "hello"}],
                "transcript": "AI: hi\nUser: junior data scientist",
                "extractedVariables": {"level": "Junior"}
            }"#,
        );
        let (log, _) = load_call_log(&path).unwrap();
        assert_eq!(log.utterances.len(), 1);
        assert!(log.transcript.as_deref().unwrap().contains("data scientist"));
        assert_eq!(log.variables.unwrap().level.as_deref(), Some("Junior"));
    }

    #[test]
    fn load_empty_file_gives_empty_log() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "empty.jsonl", "");
        let (log, stats) = load_call_log(&path).unwrap();
        assert_eq!(log, CallLog::default());
        assert_eq!(stats.records_read, 0);
    }

    #[test]
    fn load_rejects_oversized_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "big.jsonl", &"x".repeat(64));
        let err = load_call_log_with_limit(&path, 16).unwrap_err();
        assert!(matches!(err, TranscriptError::TooLarge { size: 64, max: 16 }));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = load_call_log(Path::new("/nonexistent/call.jsonl")).unwrap_err();
        assert!(matches!(err, TranscriptError::Io(_)));
    }

    #[test]
    fn load_pretty_call_object_without_messages() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "call.json",
            "{\n  \"id\": \"call_1\",\n  \"transcript\": \"User: senior backend developer\"\n}\n",
        );
        let (log, _) = load_call_log(&path).unwrap();
        assert!(log.utterances.is_empty());
        assert_eq!(log.transcript.as_deref(), Some("User: senior backend developer"));
        let resolution = crate::resolve(&log);
        assert_eq!(resolution.source, crate::Source::VendorTranscript);
        assert_eq!(resolution.result.role, "Backend Developer");
    }

    #[test]
    fn load_call_object_with_only_variables() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(
            tmp.path(),
            "call.json",
            r#"{"id":"call_1","extractedVariables":{"role":"QA Engineer","level":2}}"#,
        );
        let (log, _) = load_call_log(&path).unwrap();
        let vars = log.variables.unwrap();
        assert_eq!(vars.role.as_deref(), Some("QA Engineer"));
        assert_eq!(vars.level.as_deref(), Some("2"));
    }

    #[test]
    fn load_single_message_object() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "msg.json", r#"{"role":"user","content":"hi"}"#);
        let (log, stats) = load_call_log(&path).unwrap();
        assert_eq!(log.utterances, vec![Utterance::user("hi")]);
        assert_eq!(stats.records_kept, 1);
    }

    #[test]
    fn load_unrelated_object_is_unknown_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "call.json", "{\n  \"id\": \"call_1\"\n}");
        let err = load_call_log(&path).unwrap_err();
        assert!(matches!(err, TranscriptError::UnknownLayout(_)));
    }

    #[test]
    fn load_scalar_or_garbage_is_unknown_layout() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "n.json", "42");
        assert!(matches!(
            load_call_log(&path).unwrap_err(),
            TranscriptError::UnknownLayout(_)
        ));
        let path = write_file(tmp.path(), "g.txt", "hello there\nnot json either\n");
        assert!(matches!(
            load_call_log(&path).unwrap_err(),
            TranscriptError::UnknownLayout(_)
        ));
    }

    #[test]
    fn load_broken_array_is_json_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = write_file(tmp.path(), "bad.json", "[{\"role\":");
        let err = load_call_log(&path).unwrap_err();
        assert!(matches!(err, TranscriptError::Json(_)));
    }
}
