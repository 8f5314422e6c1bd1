use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageAction {
    /// A finished utterance to append to the transcript.
    Utterance,
    /// Mid-call variable extraction update (payload in `variables`).
    Variables,
    /// Workflow finished (payload in `extractedVariables`).
    Completed,
    Drop,
}

impl MessageAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageAction::Utterance => "utterance",
            MessageAction::Variables => "variables",
            MessageAction::Completed => "completed",
            MessageAction::Drop => "drop",
        }
    }
}

/// Classify a vendor call message.
pub fn classify_message(json: &Value) -> MessageAction {
    let msg_type = json.get("type").and_then(|v| v.as_str());

    match msg_type {
        Some("transcript") => {
            let kind = json
                .get("transcriptType")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            if kind == "final" {
                MessageAction::Utterance
            } else {
                MessageAction::Drop
            }
        }
        Some("workflow-variable-extraction") | Some("variable-extraction") => {
            MessageAction::Variables
        }
        Some("workflow-completed") | Some("workflow-finished") => MessageAction::Completed,
        // Messages polled from call status carry no type, only role + text.
        None if json.get("role").is_some() => MessageAction::Utterance,
        _ => MessageAction::Drop,
    }
}
