use prepline_core::ExtractionResult;
use serde::{Deserialize, Serialize};

use crate::extract::extract;
use crate::ingest::CallLog;
use crate::variables::parse_transcript_variables;

/// Where a resolved configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// Structured variables reported by the vendor.
    VendorVariables,
    /// Markers found in the vendor's raw transcript string.
    VendorTranscript,
    /// Keyword extraction over the local conversation.
    Conversation,
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub source: Source,
    pub result: ExtractionResult,
}

/// Pick the best available configuration for a call.
///
/// Vendor variables win, then the vendor's raw transcript, then the local
/// conversation; with nothing to go on every field is defaulted.
pub fn resolve(call: &CallLog) -> Resolution {
    let vendor = call
        .variables
        .clone()
        .filter(|v| !v.is_empty())
        .map(|v| (Source::VendorVariables, v))
        .or_else(|| {
            call.transcript
                .as_deref()
                .and_then(parse_transcript_variables)
                .map(|v| (Source::VendorTranscript, v))
        });

    let resolution = match vendor {
        Some((source, vars)) => Resolution {
            source,
            result: vars.resolve(),
        },
        None if !call.utterances.is_empty() => Resolution {
            source: Source::Conversation,
            result: extract(&call.utterances),
        },
        None => {
            tracing::warn!("no conversation data available, using defaults");
            Resolution {
                source: Source::Defaults,
                result: ExtractionResult::default(),
            }
        }
    };
    tracing::info!(source = ?resolution.source, "resolved interview configuration");
    resolution
}
