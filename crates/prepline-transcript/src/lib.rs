mod extract;
mod filter;
mod ingest;
mod resolve;
mod tables;
mod variables;

pub use extract::{conversation_text, extract};
pub use filter::{classify_message, MessageAction};
pub use ingest::{load_call_log, CallLog, IngestStats, TranscriptError};
pub use resolve::{resolve, Resolution, Source};
pub use variables::{parse_transcript_variables, ExtractedVariables};
