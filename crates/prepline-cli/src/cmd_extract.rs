use std::path::Path;

use anyhow::Context;
use prepline_core::InterviewRequest;
use prepline_transcript::{load_call_log, resolve, Resolution, Source};
use serde::Serialize;

#[derive(Serialize)]
struct ExtractOutput<'a> {
    source: Source,
    interview: &'a prepline_core::ExtractionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    request: Option<InterviewRequest>,
}

/// `prepline extract <file>` — resolve an interview configuration from a call log.
pub fn execute(path: &Path, userid: Option<&str>, json: bool) -> anyhow::Result<()> {
    let (call, stats) =
        load_call_log(path).with_context(|| format!("loading {}", path.display()))?;
    tracing::info!(
        read = stats.records_read,
        kept = stats.records_kept,
        dropped = stats.records_dropped,
        "ingested call log"
    );

    let resolution = resolve(&call);
    let request = userid.map(|id| InterviewRequest::from_extraction(&resolution.result, id));

    if json {
        let out = ExtractOutput {
            source: resolution.source,
            interview: &resolution.result,
            request,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", format_human(&resolution));
    }
    Ok(())
}

fn source_label(source: Source) -> &'static str {
    match source {
        Source::VendorVariables => "vendor variables",
        Source::VendorTranscript => "vendor transcript",
        Source::Conversation => "conversation",
        Source::Defaults => "defaults",
    }
}

pub(crate) fn format_human(resolution: &Resolution) -> String {
    let r = &resolution.result;
    let mut out = String::new();
    out.push_str(&format!("Source:     {}\n", source_label(resolution.source)));
    out.push_str(&format!("Type:       {}\n", r.interview_type));
    out.push_str(&format!("Role:       {}\n", r.role));
    out.push_str(&format!("Level:      {}\n", r.level));
    out.push_str(&format!("Tech stack: {}\n", r.techstack.tags().join(", ")));
    out.push_str(&format!("Questions:  {}\n", r.amount));
    out
}
