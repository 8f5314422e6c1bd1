use std::path::Path;

use anyhow::Context;
use prepline_core::{GenerateRequest, InterviewDraft};

/// `prepline validate <file>` — check a "create interview" body and print
/// the record it would produce.
pub fn execute(path: &Path) -> anyhow::Result<()> {
    let draft = draft_from_file(path)?;
    println!("{}", serde_json::to_string_pretty(&draft)?);
    Ok(())
}

fn draft_from_file(path: &Path) -> anyhow::Result<InterviewDraft> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let body: GenerateRequest = serde_json::from_str(&content)?;
    let req = body.validate()?;
    Ok(InterviewDraft::stamped_now(&req)?)
}
