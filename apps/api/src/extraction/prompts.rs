// Prompt text for the vision strategy.

use crate::llm_client::prompts::VERBATIM_ONLY;

pub const PAGE_TRANSCRIBE_INSTRUCTION: &str = "Extract all text from this resume page:";

/// Instruction sent with every rendered page image.
pub fn page_transcription_prompt() -> String {
    format!("{PAGE_TRANSCRIBE_INSTRUCTION}\n{VERBATIM_ONLY}")
}
