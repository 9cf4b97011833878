// Shared prompt fragments.
// Each service that calls the model defines its own prompts.rs alongside it;
// this file holds the pieces more than one of them uses.

/// Asks the model to lead with the score so readers see it first.
/// Nothing on our side parses or checks this line.
pub const FIRST_LINE_PERCENTAGE: &str =
    "Start with the percentage match on the first line (example: \"ATS Match: 76%\").";

/// Keeps transcriptions free of commentary so they can be concatenated page by page.
pub const VERBATIM_ONLY: &str =
    "Return only the text you see, in reading order, without commentary or formatting.";
