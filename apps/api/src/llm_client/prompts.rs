// Shared prompt fragments for JSON-producing model calls.
// Feature prompts live next to the feature (see `screening/prompts.rs`).

/// Correction message appended to a conversation whose completion did not decode as JSON.
pub const JSON_REPAIR_PROMPT: &str = "Your previous response was not valid JSON.
Return ONLY valid JSON matching the schema exactly.
Previous output:
{previous_output}
";

pub fn build_repair_prompt(previous_output: &str) -> String {
    JSON_REPAIR_PROMPT.replace("{previous_output}", previous_output)
}
