// Screening prompt templates.
// The rubric text is sent verbatim; the validator in `validation.rs` enforces
// the hard parts of it (keys, types, enum values), the list lengths are advisory.

/// Resume text beyond this many characters is dropped before prompting.
pub const MAX_RESUME_CHARS: usize = 50_000;

pub const SCREENING_SYSTEM: &str = "You are an AI recruiting assistant helping recruiters pre-screen candidates.

You must:
- Return VALID JSON only (no markdown, no extra text).
- Be evidence-driven: evidence snippets must be direct excerpts from the resume text (<= 25 words).
- Do NOT invent facts or experience.
- Be concise and useful for recruiter decisions.
";

pub const SCHEMA_HINT: &str = r#"{
  "fit_level": "Strong|Medium|Low",
  "suitable": true,
  "confidence": "High|Medium|Low",
  "summary": "",
  "matched_required_skills": [],
  "missing_required_skills": [],
  "matched_nice_to_have": [],
  "missing_nice_to_have": [],
  "risk_flags": [],
  "evidence": [
    {
      "claim": "",
      "snippet": ""
    }
  ],
  "screening_recommendation": "Proceed to technical interview | Recruiter screen only | Reject",
  "interview_focus_areas": [],
  "final_verdict": "",
  "final_why": []
}"#;

pub const SCREENING_PROMPT_TEMPLATE: &str = "Position Title:
{position_title}

Position Description:
{position_description}

Resume Text:
{resume_text}

Return JSON EXACTLY with this schema (same keys, same types):
{schema_hint}

Guidelines:
- fit_level:
  Strong → Meets most required skills with clear evidence.
  Medium → Partial match; some required gaps but potentially trainable.
  Low → Major required skills missing.
- suitable:
  true only if required gaps are minor.
- confidence:
  High → Resume clearly detailed.
  Medium → Some ambiguity.
  Low → Insufficient clarity.
- screening_recommendation must be one of:
  \"Proceed to technical interview\"
  \"Recruiter screen only\"
  \"Reject\"
- If Position Description is empty, infer typical requirements from the Position Title and mention that assumption briefly in summary.

Output constraints:
- summary: 2–4 sentences max.
- final_verdict: EXACTLY 1 sentence. Must align with suitable + screening_recommendation.
- final_why: 2–4 bullet points (list items) explaining WHY this verdict was chosen.
- Keep lists concise:
  matched_required_skills 4–8 (if possible),
  missing_required_skills 2–8,
  risk_flags 0–6,
  evidence 2–6,
  interview_focus_areas 3–7.
All output in English.
";

/// System and user instructions for one screening call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub system: String,
    pub user: String,
}

/// Builds the screening conversation. Pure; the resume text is silently capped
/// at `MAX_RESUME_CHARS`.
pub fn build_prompts(position_title: &str, position_description: &str, resume_text: &str) -> Prompts {
    let description = match position_description.trim() {
        "" => "(empty)",
        trimmed => trimmed,
    };

    // Caller slots are filled back to front: each first match is then always the
    // template's own placeholder, never one echoed inside caller text.
    let user = SCREENING_PROMPT_TEMPLATE
        .replace("{schema_hint}", SCHEMA_HINT)
        .replacen("{resume_text}", truncate_chars(resume_text, MAX_RESUME_CHARS), 1)
        .replacen("{position_description}", description, 1)
        .replacen("{position_title}", position_title, 1);

    Prompts {
        system: SCREENING_SYSTEM.to_string(),
        user,
    }
}

/// Returns at most `max` characters of `text`, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
