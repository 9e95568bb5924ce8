// LLM prompt constants for content expansion.

/// System prompt for content expansion — enforces JSON-only output with the
/// exact fragment keys the pipeline parses.
pub const EXPAND_SYSTEM: &str =
    "You are a helpful assistant that transforms brief career notes or bullet \
    points into well-organized resume content. \
    You MUST respond with valid JSON only — a single JSON object with exactly \
    the keys summary, experience, education, skills. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Keep entries concise and professional.";

/// Expansion prompt template. Replace `{notes}` before sending.
pub const EXPAND_PROMPT_TEMPLATE: &str = r#"Input:
{notes}

Output must be a JSON object with this EXACT schema (no extra fields):
{
  "summary": "Two or three sentence professional summary",
  "experience": [
    {"role": "Senior Engineer", "company": "Acme", "dates": "2020 - Present", "bullets": ["Shipped the billing service"]}
  ],
  "education": [
    {"degree": "BSc Computer Science", "school": "State University", "dates": "2012 - 2016"}
  ],
  "skills": ["Rust", "PostgreSQL"]
}"#;
