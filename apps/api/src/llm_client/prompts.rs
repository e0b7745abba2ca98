// Shared prompt fragments. Each consumer keeps its own prompts.rs alongside it;
// this file holds only the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every drafting prompt so the model reports missing evidence structurally.
pub const EVIDENCE_INSTRUCTION: &str = "\
    CRITICAL: Base every statement on the observation notes provided. \
    Do NOT infer, interpolate, or invent classroom events. \
    If the notes contain no evidence for an item, set \"evidence_found\" to false, \
    set \"confidence\" below 0.3, and write one neutral sentence stating that no evidence was recorded. \
    Never embed status markers or bracketed tags in the text itself.";
