// Shared prompt fragments. Each service that calls the model keeps its own
// prompts.rs next to it and pulls cross-cutting rules from here.

/// Instruction that keeps the model from inventing resume facts.
pub const FACT_PRESERVATION_INSTRUCTION: &str = "\
    CRITICAL: The base resume is the only source of truth. \
    Do NOT invent employers, job titles, dates, projects, degrees, or certifications. \
    Do NOT add numbers, percentages, team sizes, or dollar amounts that are not \
    already present in the base resume. Rephrase and reorder; never fabricate.";

/// Common output rule for every JSON-producing call.
pub const JSON_OUTPUT_INSTRUCTION: &str = "\
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
