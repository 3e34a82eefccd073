//! Prompt construction for the rewrite model.

use crate::types::ClientRules;

/// Instructions sent ahead of every narrative.
pub const SYSTEM_PROMPT: &str = r#"You are an AI legal billing assistant for a law firm.

Your job is to REWRITE time entry narratives to:
- Improve clarity
- Match professional legal billing language
- Respect client billing guidelines

STRICT RULES:
- Do NOT change the number of hours.
- Do NOT add new tasks that were not clearly implied.
- Do NOT invent work or exaggerate.
- You may make the language more professional, but the substantive meaning must remain.

You MUST respond in JSON ONLY with this exact structure:

{
  "standard": "<cleaned version of the narrative>",
  "client_compliant": "<version tuned to client rules>",
  "audit_safe": "<version that is extra clear and defensible in audits>",
  "notes": "<brief explanation of what you changed and why>"
}

Do not include any explanation outside the JSON."#;

/// Render the per-entry part of the prompt.
///
/// Hours use `Debug` formatting so whole numbers keep their decimal point
/// (`2.0`, not `2`). Rules are pretty-printed JSON; absent rules render
/// as `{}`.
pub fn build_user_prompt(original: &str, hours: f64, rules: Option<&ClientRules>) -> String {
    let empty = ClientRules::new();
    let rules_json = serde_json::to_string_pretty(rules.unwrap_or(&empty))
        .unwrap_or_else(|_| "{}".to_string());

    format!("Hours: {hours:?}\nOriginal narrative: {original}\n\nClient rules (JSON):\n{rules_json}")
        .trim()
        .to_string()
}

/// Full prompt: system instructions, a blank line, then the entry.
pub fn build_prompt(original: &str, hours: f64, rules: Option<&ClientRules>) -> String {
    format!("{SYSTEM_PROMPT}\n\n{}", build_user_prompt(original, hours, rules))
}
