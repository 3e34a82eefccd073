//! JSON object extraction from noisy model output.
//!
//! Models are asked for bare JSON but often wrap it in prose or markdown
//! fences. Extraction is two-stage:
//!
//! 1. Parse the trimmed text directly.
//! 2. Otherwise parse the slice from the first `{` to the last `}`
//!    (inclusive).
//!
//! Only a JSON *object* counts as success at either stage.
//!
//! ## Known Limitation
//!
//! The slice is taken as-is. Braces in the surrounding prose, or several
//! JSON blocks in one response, can make it over- or under-capture; no
//! attempt is made to disambiguate.

use serde_json::{Map, Value};
use tracing::debug;

/// A parsed JSON object.
pub type JsonObject = Map<String, Value>;

/// Model output contained no parseable JSON object.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("could not parse a JSON object from model output ({len} bytes)")]
pub struct MalformedOutput {
    /// Length of the trimmed output, for logs.
    pub len: usize,
}

fn parse_object(text: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => Some(object),
        _ => None,
    }
}

/// Extract the JSON object embedded in `text`.
pub fn extract_json(text: &str) -> Result<JsonObject, MalformedOutput> {
    let text = text.trim();
    if let Some(object) = parse_object(text) {
        return Ok(object);
    }

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if end > start {
            if let Some(object) = parse_object(&text[start..=end]) {
                debug!(
                    target: "rewrite_kernel::extract",
                    prefix_bytes = start,
                    suffix_bytes = text.len() - end - 1,
                    "extracted JSON object from surrounding text"
                );
                return Ok(object);
            }
        }
    }

    Err(MalformedOutput { len: text.len() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_parse() {
        let object = extract_json(r#"  {"standard": "x"}  "#).unwrap();
        assert_eq!(object["standard"], "x");
    }

    #[test]
    fn test_extract_from_prose() {
        let text = "Here is the result:\n{\"standard\":\"x\",\"client_compliant\":\"y\",\"audit_safe\":\"z\",\"notes\":\"n\"}\nHope this helps!";
        let object = extract_json(text).unwrap();
        assert_eq!(object["standard"], "x");
        assert_eq!(object["client_compliant"], "y");
        assert_eq!(object["audit_safe"], "z");
        assert_eq!(object["notes"], "n");
    }

    #[test]
    fn test_extract_from_markdown_fence() {
        let text = "```json\n{\"standard\": \"Reviewed file.\"}\n```";
        let object = extract_json(text).unwrap();
        assert_eq!(object["standard"], "Reviewed file.");
    }

    #[test]
    fn test_nested_object_kept_whole() {
        let text = r#"Result: {"standard": "a", "meta": {"k": 1}} done"#;
        let object = extract_json(text).unwrap();
        assert_eq!(object["meta"]["k"], 1);
    }

    #[test]
    fn test_no_braces_fails() {
        assert_eq!(
            extract_json("I cannot help with that."),
            Err(MalformedOutput { len: 24 })
        );
    }

    #[test]
    fn test_empty_fails() {
        assert!(extract_json("").is_err());
        assert!(extract_json("   \n").is_err());
    }

    #[test]
    fn test_reversed_braces_fail() {
        assert!(extract_json("} nothing here {").is_err());
    }

    #[test]
    fn test_non_object_json_fails() {
        assert!(extract_json("[1, 2, 3]").is_err());
        assert!(extract_json("\"just a string\"").is_err());
    }

    #[test]
    fn test_brace_in_trailing_prose_over_captures() {
        // The last `}` belongs to the prose, so the slice is not valid JSON.
        let text = r#"{"standard": "a"} and then a stray } brace"#;
        assert!(extract_json(text).is_err());
    }

    #[test]
    fn test_truncated_json_fails() {
        assert!(extract_json(r#"{"standard": "a", "client_compliant": "#).is_err());
    }
}
