//! Extraction of JSON documents from model text.
//!
//! Even in JSON mode models sometimes wrap the document in a markdown fence
//! or add a sentence before it. Strategies, in order:
//! 1. Markdown code blocks: ```json ... ```
//! 2. Balanced braces: { ... }
//! 3. Balanced brackets: [ ... ]

use estudio_error::{FlowError, FlowErrorKind};
use serde_json::Value;

/// Extract the JSON document from a model response.
///
/// # Errors
///
/// Returns [`FlowErrorKind::NoJson`] if nothing JSON-shaped is found.
///
/// # Examples
///
/// ```
/// use estudio_flows::extract_json;
///
/// let response = "Aqui está:\n```json\n{\"narration\": \"Olá\"}\n```";
/// let json = extract_json("commercial_narration", response).unwrap();
/// assert_eq!(json, "{\"narration\": \"Olá\"}");
/// ```
pub fn extract_json(flow: &str, response: &str) -> Result<String, FlowError> {
    if let Some(json) = extract_from_code_block(response) {
        return Ok(json);
    }

    let bracket_pos = response.find('[');
    let brace_pos = response.find('{');
    let candidates = match (bracket_pos, brace_pos) {
        (Some(b_pos), Some(c_pos)) if b_pos < c_pos => [('[', ']'), ('{', '}')],
        _ => [('{', '}'), ('[', ']')],
    };
    for (open, close) in candidates {
        if let Some(json) = extract_balanced(response, open, close) {
            return Ok(json);
        }
    }

    tracing::error!(
        flow,
        response_length = response.len(),
        "No JSON found in model response"
    );
    Err(FlowError::new(FlowErrorKind::NoJson {
        flow: flow.to_string(),
        length: response.len(),
    }))
}

/// Parse extracted JSON text.
///
/// # Errors
///
/// Returns [`FlowErrorKind::InvalidOutput`] on a syntax error.
pub fn parse_json(flow: &str, json_str: &str) -> Result<Value, FlowError> {
    serde_json::from_str(json_str).map_err(|e| {
        let preview = json_str.chars().take(100).collect::<String>();
        tracing::error!(flow, error = %e, json_preview = %preview, "JSON parsing failed");
        FlowError::new(FlowErrorKind::InvalidOutput {
            flow: flow.to_string(),
            message: format!("malformed JSON: {}", e),
        })
    })
}

/// Content of the first fenced block. A missing closing fence (truncated
/// response) yields everything after the opening fence.
fn extract_from_code_block(response: &str) -> Option<String> {
    let start = response.find("```")?;
    let content_start = start + 3;
    let skip_to = response[content_start..]
        .find('\n')
        .map(|n| content_start + n + 1)
        .unwrap_or(content_start);

    let content = match response[skip_to..].find("```") {
        Some(end) => &response[skip_to..skip_to + end],
        None => &response[skip_to..],
    };
    let content = content.trim();
    if content.starts_with('{') || content.starts_with('[') {
        Some(content.to_string())
    } else {
        None
    }
}

/// Finds the first `open` and returns everything up to its matching `close`,
/// ignoring delimiters inside strings.
fn extract_balanced(response: &str, open: char, close: char) -> Option<String> {
    let start = response.find(open)?;
    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in response[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            c if c == open && !in_string => depth += 1,
            c if c == close && !in_string => {
                depth -= 1;
                if depth == 0 {
                    return Some(response[start..start + i + c.len_utf8()].to_string());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_balanced_braces() {
        let response = r#"Claro! {"id": 456, "nested": {"value": "t}e{st"}} fim"#;
        let json = extract_json("f", response).unwrap();
        assert_eq!(json, r#"{"id": 456, "nested": {"value": "t}e{st"}}"#);
    }

    #[test]
    fn test_extract_json_array_first() {
        let json = extract_json("f", "Itens:\n[\n {\"id\": 1},\n {\"id\": 2}\n]\n").unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with(']'));
    }

    #[test]
    fn test_fence_without_language() {
        let json = extract_json("f", "```\n{\"a\": 1}\n```").unwrap();
        assert_eq!(json, "{\"a\": 1}");
    }

    #[test]
    fn test_no_json_found() {
        let err = extract_json("seo_metadata", "apenas texto").unwrap_err();
        assert_eq!(
            err.kind,
            FlowErrorKind::NoJson {
                flow: "seo_metadata".to_string(),
                length: 12
            }
        );
    }

    #[test]
    fn test_escaped_quotes_inside_strings() {
        let json = extract_json("f", r#"{"text": "Ela disse \"oi\" {"}"#).unwrap();
        assert!(parse_json("f", &json).is_ok());
    }
}
