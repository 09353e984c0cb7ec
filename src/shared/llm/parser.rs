use lazy_static::lazy_static;
use regex::Regex;

use super::LlmResponse;

lazy_static! {
    /// `,` directly before a closing `}` or `]`
    static ref TRAILING_COMMA_RE: Regex = Regex::new(r",(\s*[}\]])").unwrap();

    /// `"a" + "b"` style concatenation
    static ref JS_STRING_CONCAT_RE: Regex = Regex::new(r#""\s*\+\s*""#).unwrap();
}

/// Pull the JSON object out of a model answer.
///
/// Accepts, in order: a ```json fenced block, any fenced block, a bare object,
/// and finally the span between the first `{` and the last `}`.
pub fn extract_json_string(text: &str) -> Result<String, String> {
    if let Some(after) = text.split("```json").nth(1) {
        return after
            .split("```")
            .next()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| "Failed to extract JSON from markdown code block".to_string());
    }

    if let Some(start) = text.find("```") {
        let block_start = start + 3;
        if let Some(newline_offset) = text[block_start..].find('\n') {
            let body_start = block_start + newline_offset + 1;
            if let Some(end_offset) = text[body_start..].find("```") {
                return Ok(text[body_start..body_start + end_offset].trim().to_string());
            }
        }
    }

    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed.to_string());
    }

    let start = text
        .find('{')
        .ok_or_else(|| "No JSON object found in response".to_string())?;
    let end = text
        .rfind('}')
        .ok_or_else(|| "Incomplete JSON object in response".to_string())?;

    if start < end {
        Ok(text[start..=end].to_string())
    } else {
        Err("Invalid JSON boundaries in response".to_string())
    }
}

pub fn fix_trailing_commas(json_str: &str) -> String {
    TRAILING_COMMA_RE.replace_all(json_str, "$1").to_string()
}

pub fn fix_js_string_concatenation(json_str: &str) -> String {
    JS_STRING_CONCAT_RE.replace_all(json_str, "").to_string()
}

fn repair_json(json_str: &str) -> Option<String> {
    let options = llm_json::RepairOptions::default();
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        llm_json::repair_json(json_str, &options)
    }));

    match result {
        Ok(Ok(repaired)) => Some(repaired),
        Ok(Err(e)) => {
            tracing::debug!("JSON repair failed: {:?}", e);
            None
        }
        Err(_) => {
            tracing::warn!("JSON repair panicked");
            None
        }
    }
}

/// Extract, then try a direct parse, a parse after cheap fixes, and a parse after
/// `llm_json` repair. The first success wins.
fn try_parse<T>(text: &str) -> Result<T, String>
where
    T: LlmResponse,
{
    let json_str = extract_json_string(text)?;

    let candidates = std::iter::once(("as-is", Some(json_str.clone())))
        .chain(std::iter::once_with(|| {
            let fixed = fix_trailing_commas(&fix_js_string_concatenation(&json_str));
            ("after quick fixes", Some(fixed))
        }))
        .chain(std::iter::once_with(|| {
            ("after llm_json repair", repair_json(&json_str))
        }));

    let mut last_error = String::new();
    for (stage, candidate) in candidates {
        let Some(candidate) = candidate else {
            continue;
        };

        match serde_json::from_str::<T>(&candidate) {
            Ok(parsed) => {
                tracing::debug!("JSON parsed {}", stage);
                return Ok(parsed);
            }
            Err(e) => last_error = e.to_string(),
        }
    }

    Err(format!(
        "{} (answer: {})",
        last_error,
        json_str.chars().take(200).collect::<String>()
    ))
}

/// Parse a model answer, returning a marked fallback instead of an error
pub fn parse_with_fallback<T>(text: &str) -> T
where
    T: LlmResponse,
{
    match try_parse::<T>(text) {
        Ok(parsed) => parsed,
        Err(error_msg) => {
            tracing::warn!("LLM response parsing failed, using fallback: {}", error_msg);
            let mut fallback = T::default();
            fallback.mark_as_fallback(error_msg);
            fallback
        }
    }
}
