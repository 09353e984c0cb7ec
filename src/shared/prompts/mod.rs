//! Prompt templates for the generative AI integrations.
//!
//! Templates live in `templates/prompts/` and use Jinja2 syntax.

pub mod engine;

pub use engine::{render_template, TemplateError};

use minijinja::Value;
use std::collections::HashMap;

/// Render the address-to-coordinates prompt.
///
/// `full_address` is what the model should resolve; `city` and `department` are the
/// approximation it falls back to when the exact address is unknown. `answer_schema`
/// is the JSON schema of the expected answer.
pub fn render_geocoding_prompt(
    full_address: &str,
    city: &str,
    department: &str,
    country: &str,
    answer_schema: &str,
) -> Result<String, TemplateError> {
    let mut ctx: HashMap<&str, Value> = HashMap::new();
    ctx.insert("full_address", Value::from(full_address));
    ctx.insert("city", Value::from(city));
    ctx.insert("department", Value::from(department));
    ctx.insert("country", Value::from(country));
    ctx.insert("answer_schema", Value::from(answer_schema));

    render_template("geocoding/address.jinja", &ctx)
}
