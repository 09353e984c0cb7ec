//! Template engine for model prompts using Jinja2 syntax.
//!
//! Templates ship inside the binary; a file with the same name under
//! `templates/prompts/` replaces the built-in copy at startup.

use minijinja::{Environment, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;
use thiserror::Error;

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

const TEMPLATE_DIR: &str = "templates/prompts";

/// Built-in templates, keyed by path relative to `templates/prompts/`
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[(
    "geocoding/address.jinja",
    include_str!("../../../templates/prompts/geocoding/address.jinja"),
)];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for &(name, source) in BUILTIN_TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load built-in template {}: {}", name, e);
        }
    }

    let template_path = Path::new(TEMPLATE_DIR);
    if template_path.exists() {
        load_templates_recursive(&mut env, template_path, template_path);
    }

    env
}

fn load_templates_recursive(env: &mut Environment<'static>, base_path: &Path, current_path: &Path) {
    let Ok(entries) = std::fs::read_dir(current_path) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            load_templates_recursive(env, base_path, &path);
            continue;
        }
        if !path.extension().is_some_and(|ext| ext == "jinja") {
            continue;
        }

        let (Ok(relative), Ok(content)) =
            (path.strip_prefix(base_path), std::fs::read_to_string(&path))
        else {
            continue;
        };

        // Templates live for the whole process, leaking gives them a 'static lifetime
        let name: &'static str =
            Box::leak(relative.to_string_lossy().replace('\\', "/").into_boxed_str());
        let source: &'static str = Box::leak(content.into_boxed_str());
        match env.add_template(name, source) {
            Ok(()) => tracing::debug!("Loaded template override: {}", name),
            Err(e) => tracing::warn!("Failed to load template {}: {}", name, e),
        }
    }
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a template with the given context.
///
/// # Example
/// ```ignore
/// let mut ctx = HashMap::new();
/// ctx.insert("city", Value::from("Bogotá"));
/// let prompt = render_template("geocoding/address.jinja", &ctx)?;
/// ```
pub fn render_template(
    template_name: &str,
    ctx: &HashMap<&str, Value>,
) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    let render_ctx = Value::from_iter(ctx.iter().map(|(k, v)| (*k, v.clone())));

    template
        .render(render_ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}
