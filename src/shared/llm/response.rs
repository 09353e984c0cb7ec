use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;

/// A structured answer expected from a language model.
///
/// Parsing never fails outright: an unparseable answer becomes `Default::default()`
/// marked as a fallback, and callers decide whether a fallback is acceptable.
pub trait LlmResponse: DeserializeOwned + Default + JsonSchema {
    fn mark_as_fallback(&mut self, error_message: String);

    fn is_success(&self) -> bool;

    /// Error recorded by `mark_as_fallback`, if any
    fn fallback_error(&self) -> Option<&str>;

    /// JSON schema of the expected answer, for embedding in prompts
    fn json_schema_string() -> String {
        let mut gen = SchemaGenerator::default();
        let schema = gen.root_schema_for::<Self>();
        serde_json::to_string_pretty(&schema).unwrap_or_else(|_| "{}".to_string())
    }
}
