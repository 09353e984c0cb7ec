use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};
use crate::features::geocoding::models::{Coordinates, CoordinatesAnswer, GeocodeRequest};
use crate::shared::llm::LlmResponse;
use crate::features::geocoding::oracle::{parse_answer, GeocodingOracle};
use crate::shared::prompts::render_geocoding_prompt;

const UNAVAILABLE_MESSAGE: &str =
    "Could not determine coordinates using AI. Contact support if the problem persists.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Text of the first candidate, parts joined
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

/// Structured-output schema: an object with two required numbers
fn coordinates_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "latitude": { "type": "NUMBER", "description": "Latitude in decimal degrees" },
            "longitude": { "type": "NUMBER", "description": "Longitude in decimal degrees" }
        },
        "required": ["latitude", "longitude"]
    })
}

/// Geocoding oracle backed by the Gemini `generateContent` REST endpoint
pub struct GeminiGeocoder {
    http_client: reqwest::Client,
    config: GeocodingConfig,
}

impl GeminiGeocoder {
    pub fn new(config: GeocodingConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url,
            urlencoding::encode(&self.config.model)
        )
    }

    fn build_request(&self, request: &GeocodeRequest) -> Result<GenerateContentRequest> {
        let full_address = request.full_address(&self.config.country);
        let prompt = render_geocoding_prompt(
            &full_address,
            request.city.trim(),
            request.department.trim(),
            &self.config.country,
            &CoordinatesAnswer::json_schema_string(),
        )
        .map_err(|e| AppError::Internal(format!("Failed to render geocoding prompt: {}", e)))?;

        Ok(GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: Some(prompt) }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: coordinates_schema(),
                temperature: 0.0,
            },
        })
    }
}

#[async_trait]
impl GeocodingOracle for GeminiGeocoder {
    async fn geocode(&self, request: &GeocodeRequest) -> Result<Coordinates> {
        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            tracing::error!("GEMINI_API_KEY is not configured, cannot geocode");
            AppError::ExternalServiceError(UNAVAILABLE_MESSAGE.to_string())
        })?;

        let body = self.build_request(request)?;

        tracing::debug!(
            "Geocoding address with {}: {}",
            self.config.model,
            request.full_address(&self.config.country)
        );

        let response = self
            .http_client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach geocoding model: {}", e);
                AppError::ExternalServiceError(UNAVAILABLE_MESSAGE.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Geocoding model error: HTTP {} - {}", status, body);
            return Err(AppError::ExternalServiceError(
                UNAVAILABLE_MESSAGE.to_string(),
            ));
        }

        let payload = response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| {
                tracing::error!("Failed to parse geocoding model response: {}", e);
                AppError::ExternalServiceError(UNAVAILABLE_MESSAGE.to_string())
            })?;

        let text = payload
            .text()
            .ok_or_else(|| AppError::Geocoding("Model returned an empty answer".to_string()))?;

        let coordinates = parse_answer(&text)?;

        tracing::info!(
            "Geocoded '{}' to ({}, {})",
            request.address,
            coordinates.latitude,
            coordinates.longitude
        );

        Ok(coordinates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_key: Option<&str>) -> GeocodingConfig {
        GeocodingConfig {
            api_key: api_key.map(String::from),
            model: "gemini-2.5-flash".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            country: "Colombia".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_endpoint() {
        let geocoder = GeminiGeocoder::new(config(Some("key"))).unwrap();
        assert_eq!(
            geocoder.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let geocoder = GeminiGeocoder::new(config(Some("key"))).unwrap();
        let request = GeocodeRequest::new("Carrera 7 # 32-16", "Bogotá", "Cundinamarca");
        let body = serde_json::to_value(geocoder.build_request(&request).unwrap()).unwrap();

        let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Carrera 7 # 32-16, Bogotá, Cundinamarca, Colombia"));
        assert!(prompt.contains("The object must match this JSON schema"));
        assert!(!prompt.contains("\"success\""));
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(
            body["generationConfig"]["responseSchema"]["required"],
            json!(["latitude", "longitude"])
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let payload: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"latitude\": 4.6," }, { "text": " \"longitude\": -74.0}" }] }
            }]
        }))
        .unwrap();

        assert_eq!(
            payload.text().as_deref(),
            Some("{\"latitude\": 4.6, \"longitude\": -74.0}")
        );
    }

    #[test]
    fn test_response_without_candidates() {
        let payload: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert!(payload.text().is_none());
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_before_any_request() {
        let geocoder = GeminiGeocoder::new(config(None)).unwrap();
        assert!(!geocoder.is_configured());

        let request = GeocodeRequest::new("Calle 1", "Cali", "Valle del Cauca");
        let err = geocoder.geocode(&request).await.unwrap_err();
        assert!(matches!(err, AppError::ExternalServiceError(_)));
    }
}
