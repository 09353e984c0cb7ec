use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::geocoding::models::{Coordinates, CoordinatesAnswer, GeocodeRequest};
use crate::shared::llm::{parse_with_fallback, LlmResponse};

/// Turns a postal address into coordinates.
///
/// Implementations fail with [`AppError::Geocoding`] when the answer cannot be
/// read as a pair of numbers, and with [`AppError::ExternalServiceError`] when
/// the service itself is unreachable or not configured.
#[async_trait]
pub trait GeocodingOracle: Send + Sync {
    async fn geocode(&self, request: &GeocodeRequest) -> Result<Coordinates>;
}

/// Read the model's text answer as coordinates
pub fn parse_answer(text: &str) -> Result<Coordinates> {
    let answer: CoordinatesAnswer = parse_with_fallback(text);

    if !answer.is_success() {
        let reason = answer
            .fallback_error()
            .unwrap_or("unreadable answer")
            .to_string();
        return Err(AppError::Geocoding(format!(
            "Answer is not a latitude/longitude object: {}",
            reason
        )));
    }

    let coordinates = Coordinates::new(answer.latitude, answer.longitude);
    if !coordinates.is_valid() {
        return Err(AppError::Geocoding(format!(
            "Coordinates out of range: {}, {}",
            coordinates.latitude, coordinates.longitude
        )));
    }

    Ok(coordinates)
}
