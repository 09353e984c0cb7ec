use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::llm::LlmResponse;

/// Address parts the oracle resolves into coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeocodeRequest {
    pub address: String,
    pub city: String,
    pub department: String,
}

impl GeocodeRequest {
    pub fn new(
        address: impl Into<String>,
        city: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            address: address.into(),
            city: city.into(),
            department: department.into(),
        }
    }

    /// `"{address}, {city}, {department}, {country}"`
    pub fn full_address(&self, country: &str) -> String {
        format!(
            "{}, {}, {}, {}",
            self.address.trim(),
            self.city.trim(),
            self.department.trim(),
            country
        )
    }
}

/// A resolved point in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }
}

fn default_true() -> bool {
    true
}

/// Raw answer of the model. Both keys are required numbers.
#[derive(Debug, Default, Deserialize, JsonSchema)]
pub struct CoordinatesAnswer {
    /// Latitude in decimal degrees
    pub latitude: f64,

    /// Longitude in decimal degrees
    pub longitude: f64,

    #[serde(default = "default_true")]
    #[schemars(skip)]
    success: bool,

    #[serde(skip)]
    #[schemars(skip)]
    error: Option<String>,
}

impl LlmResponse for CoordinatesAnswer {
    fn mark_as_fallback(&mut self, error_message: String) {
        self.success = false;
        self.error = Some(error_message);
    }

    fn is_success(&self) -> bool {
        self.success
    }

    fn fallback_error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
