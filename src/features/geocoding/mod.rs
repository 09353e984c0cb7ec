//! Address-to-coordinates resolution backed by a generative AI model.
//!
//! The model is asked for a JSON object with numeric `latitude` and `longitude`
//! keys. Anything else is a geocoding failure, and the caller must not persist
//! a record without coordinates.

pub mod clients;
pub mod models;
pub mod oracle;

pub use clients::GeminiGeocoder;
pub use models::{Coordinates, GeocodeRequest};
pub use oracle::GeocodingOracle;
