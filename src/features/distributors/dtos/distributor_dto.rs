use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::distributors::models::{Distributor, DistributorDetails};
use crate::shared::constants::WHATSAPP_COUNTRY_CODE;
use crate::shared::validation::digits_only;

/// Click-to-chat link for a WhatsApp number; `None` when the number has no digits.
///
/// The national prefix is added unless the digits already start with it.
pub fn whatsapp_url(phone: &str) -> Option<String> {
    let digits = digits_only(phone);
    if digits.is_empty() {
        return None;
    }

    if digits.starts_with(WHATSAPP_COUNTRY_CODE) {
        Some(format!("https://wa.me/{}", digits))
    } else {
        Some(format!("https://wa.me/{}{}", WHATSAPP_COUNTRY_CODE, digits))
    }
}

/// Distributor as shown to visitors and administrators
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributorResponseDto {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub whatsapp_phone: String,
    /// `https://wa.me/...` link, absent when no WhatsApp number is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
    pub website_url: String,
    pub google_maps_url: String,
    pub logo_url: String,
    pub description: String,
    pub latitude: f64,
    pub longitude: f64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Distributor> for DistributorResponseDto {
    fn from(d: Distributor) -> Self {
        Self {
            whatsapp_url: whatsapp_url(&d.whatsapp_phone),
            id: d.id,
            name: d.name,
            department: d.department,
            city: d.city,
            address: d.address,
            phone: d.phone,
            whatsapp_phone: d.whatsapp_phone,
            website_url: d.website_url,
            google_maps_url: d.google_maps_url,
            logo_url: d.logo_url,
            description: d.description,
            latitude: d.latitude,
            longitude: d.longitude,
            active: d.active,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

fn default_active() -> bool {
    true
}

/// Admin form for a distributor. Used as-is for creation, and as the merged
/// result of an update before it is validated.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DistributorInputDto {
    #[validate(
        length(min = 1, max = 200, message = "Name is required (max 200 characters)"),
        custom(
            function = "crate::shared::validation::non_blank",
            message = "Name is required"
        )
    )]
    pub name: String,

    #[validate(
        length(min = 1, max = 100, message = "Department is required"),
        custom(
            function = "crate::shared::validation::non_blank",
            message = "Department is required"
        )
    )]
    pub department: String,

    #[validate(
        length(min = 1, max = 100, message = "City is required"),
        custom(
            function = "crate::shared::validation::non_blank",
            message = "City is required"
        )
    )]
    pub city: String,

    #[validate(
        length(min = 1, max = 300, message = "Address is required"),
        custom(
            function = "crate::shared::validation::non_blank",
            message = "Address is required"
        )
    )]
    pub address: String,

    #[validate(
        length(min = 1, max = 50, message = "Phone is required"),
        custom(
            function = "crate::shared::validation::required_phone",
            message = "A valid phone number is required"
        )
    )]
    pub phone: String,

    #[validate(custom(
        function = "crate::shared::validation::optional_phone",
        message = "Invalid WhatsApp number"
    ))]
    #[serde(default)]
    pub whatsapp_phone: String,

    #[validate(custom(
        function = "crate::shared::validation::optional_url",
        message = "Invalid website URL"
    ))]
    #[serde(default)]
    pub website_url: String,

    #[validate(custom(
        function = "crate::shared::validation::optional_url",
        message = "Invalid map link URL"
    ))]
    #[serde(default)]
    pub google_maps_url: String,

    #[validate(
        length(min = 1, message = "Logo is required"),
        custom(
            function = "crate::shared::validation::required_url",
            message = "A valid logo URL is required"
        )
    )]
    pub logo_url: String,

    #[validate(
        length(min = 1, max = 1000, message = "Description is required (max 1000 characters)"),
        custom(
            function = "crate::shared::validation::non_blank",
            message = "Description is required"
        )
    )]
    pub description: String,

    #[serde(default = "default_active")]
    pub active: bool,
}

impl From<DistributorInputDto> for DistributorDetails {
    fn from(dto: DistributorInputDto) -> Self {
        Self {
            name: dto.name,
            department: dto.department,
            city: dto.city,
            address: dto.address,
            phone: dto.phone,
            whatsapp_phone: dto.whatsapp_phone,
            website_url: dto.website_url,
            google_maps_url: dto.google_maps_url,
            logo_url: dto.logo_url,
            description: dto.description,
            active: dto.active,
        }
    }
}

/// Partial update; omitted fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDistributorDto {
    pub name: Option<String>,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub whatsapp_phone: Option<String>,
    pub website_url: Option<String>,
    pub google_maps_url: Option<String>,
    pub logo_url: Option<String>,
    pub description: Option<String>,
    pub active: Option<bool>,
}

impl UpdateDistributorDto {
    /// Overlay the provided fields on `current`
    pub fn merge_into(self, current: DistributorDetails) -> DistributorInputDto {
        DistributorInputDto {
            name: self.name.unwrap_or(current.name),
            department: self.department.unwrap_or(current.department),
            city: self.city.unwrap_or(current.city),
            address: self.address.unwrap_or(current.address),
            phone: self.phone.unwrap_or(current.phone),
            whatsapp_phone: self.whatsapp_phone.unwrap_or(current.whatsapp_phone),
            website_url: self.website_url.unwrap_or(current.website_url),
            google_maps_url: self.google_maps_url.unwrap_or(current.google_maps_url),
            logo_url: self.logo_url.unwrap_or(current.logo_url),
            description: self.description.unwrap_or(current.description),
            active: self.active.unwrap_or(current.active),
        }
    }
}

/// Deleting is permanent and must be confirmed explicitly
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteDistributorQuery {
    /// Must be `true`
    #[serde(default)]
    pub confirm: bool,
}

/// Narrowing query for the autocomplete lists
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuggestionsQuery {
    /// Department prefix typed so far
    #[serde(default)]
    pub department: String,

    /// City prefix typed so far
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuggestionsResponseDto {
    pub departments: Vec<String>,
    pub cities: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MapCenterDto {
    pub latitude: f64,
    pub longitude: f64,
}

/// One pin on the map
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MapMarkerDto {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    pub department: String,
    pub address: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp_url: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl From<&Distributor> for MapMarkerDto {
    fn from(d: &Distributor) -> Self {
        let position = d.coordinates();

        Self {
            id: d.id,
            name: d.name.clone(),
            city: d.city.clone(),
            department: d.department.clone(),
            address: d.address.clone(),
            phone: d.phone.clone(),
            whatsapp_url: whatsapp_url(&d.whatsapp_phone),
            latitude: position.latitude,
            longitude: position.longitude,
        }
    }
}

/// Initial map viewport plus one marker per visible distributor
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MapViewDto {
    pub center: MapCenterDto,
    pub zoom: u8,
    pub markers: Vec<MapMarkerDto>,
}
