use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::geocoding::{Coordinates, GeocodeRequest};
use crate::shared::filter::Locality;

/// Row of the `mapa_distribuidores` table, column names as stored
#[derive(Debug, Clone, FromRow)]
pub struct DistributorRow {
    pub id: Uuid,
    pub nombre: String,
    pub telefono: String,
    pub whatsapp: Option<String>,
    pub pagina_web: Option<String>,
    pub departamento: String,
    pub ciudad: String,
    pub direccion: String,
    pub descripcion: Option<String>,
    pub google_maps_url: Option<String>,
    pub logo_url: Option<String>,
    pub latitud: f64,
    pub longitud: f64,
    pub activo: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A distributor as the rest of the application sees it.
///
/// Optional text columns are empty strings here, never `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Distributor {
    pub id: Uuid,
    pub name: String,
    pub department: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub whatsapp_phone: String,
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

impl From<DistributorRow> for Distributor {
    fn from(row: DistributorRow) -> Self {
        Self {
            id: row.id,
            name: row.nombre,
            department: row.departamento,
            city: row.ciudad,
            address: row.direccion,
            phone: row.telefono,
            whatsapp_phone: row.whatsapp.unwrap_or_default(),
            website_url: row.pagina_web.unwrap_or_default(),
            google_maps_url: row.google_maps_url.unwrap_or_default(),
            logo_url: row.logo_url.unwrap_or_default(),
            description: row.descripcion.unwrap_or_default(),
            latitude: row.latitud,
            longitude: row.longitud,
            // an unknown flag never makes a record public
            active: row.activo.unwrap_or(false),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl Distributor {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// The editable part of this record
    pub fn details(&self) -> DistributorDetails {
        DistributorDetails {
            name: self.name.clone(),
            department: self.department.clone(),
            city: self.city.clone(),
            address: self.address.clone(),
            phone: self.phone.clone(),
            whatsapp_phone: self.whatsapp_phone.clone(),
            website_url: self.website_url.clone(),
            google_maps_url: self.google_maps_url.clone(),
            logo_url: self.logo_url.clone(),
            description: self.description.clone(),
            active: self.active,
        }
    }
}

impl Locality for Distributor {
    fn department(&self) -> &str {
        &self.department
    }

    fn city(&self) -> &str {
        &self.city
    }
}

/// Fields an administrator edits. Coordinates are never entered by hand.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributorDetails {
    pub name: String,
    pub department: String,
    pub city: String,
    pub address: String,
    pub phone: String,
    pub whatsapp_phone: String,
    pub website_url: String,
    pub google_maps_url: String,
    pub logo_url: String,
    pub description: String,
    pub active: bool,
}

impl DistributorDetails {
    pub fn geocode_request(&self) -> GeocodeRequest {
        GeocodeRequest::new(&self.address, &self.city, &self.department)
    }
}

/// Values bound to an INSERT or UPDATE; blank optional text is stored as NULL
#[derive(Debug, Clone, PartialEq)]
pub struct DistributorWrite {
    pub nombre: String,
    pub telefono: String,
    pub whatsapp: Option<String>,
    pub pagina_web: Option<String>,
    pub departamento: String,
    pub ciudad: String,
    pub direccion: String,
    pub descripcion: Option<String>,
    pub google_maps_url: Option<String>,
    pub logo_url: Option<String>,
    pub latitud: f64,
    pub longitud: f64,
    pub activo: bool,
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl DistributorWrite {
    pub fn new(details: &DistributorDetails, coordinates: Coordinates) -> Self {
        Self {
            nombre: details.name.trim().to_string(),
            telefono: details.phone.trim().to_string(),
            whatsapp: non_blank(&details.whatsapp_phone),
            pagina_web: non_blank(&details.website_url),
            departamento: details.department.trim().to_string(),
            ciudad: details.city.trim().to_string(),
            direccion: details.address.trim().to_string(),
            descripcion: non_blank(&details.description),
            google_maps_url: non_blank(&details.google_maps_url),
            logo_url: non_blank(&details.logo_url),
            latitud: coordinates.latitude,
            longitud: coordinates.longitude,
            activo: details.active,
        }
    }
}
