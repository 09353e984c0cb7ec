// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// The only role allowed into the management panel
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// TABLES
// =============================================================================

pub const DISTRIBUTORS_TABLE: &str = "mapa_distribuidores";

pub const USERS_TABLE: &str = "users";

// =============================================================================
// MAP DEFAULTS
// =============================================================================

/// Geographic center of Colombia, used as the initial map viewport
pub const MAP_DEFAULT_CENTER: (f64, f64) = (4.5709, -74.2973);

pub const MAP_DEFAULT_ZOOM: u8 = 6;

/// Country calling code prepended to WhatsApp numbers that lack one
pub const WHATSAPP_COUNTRY_CODE: &str = "57";
