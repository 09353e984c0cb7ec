use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth::{dtos as auth_dtos, handlers as auth_handlers};
use crate::features::distributors::{dtos as distributors_dtos, handlers as distributors_handlers};
use crate::features::geocoding::Coordinates;
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth_handlers::login,
        auth_handlers::logout,
        auth_handlers::get_session,
        auth_handlers::get_me,
        // Distributors (public)
        distributors_handlers::list_distributors,
        distributors_handlers::get_suggestions,
        distributors_handlers::get_map,
        // Distributors (admin)
        distributors_handlers::list_all_distributors,
        distributors_handlers::create_distributor,
        distributors_handlers::update_distributor,
        distributors_handlers::delete_distributor,
    ),
    components(
        schemas(
            Meta,
            Coordinates,
            // Auth
            auth_dtos::LoginRequestDto,
            auth_dtos::AuthResponseDto,
            auth_dtos::AdminUserDto,
            auth_dtos::SessionResponseDto,
            ApiResponse<auth_dtos::AuthResponseDto>,
            ApiResponse<auth_dtos::AdminUserDto>,
            ApiResponse<auth_dtos::SessionResponseDto>,
            // Distributors
            distributors_dtos::DistributorResponseDto,
            distributors_dtos::DistributorInputDto,
            distributors_dtos::UpdateDistributorDto,
            distributors_dtos::SuggestionsResponseDto,
            distributors_dtos::MapCenterDto,
            distributors_dtos::MapMarkerDto,
            distributors_dtos::MapViewDto,
            ApiResponse<distributors_dtos::DistributorResponseDto>,
            ApiResponse<Vec<distributors_dtos::DistributorResponseDto>>,
            ApiResponse<distributors_dtos::SuggestionsResponseDto>,
            ApiResponse<distributors_dtos::MapViewDto>,
        )
    ),
    tags(
        (name = "auth", description = "Admin sign-in and session state"),
        (name = "distributors", description = "Public distributor directory and map"),
        (name = "admin", description = "Distributor management (admin only)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Distributor Map API",
        version = "0.1.0",
        description = "Regional distributor directory and map",
    )
)]
pub struct ApiDoc;

/// Adds the bearer token security scheme to the OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
