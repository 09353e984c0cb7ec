use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::guards::RequireAdmin;
use crate::features::distributors::dtos::{
    DeleteDistributorQuery, DistributorInputDto, DistributorResponseDto, UpdateDistributorDto,
};
use crate::features::distributors::services::DistributorService;
use crate::shared::types::{ApiResponse, Meta};

/// List every distributor, active or not
#[utoipa::path(
    get,
    path = "/api/admin/distributors",
    responses(
        (status = 200, description = "All distributors, newest first", body = ApiResponse<Vec<DistributorResponseDto>>),
        (status = 401, description = "Admin session required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_all_distributors(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<DistributorService>>,
) -> Result<Json<ApiResponse<Vec<DistributorResponseDto>>>> {
    let distributors = service.list_all().await?;
    let total = distributors.len();

    let data = distributors
        .into_iter()
        .map(DistributorResponseDto::from)
        .collect();

    Ok(Json(ApiResponse::success(
        Some(data),
        None,
        Some(Meta::total(total)),
    )))
}

/// Create a distributor; its address is geocoded before it is stored
#[utoipa::path(
    post,
    path = "/api/admin/distributors",
    request_body = DistributorInputDto,
    responses(
        (status = 201, description = "Distributor created", body = ApiResponse<DistributorResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Admin session required"),
        (status = 422, description = "Address could not be geocoded"),
        (status = 502, description = "Geocoding service unavailable")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_distributor(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<DistributorService>>,
    AppJson(dto): AppJson<DistributorInputDto>,
) -> Result<(StatusCode, Json<ApiResponse<DistributorResponseDto>>)> {
    tracing::debug!("{} is creating distributor '{}'", admin.email, dto.name);

    let distributor = service.create(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(distributor.into()),
            Some("Distributor created".to_string()),
            None,
        )),
    ))
}

/// Update a distributor; coordinates are recomputed from the resulting address
#[utoipa::path(
    put,
    path = "/api/admin/distributors/{id}",
    params(
        ("id" = Uuid, Path, description = "Distributor ID")
    ),
    request_body = UpdateDistributorDto,
    responses(
        (status = 200, description = "Distributor updated", body = ApiResponse<DistributorResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Admin session required"),
        (status = 404, description = "Distributor not found"),
        (status = 422, description = "Address could not be geocoded")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_distributor(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<DistributorService>>,
    Path(id): Path<Uuid>,
    AppJson(dto): AppJson<UpdateDistributorDto>,
) -> Result<Json<ApiResponse<DistributorResponseDto>>> {
    let distributor = service.update(id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(distributor.into()),
        Some("Distributor updated".to_string()),
        None,
    )))
}

/// Permanently delete a distributor. Requires `?confirm=true`.
#[utoipa::path(
    delete,
    path = "/api/admin/distributors/{id}",
    params(
        ("id" = Uuid, Path, description = "Distributor ID"),
        DeleteDistributorQuery
    ),
    responses(
        (status = 200, description = "Distributor deleted"),
        (status = 400, description = "Deletion not confirmed"),
        (status = 401, description = "Admin session required"),
        (status = 404, description = "Distributor not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_distributor(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<DistributorService>>,
    Path(id): Path<Uuid>,
    Query(query): Query<DeleteDistributorQuery>,
) -> Result<Json<ApiResponse<()>>> {
    if !query.confirm {
        return Err(AppError::BadRequest(
            "Deleting a distributor is permanent; repeat the request with confirm=true".to_string(),
        ));
    }

    service.delete(id).await?;
    tracing::info!("Distributor {} deleted by {}", id, admin.email);

    Ok(Json(ApiResponse::success(
        None,
        Some("Distributor deleted".to_string()),
        None,
    )))
}
