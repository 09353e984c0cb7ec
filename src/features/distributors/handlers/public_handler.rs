use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::distributors::dtos::{
    DistributorResponseDto, MapViewDto, SuggestionsQuery, SuggestionsResponseDto,
};
use crate::features::distributors::services::DistributorService;
use crate::shared::filter::LocalityFilter;
use crate::shared::types::{ApiResponse, Meta};

/// List active distributors
///
/// Both filters are case-insensitive substring matches and are combined with AND.
#[utoipa::path(
    get,
    path = "/api/distributors",
    params(LocalityFilter),
    responses(
        (status = 200, description = "Active distributors ordered by name", body = ApiResponse<Vec<DistributorResponseDto>>),
        (status = 500, description = "Could not load distributors")
    ),
    tag = "distributors"
)]
pub async fn list_distributors(
    State(service): State<Arc<DistributorService>>,
    Query(filter): Query<LocalityFilter>,
) -> Result<Json<ApiResponse<Vec<DistributorResponseDto>>>> {
    let distributors = service.search(&filter).await?;
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

/// Autocomplete values for the department and city inputs
#[utoipa::path(
    get,
    path = "/api/distributors/suggestions",
    params(SuggestionsQuery),
    responses(
        (status = 200, description = "Distinct sorted values starting with the input", body = ApiResponse<SuggestionsResponseDto>)
    ),
    tag = "distributors"
)]
pub async fn get_suggestions(
    State(service): State<Arc<DistributorService>>,
    Query(query): Query<SuggestionsQuery>,
) -> Result<Json<ApiResponse<SuggestionsResponseDto>>> {
    let suggestions = service
        .suggestions(&query.department, &query.city)
        .await?;
    Ok(Json(ApiResponse::success(Some(suggestions), None, None)))
}

/// Map viewport and markers for the filtered listing
#[utoipa::path(
    get,
    path = "/api/distributors/map",
    params(LocalityFilter),
    responses(
        (status = 200, description = "Map data", body = ApiResponse<MapViewDto>)
    ),
    tag = "distributors"
)]
pub async fn get_map(
    State(service): State<Arc<DistributorService>>,
    Query(filter): Query<LocalityFilter>,
) -> Result<Json<ApiResponse<MapViewDto>>> {
    let map = service.map_view(&filter).await?;
    Ok(Json(ApiResponse::success(Some(map), None, None)))
}
