use std::path::Path;

use axum::{
    handler::HandlerWithoutStateExt,
    http::Uri,
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use tower_http::services::{ServeDir, ServeFile};

use crate::core::error::AppError;
use crate::shared::types::ApiResponse;

const CLIENT_ROUTES: [&str; 3] = ["/", "/admin/login", "/admin"];

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

/// Unknown API paths get a JSON 404; everything else goes back to the root page
async fn redirect_to_root(uri: Uri) -> Response {
    if is_api_path(uri.path()) {
        return AppError::NotFound(format!("Route {} not found", uri.path())).into_response();
    }

    Redirect::to("/").into_response()
}

/// Stand-in page when no front-end build is configured
async fn landing() -> Json<ApiResponse<()>> {
    Json(ApiResponse::success(
        None,
        Some("Distributor map API. See /swagger-ui for the endpoints.".to_string()),
        None,
    ))
}

/// Client routes plus the application-wide fallback.
///
/// With a `static_dir`, the client routes serve its `index.html` and other files
/// are served as assets.
pub fn routes(static_dir: Option<&str>) -> Router {
    let mut router = Router::new();

    match static_dir {
        Some(dir) => {
            let index = Path::new(dir).join("index.html");
            for path in CLIENT_ROUTES {
                router = router.route_service(path, ServeFile::new(&index));
            }

            router.fallback_service(ServeDir::new(dir).fallback(redirect_to_root.into_service()))
        }
        None => {
            for path in CLIENT_ROUTES {
                router = router.route(path, get(landing));
            }

            router.fallback(redirect_to_root)
        }
    }
}
