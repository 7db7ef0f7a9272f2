use crate::docs::api_doc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::guard::require_session;
use crate::middleware::tab::{TAB_HEADER, tab_middleware};
use crate::modules::auth::router::init_auth_router;
use crate::modules::guidance::router::init_guidance_router;
use crate::modules::home::router::init_home_router;
use crate::modules::pastoral::router::init_pastoral_router;
use crate::modules::student_records::router::init_student_records_router;
use crate::state::AppState;
use axum::http::{HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::{Json, Router, middleware};
use serde_json::{Value, json};
use tower_http::cors::CorsLayer;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

pub fn init_router(state: AppState) -> Router {
    // Route layers run bottom-up: the tab is attached before the guard
    // looks at its session.
    let screens = Router::new()
        .merge(init_home_router())
        .nest("/guidance", init_guidance_router())
        .nest("/pastoral", init_pastoral_router())
        .nest("/student-records", init_student_records_router())
        .route_layer(middleware::from_fn(require_session))
        .route_layer(middleware::from_fn_with_state(state.clone(), tab_middleware));

    let auth = init_auth_router(&state.dev_config)
        .route_layer(middleware::from_fn_with_state(state.clone(), tab_middleware));

    let tab_header = HeaderName::from_static(TAB_HEADER);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api_doc()))
        .merge(Scalar::with_url("/scalar", api_doc()))
        .nest("/auth", auth)
        .merge(screens)
        .fallback(not_found)
        .with_state(state.clone())
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                    tab_header.clone(),
                ])
                .expose_headers([tab_header])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}

async fn not_found(uri: Uri) -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Page not found",
            "path": uri.path(),
        })),
    )
}
