//! Route definitions and middleware stack

use std::time::Duration;

use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use gitscan_core::Config;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app::AppState;
use crate::presentation::handlers::{
    analyze_snippet_handler, cancel_scan, generate_fix_handler, get_scan_status, health,
    list_providers, list_rules, submit_scan,
};
use crate::presentation::models::*;

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::handlers::health,
        crate::presentation::handlers::submit_scan,
        crate::presentation::handlers::get_scan_status,
        crate::presentation::handlers::cancel_scan,
        crate::presentation::handlers::list_rules,
        crate::presentation::handlers::list_providers,
        crate::presentation::handlers::generate_fix_handler,
        crate::presentation::handlers::analyze_snippet_handler
    ),
    components(schemas(
        ScanSubmitRequest,
        RepositoryDto,
        ScanOptionsDto,
        ScanResultResponse,
        FindingDto,
        SummaryDto,
        CancelResponse,
        RulesResponse,
        RuleCategoryDto,
        GenerateFixRequest,
        VulnerabilityDto,
        GenerateFixResponse,
        FixResponseDto,
        AnalyzeRequest,
        AnalyzeResponse,
        ProvidersResponse,
        ProviderListingDto,
        ErrorResponse,
        HealthResponse
    )),
    tags(
        (name = "scanner", description = "Repository security scanning endpoints"),
        (name = "llm", description = "AI-assisted fix generation and snippet analysis")
    ),
    info(
        title = "GitScan API",
        version = "1.0.0",
        description = "Scans cloned repositories for security vulnerabilities by combining pattern rules with professional static-analysis tools, and generates fixes on demand."
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the application router with its middleware stack.
pub fn create_router(state: AppState, config: &Config) -> Router {
    let api_routes = Router::new()
        .route("/scan", post(submit_scan))
        .route("/scan/{scan_id}/status", get(get_scan_status))
        .route("/scan/{scan_id}/cancel", post(cancel_scan))
        .route("/rules", get(list_rules))
        .route("/llm/providers", get(list_providers))
        .route("/llm/generate-fix", post(generate_fix_handler))
        .route("/llm/analyze", post(analyze_snippet_handler));

    let allow_origin = if config.server.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(
            config
                .server
                .allowed_origins
                .iter()
                .filter_map(|origin| {
                    HeaderValue::from_str(origin)
                        .map_err(|_| {
                            tracing::warn!(origin, "Invalid CORS origin in config; skipping");
                        })
                        .ok()
                })
                .collect::<Vec<_>>(),
        )
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_seconds,
                ))),
        )
        .with_state(state)
}
