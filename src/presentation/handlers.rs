//! HTTP handlers

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use gitscan_core::{Category, ScanProfile, ScanRequest};
use gitscan_llm::{analyze_snippet, generate_fix, LlmError, ProviderKind};
use tracing::{info, warn};

use crate::app::AppState;
use crate::presentation::models::*;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// GET /health
#[utoipa::path(get, path = "/health", responses((status = 200, body = HealthResponse)))]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "gitscan".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// POST /api/v1/scan - run a security scan and return its result.
///
/// The scan is registered before it runs, so status and cancel endpoints
/// work while this request is still in flight.
#[utoipa::path(
    post,
    path = "/api/v1/scan",
    request_body = ScanSubmitRequest,
    responses(
        (status = 200, description = "Scan finished (possibly FAILED)", body = ScanResultResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 409, description = "Scan id already running", body = ErrorResponse)
    ),
    tag = "scanner"
)]
pub async fn submit_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanSubmitRequest>,
) -> Result<Json<ScanResultResponse>, ApiError> {
    let scan_id = request
        .scan_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "scan_id is required"))?;

    if request.repository.clone_url.trim().is_empty() {
        return Err(error(StatusCode::BAD_REQUEST, "repository.clone_url is required"));
    }

    let profile = match request.options.scan_type.as_deref() {
        None => ScanProfile::Full,
        Some(raw) => raw
            .parse()
            .map_err(|_| error(StatusCode::BAD_REQUEST, format!("unknown scan_type: {raw}")))?,
    };

    // Unknown category names are ignored, matching the roster's treatment
    // of categories with no mapped scanner.
    let categories: Vec<Category> = request
        .options
        .scanners
        .unwrap_or_default()
        .iter()
        .filter_map(|raw| match raw.parse() {
            Ok(category) => Some(category),
            Err(_) => {
                warn!(category = raw.as_str(), "Ignoring unknown scanner category");
                None
            }
        })
        .collect();

    let mut scan_request = ScanRequest::new(scan_id, request.repository.clone_url.trim())
        .with_profile(profile)
        .with_categories(categories);
    if let Some(branch) = request.repository.branch.filter(|b| !b.is_empty()) {
        scan_request = scan_request.with_branch(branch);
    }
    if let Some(token) = request.repository.access_token.filter(|t| !t.is_empty()) {
        scan_request = scan_request.with_access_token(token);
    }
    scan_request.include_patterns = request.options.file_patterns.unwrap_or_default();
    scan_request.exclude_patterns = request.options.exclude_patterns.unwrap_or_default();

    let handle = state
        .scans
        .register(scan_id)
        .await
        .map_err(|e| error(StatusCode::CONFLICT, e.to_string()))?;

    info!(scan_id, "Starting scan");
    state
        .orchestrator
        .run(&scan_request, handle.result.clone(), handle.cancel.clone())
        .await;

    let result = handle.result.read().await;
    Ok(Json(ScanResultResponse::from(&*result)))
}

/// GET /api/v1/scan/{scan_id}/status
#[utoipa::path(
    get,
    path = "/api/v1/scan/{scan_id}/status",
    params(("scan_id" = String, Path, description = "Scan identifier")),
    responses(
        (status = 200, body = ScanResultResponse),
        (status = 404, description = "Unknown scan", body = ErrorResponse)
    ),
    tag = "scanner"
)]
pub async fn get_scan_status(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Result<Json<ScanResultResponse>, ApiError> {
    let handle = state
        .scans
        .get(&scan_id)
        .await
        .ok_or_else(|| error(StatusCode::NOT_FOUND, format!("unknown scan: {scan_id}")))?;

    let result = handle.result.read().await;
    Ok(Json(ScanResultResponse::from(&*result)))
}

/// POST /api/v1/scan/{scan_id}/cancel
#[utoipa::path(
    post,
    path = "/api/v1/scan/{scan_id}/cancel",
    params(("scan_id" = String, Path, description = "Scan identifier")),
    responses(
        (status = 200, body = CancelResponse),
        (status = 404, description = "Unknown scan", body = ErrorResponse)
    ),
    tag = "scanner"
)]
pub async fn cancel_scan(
    State(state): State<AppState>,
    Path(scan_id): Path<String>,
) -> Result<Json<CancelResponse>, ApiError> {
    if !state.scans.cancel(&scan_id).await {
        return Err(error(StatusCode::NOT_FOUND, format!("unknown scan: {scan_id}")));
    }

    Ok(Json(CancelResponse {
        scan_id,
        status: "cancelled".to_string(),
    }))
}

/// GET /api/v1/rules - available rule categories and supported languages.
#[utoipa::path(
    get,
    path = "/api/v1/rules",
    responses((status = 200, body = RulesResponse)),
    tag = "scanner"
)]
pub async fn list_rules() -> Json<RulesResponse> {
    let categories = [
        ("xss", "Cross-Site Scripting (XSS)", "Detect potential XSS vulnerabilities"),
        ("sql_injection", "SQL Injection", "Detect SQL injection vulnerabilities"),
        (
            "command_injection",
            "Command Injection",
            "Detect command injection vulnerabilities",
        ),
        ("secrets", "Secrets Exposure", "Detect hardcoded secrets and API keys"),
        ("csrf", "Cross-Site Request Forgery", "Detect missing CSRF protections"),
        ("session", "Session Security", "Detect insecure session management"),
        ("idor", "Insecure Direct Object Reference", "Detect unauthorized object access"),
        (
            "authentication",
            "Authentication Issues",
            "Detect authentication-related vulnerabilities",
        ),
        (
            "cryptography",
            "Cryptography Issues",
            "Detect weak or insecure cryptographic implementations",
        ),
        ("dependency", "Vulnerable Dependencies", "Detect known-vulnerable dependencies"),
    ];

    Json(RulesResponse {
        categories: categories
            .into_iter()
            .map(|(id, name, description)| RuleCategoryDto {
                id: id.to_string(),
                name: name.to_string(),
                description: description.to_string(),
            })
            .collect(),
        supported_languages: [
            "javascript",
            "typescript",
            "python",
            "java",
            "go",
            "ruby",
            "php",
            "csharp",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    })
}

/// GET /api/v1/llm/providers
#[utoipa::path(
    get,
    path = "/api/v1/llm/providers",
    responses((status = 200, body = ProvidersResponse)),
    tag = "llm"
)]
pub async fn list_providers(State(state): State<AppState>) -> Json<ProvidersResponse> {
    let data = state
        .llm
        .available_providers()
        .into_iter()
        .map(|listing| ProviderListingDto {
            provider: listing.provider,
            models: listing.models,
        })
        .collect();

    Json(ProvidersResponse {
        success: true,
        data,
    })
}

fn parse_provider(raw: Option<&str>) -> Result<ProviderKind, ApiError> {
    raw.unwrap_or("OPENAI")
        .parse()
        .map_err(|e: LlmError| error(StatusCode::BAD_REQUEST, e.to_string()))
}

fn llm_error(e: LlmError) -> ApiError {
    match e {
        LlmError::MissingApiKey(_) | LlmError::UnknownProvider(_) => {
            error(StatusCode::BAD_REQUEST, e.to_string())
        }
        other => error(StatusCode::BAD_GATEWAY, other.to_string()),
    }
}

/// POST /api/v1/llm/generate-fix
#[utoipa::path(
    post,
    path = "/api/v1/llm/generate-fix",
    request_body = GenerateFixRequest,
    responses(
        (status = 200, body = GenerateFixResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Provider failure", body = ErrorResponse)
    ),
    tag = "llm"
)]
pub async fn generate_fix_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateFixRequest>,
) -> Result<Json<GenerateFixResponse>, ApiError> {
    let vuln = &request.vulnerability;
    let required = [
        ("title", &vuln.title),
        ("description", &vuln.description),
        ("category", &vuln.category),
        ("file_path", &vuln.file_path),
        ("code_snippet", &vuln.code_snippet),
        ("language", &vuln.language),
    ];
    let missing: Vec<&str> = required
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();
    if !missing.is_empty() {
        return Err(error(
            StatusCode::BAD_REQUEST,
            format!("Missing required vulnerability fields: {}", missing.join(", ")),
        ));
    }

    let kind = parse_provider(request.provider.as_deref())?;
    let provider = state
        .llm
        .create(kind, request.api_key.as_deref())
        .map_err(llm_error)?;

    let fix_request = gitscan_llm::FixRequest {
        title: vuln.title.clone(),
        description: vuln.description.clone(),
        category: vuln.category.clone(),
        file_path: vuln.file_path.clone(),
        code_snippet: vuln.code_snippet.clone(),
        language: vuln.language.clone(),
        cwe_id: vuln.cwe_id.clone(),
        suggested_fix: vuln.suggested_fix.clone(),
        context: vuln.context.clone(),
    };

    let response = generate_fix(
        provider.as_ref(),
        &fix_request,
        request.model.as_deref(),
        state.llm.max_tokens(),
    )
    .await
    .map_err(llm_error)?;

    Ok(Json(GenerateFixResponse {
        success: true,
        data: FixResponseDto {
            fixed_code: response.fixed_code,
            explanation: response.explanation,
            confidence: response.confidence,
            provider: response.provider,
            model: response.model,
            tokens_used: response.tokens_used,
        },
    }))
}

/// POST /api/v1/llm/analyze
#[utoipa::path(
    post,
    path = "/api/v1/llm/analyze",
    request_body = AnalyzeRequest,
    responses(
        (status = 200, body = AnalyzeResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Provider failure", body = ErrorResponse)
    ),
    tag = "llm"
)]
pub async fn analyze_snippet_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let code = request
        .code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .ok_or_else(|| error(StatusCode::BAD_REQUEST, "Code is required"))?;

    let kind = parse_provider(request.provider.as_deref())?;
    let provider = state
        .llm
        .create(kind, request.api_key.as_deref())
        .map_err(llm_error)?;

    let analysis = analyze_snippet(
        provider.as_ref(),
        code,
        request.language.as_deref().unwrap_or("javascript"),
        request.context.as_deref(),
        state.llm.max_tokens(),
    )
    .await
    .map_err(llm_error)?;

    let data = serde_json::to_value(&analysis)
        .map_err(|e| error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(AnalyzeResponse {
        success: true,
        data,
    }))
}
