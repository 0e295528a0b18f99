use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    routing::{get, post},
    Json, Router,
};
use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::sync::{broadcast, Mutex};
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing::{info, warn};

use ai_visibility::analysis::ResponseEvaluator;
use ai_visibility::config::VisibilityConfig;
use ai_visibility::content::ContentSource;
use ai_visibility::diagnostics::TracingObserver;
use ai_visibility::aggregate_record_inputs;

use crate::api::{
    required_text, ApiAnalyzeRequest, ApiAnalyzeResponse, ApiCustomPromptsRequest,
    ApiEvaluateRequest, ApiKeywordsRequest, ApiKeywordsResponse, ApiMetricsRequest,
    ApiMetricsResponse, ApiPromptsResponse, ApiRecordResponse,
};
use crate::llm::QueryEngine;
use crate::orchestrator::{
    now_ms, prepare_keywords, prepare_prompts, run_analysis, send_event, AnalysisPlan,
    ProgressSender,
};

#[derive(Clone)]
struct AppState {
    config: Arc<VisibilityConfig>,
    engine: Option<QueryEngine>,
    content: ContentSource,
    channels: Arc<Mutex<HashMap<String, ProgressSender>>>,
}

#[derive(serde::Deserialize)]
struct StreamQuery {
    request_id: String,
}

static REQUEST_COUNTER: AtomicUsize = AtomicUsize::new(0);

pub async fn serve(args: crate::ServeArgs, config: VisibilityConfig) -> Result<(), String> {
    let engine = QueryEngine::from_env(&config.query_engine);
    match &engine {
        Some(engine) => info!(model = engine.model(), "query engine configured"),
        None => warn!("OPENAI_API_KEY is not set; /api/analyze is disabled"),
    }
    let content = ContentSource::new(config.content.clone()).map_err(|err| err.to_string())?;
    let state = AppState {
        config: Arc::new(config),
        engine,
        content,
        channels: Arc::new(Mutex::new(HashMap::new())),
    };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/evaluate", post(evaluate_handler))
        .route("/api/metrics", post(metrics_handler))
        .route("/api/prompts/custom", post(custom_prompts_handler))
        .route("/api/keywords", post(keywords_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/analyze/stream", get(stream_handler))
        .nest_service("/", static_service)
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;
    info!(%addr, "serving visibility API");

    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn evaluate_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiEvaluateRequest>,
) -> Result<Json<ApiRecordResponse>, (StatusCode, String)> {
    let (brand, prompt, platform, answers) =
        request.validate().map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let evaluator = ResponseEvaluator::new(state.config.analysis.preview_chars);
    let record = evaluator.evaluate(&prompt, &brand, &platform, &answers);
    Ok(Json(ApiRecordResponse::from_record(record)))
}

async fn metrics_handler(
    Json(request): Json<ApiMetricsRequest>,
) -> Result<Json<ApiMetricsResponse>, (StatusCode, String)> {
    let brand = required_text(request.brand_name, "brand_name")
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let metrics = aggregate_record_inputs(&brand, request.records, &TracingObserver)
        .map_err(|err| (StatusCode::BAD_REQUEST, err.to_string()))?;
    Ok(Json(ApiMetricsResponse::from_metrics(&metrics, Vec::new())))
}

async fn custom_prompts_handler(
    Json(request): Json<ApiCustomPromptsRequest>,
) -> Result<Json<ApiPromptsResponse>, (StatusCode, String)> {
    ApiPromptsResponse::from_custom(request)
        .map(Json)
        .map_err(|err| (StatusCode::BAD_REQUEST, err))
}

async fn keywords_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiKeywordsRequest>,
) -> Result<Json<ApiKeywordsResponse>, (StatusCode, String)> {
    let brand_name = required_text(request.brand_name, "brand_name")
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let domain =
        required_text(request.domain, "domain").map_err(|err| (StatusCode::BAD_REQUEST, err))?;

    let keywords = prepare_keywords(
        state.engine.as_ref(),
        &state.content,
        &brand_name,
        &domain,
        state.config.analysis.max_keywords,
    )
    .await;

    Ok(Json(ApiKeywordsResponse {
        brand_name,
        domain,
        keywords,
    }))
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyzeRequest>,
) -> Result<Json<ApiAnalyzeResponse>, (StatusCode, String)> {
    let brand = required_text(request.brand_name, "brand_name")
        .map_err(|err| (StatusCode::BAD_REQUEST, err))?;
    let engine = state.engine.as_ref().ok_or_else(|| {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            "query engine not configured: set OPENAI_API_KEY".to_string(),
        )
    })?;
    let request_id = request.request_id.clone().unwrap_or_else(generate_request_id);
    let sender = get_or_create_channel(&state, &request_id).await;
    let analysis = &state.config.analysis;

    let mut prompts: Vec<String> = request
        .prompts
        .into_iter()
        .map(|prompt| prompt.trim().to_string())
        .filter(|prompt| !prompt.is_empty())
        .collect();
    if prompts.is_empty() {
        let domain = match request.domain {
            Some(domain) if !domain.trim().is_empty() => domain,
            _ => {
                send_event(Some(&sender), "error", "No prompts or domain supplied");
                return Err((
                    StatusCode::BAD_REQUEST,
                    "prompts or domain is required".to_string(),
                ));
            }
        };
        send_event(Some(&sender), "keywords", format!("Extracting keywords from {}", domain));
        let keywords = prepare_keywords(
            Some(engine),
            &state.content,
            &brand,
            &domain,
            analysis.max_keywords,
        )
        .await;
        prompts = prepare_prompts(engine, &brand, &keywords, &state.config).await;
    }
    prompts.truncate(analysis.max_prompts);

    let platforms = if request.platforms.is_empty() {
        analysis.platforms.clone()
    } else {
        request.platforms
    };
    let plan = AnalysisPlan {
        brand,
        prompts,
        platforms,
        runs: request.runs.unwrap_or(analysis.runs_per_prompt).max(1),
    };

    let evaluator = ResponseEvaluator::new(analysis.preview_chars);
    let report = run_analysis(engine, &evaluator, &plan, Some(&sender)).await;
    schedule_cleanup(state.channels.clone(), request_id.clone());

    Ok(Json(ApiAnalyzeResponse {
        request_id,
        metrics: ApiMetricsResponse::from_metrics(&report.metrics, Vec::new()),
        results: report
            .records
            .into_iter()
            .map(ApiRecordResponse::from_record)
            .collect(),
    }))
}

async fn stream_handler(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Result<Sse<impl tokio_stream::Stream<Item = Result<Event, std::convert::Infallible>>>, StatusCode>
{
    let sender = get_or_create_channel(&state, &query.request_id).await;
    let receiver = sender.subscribe();
    let stream = BroadcastStream::new(receiver).filter_map(|event| match event {
        Ok(event) => {
            let data = serde_json::to_string(&event).unwrap_or_default();
            Some(Ok(Event::default().data(data)))
        }
        Err(_) => None,
    });

    send_event(Some(&sender), "connected", "Streaming analysis progress");
    Ok(Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(8))))
}

async fn get_or_create_channel(state: &AppState, request_id: &str) -> ProgressSender {
    let mut guard = state.channels.lock().await;
    if let Some(sender) = guard.get(request_id) {
        return sender.clone();
    }
    let (sender, _) = broadcast::channel(64);
    guard.insert(request_id.to_string(), sender.clone());
    sender
}

fn schedule_cleanup(channels: Arc<Mutex<HashMap<String, ProgressSender>>>, request_id: String) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(10)).await;
        let mut guard = channels.lock().await;
        guard.remove(&request_id);
    });
}

fn generate_request_id() -> String {
    let counter = REQUEST_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("req-{}-{}", now_ms(), counter)
}
