use super::dto::{MarketDataQuery, MarketDataResponse, ProxyQuery, VerifyRequest, VerifyResponse};
use super::error::ApiError;
use super::router::AppState;
use crate::application::licensing::WebhookOutcome;
use crate::domain::errors::LicenseError;
use crate::infrastructure::proxy::{fallback_fear_greed_document, fallback_global_document};
use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde_json::{Value, json};
use tracing::{info, warn};

const LICENSE_HEADER: &str = "x-license-key";
const LICENSE_COOKIE: &str = "license_key";
const SIGNATURE_HEADER: &str = "x-signature";

const DEFAULT_BINANCE_ENDPOINT: &str = "ticker/24hr?symbol=BTCUSDT";
const DEFAULT_COINGECKO_ENDPOINT: &str = "global";
const FEAR_GREED_HISTORY_ENDPOINT: &str = "fng/?limit=10";

const PROXY_CACHE_CONTROL: &str = "public, s-maxage=10, stale-while-revalidate=30";
const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn market_data(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<MarketDataQuery>,
) -> Result<Json<MarketDataResponse>, ApiError> {
    let key = license_key_from_request(&headers, &query);
    let response = state.market_feed.evaluate(key.as_deref()).await?;
    Ok(Json(response.into()))
}

/// Header first, then cookie, then `?key=`
pub fn license_key_from_request(headers: &HeaderMap, query: &MarketDataQuery) -> Option<String> {
    let from_header = headers
        .get(LICENSE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let from_cookie = || {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == LICENSE_COOKIE)
            .map(|(_, value)| value.to_string())
    };

    from_header
        .or_else(from_cookie)
        .or_else(|| query.key.clone())
        .filter(|k| !k.trim().is_empty())
}

pub async fn verify_license(
    State(state): State<AppState>,
    request: Result<Json<VerifyRequest>, JsonRejection>,
) -> (StatusCode, Json<VerifyResponse>) {
    let raw_key = request
        .ok()
        .and_then(|Json(body)| body.license_key)
        .unwrap_or_default();

    match state.license_service.verify(&raw_key).await {
        Ok(license) => (StatusCode::OK, Json(VerifyResponse::valid(&license))),
        Err(e) => {
            let status = match &e {
                LicenseError::Missing => StatusCode::BAD_REQUEST,
                LicenseError::NotFound => StatusCode::NOT_FOUND,
                LicenseError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::FORBIDDEN,
            };
            let message = match &e {
                LicenseError::Missing => "License key is required".to_string(),
                LicenseError::Storage(inner) => {
                    warn!("License verification failed: {:#}", inner);
                    "Internal server error".to_string()
                }
                other => other.to_string(),
            };
            (status, Json(VerifyResponse::invalid(message)))
        }
    }
}

pub async fn lemon_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());

    match state.webhook.process(&body, signature).await? {
        WebhookOutcome::LicenseIssued(license) => {
            info!("Webhook handled: license {} issued", license.license_key);
        }
        WebhookOutcome::Ignored { event_name } => {
            info!("Webhook handled: {} ignored", event_name);
        }
    }

    Ok(Json(json!({ "success": true })))
}

pub async fn proxy_binance(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let endpoint = query
        .endpoint
        .unwrap_or_else(|| DEFAULT_BINANCE_ENDPOINT.to_string());
    let document = state.proxies.binance.fetch_json(&endpoint).await?;

    Ok((
        [(CACHE_CONTROL, HeaderValue::from_static(PROXY_CACHE_CONTROL))],
        Json(document),
    )
        .into_response())
}

pub async fn proxy_coingecko(
    State(state): State<AppState>,
    Query(query): Query<ProxyQuery>,
) -> Result<Response, ApiError> {
    let endpoint = query
        .endpoint
        .unwrap_or_else(|| DEFAULT_COINGECKO_ENDPOINT.to_string());

    match state.proxies.coingecko.fetch_json(&endpoint).await {
        Ok(document) => Ok((
            [(CACHE_CONTROL, HeaderValue::from_static(PROXY_CACHE_CONTROL))],
            Json(document),
        )
            .into_response()),
        Err(e) if endpoint == DEFAULT_COINGECKO_ENDPOINT => {
            warn!("CoinGecko proxy failed, serving fallback: {}", e);
            Ok(Json(fallback_global_document()).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn proxy_alternative(State(state): State<AppState>) -> Response {
    match state
        .proxies
        .alternative_me
        .fetch_json(FEAR_GREED_HISTORY_ENDPOINT)
        .await
    {
        Ok(document) => (
            [(CACHE_CONTROL, HeaderValue::from_static(PROXY_CACHE_CONTROL))],
            Json(document),
        )
            .into_response(),
        Err(e) => {
            warn!("Fear & Greed proxy failed, serving fallback: {}", e);
            (
                [(
                    HeaderName::from_static("x-cache"),
                    HeaderValue::from_static("FALLBACK"),
                )],
                Json(fallback_fear_greed_document(Utc::now())),
            )
                .into_response()
        }
    }
}

pub async fn metrics(State(state): State<AppState>) -> Response {
    let body = state
        .metrics
        .as_ref()
        .map(|m| m.render())
        .unwrap_or_default();

    ([(CONTENT_TYPE, METRICS_CONTENT_TYPE)], body).into_response()
}
