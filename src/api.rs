//! HTTP surface: axum router and request handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::catalog::Catalog;
use crate::gold::GoldPriceSource;
use crate::pricing::{self, PricedProduct, ProductFilter};

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub gold: Arc<dyn GoldPriceSource>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/products", get(list_products))
        .route("/api/products/:id", get(get_product))
        .route("/api/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Any uncaught fault during request handling, rendered as the 500 envelope.
#[derive(Debug)]
pub struct ApiError(pub anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Request handling failed");
        let body = serde_json::json!({
            "success": false,
            "message": "Unexpected error handling request",
            "error": self.0.to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    min_price: Option<String>,
    max_price: Option<String>,
    min_popularity: Option<String>,
    max_popularity: Option<String>,
}

/// Query values arrive as strings; empty or unparseable ones impose no bound.
fn parse_bound(raw: &Option<String>) -> Option<f64> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

impl ListQuery {
    fn into_filter(self) -> ProductFilter {
        ProductFilter {
            min_price: parse_bound(&self.min_price),
            max_price: parse_bound(&self.max_price),
            min_popularity: parse_bound(&self.min_popularity),
            max_popularity: parse_bound(&self.max_popularity),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse {
    pub success: bool,
    pub products: Vec<PricedProduct>,
    pub gold_price: f64,
    pub total_products: usize,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub success: bool,
    pub product: PricedProduct,
}

async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListResponse>, ApiError> {
    let gold_price = state.gold.price_per_gram().await;
    let products = pricing::list_products(&state.catalog, gold_price, &query.into_filter());

    Ok(Json(ListResponse {
        success: true,
        total_products: products.len(),
        products,
        gold_price,
    }))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let gold_price = state.gold.price_per_gram().await;

    // A non-numeric id is a lookup miss, not a parse error.
    let found = id
        .parse::<i64>()
        .ok()
        .and_then(|id| pricing::get_product(&state.catalog, id, gold_price));

    let response = match found {
        Some(product) => Json(ProductResponse {
            success: true,
            product,
        })
        .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({
                "success": false,
                "message": "Product not found",
            })),
        )
            .into_response(),
    };
    Ok(response)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "success": true,
        "message": "API is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}
