//! Browser form and JSON endpoint in front of the predictor.

use crate::{
    config::ChartConfig,
    form,
    logging::*,
    plotting,
    render::{self, Outcome, PageView},
};
use anyhow::{Context, Result};
use aquaforge_core::predictor::Predictor;
use aquaforge_schemas::{measurement::MeasurementRecord, target::Target};
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use std::{collections::HashMap, sync::Arc};

/// Shared, read-only state handed to every request.
pub struct AppState {
    pub predictor: Predictor,
    pub chart: ChartConfig,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/predict", post(predict_form))
        .route("/api/predict", post(predict_json))
        .route("/healthcheck", get(|| async { "OK" }))
        .with_state(state)
}

pub async fn run(state: Arc<AppState>, bind: &str) -> Result<()> {
    let log = DEFAULT.new(o!("function" => "web::run"));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind web server to {}", bind))?;
    info!(log, "serving prediction form"; "bind" => bind);
    axum::serve(listener, router(state))
        .await
        .context("web server terminated")?;
    Ok(())
}

async fn index() -> Html<String> {
    Html(render::page(&PageView::awaiting_input()))
}

async fn predict_form(
    State(state): State<Arc<AppState>>,
    Form(fields): Form<HashMap<String, String>>,
) -> Html<String> {
    Html(render::page(&form_view(&state, &fields)))
}

/// Runs one form submission through the predictor and decides what the page shows.
pub fn form_view(state: &AppState, fields: &HashMap<String, String>) -> PageView {
    let log = DEFAULT.new(o!("function" => "web::form_view"));
    let echoed = form::echo_fields(fields);

    let record = match form::record_from_fields(fields) {
        Ok(record) => record,
        Err(e) => {
            debug!(log, "rejected form input"; "error" => %e);
            return PageView {
                fields: echoed,
                outcome: Outcome::InvalidInput(e.to_string()),
            };
        }
    };

    let outcome = match state.predictor.predict(&record) {
        Ok(result) => {
            debug!(log, "prediction complete";
                "inputs" => ?record.to_row(),
                "outputs" => ?result.values);
            let dims = (state.chart.width, state.chart.height);
            let chart_svg = match plotting::bar_chart_svg(&result, dims) {
                Ok(svg) => Some(svg),
                Err(e) => {
                    warn!(log, "chart rendering failed"; "error" => %e);
                    None
                }
            };
            Outcome::Displayed {
                result,
                chart_svg,
                predicted_at: chrono::Utc::now().to_rfc3339(),
            }
        }
        Err(e) => {
            warn!(log, "prediction failed"; "error" => %e);
            Outcome::PredictionFailed(e.to_string())
        }
    };

    PageView {
        fields: echoed,
        outcome,
    }
}

#[derive(Debug, Serialize)]
pub struct ApiPrediction {
    pub predictions: Vec<ApiValue>,
    pub predicted_at: String,
}

#[derive(Debug, Serialize)]
pub struct ApiValue {
    pub target: Target,
    pub label: &'static str,
    pub value: f64,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub kind: &'static str,
    pub message: String,
}

async fn predict_json(
    State(state): State<Arc<AppState>>,
    Json(record): Json<MeasurementRecord>,
) -> Result<Json<ApiPrediction>, (StatusCode, Json<ApiError>)> {
    api_predict(&state, &record)
        .map(Json)
        .map_err(|e| (StatusCode::UNPROCESSABLE_ENTITY, Json(e)))
}

pub fn api_predict(state: &AppState, record: &MeasurementRecord) -> Result<ApiPrediction, ApiError> {
    if let Some((feature, value)) = record.out_of_bounds() {
        let bounds = feature.bounds();
        return Err(ApiError {
            kind: "invalid_input",
            message: format!(
                "{} must be between {} and {}, got {}",
                feature.label(),
                bounds.min,
                bounds.max,
                value
            ),
        });
    }

    let result = state.predictor.predict(record).map_err(|e| {
        let log = DEFAULT.new(o!("function" => "web::api_predict"));
        warn!(log, "prediction failed"; "error" => %e);
        ApiError {
            kind: "prediction_failed",
            message: e.to_string(),
        }
    })?;

    Ok(ApiPrediction {
        predictions: result
            .iter()
            .map(|(target, value)| ApiValue {
                target,
                label: target.label(),
                value,
            })
            .collect(),
        predicted_at: chrono::Utc::now().to_rfc3339(),
    })
}
