use axum::{
    Router,
    extract::{Json, Query},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use clap::Args;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::core::{
    DEFAULT_ANNUAL_RATE_PERCENT, DEFAULT_LOAN_AMOUNT, DEFAULT_TENURE_YEARS, FieldId, InputError,
    RawInputs,
};
use crate::view::{CalculatorView, ViewSnapshot};

const INDEX_HTML: &str = include_str!("../../web/index.html");
const STYLES_CSS: &str = include_str!("../../web/styles.css");
const APP_JS: &str = include_str!("../../web/app.js");

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{}: {source}", .field.label())]
    InvalidEntry {
        field: FieldId,
        #[source]
        source: InputError,
    },
    #[error("Not found")]
    NotFound,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidEntry { .. } => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }

    fn field(&self) -> Option<FieldId> {
        match self {
            ApiError::InvalidEntry { field, .. } => Some(*field),
            ApiError::NotFound => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error_response(self.status(), &self.to_string(), self.field())
    }
}

/// A field value as sent by the page: the raw text of the input box, or a
/// number from a slider or a scripted client.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Number(f64),
    Text(String),
}

impl RawEntry {
    fn into_text(self) -> String {
        match self {
            RawEntry::Number(v) => v.to_string(),
            RawEntry::Text(s) => s,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Deserialize)]
struct SliderMove {
    field: FieldId,
    position: f64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct EmiPayload {
    loan_amount: Option<RawEntry>,
    annual_rate: Option<RawEntry>,
    tenure_years: Option<RawEntry>,
    slide: Option<SliderMove>,
    viewport_width: Option<u32>,
}

/// Field entries exactly as typed. Shared by `emi calc` and the HTTP API,
/// which overlays request values onto the page defaults.
#[derive(Args, Debug, Clone)]
pub struct CalcArgs {
    #[arg(long, allow_hyphen_values = true, default_value_t = DEFAULT_LOAN_AMOUNT.to_string(), help = "Loan amount in rupees; empty means 0")]
    pub loan_amount: String,
    #[arg(long, allow_hyphen_values = true, default_value_t = DEFAULT_ANNUAL_RATE_PERCENT.to_string(), help = "Annual interest rate in percent, e.g. 8.5")]
    pub rate: String,
    #[arg(long, allow_hyphen_values = true, default_value_t = DEFAULT_TENURE_YEARS.to_string(), help = "Loan tenure in years; fractions allowed")]
    pub years: String,
    #[arg(long, help = "Print the JSON response body instead of a summary")]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<FieldId>,
}

pub fn build_inputs(args: &CalcArgs) -> Result<RawInputs, ApiError> {
    let mut view = CalculatorView::new();
    for (field, text) in [
        (FieldId::LoanAmount, &args.loan_amount),
        (FieldId::AnnualRate, &args.rate),
        (FieldId::TenureYears, &args.years),
    ] {
        view.enter_text(field, text)
            .map_err(|source| ApiError::InvalidEntry { field, source })?;
    }
    Ok(*view.inputs())
}

pub fn build_emi_response(raw: &RawInputs) -> ViewSnapshot {
    CalculatorView::with_inputs(*raw).snapshot()
}

pub fn router() -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/index.html", get(index_handler))
        .route("/styles.css", get(styles_handler))
        .route("/app.js", get(app_js_handler))
        .route("/api/emi", get(emi_get_handler).post(emi_post_handler))
        .fallback(not_found_handler)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_http_server(port: u16) -> std::io::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "EMI calculator listening");
    info!("Local access: http://127.0.0.1:{port}/");

    axum::serve(listener, router()).await
}

async fn index_handler() -> impl IntoResponse {
    with_cache_control(Html(INDEX_HTML))
}

async fn styles_handler() -> impl IntoResponse {
    with_cache_control((
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLES_CSS,
    ))
}

async fn app_js_handler() -> impl IntoResponse {
    with_cache_control((
        [(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )],
        APP_JS,
    ))
}

async fn not_found_handler() -> Response {
    ApiError::NotFound.into_response()
}

async fn emi_get_handler(Query(payload): Query<EmiPayload>) -> Response {
    emi_handler_impl(payload)
}

async fn emi_post_handler(Json(payload): Json<EmiPayload>) -> Response {
    emi_handler_impl(payload)
}

fn emi_handler_impl(payload: EmiPayload) -> Response {
    match view_from_payload(payload) {
        Ok(view) => json_response(StatusCode::OK, view.snapshot()),
        Err(err) => {
            debug!(%err, "rejected calculator entry");
            err.into_response()
        }
    }
}

fn view_from_payload(payload: EmiPayload) -> Result<CalculatorView, ApiError> {
    let slide = payload.slide;
    let viewport_width = payload.viewport_width;

    let mut view = CalculatorView::with_inputs(raw_inputs_from_payload(payload)?);
    if let Some(SliderMove { field, position }) = slide {
        view.slide(field, position);
    }
    if let Some(width) = viewport_width {
        view.set_viewport_width(width);
    }
    Ok(view)
}

fn raw_inputs_from_payload(payload: EmiPayload) -> Result<RawInputs, ApiError> {
    let mut args = default_calc_args();

    if let Some(v) = payload.loan_amount {
        args.loan_amount = v.into_text();
    }
    if let Some(v) = payload.annual_rate {
        args.rate = v.into_text();
    }
    if let Some(v) = payload.tenure_years {
        args.years = v.into_text();
    }

    build_inputs(&args)
}

#[cfg(test)]
fn raw_inputs_from_json(json: &str) -> Result<RawInputs, String> {
    let payload = serde_json::from_str::<EmiPayload>(json)
        .map_err(|e| format!("Invalid API JSON payload: {e}"))?;
    raw_inputs_from_payload(payload).map_err(|e| e.to_string())
}

fn default_calc_args() -> CalcArgs {
    CalcArgs {
        loan_amount: DEFAULT_LOAN_AMOUNT.to_string(),
        rate: DEFAULT_ANNUAL_RATE_PERCENT.to_string(),
        years: DEFAULT_TENURE_YEARS.to_string(),
        json: false,
    }
}

fn with_cache_control<R: IntoResponse>(response: R) -> Response {
    let mut response = response.into_response();
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        header::HeaderValue::from_static("no-store"),
    );
    response
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    with_cache_control((status, Json(body)))
}

fn error_response(status: StatusCode, msg: &str, field: Option<FieldId>) -> Response {
    json_response(
        status,
        ErrorResponse {
            error: msg.to_string(),
            field,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Field;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    const EPS: f64 = 1e-6;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    async fn send(request: Request<Body>) -> (StatusCode, Option<String>, serde_json::Value) {
        let response = router().oneshot(request).await.expect("router is infallible");
        let status = response.status();
        let cache = response
            .headers()
            .get(header::CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, cache, json)
    }

    #[test]
    fn build_inputs_uses_page_defaults() {
        let raw = build_inputs(&default_calc_args()).expect("defaults are valid");
        assert_eq!(raw, RawInputs::default());
    }

    #[test]
    fn build_inputs_rejects_negative_rate() {
        let mut args = default_calc_args();
        args.rate = "-2".to_string();

        let err = build_inputs(&args).expect_err("must reject negative rate");
        assert!(matches!(
            err,
            ApiError::InvalidEntry {
                field: FieldId::AnnualRate,
                source: InputError::Negative
            }
        ));
        assert!(err.to_string().starts_with("annualRate"));
    }

    #[test]
    fn raw_inputs_from_json_accepts_numbers_text_and_blanks() {
        let json = r#"{
          "loanAmount": 500000,
          "annualRate": "8.5",
          "tenureYears": ""
        }"#;
        let raw = raw_inputs_from_json(json).expect("json should parse");

        assert_eq!(raw.loan_amount, Field::Number(500_000.0));
        assert_eq!(raw.annual_rate_percent, Field::Number(8.5));
        assert_eq!(raw.tenure_years, Field::Empty);
    }

    #[test]
    fn raw_inputs_from_json_keeps_defaults_for_missing_keys() {
        let raw = raw_inputs_from_json(r#"{ "annualRate": 0 }"#).expect("json should parse");
        assert_eq!(raw.loan_amount, Field::Number(DEFAULT_LOAN_AMOUNT));
        assert_eq!(raw.annual_rate_percent, Field::Number(0.0));
        assert_eq!(raw.tenure_years, Field::Number(DEFAULT_TENURE_YEARS));
    }

    #[test]
    fn raw_inputs_from_json_rejects_non_numeric_text() {
        let err = raw_inputs_from_json(r#"{ "loanAmount": "ten lakh" }"#)
            .expect_err("must reject text");
        assert!(err.contains("loanAmount"));
        assert!(err.contains("ten lakh"));
    }

    #[test]
    fn emi_response_serialization_contains_expected_fields() {
        let response = build_emi_response(&RawInputs::default());
        let json = serde_json::to_string(&response).expect("response should serialize");
        assert!(json.contains("\"periodicPayment\""));
        assert!(json.contains("\"totalPayable\""));
        assert!(json.contains("\"principalSharePercent\""));
        assert!(json.contains("\"interestShare\":\"56.1\""));
        assert!(json.contains("\"annualRatePercent\""));
    }

    #[tokio::test]
    async fn get_emi_computes_from_query_string() {
        let request = Request::get("/api/emi?loanAmount=100000&annualRate=0&tenureYears=10")
            .body(Body::empty())
            .expect("valid request");
        let (status, cache, json) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(cache.as_deref(), Some("no-store"));
        let payment = json["result"]["periodicPayment"].as_f64().expect("number");
        assert_approx(payment, 100_000.0 / 120.0);
        assert_eq!(json["result"]["totalInterest"].as_f64(), Some(0.0));
        assert_eq!(json["display"]["totalPayable"], "1,00,000");
        assert_eq!(json["display"]["periodicPayment"], "833");
    }

    #[tokio::test]
    async fn post_emi_reports_rejected_field() {
        let request = Request::post("/api/emi")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"loanAmount": -5}"#))
            .expect("valid request");
        let (status, _, json) = send(request).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["field"], "loanAmount");
        assert!(json["error"].as_str().is_some_and(|e| e.contains("negative")));
    }

    #[tokio::test]
    async fn blank_query_values_compute_as_zero() {
        let request = Request::get("/api/emi?loanAmount=")
            .body(Body::empty())
            .expect("valid request");
        let (status, _, json) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["result"]["totalPayable"].as_f64(), Some(0.0));
        assert_eq!(json["display"]["interestShare"], "0.0");
        assert_eq!(json["fields"]["loanAmount"], "");
        assert_eq!(json["sliders"]["loanAmount"].as_f64(), Some(50_000.0));
    }

    #[tokio::test]
    async fn post_emi_applies_slider_move_and_viewport_width() {
        let request = Request::post("/api/emi")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{
                  "loanAmount": "350000",
                  "annualRate": "15",
                  "tenureYears": "13",
                  "slide": { "field": "annualRate", "position": 9.96 },
                  "viewportWidth": 500
                }"#,
            ))
            .expect("valid request");
        let (status, _, json) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["fields"]["annualRate"], "10");
        assert_eq!(json["sliders"]["annualRate"].as_f64(), Some(10.0));
        assert_eq!(json["layout"], "mobile");
        assert_eq!(json["donut"]["sizePx"], 180);
        assert_eq!(json["donut"]["holePx"], 94);
    }

    #[tokio::test]
    async fn near_zero_rate_renders_finite_figures() {
        let request = Request::get("/api/emi?loanAmount=100000&annualRate=0.0000000000001&tenureYears=10")
            .body(Body::empty())
            .expect("valid request");
        let (status, _, json) = send(request).await;

        assert_eq!(status, StatusCode::OK);
        let payment = json["result"]["periodicPayment"].as_f64().expect("finite number");
        assert_approx(payment, 100_000.0 / 120.0);
        assert!(json["result"]["totalPayable"].is_number());
        assert_eq!(json["display"]["periodicPayment"], "833");
        assert_eq!(json["display"]["totalPayable"], "1,00,000");
    }

    #[derive(clap::Parser, Debug)]
    struct CalcCommand {
        #[command(flatten)]
        args: CalcArgs,
    }

    #[test]
    fn calc_args_pass_negative_values_through_to_rejection() {
        use clap::Parser;

        let command = CalcCommand::try_parse_from(["emi", "--rate", "-2"])
            .expect("negative values are parsed as values");
        assert_eq!(command.args.rate, "-2");

        let err = build_inputs(&command.args).expect_err("must reject negative rate");
        assert!(matches!(
            err,
            ApiError::InvalidEntry {
                field: FieldId::AnnualRate,
                source: InputError::Negative
            }
        ));
    }

    #[tokio::test]
    async fn unknown_paths_return_json_not_found() {
        let request = Request::get("/history")
            .body(Body::empty())
            .expect("valid request");
        let (status, _, json) = send(request).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "Not found");
        assert!(json.get("field").is_none());
    }

    #[tokio::test]
    async fn index_page_is_served() {
        let response = router()
            .oneshot(Request::get("/").body(Body::empty()).expect("valid request"))
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body should be readable");
        let html = String::from_utf8(bytes.to_vec()).expect("utf-8 page");
        assert!(html.contains("EMI Calculator"));
        assert!(html.contains("app.js"));
    }
}
