use actix_web::{HttpResponse, get, web};
use serde::Serialize;
use statusboard_service::StatusRecord;
use tera::{Context, Tera};
use tracing::error;

use super::assets::text_asset;
use crate::error::ApiError;
use crate::state::AppState;

const INDEX_TEMPLATE: &str = "templates/index.html";

/// Current status as the page shows it
#[derive(Debug, Serialize)]
struct StatusView {
    label: String,
    class: &'static str,
    response_time: String,
    status_code: String,
    checked_at: String,
}

const NOT_AVAILABLE: &str = "-";

impl StatusView {
    fn from_record(record: Option<&StatusRecord>) -> Self {
        match record {
            Some(record) => Self {
                label: status_label(record),
                class: if record.is_up { "up" } else { "down" },
                response_time: format!("{} ms", record.response_time_ms),
                status_code: record.status_code.to_string(),
                checked_at: record.timestamp.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            },
            None => Self::placeholder("No data yet", "unknown"),
        }
    }

    fn placeholder(label: &str, class: &'static str) -> Self {
        Self {
            label: label.to_string(),
            class,
            response_time: NOT_AVAILABLE.into(),
            status_code: NOT_AVAILABLE.into(),
            checked_at: NOT_AVAILABLE.into(),
        }
    }
}

/// A down record with a response names its code; code 0 means nothing came back
fn status_label(record: &StatusRecord) -> String {
    match (record.is_up, record.status_code) {
        (true, _) => "Operational".into(),
        (false, 0) => "Outage".into(),
        (false, code) => format!("Outage ({code})"),
    }
}

fn render_index(state: &AppState, status: &StatusView) -> Result<String, ApiError> {
    let template = text_asset(INDEX_TEMPLATE).ok_or_else(|| {
        error!("Template {} is missing from the embedded assets", INDEX_TEMPLATE);
        ApiError::Internal("Internal Server Error".into())
    })?;

    let mut context = Context::new();
    context.insert("target_url", &state.target_url);
    context.insert("history_days", &state.history_days);
    context.insert("status", status);

    Tera::one_off(&template, &context, true).map_err(|e| {
        error!("Failed to render {}: {:?}", INDEX_TEMPLATE, e);
        ApiError::Internal("Internal Server Error".into())
    })
}

/// HTML status page; the embedded script keeps it current
#[get("/")]
pub async fn index_route(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let status = match state.current_status().await {
        Ok(record) => StatusView::from_record(record.as_ref()),
        Err(e) => {
            error!("Error querying current status for page: {:#}", e);
            StatusView::placeholder("Status unavailable", "unknown")
        }
    };

    let html = render_index(&state, &status)?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}
