use actix_web::{HttpResponse, get, web};
use chrono::Utc;
use statusboard_service::uptime::uptime_report;
use tracing::error;

use crate::error::ApiError;
use crate::state::AppState;

/// Latest status as JSON; 404 when nothing has been recorded yet
#[get("/api/status/current")]
pub async fn current_status_route(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    match state.current_status().await {
        Ok(Some(record)) => Ok(HttpResponse::Ok().json(record)),
        Ok(None) => Err(ApiError::NotFound("No status data available yet".into())),
        Err(e) => {
            error!("Error querying current status: {:#}", e);
            Err(ApiError::Internal("Error fetching current status".into()))
        }
    }
}

/// Records from the configured history window, oldest first
#[get("/api/status/history")]
pub async fn history_route(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let history = state.store.recent_history(state.history_days).await.map_err(|e| {
        error!("Error querying status history: {:#}", e);
        ApiError::Internal("Error fetching status history".into())
    })?;

    Ok(HttpResponse::Ok().json(history))
}

/// Uptime percentages; a failed window shows the error marker instead
#[get("/api/status/uptime")]
pub async fn uptime_route(state: web::Data<AppState>) -> HttpResponse {
    let report = uptime_report(state.store.as_ref(), Utc::now()).await;
    HttpResponse::Ok().json(report.summary())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::{broken_state, empty_state};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use chrono::Duration;
    use statusboard_service::StatusRecord;

    #[actix_web::test]
    async fn test_current_is_404_without_any_data() {
        let (state, _dir) = empty_state().await;
        let app = test::init_service(App::new().app_data(state).service(current_status_route)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/status/current").to_request()).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_current_prefers_cache() {
        let (state, _dir) = empty_state().await;
        let cached = StatusRecord::new(Utc::now(), false, 10_000, 0);
        state.latest.store(cached.clone());
        let app = test::init_service(App::new().app_data(state).service(current_status_route)).await;

        let body: StatusRecord =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status/current").to_request())
                .await;

        assert_eq!(body, cached);
    }

    #[actix_web::test]
    async fn test_current_falls_back_to_store_and_seeds_cache() {
        let (state, _dir) = empty_state().await;
        let stored = StatusRecord::new(Utc::now() - Duration::minutes(3), true, 120, 200);
        state.store.append(&stored).await.unwrap();
        let app = test::init_service(App::new().app_data(state.clone()).service(current_status_route)).await;

        let body: StatusRecord =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status/current").to_request())
                .await;

        assert_eq!(body, stored.truncated_to_storage());
        assert_eq!(state.latest.load(), Some(body));
    }

    #[actix_web::test]
    async fn test_history_is_empty_array_without_data() {
        let (state, _dir) = empty_state().await;
        let app = test::init_service(App::new().app_data(state).service(history_route)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/status/history").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = test::read_body(resp).await;
        assert_eq!(body.as_ref(), b"[]");
    }

    #[actix_web::test]
    async fn test_history_respects_window() {
        let (state, _dir) = empty_state().await;
        let now = Utc::now();
        let old = StatusRecord::new(now - Duration::days(91), true, 40, 200);
        let recent = StatusRecord::new(now - Duration::days(1), false, 40, 502);
        state.store.append(&old).await.unwrap();
        state.store.append(&recent).await.unwrap();
        let app = test::init_service(App::new().app_data(state).service(history_route)).await;

        let body: Vec<StatusRecord> =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status/history").to_request())
                .await;

        assert_eq!(body, vec![recent.truncated_to_storage()]);
    }

    #[actix_web::test]
    async fn test_store_failure_is_500() {
        let state = broken_state();
        let app = test::init_service(
            App::new().app_data(state).service(current_status_route).service(history_route),
        )
        .await;

        for uri in ["/api/status/current", "/api/status/history"] {
            let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR, "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_uptime_reports_each_window() {
        let (state, _dir) = empty_state().await;
        let now = Utc::now();
        for (minutes, code) in [(120, 200), (90, 200), (75, 500)] {
            let record = StatusRecord::new(now - Duration::minutes(minutes), code == 200, 30, code);
            state.store.append(&record).await.unwrap();
        }
        let app = test::init_service(App::new().app_data(state).service(uptime_route)).await;

        let body: serde_json::Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/api/status/uptime").to_request())
                .await;

        assert_eq!(body["uptime24h"], "66.67%");
        assert_eq!(body["uptime7d"], "66.67%");
        assert_eq!(body["uptime30d"], "66.67%");
    }

    #[actix_web::test]
    async fn test_uptime_uses_error_marker_when_store_fails() {
        let app = test::init_service(App::new().app_data(broken_state()).service(uptime_route)).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/status/uptime").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["uptime24h"], "Error");
        assert_eq!(body["uptime7d"], "Error");
        assert_eq!(body["uptime30d"], "Error");
    }
}
