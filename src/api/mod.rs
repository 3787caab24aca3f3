mod balance;
mod chain;
mod health;
mod info;
pub mod models;

use actix_web::http::StatusCode;
use actix_web::web::ServiceConfig;
use actix_web::{HttpResponse, ResponseError};

use crate::error::LedgerError;
pub use models::AppState;
use models::ErrorResponse;

pub fn init_routes(cfg: &mut ServiceConfig) {
    cfg.service(health::health_check)
        .service(info::get_info)
        .service(info::get_info_attribute)
        .service(chain::get_blockchain)
        .service(chain::give)
        .service(balance::get_balance);
}

impl ResponseError for LedgerError {
    fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::Unauthorized => StatusCode::FORBIDDEN,
            LedgerError::UnknownAttribute(_) => StatusCode::NOT_FOUND,
            LedgerError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::Blockchain;
    use crate::config::{LedgerConfig, MINER_ACCOUNT};
    use actix_web::{App, test, web};
    use serde_json::Value;
    use std::path::Path;

    fn state(dir: &Path) -> web::Data<AppState> {
        let ledger = Blockchain::new(LedgerConfig {
            difficulty: 1,
            state_file: dir.join("state.json"),
            ..LedgerConfig::server_defaults()
        });
        web::Data::new(AppState::new(ledger, Some("secret".to_string())))
    }

    #[actix_web::test]
    async fn root_reports_running() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(init_routes)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["status"], "API is running");
    }

    #[actix_web::test]
    async fn info_endpoints() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(init_routes)).await;

        let req = test::TestRequest::get().uri("/info").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["blockchain"]["attributes"]["exist"], false);

        let req = test::TestRequest::get().uri("/info/crypto").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["cryptoSymbol"], "KSC");

        let req = test::TestRequest::get().uri("/info/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn snapshot_queries_do_not_wait_for_the_ledger_lock() {
        let dir = tempfile::tempdir().unwrap();
        let data = state(dir.path());
        data.ledger().save_state().unwrap();
        let app = test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        // Held as if a give were mid-search; these routes must still answer.
        let _busy = data.ledger();
        for uri in ["/info", "/info/crypto", "/blockchain"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        }
    }

    #[actix_web::test]
    async fn give_requires_admin_key() {
        let dir = tempfile::tempdir().unwrap();
        let data = state(dir.path());
        let app = test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/blockchain/give/wrong/bob/1.5")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        assert_eq!(data.ledger().len(), 1);
        assert!(!dir.path().join("state.json").exists());
    }

    #[actix_web::test]
    async fn give_rejects_non_numeric_amount() {
        let dir = tempfile::tempdir().unwrap();
        let app = test::init_service(App::new().app_data(state(dir.path())).configure(init_routes)).await;
        let req = test::TestRequest::post()
            .uri("/blockchain/give/secret/bob/abc")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn give_settles_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let data = state(dir.path());
        let app = test::init_service(App::new().app_data(data.clone()).configure(init_routes)).await;

        let req = test::TestRequest::post()
            .uri("/blockchain/give/secret/bob/1.5")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["transaction"], true);
        assert_eq!(body["data"], true);
        assert_eq!(body["mine"], true);
        assert_eq!(body["attributes"]["to"], "bob");
        assert_eq!(body["attributes"]["amount"], 1.5);
        assert_eq!(data.ledger().len(), 2);

        let req = test::TestRequest::get().uri("/blockchain").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["blockchain_exist"], true);
        assert_eq!(body["attributes"]["pending_transactions"][0]["recipient"], "bob");

        let req = test::TestRequest::get()
            .uri(&format!("/balance/{MINER_ACCOUNT}"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["balance"].as_f64().unwrap() < 200.0);
    }
}
