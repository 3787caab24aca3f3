use actix_web::{HttpResponse, get, web};

use super::models::AppState;
use crate::error::LedgerError;
use crate::service;

/// General information about the chain and the API.
#[get("/info")]
pub async fn get_info(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    Ok(HttpResponse::Ok().json(service::status_info(&state.state_file)?))
}

/// One category: blockchain, api, crypto or github.
#[get("/info/{attr}")]
pub async fn get_info_attribute(
    state: web::Data<AppState>,
    attr: web::Path<String>,
) -> Result<HttpResponse, LedgerError> {
    let value = service::info_attribute(&state.state_file, &attr.into_inner())?;
    Ok(HttpResponse::Ok().json(value))
}
