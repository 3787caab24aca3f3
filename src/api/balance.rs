use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, BalanceResponse};

/// Balance of an address in the live ledger (0 for unknown addresses).
#[get("/balance/{address}")]
pub async fn get_balance(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let address = path.into_inner().0;
    let balance = state.ledger().get_balance(&address);

    HttpResponse::Ok().json(BalanceResponse { address, balance })
}
