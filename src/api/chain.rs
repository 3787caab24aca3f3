use actix_web::{HttpResponse, get, post, web};
use log::debug;

use super::models::AppState;
use crate::error::LedgerError;
use crate::service;

/// Contents of the persisted snapshot, if any.
#[get("/blockchain")]
pub async fn get_blockchain(state: web::Data<AppState>) -> Result<HttpResponse, LedgerError> {
    Ok(HttpResponse::Ok().json(service::snapshot_contents(&state.state_file)?))
}

/// Give crypto to an address: transfer from the miner account, save,
/// then mine. The whole sequence runs under the ledger lock.
#[post("/blockchain/give/{admin_key}/{address}/{amount}")]
pub async fn give(
    state: web::Data<AppState>,
    path: web::Path<(String, String, String)>,
) -> Result<HttpResponse, LedgerError> {
    let (admin_key, address, amount) = path.into_inner();
    debug!("POST /blockchain/give - to={address} amount={amount}");

    let outcome = {
        let mut ledger = state.ledger();
        let operator = ledger.miner_account().to_string();
        service::give(
            &mut ledger,
            state.admin_key.as_deref(),
            &operator,
            &admin_key,
            &address,
            &amount,
        )?
    };

    Ok(HttpResponse::Ok().json(outcome))
}
