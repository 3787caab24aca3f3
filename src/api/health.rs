use actix_web::{HttpResponse, Responder, get};

use super::models::StatusResponse;

#[get("/")]
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(StatusResponse {
        status: "API is running",
    })
}
