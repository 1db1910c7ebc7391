//! Contact form intake.

use actix_web::{HttpResponse, web};

use meridian_core::domain::LeadSubmission;
use meridian_shared::SuccessResponse;

use crate::middleware::error::AppResult;
use crate::state::AppState;

const THANK_YOU: &str = "Thanks for reaching out. We'll be in touch shortly.";

/// POST /api/leads
///
/// Succeeds for every valid submission, whether or not the notification
/// email could be sent.
pub async fn submit_lead(
    state: web::Data<AppState>,
    body: web::Json<LeadSubmission>,
) -> AppResult<HttpResponse> {
    state.leads.submit(body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(SuccessResponse::with_message(THANK_YOU)))
}
