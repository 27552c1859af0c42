use std::sync::Arc;

use axum::{
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::mailer::Mailer;
use super::postings::{JobPosting, ListingSource};
use super::relay::{ApplicationRelay, RelayError, RelayReceipt};
use super::submission::{ApplicationForm, ResumeAttachment};

pub const APPLY_PATH: &str = "/api/careers/apply";
pub const POSITIONS_PATH: &str = "/api/careers/positions";

/// JSON envelope returned by the apply endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApplyResponse {
    pub fn accepted(receipt: RelayReceipt) -> Self {
        Self {
            success: true,
            message: Some(receipt.message),
            message_id: Some(receipt.message_id),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            message_id: None,
            error: Some(error.into()),
        }
    }
}

fn failure(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ApplyResponse::failed(error))).into_response()
}

/// Shared handler state: the relay and the listing source.
pub struct CareersState<M> {
    pub relay: Arc<ApplicationRelay<M>>,
    pub listings: Arc<dyn ListingSource>,
}

impl<M> Clone for CareersState<M> {
    fn clone(&self) -> Self {
        Self {
            relay: Arc::clone(&self.relay),
            listings: Arc::clone(&self.listings),
        }
    }
}

/// Router exposing the listing and the apply endpoint.
pub fn careers_router<M>(
    relay: Arc<ApplicationRelay<M>>,
    listings: Arc<dyn ListingSource>,
    max_upload_bytes: usize,
) -> Router
where
    M: Mailer,
{
    let state = CareersState { relay, listings };
    Router::new()
        .route(
            APPLY_PATH,
            post(apply_handler::<M>).layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .route(POSITIONS_PATH, get(list_positions_handler::<M>))
        .route(
            "/api/careers/positions/:position_id",
            get(position_handler::<M>),
        )
        .with_state(state)
}

pub(crate) async fn apply_handler<M>(
    State(state): State<CareersState<M>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response
where
    M: Mailer,
{
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::debug!(%rejection, "apply request is not multipart");
            return failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    let form = match read_form(multipart).await {
        Ok(form) => form,
        Err(err) => {
            tracing::debug!(%err, "unable to read apply form");
            return failure(err.status(), err.body_text());
        }
    };

    match state.relay.relay(form).await {
        Ok(receipt) => (StatusCode::OK, Json(ApplyResponse::accepted(receipt))).into_response(),
        Err(err) => relay_failure(&err),
    }
}

fn relay_failure(err: &RelayError) -> Response {
    failure(err.status(), err.public_message())
}

async fn read_form(mut multipart: Multipart) -> Result<ApplicationForm, MultipartError> {
    let mut form = ApplicationForm::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            // Repeated fields keep their first value.
            Some("email") => first_text(&mut form.email, field).await?,
            Some("phone") => first_text(&mut form.phone, field).await?,
            Some("position") => first_text(&mut form.position, field).await?,
            Some("positionId") => first_text(&mut form.position_id, field).await?,
            Some("resume") if form.resume.is_some() => {}
            Some("resume") => {
                // A plain text part under this name is not a file upload.
                let Some(filename) = field.file_name().map(str::to_owned) else {
                    continue;
                };
                let content = field.bytes().await?;
                form.resume = Some(ResumeAttachment::new(filename, content.to_vec()));
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn first_text(slot: &mut Option<String>, field: Field<'_>) -> Result<(), MultipartError> {
    if slot.is_none() {
        *slot = Some(field.text().await?);
    }
    Ok(())
}

pub(crate) async fn list_positions_handler<M>(
    State(state): State<CareersState<M>>,
) -> Json<Vec<JobPosting>>
where
    M: Mailer,
{
    Json(state.listings.postings())
}

pub(crate) async fn position_handler<M>(
    State(state): State<CareersState<M>>,
    Path(position_id): Path<String>,
) -> Response
where
    M: Mailer,
{
    match state.listings.find(&position_id) {
        Some(posting) => (StatusCode::OK, Json(posting)).into_response(),
        None => failure(
            StatusCode::NOT_FOUND,
            format!("position '{position_id}' not found"),
        ),
    }
}
