//! Contact form handler
//!
//! Handles `POST /api/contact`. Field checks run before anything touches
//! storage, and every failing field is reported at once.

use crate::error::{AppError, FieldError};
use crate::handlers::AppState;
use crate::metrics::ContactOutcome;
use crate::middleware::RequestId;
use crate::storage::ContactRecord;
use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde::Serialize;
use serde_json::Value;

/// Longest accepted local part of an email address
const MAX_EMAIL_LOCAL_LEN: usize = 64;

/// Longest accepted email address
const MAX_EMAIL_LEN: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactResponse {
    pub message: &'static str,
}

/// Validated contact submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactSubmission {
    /// Validate a raw JSON body, collecting an error for every bad field
    pub fn from_body(body: &Value) -> Result<Self, Vec<FieldError>> {
        let text = |field: &str| {
            body.get(field)
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default()
        };

        let name = text("name");
        let email = text("email");
        let message = text("message");

        let mut errors = Vec::new();
        if name.is_empty() {
            errors.push(FieldError::new("name", "Name is required"));
        }
        if !is_valid_email(email) {
            errors.push(FieldError::new("email", "Valid email is required"));
        }
        if message.is_empty() {
            errors.push(FieldError::new("message", "Message is required"));
        }

        if errors.is_empty() {
            Ok(Self {
                name: name.to_string(),
                email: email.to_string(),
                message: message.to_string(),
            })
        } else {
            Err(errors)
        }
    }
}

/// Syntactic email check: `local@domain.tld` with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || local.len() > MAX_EMAIL_LOCAL_LEN || domain.contains('@') {
        return false;
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    });
    let tld_ok = labels
        .last()
        .is_some_and(|tld| tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic));

    labels_ok && tld_ok
}

/// POST /api/contact handler
pub async fn handler(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<ContactResponse>), AppError> {
    if !state.storage().is_connected().await {
        tracing::warn!(request_id = %request_id, "Contact submission while storage is disconnected");
        return Err(AppError::StorageUnavailable);
    }

    let body = match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(
                request_id = %request_id,
                error = %rejection.body_text(),
                "Contact body was not JSON, validating as empty"
            );
            Value::Null
        }
    };

    let submission = match ContactSubmission::from_body(&body) {
        Ok(submission) => submission,
        Err(errors) => {
            record(&state, request_id, ContactOutcome::Invalid);
            tracing::info!(
                request_id = %request_id,
                invalid_fields = ?errors.iter().map(|e| e.field).collect::<Vec<_>>(),
                "Rejected contact submission"
            );
            return Err(AppError::ContactValidation(errors));
        }
    };

    let record_to_store =
        ContactRecord::new(submission.name, submission.email, submission.message);
    let id = record_to_store.id;

    if let Err(e) = state.storage().save_contact(record_to_store).await {
        record(&state, request_id, ContactOutcome::Failed);
        return Err(e.into());
    }

    record(&state, request_id, ContactOutcome::Stored);
    tracing::info!(request_id = %request_id, contact_id = %id, "Stored contact submission");

    Ok((
        StatusCode::CREATED,
        Json(ContactResponse {
            message: "Message sent successfully",
        }),
    ))
}

fn record(state: &AppState, request_id: RequestId, outcome: ContactOutcome) {
    if let Err(e) = state.metrics().record_contact(outcome) {
        tracing::error!(
            request_id = %request_id,
            error = %e,
            "Metrics recording failed (non-fatal)"
        );
    }
}
