//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{StatusCode, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};
use unicode_segmentation::UnicodeSegmentation;

use crate::endpoints;

/// Form fields whose values must never reach the logs.
const REDACTED_FIELDS: [&str; 4] = ["password", "confirm_password", "cc_num", "cvv"];

/// Routes whose responses render the card number and CVV back into the page.
const CARD_DETAIL_ROUTES: [&str; 3] = [
    endpoints::PAYMENT_STEP,
    endpoints::PAYMENT_CARD_PREVIEW,
    endpoints::PAYMENTS_API,
];

const OMITTED_BODY: &str = "<omitted, contains card details>";

const UNREADABLE_FORM: &str = "<unreadable form body>";

const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// Sensitive form fields are redacted before logging, and response bodies
/// from the payment routes are never logged.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let response_has_card_details = CARD_DETAIL_ROUTES.contains(&parts.uri.path());
    let body_text = match read_body(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read request body: {error}");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    let is_form = parts
        .headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    if is_form {
        log_body("Received request", &parts, &redact_form_fields(&body_text));
    } else {
        log_body("Received request", &parts, &body_text);
    }

    let request = Request::from_parts(parts, body_text.into());
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_text = match read_body(body).await {
        Ok(text) => text,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    if response_has_card_details {
        log_body("Sending response", &parts, OMITTED_BODY);
    } else {
        log_body("Sending response", &parts, &body_text);
    }

    Response::from_parts(parts, body_text.into())
}

async fn read_body(body: Body) -> Result<String, axum::Error> {
    let bytes = axum::body::to_bytes(body, usize::MAX).await?;

    Ok(String::from_utf8_lossy(&bytes).to_string())
}

/// Replace the values of [REDACTED_FIELDS] in a URL encoded form body.
///
/// Names are compared after percent-decoding. The result is re-encoded.
fn redact_form_fields(form_text: &str) -> String {
    let Ok(pairs) = serde_urlencoded::from_str::<Vec<(String, String)>>(form_text) else {
        return UNREADABLE_FORM.to_owned();
    };

    let redacted: Vec<(String, String)> = pairs
        .into_iter()
        .map(|(name, value)| {
            if REDACTED_FIELDS.contains(&name.as_str()) {
                (name, "********".to_owned())
            } else {
                (name, value)
            }
        })
        .collect();

    serde_urlencoded::to_string(&redacted).unwrap_or_else(|_| UNREADABLE_FORM.to_owned())
}

/// Cut `text` to at most `limit` bytes without splitting a character.
fn truncate(text: &str, limit: usize) -> &str {
    let end = text
        .grapheme_indices(true)
        .map(|(index, grapheme)| index + grapheme.len())
        .take_while(|&end| end <= limit)
        .last()
        .unwrap_or(0);

    &text[..end]
}

fn log_body(message: &str, parts: &impl std::fmt::Debug, body: &str) {
    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "{message}: {parts:#?}\nbody: {}...",
            truncate(body, LOG_BODY_LENGTH_LIMIT)
        );
        tracing::debug!("{message} full body: {body:?}");
    } else {
        tracing::info!("{message}: {parts:#?}\nbody: {body:?}");
    }
}
