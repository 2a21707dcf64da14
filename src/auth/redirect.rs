//! Helpers for the `redirect_url` that sends a user back to where they were
//! after logging in.

use axum::{extract::Request, http::Uri};

use crate::endpoints;

/// Only same-site, absolute paths are accepted, and never the auth pages
/// themselves since that would loop.
fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map_or(redirect_url, |(path, _)| path);

    path != endpoints::LOG_IN_VIEW && path != endpoints::SIGN_UP_VIEW
}

/// Reduce `raw_url` to its path and query if it is a safe place to redirect to.
///
/// When `allow_authority` is false, URLs with a scheme or host are rejected
/// outright. HTMX sends the full URL of the current page, so headers are
/// parsed with `allow_authority` set and only keep their path.
fn normalize(raw_url: &str, allow_authority: bool) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if !allow_authority && (uri.scheme().is_some() || uri.authority().is_some()) {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Validate a redirect URL supplied by the client.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    normalize(raw_url, false)
}

/// Build the log-in URL that returns the user to the page they requested.
///
/// For `/api` routes the request URI is not a page, so the page that issued
/// the HTMX request (the `HX-Current-URL` header) is used instead.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    let redirect_target = if request.uri().path().starts_with("/api") {
        redirect_target_from_hx_request(request)?
    } else {
        normalize_redirect_url(request.uri().path_and_query()?.as_str())?
    };

    build_log_in_redirect_url_from_target(&redirect_target)
}

pub fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN_VIEW, param)),
        Err(error) => {
            tracing::error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

fn redirect_target_from_hx_request(request: &Request) -> Option<String> {
    let headers = request.headers();
    let is_hx_request = headers
        .get("hx-request")
        .and_then(|header| header.to_str().ok())
        .is_some_and(|header| header.eq_ignore_ascii_case("true"));

    if !is_hx_request {
        tracing::warn!("Missing HX-Request header for /api request.");
        return None;
    }

    let Some(current_url) = headers
        .get("hx-current-url")
        .and_then(|header| header.to_str().ok())
    else {
        tracing::warn!("Missing HX-Current-URL header for /api request.");
        return None;
    };

    let redirect_url = normalize(current_url, true);
    if redirect_url.is_none() {
        tracing::warn!("Invalid HX-Current-URL header value: {current_url}");
    }

    redirect_url
}
