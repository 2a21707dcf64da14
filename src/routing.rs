//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    response::Redirect,
    routing::{get, post},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    auth::{
        auth_guard, auth_guard_hx, get_log_in_page, get_log_out, get_sign_up_page, post_log_in,
        post_sign_up,
    },
    dashboard::{get_dashboard_page, get_dashboard_transactions},
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    payment::{
        get_payment_page, get_payment_success_page, post_card_preview, post_payment,
        post_payment_step,
    },
    transaction::get_transactions_api,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::LOG_IN_VIEW, get(get_log_in_page))
        .route(endpoints::LOG_IN_API, post(post_log_in))
        .route(endpoints::LOG_OUT, get(get_log_out))
        .route(endpoints::SIGN_UP_VIEW, get(get_sign_up_page))
        .route(endpoints::USERS, post(post_sign_up))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let protected_routes = Router::new()
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::PAYMENT_VIEW, get(get_payment_page))
        .route(
            endpoints::PAYMENT_SUCCESS_VIEW,
            get(get_payment_success_page),
        )
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    // Routes requested by HTMX or scripts need the HX-REDIRECT header for auth redirects to work properly.
    let protected_routes = protected_routes.merge(
        Router::new()
            .route(
                endpoints::DASHBOARD_TRANSACTIONS,
                get(get_dashboard_transactions),
            )
            .route(endpoints::TRANSACTIONS_API, get(get_transactions_api))
            .route(endpoints::PAYMENT_STEP, post(post_payment_step))
            .route(endpoints::PAYMENT_CARD_PREVIEW, post(post_card_preview))
            .route(endpoints::PAYMENTS_API, post(post_payment))
            .layer(middleware::from_fn_with_state(state.clone(), auth_guard_hx)),
    );

    protected_routes
        .merge(unprotected_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod root_route_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::{endpoints, routing::get_index_page};

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let response = get_index_page().await.into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let location = response.headers().get("location").unwrap();
        assert_eq!(location, endpoints::DASHBOARD_VIEW);
    }
}

#[cfg(test)]
mod router_tests {
    use axum::http::StatusCode;
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::Value;
    use time::macros::datetime;

    use crate::{
        AppState, PaginationConfig,
        auth::{COOKIE_TOKEN, PasswordHash, Role, ValidatedPassword, upsert_user},
        endpoints,
        transaction::{create_transaction, test_utils::new_transaction},
    };

    use super::build_router;

    const EMAIL: &str = "admin@org.com";
    const PASSWORD: &str = "averysafeandsecurepassword";

    fn get_test_server() -> TestServer {
        let state = AppState::new(
            Connection::open_in_memory().unwrap(),
            "42",
            "Etc/UTC",
            PaginationConfig::default(),
        )
        .unwrap();

        {
            let connection = state.db_connection.lock().unwrap();
            let password_hash =
                PasswordHash::new(ValidatedPassword::new_unchecked(PASSWORD), 4).unwrap();
            upsert_user("admin", EMAIL, password_hash, Role::Admin, &connection).unwrap();
            create_transaction(new_transaction(datetime!(2019-01-01 00:00:18)), &connection)
                .unwrap();
        }

        TestServer::try_new(build_router(state)).unwrap()
    }

    async fn log_in(server: &TestServer) -> Cookie<'static> {
        let response = server
            .post(endpoints::LOG_IN_API)
            .form(&[("email", EMAIL), ("password", PASSWORD)])
            .await;

        response.assert_status_see_other();
        response.cookie(COOKIE_TOKEN)
    }

    #[tokio::test]
    async fn pages_redirect_to_log_in_without_cookie() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_see_other();
        let location = response.header("location");
        assert!(
            location
                .to_str()
                .unwrap()
                .starts_with(&format!("{}?redirect_url=", endpoints::LOG_IN_VIEW)),
            "got location {location:?}"
        );
    }

    #[tokio::test]
    async fn htmx_routes_use_hx_redirect_without_cookie() {
        let server = get_test_server();

        let response = server.get(endpoints::TRANSACTIONS_API).await;

        response.assert_status_ok();
        assert!(
            response
                .header("hx-redirect")
                .to_str()
                .unwrap()
                .starts_with(endpoints::LOG_IN_VIEW)
        );
    }

    #[tokio::test]
    async fn logged_in_user_can_view_pages() {
        let server = get_test_server();
        let cookie = log_in(&server).await;

        for page in [
            endpoints::DASHBOARD_VIEW,
            endpoints::PAYMENT_VIEW,
            endpoints::PAYMENT_SUCCESS_VIEW,
        ] {
            server
                .get(page)
                .add_cookie(cookie.clone())
                .await
                .assert_status_ok();
        }
    }

    #[tokio::test]
    async fn logged_in_user_can_fetch_transactions() {
        let server = get_test_server();
        let cookie = log_in(&server).await;

        let response = server
            .get(endpoints::TRANSACTIONS_API)
            .add_cookie(cookie)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["transactions"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn auth_pages_are_public() {
        let server = get_test_server();

        server.get(endpoints::LOG_IN_VIEW).await.assert_status_ok();
        server.get(endpoints::SIGN_UP_VIEW).await.assert_status_ok();
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let server = get_test_server();

        server
            .get("/does/not/exist")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }
}
