//! The API endpoints URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The landing page for logged in users.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The transaction table fragment on the dashboard, filtered and paged.
pub const DASHBOARD_TRANSACTIONS: &str = "/dashboard/transactions";
/// The first step of the payment form.
pub const PAYMENT_VIEW: &str = "/payment";
/// The page shown after a payment was submitted.
pub const PAYMENT_SUCCESS_VIEW: &str = "/payment/success";
/// The route for getting the sign-up page.
pub const SIGN_UP_VIEW: &str = "/sign_up";
/// The route for getting the log in page.
pub const LOG_IN_VIEW: &str = "/log_in";
/// The page to display when an internal server error occurs.
pub const INTERNAL_ERROR_VIEW: &str = "/error";
/// The route for static files.
pub const STATIC: &str = "/static";

/// The route for logging in a user.
pub const LOG_IN_API: &str = "/api/log_in";
/// The route for the client to log out the current user.
pub const LOG_OUT: &str = "/api/log_out";
/// The route to create users.
pub const USERS: &str = "/api/users";
/// The route to fetch every transaction as JSON.
pub const TRANSACTIONS_API: &str = "/api/transactions";
/// The route for moving between the steps of the payment form.
pub const PAYMENT_STEP: &str = "/api/payment/step";
/// The route for re-rendering the card preview while the card details are typed.
pub const PAYMENT_CARD_PREVIEW: &str = "/api/payment/card_preview";
/// The route for submitting a completed payment.
pub const PAYMENTS_API: &str = "/api/payments";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::PAYMENT_VIEW);
        assert_endpoint_is_valid_uri(endpoints::PAYMENT_SUCCESS_VIEW);
        assert_endpoint_is_valid_uri(endpoints::SIGN_UP_VIEW);
        assert_endpoint_is_valid_uri(endpoints::LOG_IN_VIEW);
        assert_endpoint_is_valid_uri(endpoints::INTERNAL_ERROR_VIEW);
        assert_endpoint_is_valid_uri(endpoints::STATIC);

        assert_endpoint_is_valid_uri(endpoints::LOG_IN_API);
        assert_endpoint_is_valid_uri(endpoints::LOG_OUT);
        assert_endpoint_is_valid_uri(endpoints::USERS);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS_API);
        assert_endpoint_is_valid_uri(endpoints::PAYMENT_STEP);
        assert_endpoint_is_valid_uri(endpoints::PAYMENT_CARD_PREVIEW);
        assert_endpoint_is_valid_uri(endpoints::PAYMENTS_API);
    }
}
