//! The sign-up page and the endpoint that creates new accounts.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    auth::{PasswordHash, Role, ValidatedPassword, user::create_user},
    email::is_valid_email,
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, auth_card, base, labelled_input, link, loading_spinner},
};

/// The state needed for creating a new user.
#[derive(Debug, Clone)]
pub struct SignUpState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for SignUpState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The data submitted from the sign-up form.
#[derive(Default, Serialize, Deserialize)]
pub struct SignUpForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Error messages for each field of the sign-up form.
#[derive(Default)]
struct SignUpErrors<'a> {
    name: Option<&'a str>,
    email: Option<&'a str>,
    password: Option<&'a str>,
    confirm_password: Option<&'a str>,
}

fn sign_up_form(form: &SignUpForm, errors: SignUpErrors) -> Markup {
    html! {
        form
            hx-post=(endpoints::USERS)
            hx-indicator="#indicator"
            hx-disabled-elt="#submit-button"
            hx-swap="outerHTML"
            class="space-y-4 md:space-y-6"
        {
            (labelled_input("name", "Full Name", "text", &form.name, "Jane Doe", errors.name))
            (labelled_input("email", "Email", "email", &form.email, "you@example.com", errors.email))
            (labelled_input("password", "Password", "password", "", "••••••••", errors.password))
            (labelled_input(
                "confirm_password",
                "Confirm Password",
                "password",
                "",
                "••••••••",
                errors.confirm_password,
            ))

            button type="submit" id="submit-button" class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Create Account"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400"
            {
                "Already have an account? "
                (link(endpoints::LOG_IN_VIEW, "Sign in"))
            }
        }
    }
}

/// Display the sign-up page.
pub async fn get_sign_up_page() -> Response {
    let form = sign_up_form(&SignUpForm::default(), SignUpErrors::default());
    let content = auth_card("Create Account", "Start monitoring your transactions", &form);

    base("Sign Up", &[], &content).into_response()
}

/// Create a user account from the sign-up form.
///
/// Invalid input re-renders the form with an error under the offending
/// field. On success the client is redirected to the log-in page.
pub async fn post_sign_up(
    State(state): State<SignUpState>,
    Form(form): Form<SignUpForm>,
) -> Response {
    let name = form.name.trim();
    if name.is_empty() {
        let errors = SignUpErrors {
            name: Some("Name is required"),
            ..Default::default()
        };
        return sign_up_form(&form, errors).into_response();
    }

    let email = form.email.trim();
    if !is_valid_email(email) {
        let errors = SignUpErrors {
            email: Some("Please enter a valid email address"),
            ..Default::default()
        };
        return sign_up_form(&form, errors).into_response();
    }

    if form.password != form.confirm_password {
        let errors = SignUpErrors {
            confirm_password: Some("Passwords do not match"),
            ..Default::default()
        };
        return sign_up_form(&form, errors).into_response();
    }

    let validated_password = match ValidatedPassword::new(&form.password, &[name, email]) {
        Ok(password) => password,
        Err(error) => {
            let message = error.to_string();
            let errors = SignUpErrors {
                password: Some(&message),
                ..Default::default()
            };
            return sign_up_form(&form, errors).into_response();
        }
    };

    let password_hash = match PasswordHash::new(validated_password, PasswordHash::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(error) => {
            tracing::error!("an error occurred while hashing a password: {error}");
            return error.into_alert_response();
        }
    };

    let result = match state.db_connection.lock() {
        Ok(connection) => create_user(name, email, password_hash, Role::User, &connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match result {
        Ok(user) => {
            tracing::info!("Created user {} ({})", user.id, user.email);
            (
                StatusCode::SEE_OTHER,
                HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
                (),
            )
                .into_response()
        }
        Err(Error::DuplicateEmail) => {
            let errors = SignUpErrors {
                email: Some("An account with this email already exists"),
                ..Default::default()
            };
            sign_up_form(&form, errors).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}
