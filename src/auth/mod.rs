//! User accounts, the auth cookie and the pages for logging in and signing up.

mod cookie;
mod log_in;
mod log_out;
mod middleware;
mod password;
mod redirect;
mod sign_up;
mod token;
mod user;

pub use cookie::{COOKIE_TOKEN, DEFAULT_COOKIE_DURATION, invalidate_auth_cookie, set_auth_cookie};
pub use log_in::{get_log_in_page, post_log_in};
pub use log_out::get_log_out;
pub use middleware::{AuthState, auth_guard, auth_guard_hx};
pub use password::{PasswordHash, ValidatedPassword};
pub use sign_up::{get_sign_up_page, post_sign_up};
pub(crate) use token::Token;
pub use user::{
    Role, User, UserID, create_user_table, get_user_by_email, get_user_by_id, update_password,
    upsert_user,
};
