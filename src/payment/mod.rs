//! The four step payment form.
//!
//! The card, payment, recipient and location details are collected one step
//! at a time. Each step is validated on the server before the next is shown,
//! and the completed form is stamped and handed to the payment gateway.

mod form;
mod handlers;
mod submission;
mod validation;
mod views;

pub use handlers::{
    get_payment_page, get_payment_success_page, post_card_preview, post_payment,
    post_payment_step,
};
