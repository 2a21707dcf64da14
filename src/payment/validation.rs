//! Checks that each step of the payment form is complete.

use std::collections::BTreeMap;

use crate::{
    email::is_valid_email,
    payment::form::{CATEGORIES, PaymentFormData, STATES, WizardStep},
};

/// Error messages keyed by the name of the input they belong to.
///
/// Empty when the step is valid.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn validate_card(data: &PaymentFormData, errors: &mut FieldErrors) {
    if is_blank(&data.cardholder_name) {
        errors.insert("cardholder_name", "Cardholder name is required");
    }

    let card_digits = data.cc_num.chars().filter(|c| !c.is_whitespace()).count();
    if card_digits < 16 {
        errors.insert("cc_num", "Valid card number is required");
    }

    if data.expiry.chars().count() < 5 {
        errors.insert("expiry", "Valid expiry date is required");
    }

    if data.cvv.chars().count() < 3 {
        errors.insert("cvv", "Valid CVV is required");
    }
}

fn validate_payment(data: &PaymentFormData, errors: &mut FieldErrors) {
    let is_valid_amount = data
        .amt
        .trim()
        .parse::<f64>()
        .is_ok_and(|amount| amount.is_finite() && amount > 0.0);
    if !is_valid_amount {
        errors.insert("amt", "Please enter a valid amount");
    }

    if !CATEGORIES.contains(&data.category.as_str()) {
        errors.insert("category", "Please select a category");
    }

    if is_blank(&data.reason) {
        errors.insert("reason", "Please enter a payment reason");
    }
}

fn validate_recipient(data: &PaymentFormData, errors: &mut FieldErrors) {
    if is_blank(&data.recipient_name) {
        errors.insert("recipient_name", "Recipient name is required");
    }

    if !is_valid_email(&data.recipient_email) {
        errors.insert("recipient_email", "Valid email address is required");
    }

    if is_blank(&data.recipient_phone) {
        errors.insert("recipient_phone", "Phone number is required");
    }
}

fn validate_location(data: &PaymentFormData, errors: &mut FieldErrors) {
    if is_blank(&data.address) {
        errors.insert("address", "Address is required");
    }

    if is_blank(&data.city) {
        errors.insert("city", "City is required");
    }

    if !STATES.contains(&data.state.as_str()) {
        errors.insert("state", "State is required");
    }

    if is_blank(&data.zip_code) {
        errors.insert("zip_code", "ZIP code is required");
    }
}

/// Validate the inputs that belong to `step`, ignoring the other steps.
pub fn validate_step(step: WizardStep, data: &PaymentFormData) -> FieldErrors {
    let mut errors = FieldErrors::new();

    match step {
        WizardStep::Card => validate_card(data, &mut errors),
        WizardStep::Payment => validate_payment(data, &mut errors),
        WizardStep::Recipient => validate_recipient(data, &mut errors),
        WizardStep::Location => validate_location(data, &mut errors),
    }

    errors
}

/// Validate every step in order and return the first one with errors.
pub fn first_invalid_step(data: &PaymentFormData) -> Option<(WizardStep, FieldErrors)> {
    WizardStep::ALL
        .into_iter()
        .map(|step| (step, validate_step(step, data)))
        .find(|(_, errors)| !errors.is_empty())
}
