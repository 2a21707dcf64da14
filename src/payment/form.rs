//! The data collected by the payment form and the helpers that tidy up what
//! the user typed.

use serde::{Deserialize, Serialize};

/// The payment categories the user can choose from.
pub const CATEGORIES: [&str; 6] = [
    "Online Shopping",
    "Travel",
    "Entertainment",
    "Food & Dining",
    "Services",
    "Other",
];

/// The postal codes of the 50 US states.
pub const STATES: [&str; 50] = [
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "FL", "GA", "HI", "ID", "IL", "IN", "IA", "KS",
    "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH", "NJ", "NM", "NY",
    "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT", "VT", "VA", "WA", "WV",
    "WI", "WY",
];

pub const CARDHOLDER_NAME_MAX_LENGTH: usize = 30;
pub const CARD_NUMBER_MAX_LENGTH: usize = 19;
pub const EXPIRY_MAX_LENGTH: usize = 5;
pub const CVV_MAX_LENGTH: usize = 4;

/// The number of characters shown for the card number on the card preview.
const DISPLAY_CARD_NUMBER_LENGTH: usize = 19;
const DISPLAY_CARD_NUMBER_PADDING: char = '•';

/// Everything entered across the four steps of the payment form.
///
/// The values of every step are carried along in hidden inputs, so each
/// request to the server holds the whole form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaymentFormData {
    pub cc_num: String,
    pub expiry: String,
    pub cvv: String,
    pub cardholder_name: String,
    pub amt: String,
    pub category: String,
    pub reason: String,
    pub recipient_name: String,
    pub recipient_email: String,
    pub recipient_phone: String,
    pub city: String,
    pub state: String,
    pub address: String,
    pub zip_code: String,
    /// The latitude of the address, zero when unknown.
    pub merch_lat: f64,
    /// The longitude of the address, zero when unknown.
    pub merch_long: f64,
}

impl PaymentFormData {
    /// Reformat the card fields the way the card inputs display them and cut
    /// them to their maximum lengths.
    pub fn normalise_card_fields(&mut self) {
        self.cardholder_name = truncate_chars(&self.cardholder_name, CARDHOLDER_NAME_MAX_LENGTH);
        self.cc_num = truncate_chars(&format_card_number(&self.cc_num), CARD_NUMBER_MAX_LENGTH);
        self.expiry = truncate_chars(&format_expiry(&self.expiry), EXPIRY_MAX_LENGTH);
        self.cvv = format_cvv(&self.cvv);
    }
}

/// A step of the payment form, in the order they are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WizardStep {
    Card = 1,
    Payment = 2,
    Recipient = 3,
    Location = 4,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::Card,
        WizardStep::Payment,
        WizardStep::Recipient,
        WizardStep::Location,
    ];

    /// The 1-based position of the step.
    pub fn number(self) -> u8 {
        self as u8
    }

    /// The following step, or this step if it is the last one.
    pub fn next(self) -> Self {
        match self {
            WizardStep::Card => WizardStep::Payment,
            WizardStep::Payment => WizardStep::Recipient,
            WizardStep::Recipient | WizardStep::Location => WizardStep::Location,
        }
    }

    /// The preceding step, or this step if it is the first one.
    pub fn previous(self) -> Self {
        match self {
            WizardStep::Card | WizardStep::Payment => WizardStep::Card,
            WizardStep::Recipient => WizardStep::Payment,
            WizardStep::Location => WizardStep::Recipient,
        }
    }

    /// The short name shown under the step indicator.
    pub fn label(self) -> &'static str {
        match self {
            WizardStep::Card => "Card",
            WizardStep::Payment => "Payment",
            WizardStep::Recipient => "Recipient",
            WizardStep::Location => "Location",
        }
    }
}

impl TryFrom<u8> for WizardStep {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(WizardStep::Card),
            2 => Ok(WizardStep::Payment),
            3 => Ok(WizardStep::Recipient),
            4 => Ok(WizardStep::Location),
            other => Err(format!("{other} is not a payment step, expected 1 to 4")),
        }
    }
}

impl From<WizardStep> for u8 {
    fn from(step: WizardStep) -> Self {
        step.number()
    }
}

fn truncate_chars(text: &str, max_length: usize) -> String {
    text.chars().take(max_length).collect()
}

fn digits_of(text: &str) -> String {
    text.chars().filter(char::is_ascii_digit).collect()
}

/// Group the first 16 digits of `value` in fours, e.g. "4111111111111111"
/// becomes "4111 1111 1111 1111".
///
/// Input with fewer than four digits is returned unchanged.
pub fn format_card_number(value: &str) -> String {
    let digits = digits_of(value);

    if digits.len() < 4 {
        return value.to_owned();
    }

    digits
        .as_bytes()
        .chunks(4)
        .take(4)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format the digits of `value` as `MM/YY`.
///
/// "12" becomes "12/" so the slash appears as soon as the month is typed.
pub fn format_expiry(value: &str) -> String {
    let digits = digits_of(value);

    if digits.len() < 2 {
        return digits;
    }

    let year_end = digits.len().min(4);
    format!("{}/{}", &digits[..2], &digits[2..year_end])
}

/// The first four digits of `value`.
pub fn format_cvv(value: &str) -> String {
    digits_of(value).chars().take(CVV_MAX_LENGTH).collect()
}

/// Pad the card number with dots so the preview always shows 19 characters.
pub fn format_display_card_number(value: &str) -> String {
    value
        .chars()
        .chain(std::iter::repeat(DISPLAY_CARD_NUMBER_PADDING))
        .take(DISPLAY_CARD_NUMBER_LENGTH)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        PaymentFormData, WizardStep, format_card_number, format_cvv, format_display_card_number,
        format_expiry,
    };

    #[test]
    fn card_number_is_grouped_in_fours() {
        assert_eq!(format_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(format_card_number("4111-1111 11"), "4111 1111 11");
        assert_eq!(format_card_number("41111"), "4111 1");
    }

    #[test]
    fn card_number_keeps_first_sixteen_digits() {
        assert_eq!(
            format_card_number("41111111111111112222"),
            "4111 1111 1111 1111"
        );
    }

    #[test]
    fn short_card_number_is_unchanged() {
        assert_eq!(format_card_number("41a"), "41a");
        assert_eq!(format_card_number(""), "");
    }

    #[test]
    fn expiry_gets_a_slash_after_the_month() {
        assert_eq!(format_expiry("1"), "1");
        assert_eq!(format_expiry("12"), "12/");
        assert_eq!(format_expiry("122"), "12/2");
        assert_eq!(format_expiry("1225"), "12/25");
        assert_eq!(format_expiry("12/2599"), "12/25");
    }

    #[test]
    fn cvv_keeps_up_to_four_digits() {
        assert_eq!(format_cvv("1a2b3"), "123");
        assert_eq!(format_cvv("123456"), "1234");
    }

    #[test]
    fn display_card_number_is_padded_and_truncated() {
        assert_eq!(format_display_card_number(""), "•".repeat(19));
        assert_eq!(
            format_display_card_number("4111 1"),
            format!("4111 1{}", "•".repeat(13))
        );
        assert_eq!(
            format_display_card_number("4111 1111 1111 1111 99"),
            "4111 1111 1111 1111"
        );
    }

    #[test]
    fn normalise_card_fields_formats_and_truncates() {
        let mut data = PaymentFormData {
            cc_num: "4111111111111111".to_owned(),
            expiry: "1225".to_owned(),
            cvv: "12x3".to_owned(),
            cardholder_name: "A".repeat(40),
            ..Default::default()
        };

        data.normalise_card_fields();

        assert_eq!(data.cc_num, "4111 1111 1111 1111");
        assert_eq!(data.expiry, "12/25");
        assert_eq!(data.cvv, "123");
        assert_eq!(data.cardholder_name, "A".repeat(30));
    }

    #[test]
    fn steps_stop_at_either_end() {
        assert_eq!(WizardStep::Card.previous(), WizardStep::Card);
        assert_eq!(WizardStep::Card.next(), WizardStep::Payment);
        assert_eq!(WizardStep::Recipient.previous(), WizardStep::Payment);
        assert_eq!(WizardStep::Location.next(), WizardStep::Location);
    }

    #[test]
    fn step_from_number() {
        assert_eq!(WizardStep::try_from(3), Ok(WizardStep::Recipient));
        assert!(WizardStep::try_from(0).is_err());
        assert!(WizardStep::try_from(5).is_err());
    }
}
