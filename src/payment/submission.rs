//! The payload sent to the payment gateway once every step is complete.
//!
//! There is no real gateway, submitted payments are written to the log.

use serde::Serialize;
use serde_json::Value;
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, payment::form::PaymentFormData};

/// ISO 8601 in UTC with milliseconds, e.g. "2024-05-01T12:30:45.123Z".
const TIMESTAMP_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z"
);

const REDACTED_FIELDS: [&str; 2] = ["cc_num", "cvv"];

/// A completed payment form stamped with the time it was submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentSubmission {
    #[serde(flatten)]
    pub form: PaymentFormData,
    pub trans_date_trans_time: String,
    /// Seconds since the Unix epoch with millisecond precision.
    pub unix_time: f64,
}

impl PaymentSubmission {
    /// Stamp `form` with `submitted_at`, which is converted to UTC.
    pub fn new(form: PaymentFormData, submitted_at: OffsetDateTime) -> Result<Self, Error> {
        let submitted_at = submitted_at.to_offset(time::UtcOffset::UTC);
        let trans_date_trans_time = submitted_at
            .format(TIMESTAMP_FORMAT)
            .map_err(|error| Error::InvalidDateTime(error.to_string()))?;
        let unix_millis = submitted_at.unix_timestamp_nanos() / 1_000_000;

        Ok(Self {
            form,
            trans_date_trans_time,
            unix_time: unix_millis as f64 / 1000.0,
        })
    }

    /// The submission as JSON with the card number and CVV masked.
    pub fn to_redacted_json(&self) -> Result<String, Error> {
        let mut value = serde_json::to_value(self)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        if let Value::Object(fields) = &mut value {
            for field in REDACTED_FIELDS {
                if let Some(field_value) = fields.get_mut(field) {
                    *field_value = Value::String("********".to_owned());
                }
            }
        }

        Ok(value.to_string())
    }
}

/// Hand the payment to the gateway.
pub fn send_to_gateway(submission: &PaymentSubmission) -> Result<(), Error> {
    let payload = submission.to_redacted_json()?;
    tracing::info!("Payment submitted: {payload}");

    Ok(())
}
