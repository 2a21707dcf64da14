use axum::{
    Form,
    extract::Query,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    endpoints,
    payment::{
        form::{PaymentFormData, WizardStep},
        submission::{PaymentSubmission, send_to_gateway},
        validation::{FieldErrors, first_invalid_step, validate_step},
        views::{card_preview, payment_page_view, payment_success_view, wizard_view},
    },
};

/// Which way to move through the payment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepAction {
    Next,
    Back,
}

/// The step the form was on and where the user wants to go from it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepQuery {
    pub step: WizardStep,
    pub action: StepAction,
}

/// Display the payment form at the first step.
pub async fn get_payment_page() -> Response {
    let wizard = wizard_view(
        WizardStep::Card,
        &PaymentFormData::default(),
        &FieldErrors::new(),
    );

    payment_page_view(wizard).into_response()
}

/// Move the payment form forwards or backwards by one step.
///
/// Going back never validates. Going forward only succeeds when the inputs of
/// the current step are valid, otherwise the same step is shown with errors.
pub async fn post_payment_step(
    Query(query): Query<StepQuery>,
    Form(mut data): Form<PaymentFormData>,
) -> Response {
    let (step, errors) = match query.action {
        StepAction::Back => (query.step.previous(), FieldErrors::new()),
        StepAction::Next => {
            if query.step == WizardStep::Card {
                data.normalise_card_fields();
            }

            let errors = validate_step(query.step, &data);
            if errors.is_empty() {
                (query.step.next(), errors)
            } else {
                (query.step, errors)
            }
        }
    };

    wizard_view(step, &data, &errors).into_response()
}

/// Render the card preview for the card details typed so far.
pub async fn post_card_preview(Form(mut data): Form<PaymentFormData>) -> Response {
    data.normalise_card_fields();

    card_preview(&data.cc_num, &data.cardholder_name, &data.expiry).into_response()
}

/// Submit the completed payment form.
///
/// Every step is validated again and the first invalid step is shown if any
/// input is missing.
pub async fn post_payment(Form(mut data): Form<PaymentFormData>) -> Response {
    data.normalise_card_fields();

    if let Some((step, errors)) = first_invalid_step(&data) {
        tracing::debug!("Payment rejected at step {}", step.number());
        return wizard_view(step, &data, &errors).into_response();
    }

    let result = PaymentSubmission::new(data, OffsetDateTime::now_utc())
        .and_then(|submission| send_to_gateway(&submission));

    match result {
        Ok(()) => (
            StatusCode::SEE_OTHER,
            HxRedirect(endpoints::PAYMENT_SUCCESS_VIEW.to_owned()),
            (),
        )
            .into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Display the confirmation shown after a payment was submitted.
pub async fn get_payment_success_page() -> Response {
    payment_success_view().into_response()
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::{TestResponse, TestServer};
    use scraper::{Html, Selector};

    use crate::{
        endpoints,
        payment::{
            form::{PaymentFormData, WizardStep},
            validation::test_utils::complete_form_data,
        },
        test_utils::{assert_valid_html, must_get_form},
    };

    use super::{
        StepAction, StepQuery, get_payment_page, get_payment_success_page, post_card_preview,
        post_payment, post_payment_step,
    };

    fn get_test_server() -> TestServer {
        let app = Router::new()
            .route(endpoints::PAYMENT_VIEW, get(get_payment_page))
            .route(endpoints::PAYMENT_STEP, post(post_payment_step))
            .route(endpoints::PAYMENT_CARD_PREVIEW, post(post_card_preview))
            .route(endpoints::PAYMENTS_API, post(post_payment))
            .route(endpoints::PAYMENT_SUCCESS_VIEW, get(get_payment_success_page));

        TestServer::try_new(app).unwrap()
    }

    async fn post_step(
        server: &TestServer,
        step: WizardStep,
        action: StepAction,
        data: &PaymentFormData,
    ) -> TestResponse {
        server
            .post(endpoints::PAYMENT_STEP)
            .add_query_params(StepQuery { step, action })
            .form(data)
            .await
    }

    fn shown_step(response: &TestResponse) -> String {
        let html = Html::parse_fragment(&response.text());
        let form = must_get_form(&html);

        form.value().attr("data-step").unwrap_or_default().to_owned()
    }

    fn error_messages(response: &TestResponse) -> Vec<String> {
        let html = Html::parse_fragment(&response.text());

        html.select(&Selector::parse("form p.text-red-500").unwrap())
            .map(|p| p.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn payment_page_starts_at_card_step() {
        let server = get_test_server();

        let response = server.get(endpoints::PAYMENT_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        assert_eq!(shown_step(&response), "1");
        let heading = html
            .select(&Selector::parse("h1").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        assert_eq!(heading, "Secure Payment Gateway");
    }

    #[tokio::test]
    async fn next_with_valid_card_moves_to_payment_step() {
        let server = get_test_server();
        let mut data = complete_form_data();
        data.cc_num = "4111111111111111".to_owned();
        data.expiry = "1225".to_owned();

        let response = post_step(&server, WizardStep::Card, StepAction::Next, &data).await;

        response.assert_status_ok();
        assert_eq!(shown_step(&response), "2");
        // The card fields are carried forward formatted.
        let html = Html::parse_fragment(&response.text());
        let hidden_card = html
            .select(&Selector::parse("input[type=hidden][name=cc_num]").unwrap())
            .next()
            .unwrap();
        assert_eq!(hidden_card.value().attr("value"), Some("4111 1111 1111 1111"));
    }

    #[tokio::test]
    async fn next_with_invalid_step_stays_and_shows_errors() {
        let server = get_test_server();

        let response = post_step(
            &server,
            WizardStep::Recipient,
            StepAction::Next,
            &PaymentFormData::default(),
        )
        .await;

        response.assert_status_ok();
        assert_eq!(shown_step(&response), "3");
        assert_eq!(
            error_messages(&response),
            vec![
                "Recipient name is required",
                "Valid email address is required",
                "Phone number is required",
            ]
        );
    }

    #[tokio::test]
    async fn back_skips_validation() {
        let server = get_test_server();

        let response = post_step(
            &server,
            WizardStep::Location,
            StepAction::Back,
            &PaymentFormData::default(),
        )
        .await;

        assert_eq!(shown_step(&response), "3");
        assert!(error_messages(&response).is_empty());
    }

    #[tokio::test]
    async fn back_on_first_step_stays() {
        let server = get_test_server();

        let response = post_step(
            &server,
            WizardStep::Card,
            StepAction::Back,
            &PaymentFormData::default(),
        )
        .await;

        assert_eq!(shown_step(&response), "1");
    }

    #[tokio::test]
    async fn unknown_step_is_rejected() {
        let server = get_test_server();

        server
            .post(&format!("{}?step=9&action=next", endpoints::PAYMENT_STEP))
            .form(&PaymentFormData::default())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn card_preview_formats_typed_details() {
        let server = get_test_server();
        let data = PaymentFormData {
            cc_num: "41111111".to_owned(),
            cardholder_name: "Jane Doe".to_owned(),
            expiry: "12".to_owned(),
            ..Default::default()
        };

        let response = server.post(endpoints::PAYMENT_CARD_PREVIEW).form(&data).await;

        response.assert_status_ok();
        let html = Html::parse_fragment(&response.text());
        let text_of = |selector: &str| {
            html.select(&Selector::parse(selector).unwrap())
                .next()
                .unwrap()
                .text()
                .collect::<String>()
        };
        assert_eq!(text_of("[data-card-number]"), format!("4111 1111{}", "•".repeat(10)));
        assert_eq!(text_of("[data-cardholder-name]"), "Jane Doe");
        assert_eq!(text_of("[data-expiry]"), "12/");
    }

    #[tokio::test]
    async fn complete_payment_redirects_to_success() {
        let server = get_test_server();

        let response = server
            .post(endpoints::PAYMENTS_API)
            .form(&complete_form_data())
            .await;

        response.assert_status_see_other();
        assert_eq!(response.header("hx-redirect"), endpoints::PAYMENT_SUCCESS_VIEW);
    }

    #[tokio::test]
    async fn incomplete_payment_shows_first_invalid_step() {
        let server = get_test_server();
        let mut data = complete_form_data();
        data.category.clear();
        data.zip_code.clear();

        let response = server.post(endpoints::PAYMENTS_API).form(&data).await;

        response.assert_status_ok();
        assert_eq!(shown_step(&response), "2");
        assert_eq!(error_messages(&response), vec!["Please select a category"]);
    }

    #[tokio::test]
    async fn success_page_links_to_dashboard() {
        let server = get_test_server();

        let response = server.get(endpoints::PAYMENT_SUCCESS_VIEW).await;

        response.assert_status_ok();
        let html = Html::parse_document(&response.text());
        assert_valid_html(&html);
        let links = html
            .select(&Selector::parse("a").unwrap())
            .filter(|a| a.text().collect::<String>().trim() == "Back to Dashboard")
            .filter_map(|a| a.value().attr("href"))
            .collect::<Vec<_>>();
        assert_eq!(links, vec![endpoints::DASHBOARD_VIEW]);
    }
}
