//! Markup for the payment form: the step indicator, the card preview, the
//! inputs of each step and the success page.

use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, FORM_ERROR_STYLE, FORM_LABEL_STYLE,
        FORM_TEXT_INPUT_STYLE, PAGE_CONTAINER_STYLE, base, loading_spinner,
    },
    navigation::NavBar,
    payment::{
        form::{
            CARD_NUMBER_MAX_LENGTH, CARDHOLDER_NAME_MAX_LENGTH, CATEGORIES, CVV_MAX_LENGTH,
            EXPIRY_MAX_LENGTH, PaymentFormData, STATES, WizardStep, format_display_card_number,
        },
        validation::FieldErrors,
    },
};

pub(super) const WIZARD_ID: &str = "payment-wizard";
pub(super) const CARD_PREVIEW_ID: &str = "card-preview";

const CARD_STYLE: &str = "w-full bg-white rounded-lg shadow dark:border dark:bg-gray-800 \
    dark:border-gray-700 p-6 space-y-5";

fn step_url(step: WizardStep, action: &str) -> String {
    format!(
        "{}?step={}&action={action}",
        endpoints::PAYMENT_STEP,
        step.number()
    )
}

/// The numbered circles across the top of the form.
///
/// Each step is marked as completed, current or upcoming in `data-step-state`.
pub(super) fn step_indicator(current: WizardStep) -> Markup {
    html! {
        ol id="step-indicator" class="flex items-center justify-between w-full max-w-sm mb-6"
        {
            @for step in WizardStep::ALL {
                @let (state, circle_style) = if step == current {
                    ("current", "bg-blue-500 text-white shadow-lg shadow-blue-500/30 scale-110")
                } else if step < current {
                    ("completed", "bg-blue-500/80 text-white")
                } else {
                    ("upcoming", "bg-gray-200 text-gray-600 dark:bg-gray-700 dark:text-gray-400")
                };
                @let label_style = if step <= current {
                    "text-xs text-blue-500"
                } else {
                    "text-xs text-gray-400"
                };

                li
                    class="flex flex-col items-center gap-1"
                    data-step-state=(state)
                    aria-current=[(step == current).then_some("step")]
                {
                    span
                        class={ "flex items-center justify-center w-8 h-8 rounded-full " (circle_style) }
                    {
                        (step.number())
                    }

                    span class=(label_style)
                    {
                        (step.label())
                    }
                }
            }
        }
    }
}

/// A picture of the card showing what has been typed so far.
pub(super) fn card_preview(cc_num: &str, cardholder_name: &str, expiry: &str) -> Markup {
    let name = if cardholder_name.trim().is_empty() {
        "YOUR NAME"
    } else {
        cardholder_name
    };
    let expiry = if expiry.is_empty() { "MM/YY" } else { expiry };

    html! {
        div
            id=(CARD_PREVIEW_ID)
            class="w-full aspect-[1.586] rounded-2xl p-6 shadow-xl text-white
                bg-gradient-to-br from-blue-600 to-indigo-800 flex flex-col justify-between"
        {
            div class="flex justify-between items-start"
            {
                p class="text-xs font-medium opacity-80" { "Card Preview" }
                span class="text-sm font-bold" { "VISA" }
            }

            p data-card-number class="text-lg font-mono tracking-wider"
            {
                (format_display_card_number(cc_num))
            }

            div class="grid grid-cols-2 gap-4"
            {
                div
                {
                    p class="text-xs opacity-80 mb-1" { "Card Holder" }
                    p data-cardholder-name class="font-medium truncate" { (name) }
                }
                div
                {
                    p class="text-xs opacity-80 mb-1" { "Expires" }
                    p data-expiry class="font-medium" { (expiry) }
                }
            }
        }
    }
}

struct WizardInput<'a> {
    name: &'a str,
    label: &'a str,
    type_: &'a str,
    value: &'a str,
    placeholder: &'a str,
    max_length: Option<usize>,
    /// Re-render the card preview as the user types.
    updates_preview: bool,
}

impl<'a> WizardInput<'a> {
    fn new(name: &'a str, label: &'a str, value: &'a str, placeholder: &'a str) -> Self {
        Self {
            name,
            label,
            type_: "text",
            value,
            placeholder,
            max_length: None,
            updates_preview: false,
        }
    }

    fn type_(mut self, type_: &'a str) -> Self {
        self.type_ = type_;
        self
    }

    fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    fn updates_preview(mut self) -> Self {
        self.updates_preview = true;
        self
    }

    fn into_html(self, errors: &FieldErrors) -> Markup {
        let preview_target = format!("#{CARD_PREVIEW_ID}");

        html! {
            div
            {
                label for=(self.name) class=(FORM_LABEL_STYLE) { (self.label) }

                @if self.updates_preview {
                    input
                        type=(self.type_)
                        name=(self.name)
                        id=(self.name)
                        placeholder=(self.placeholder)
                        maxlength=[self.max_length]
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(self.value)
                        hx-post=(endpoints::PAYMENT_CARD_PREVIEW)
                        hx-trigger="keyup changed delay:200ms"
                        hx-target=(preview_target)
                        hx-swap="outerHTML";
                } @else {
                    input
                        type=(self.type_)
                        name=(self.name)
                        id=(self.name)
                        placeholder=(self.placeholder)
                        maxlength=[self.max_length]
                        class=(FORM_TEXT_INPUT_STYLE)
                        value=(self.value);
                }

                @if let Some(error_message) = errors.get(self.name) {
                    p class=(FORM_ERROR_STYLE) { (error_message) }
                }
            }
        }
    }
}

fn select_input(
    name: &str,
    label: &str,
    placeholder: &str,
    options: &[&str],
    selected: &str,
    errors: &FieldErrors,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }

            select name=(name) id=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { (placeholder) }

                @for option in options {
                    option value=(option) selected[*option == selected] { (option) }
                }
            }

            @if let Some(error_message) = errors.get(name) {
                p class=(FORM_ERROR_STYLE) { (error_message) }
            }
        }
    }
}

fn card_step(data: &PaymentFormData, errors: &FieldErrors) -> Markup {
    html! {
        h2 class="text-xl font-bold" { "Card Information" }

        (WizardInput::new("cardholder_name", "Cardholder Name", &data.cardholder_name, "Cardholder fullname")
            .max_length(CARDHOLDER_NAME_MAX_LENGTH)
            .updates_preview()
            .into_html(errors))

        (WizardInput::new("cc_num", "Card Number", &data.cc_num, "0000 0000 0000 0000")
            .max_length(CARD_NUMBER_MAX_LENGTH)
            .updates_preview()
            .into_html(errors))

        div class="grid grid-cols-2 gap-4"
        {
            (WizardInput::new("expiry", "Expiry Date", &data.expiry, "MM/YY")
                .max_length(EXPIRY_MAX_LENGTH)
                .updates_preview()
                .into_html(errors))

            (WizardInput::new("cvv", "CVV", &data.cvv, "•••")
                .type_("password")
                .max_length(CVV_MAX_LENGTH)
                .into_html(errors))
        }
    }
}

fn payment_step(data: &PaymentFormData, errors: &FieldErrors) -> Markup {
    html! {
        h2 class="text-xl font-bold" { "Payment Details" }

        (WizardInput::new("amt", "Amount", &data.amt, "0.00").type_("number").into_html(errors))

        (select_input("category", "Payment Category", "Select Category", &CATEGORIES, &data.category, errors))

        (WizardInput::new("reason", "Payment Reason", &data.reason, "e.g., Monthly subscription")
            .into_html(errors))
    }
}

fn recipient_step(data: &PaymentFormData, errors: &FieldErrors) -> Markup {
    html! {
        h2 class="text-xl font-bold" { "Recipient Information" }

        (WizardInput::new("recipient_name", "Recipient Name", &data.recipient_name, "Jane Doe")
            .into_html(errors))
        (WizardInput::new("recipient_email", "Recipient Email", &data.recipient_email, "email@example.com")
            .type_("email")
            .into_html(errors))
        (WizardInput::new("recipient_phone", "Recipient Phone", &data.recipient_phone, "(123) 456-7890")
            .type_("tel")
            .into_html(errors))
    }
}

fn location_step(data: &PaymentFormData, errors: &FieldErrors) -> Markup {
    html! {
        h2 class="text-xl font-bold" { "Location Details" }

        (WizardInput::new("address", "Address", &data.address, "1 Main St").into_html(errors))

        div class="grid grid-cols-2 gap-4"
        {
            (WizardInput::new("city", "City", &data.city, "New York").into_html(errors))
            (select_input("state", "State", "State", &STATES, &data.state, errors))
        }

        (WizardInput::new("zip_code", "ZIP Code", &data.zip_code, "10001").into_html(errors))
    }
}

/// The names and values of the inputs shown on `step`.
fn step_fields(step: WizardStep, data: &PaymentFormData) -> Vec<(&'static str, &str)> {
    match step {
        WizardStep::Card => vec![
            ("cc_num", data.cc_num.as_str()),
            ("expiry", data.expiry.as_str()),
            ("cvv", data.cvv.as_str()),
            ("cardholder_name", data.cardholder_name.as_str()),
        ],
        WizardStep::Payment => vec![
            ("amt", data.amt.as_str()),
            ("category", data.category.as_str()),
            ("reason", data.reason.as_str()),
        ],
        WizardStep::Recipient => vec![
            ("recipient_name", data.recipient_name.as_str()),
            ("recipient_email", data.recipient_email.as_str()),
            ("recipient_phone", data.recipient_phone.as_str()),
        ],
        WizardStep::Location => vec![
            ("address", data.address.as_str()),
            ("city", data.city.as_str()),
            ("state", data.state.as_str()),
            ("zip_code", data.zip_code.as_str()),
        ],
    }
}

/// Hidden inputs carrying the values of every step other than `current`.
fn hidden_inputs(current: WizardStep, data: &PaymentFormData) -> Markup {
    html! {
        @for step in WizardStep::ALL.into_iter().filter(|step| *step != current) {
            @for (name, value) in step_fields(step, data) {
                input type="hidden" name=(name) value=(value);
            }
        }

        input type="hidden" name="merch_lat" value=(data.merch_lat);
        input type="hidden" name="merch_long" value=(data.merch_long);
    }
}

/// The step indicator, card preview and form for `step`.
///
/// This is the element swapped by htmx when moving between steps.
pub(super) fn wizard_view(step: WizardStep, data: &PaymentFormData, errors: &FieldErrors) -> Markup {
    let wizard_target = format!("#{WIZARD_ID}");
    let form_endpoint = match step {
        WizardStep::Location => endpoints::PAYMENTS_API.to_owned(),
        step => step_url(step, "next"),
    };

    html! {
        div id=(WIZARD_ID) class="w-full flex flex-col items-center"
        {
            (step_indicator(step))

            div class="grid md:grid-cols-12 gap-6 w-full"
            {
                div class="md:col-span-5 lg:col-span-4 order-2 md:order-1"
                {
                    (card_preview(&data.cc_num, &data.cardholder_name, &data.expiry))
                }

                form
                    hx-post=(form_endpoint)
                    hx-target=(wizard_target)
                    hx-target-error="#alert-container"
                    hx-swap="outerHTML"
                    hx-indicator="#indicator"
                    hx-disabled-elt="#submit-button"
                    data-step=(step.number())
                    class={ "md:col-span-7 lg:col-span-8 order-1 md:order-2 " (CARD_STYLE) }
                {
                    @match step {
                        WizardStep::Card => (card_step(data, errors)),
                        WizardStep::Payment => (payment_step(data, errors)),
                        WizardStep::Recipient => (recipient_step(data, errors)),
                        WizardStep::Location => (location_step(data, errors)),
                    }

                    (hidden_inputs(step, data))

                    div class="flex justify-between gap-4"
                    {
                        @if step != WizardStep::Card {
                            button
                                type="button"
                                id="back-button"
                                hx-post=(step_url(step, "back"))
                                class=(BUTTON_SECONDARY_STYLE)
                            {
                                "Back"
                            }
                        }

                        button type="submit" id="submit-button" tabindex="0" class=(BUTTON_PRIMARY_STYLE)
                        {
                            span id="indicator" class="inline htmx-indicator"
                            {
                                (loading_spinner())
                            }
                            @match step {
                                WizardStep::Card => "Continue to Payment Details",
                                WizardStep::Location => "Complete Payment",
                                _ => "Continue",
                            }
                        }
                    }
                }
            }
        }
    }
}

/// The payment page with the wizard at `step`.
pub(super) fn payment_page_view(wizard: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::PAYMENT_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class={ (PAGE_CONTAINER_STYLE) " max-w-5xl" }
        {
            header class="flex flex-col items-center space-y-2 mb-8"
            {
                h1 class="text-3xl font-bold" { "Secure Payment Gateway" }
                p class="text-gray-500 dark:text-gray-400" { "Protected by Advanced Fraud Detection" }
            }

            (wizard)
        }
    };

    base("Make Payment", &[], &content)
}

pub(super) fn payment_success_view() -> Markup {
    let nav_bar = NavBar::new(endpoints::PAYMENT_SUCCESS_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-md text-center bg-white dark:bg-gray-800 rounded-2xl p-8 shadow-xl"
            {
                h1 class="text-3xl font-bold mb-2" { "Payment Successful!" }
                p class="text-gray-500 dark:text-gray-400 mb-8"
                {
                    "Your transaction has been processed successfully."
                }

                div class="border-t dark:border-gray-700 pt-6"
                {
                    p class="mb-6" { "A confirmation has been sent to your email." }

                    a
                        href=(endpoints::DASHBOARD_VIEW)
                        class="block w-full px-4 py-2 bg-blue-500 hover:bg-blue-600 text-white rounded"
                    {
                        "Back to Dashboard"
                    }
                }
            }
        }
    };

    base("Payment Successful", &[], &content)
}
