//! Alerts for showing the outcome of a background request.
//!
//! Alerts are swapped into the `#alert-container` element that [crate::html::base]
//! places at the bottom of every page.

use maud::{Markup, html};

/// A dismissable message shown at the bottom of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// The operation failed.
    Error {
        /// The headline.
        message: String,
        /// Extra context shown under the headline.
        details: String,
    },
}

impl Alert {
    /// Render the alert as an out-of-band swap into the alert container.
    pub fn into_html(self) -> Markup {
        let Alert::Error { message, details } = self;
        let colours = "text-red-800 bg-red-50 border-red-300 dark:bg-gray-800 \
            dark:text-red-400 dark:border-red-800";

        html! {
            div id="alert-container" hx-swap-oob="true" class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div role="alert" class={ "p-4 mb-4 text-sm rounded-lg border " (colours) }
                {
                    div class="flex items-center justify-between"
                    {
                        span class="font-medium" { (message) }

                        button
                            type="button"
                            aria-label="Dismiss"
                            onclick="this.closest('#alert-container').classList.add('hidden')"
                            class="ms-4 font-bold"
                        {
                            "×"
                        }
                    }

                    @if !details.is_empty() {
                        p class="mt-1" { (details) }
                    }
                }
            }
        }
    }
}
