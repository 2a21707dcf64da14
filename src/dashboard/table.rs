//! The searchable, filterable and paginated table of recent transactions.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};
use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    endpoints,
    html::{
        FORM_TEXT_INPUT_STYLE, FRAUD_BADGE_STYLE, LEGITIMATE_BADGE_STYLE, TABLE_CELL_STYLE,
        TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency,
    },
    pagination::{Page, PaginationIndicator, create_pagination_indicators},
    transaction::Transaction,
};

/// The ID of the element that table updates are swapped into.
pub(super) const TABLE_ID: &str = "transactions-table";

const DISPLAY_DATE_TIME_FORMAT: &[BorrowedFormatItem] = format_description!(
    "[month repr:short] [day padding:none], [year], [hour repr:12 padding:none]:[minute]:[second] [period]"
);

/// Which transactions to show based on their fraud flag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Fraud,
    Legitimate,
}

impl StatusFilter {
    fn matches(self, transaction: &Transaction) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Fraud => transaction.is_fraud,
            StatusFilter::Legitimate => !transaction.is_fraud,
        }
    }

    fn value(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Fraud => "fraud",
            StatusFilter::Legitimate => "legitimate",
        }
    }

    fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All Transactions",
            StatusFilter::Fraud => "Fraudulent Only",
            StatusFilter::Legitimate => "Legitimate Only",
        }
    }
}

/// The search, filter and page requested for the table.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuery {
    /// Case-insensitive text to look for in the merchant, category or city.
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub status: StatusFilter,
    /// The 1-based page number, defaults to the first page.
    pub page: Option<u64>,
}

impl TableQuery {
    /// This query with `page` swapped in, as a URL under `route`.
    fn to_url(&self, route: &str, page: u64) -> String {
        let query = TableQuery {
            page: Some(page),
            ..self.clone()
        };

        match serde_urlencoded::to_string(&query) {
            Ok(query_string) => format!("{route}?{query_string}"),
            Err(error) => {
                tracing::error!("Could not encode table query {query:?}: {error}");
                format!("{route}?page={page}")
            }
        }
    }
}

/// Keep the transactions that match both the search text and the status filter.
///
/// An empty search matches every transaction. Whitespace in `search` is
/// matched like any other character.
pub(super) fn filter_transactions<'a>(
    transactions: &'a [Transaction],
    search: &str,
    status: StatusFilter,
) -> Vec<&'a Transaction> {
    let search = search.to_lowercase();

    transactions
        .iter()
        .filter(|transaction| {
            let matches_search = search.is_empty()
                || transaction.merchant.to_lowercase().contains(&search)
                || transaction.category.to_lowercase().contains(&search)
                || transaction.city.to_lowercase().contains(&search);

            matches_search && status.matches(transaction)
        })
        .collect()
}

/// The search box and status select. These stay outside the swapped table so
/// typing is not interrupted when the rows update.
pub(super) fn table_controls_view(query: &TableQuery) -> Markup {
    let table_target = format!("#{TABLE_ID}");

    html! {
        form
            id="table-controls"
            class="flex flex-col sm:flex-row gap-4 items-center p-4 bg-gray-50 dark:bg-gray-700 rounded-t-lg"
            hx-get=(endpoints::DASHBOARD_TRANSACTIONS)
            hx-target=(table_target)
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
        {
            input
                type="search"
                name="search"
                id="search"
                placeholder="Search transactions..."
                value=(query.search)
                class={ "flex-1 " (FORM_TEXT_INPUT_STYLE) }
                hx-get=(endpoints::DASHBOARD_TRANSACTIONS)
                hx-trigger="input changed delay:300ms, search"
                hx-include="#table-controls";

            select
                name="status"
                id="status"
                class={ "sm:w-56 " (FORM_TEXT_INPUT_STYLE) }
                hx-get=(endpoints::DASHBOARD_TRANSACTIONS)
                hx-trigger="change"
                hx-include="#table-controls"
            {
                @for status in [StatusFilter::All, StatusFilter::Fraud, StatusFilter::Legitimate] {
                    option value=(status.value()) selected[status == query.status] { (status.label()) }
                }
            }
        }
    }
}

fn transaction_row_view(transaction: &Transaction) -> Markup {
    let date_time = transaction
        .trans_date_trans_time
        .format(DISPLAY_DATE_TIME_FORMAT)
        .unwrap_or_else(|error| {
            tracing::warn!("Could not format date for transaction {}: {error}", transaction.id);
            transaction.trans_date_trans_time.to_string()
        });

    html! {
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                div class="font-medium text-gray-900 dark:text-white" { (transaction.merchant) }
                div class="text-sm text-gray-500 dark:text-gray-400" { (transaction.category) }
                div class="text-xs text-gray-400 dark:text-gray-500 mt-1" { (date_time) }
            }
            td class=(TABLE_CELL_STYLE)
            {
                div class="font-medium" { (format_currency(transaction.amt)) }
                div class="text-sm text-gray-500 dark:text-gray-400 mt-1"
                {
                    (transaction.city) ", " (transaction.state)
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if transaction.is_fraud {
                    span class=(FRAUD_BADGE_STYLE) { "Fraudulent" }
                } @else {
                    span class=(LEGITIMATE_BADGE_STYLE) { "Legitimate" }
                }

                @if !transaction.reason.is_empty() {
                    div class="text-xs text-gray-500 dark:text-gray-400 mt-2" { (transaction.reason) }
                }
            }
        }
    }
}

fn pagination_view(page: &Page, query: &TableQuery, max_pages: u64) -> Markup {
    let indicators = create_pagination_indicators(page, max_pages);
    let (start, end) = page.item_range();
    let table_target = format!("#{TABLE_ID}");
    let page_link = |number: u64, text: &str, style: &str| {
        html! {
            a
                href=(query.to_url(endpoints::DASHBOARD_VIEW, number))
                hx-get=(query.to_url(endpoints::DASHBOARD_TRANSACTIONS, number))
                hx-target=(table_target)
                hx-swap="outerHTML"
                class=(style)
            { (text) }
        }
    };
    let link_style = "block px-3 py-2 rounded text-blue-600 hover:underline dark:text-blue-500";

    html! {
        div class="flex flex-col md:flex-row items-center justify-between gap-4 p-4 border-t dark:border-gray-700"
        {
            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "Showing " (start) " to " (end) " of " (page.total_items) " transactions"
            }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "Page " (page.number) " of " (page.total_pages())
            }

            nav class="pagination"
            {
                ul class="pagination flex items-center gap-1"
                {
                    @for indicator in indicators {
                        li
                        {
                            @match indicator {
                                PaginationIndicator::CurrPage(number) => {
                                    span
                                        aria-current="page"
                                        class="block px-3 py-2 rounded font-bold text-white bg-blue-600"
                                    { (number) }
                                }
                                PaginationIndicator::Page(number) => {
                                    (page_link(number, &number.to_string(), link_style))
                                }
                                PaginationIndicator::Ellipsis => {
                                    span class="block px-3 py-2 text-gray-400" { "..." }
                                }
                                PaginationIndicator::BackButton(number) => {
                                    (page_link(number, "Previous", link_style))
                                }
                                PaginationIndicator::NextButton(number) => {
                                    (page_link(number, "Next", link_style))
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Renders the table body and pagination for `transactions`, which must
/// already be filtered.
///
/// The footer with the item range and page links is only shown when there is
/// more than one page.
pub(super) fn transactions_table_view(
    transactions: &[&Transaction],
    query: &TableQuery,
    page: &Page,
    max_pages: u64,
) -> Markup {
    let start = (page.offset() as usize).min(transactions.len());
    let end = (start + page.size as usize).min(transactions.len());
    let rows = &transactions[start..end];

    html! {
        div id=(TABLE_ID) class="w-full"
        {
            div class="overflow-x-auto"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Transaction" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Amount" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Status" }
                        }
                    }

                    tbody
                    {
                        @for transaction in rows {
                            (transaction_row_view(transaction))
                        }

                        @if rows.is_empty() {
                            tr
                            {
                                td colspan="3" class="px-6 py-6 text-center"
                                {
                                    "No transactions found"
                                }
                            }
                        }
                    }
                }
            }

            @if page.total_pages() > 1 {
                (pagination_view(page, query, max_pages))
            }
        }
    }
}
