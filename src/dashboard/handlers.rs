//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The handler for the full dashboard page
//! - The handler for the table fragment that htmx swaps in on search, filter and paging
//! - The state used by the handlers

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    auth::{UserID, get_user_by_id},
    dashboard::{
        cards::stats_cards_view,
        charts::{DashboardChart, chart_container, charts_script, fraud_map_chart},
        stats::TransactionStats,
        table::{TableQuery, filter_transactions, table_controls_view, transactions_table_view},
    },
    endpoints,
    html::{HeadElement, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    pagination::{Page, PaginationConfig},
    transaction::{Transaction, get_all_transactions},
};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// Configuration for the table's pagination controls.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Filter and paginate `transactions` for the table and render it.
fn build_table(
    transactions: &[Transaction],
    query: &TableQuery,
    pagination_config: &PaginationConfig,
) -> Markup {
    let filtered = filter_transactions(transactions, &query.search, query.status);
    let page = Page::new(
        query.page.unwrap_or(pagination_config.default_page),
        pagination_config.default_page_size,
        filtered.len() as u64,
    );

    transactions_table_view(&filtered, query, &page, pagination_config.max_pages)
}

/// Display the stats cards, the transaction map and the transactions table.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(query): Query<TableQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let user_name = match get_user_by_id(user_id, &connection) {
        Ok(user) => Some(user.name),
        Err(Error::NotFound) => {
            tracing::warn!("User {user_id} has a valid cookie but no account");
            None
        }
        Err(error) => return Err(error),
    };

    let transactions = get_all_transactions(&connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    drop(connection);

    let stats = TransactionStats::from_transactions(&transactions);
    let map = DashboardChart {
        id: "fraud-map",
        options: fraud_map_chart(&transactions).to_string(),
    };
    let table = build_table(&transactions, &query, &state.pagination_config);

    Ok(dashboard_view(user_name.as_deref(), &stats, &map, &query, table).into_response())
}

/// Render only the transactions table, for htmx updates.
pub async fn get_dashboard_transactions(
    State(state): State<DashboardState>,
    Query(query): Query<TableQuery>,
) -> Response {
    let transactions = match state.db_connection.lock() {
        Ok(connection) => get_all_transactions(&connection),
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            Err(Error::DatabaseLockError)
        }
    };

    match transactions {
        Ok(transactions) => {
            build_table(&transactions, &query, &state.pagination_config).into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

fn section_heading(title: &str, badge: &str) -> Markup {
    html! {
        div class="flex items-center justify-between mb-4"
        {
            h2 class="text-2xl font-semibold text-blue-600 dark:text-blue-400" { (title) }
            span
                class="rounded-full bg-blue-100 dark:bg-blue-500/10 px-4 py-1 text-sm
                    text-blue-700 dark:text-blue-400"
            {
                (badge)
            }
        }
    }
}

fn dashboard_view(
    user_name: Option<&str>,
    stats: &TransactionStats,
    map: &DashboardChart,
    query: &TableQuery,
    table: Markup,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html!(
        (nav_bar)

        div class={ (PAGE_CONTAINER_STYLE) " max-w-screen-xl" }
        {
            header class="w-full mb-8"
            {
                h1 class="text-4xl font-bold text-blue-600 dark:text-blue-400"
                {
                    "Fraud Detection Hub"
                }
                p class="mt-1 text-gray-600 dark:text-gray-400"
                {
                    "Real-time transaction monitoring & analysis"
                }
                @if let Some(name) = user_name {
                    p class="mt-1 text-sm text-gray-500" { "Signed in as " (name) }
                }
            }

            (stats_cards_view(stats))

            section id="map" class="w-full mb-8"
            {
                (section_heading("Transaction Geography", "Live Updates"))
                (chart_container(map))
            }

            section id="recent-activity" class="w-full mb-8"
            {
                (section_heading("Recent Activity", "Real-time"))

                div class="rounded-lg shadow-md bg-white dark:bg-gray-800"
                {
                    (table_controls_view(query))
                    (table)
                }
            }
        }
    );

    let scripts = [
        HeadElement::ScriptLink("/static/echarts.6.0.0.min.js".to_owned()),
        charts_script(std::slice::from_ref(map)),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{
        Extension, Router, extract::Query, extract::State, http::StatusCode, routing::get,
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use time::macros::datetime;

    use crate::{
        auth::{PasswordHash, Role, UserID, upsert_user},
        dashboard::table::{StatusFilter, TableQuery},
        db::initialize,
        endpoints,
        pagination::PaginationConfig,
        test_utils::{assert_valid_html, parse_html_document},
        transaction::{create_transaction, test_utils::new_transaction},
    };

    use super::{DashboardState, get_dashboard_page, get_dashboard_transactions};

    fn get_state_with_transactions(count: usize, fraud_every: usize) -> (DashboardState, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let user = upsert_user(
            "admin",
            "admin@org.com",
            PasswordHash::new_unchecked("hash"),
            Role::Admin,
            &connection,
        )
        .unwrap();

        for i in 0..count {
            let mut transaction = new_transaction(datetime!(2019-01-01 00:00:00));
            transaction.amt = 10.0;
            transaction.is_fraud = fraud_every > 0 && i % fraud_every == 0;
            if i % 2 == 0 {
                transaction.city = "Seattle".to_owned();
            }
            create_transaction(transaction, &connection).unwrap();
        }

        let state = DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            pagination_config: PaginationConfig::default(),
        };

        (state, user.id)
    }

    fn select_text(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|element| element.text().collect::<String>().trim().to_owned())
            .collect()
    }

    #[tokio::test]
    async fn dashboard_page_shows_all_sections() {
        let (state, user_id) = get_state_with_transactions(12, 4);

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Query(TableQuery::default()),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(select_text(&html, "h1"), vec!["Fraud Detection Hub"]);
        let headings = select_text(&html, "h2");
        assert!(headings.contains(&"Transaction Geography".to_owned()));
        assert!(headings.contains(&"Recent Activity".to_owned()));

        let nav_links = select_text(&html, "nav a");
        assert!(nav_links.contains(&"Make Payment".to_owned()));
        assert!(nav_links.contains(&"Sign Out".to_owned()));

        assert_eq!(html.select(&Selector::parse("#fraud-map").unwrap()).count(), 1);
        assert_eq!(
            select_text(&html, "#stats [data-stat-card='Fraud Cases'] h3"),
            vec!["3"]
        );
        assert_eq!(
            select_text(&html, "#stats [data-stat-card='Total Volume'] h3"),
            vec!["$120.00"]
        );
        assert_eq!(html.select(&Selector::parse("tbody tr").unwrap()).count(), 10);
        assert!(select_text(&html, "p").contains(&"Page 1 of 2".to_owned()));
        assert!(select_text(&html, "p").contains(&"Signed in as admin".to_owned()));
    }

    #[tokio::test]
    async fn dashboard_page_with_no_transactions() {
        let (state, user_id) = get_state_with_transactions(0, 0);

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Query(TableQuery::default()),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(select_text(&html, "tbody td"), vec!["No transactions found"]);
        assert_eq!(
            select_text(&html, "[data-stat-card='Fraud Amount'] span"),
            vec!["0.0%"]
        );
    }

    #[tokio::test]
    async fn out_of_range_page_is_clamped() {
        let (state, user_id) = get_state_with_transactions(15, 0);

        let response = get_dashboard_page(
            State(state),
            Extension(user_id),
            Query(TableQuery {
                page: Some(99),
                ..Default::default()
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert!(select_text(&html, "p").contains(&"Page 2 of 2".to_owned()));
        assert_eq!(html.select(&Selector::parse("tbody tr").unwrap()).count(), 5);
    }

    #[tokio::test]
    async fn transactions_fragment_applies_search_and_status() {
        let (state, _) = get_state_with_transactions(12, 4);
        let app = Router::new()
            .route(
                endpoints::DASHBOARD_TRANSACTIONS,
                get(get_dashboard_transactions),
            )
            .with_state(state);
        let server = TestServer::try_new(app).unwrap();

        let response = server
            .get(endpoints::DASHBOARD_TRANSACTIONS)
            .add_query_params(TableQuery {
                search: "SEATTLE".to_owned(),
                status: StatusFilter::Fraud,
                page: None,
            })
            .await;

        response.assert_status_ok();
        let fragment = Html::parse_fragment(&response.text());
        assert_eq!(
            fragment.select(&Selector::parse("#transactions-table").unwrap()).count(),
            1
        );
        assert!(fragment.select(&Selector::parse("h1").unwrap()).next().is_none());
        // Rows 0, 4 and 8 are fraud and all are in Seattle.
        assert_eq!(fragment.select(&Selector::parse("tbody tr").unwrap()).count(), 3);
    }

    #[tokio::test]
    async fn invalid_status_is_rejected() {
        let (state, _) = get_state_with_transactions(1, 0);
        let app = Router::new()
            .route(
                endpoints::DASHBOARD_TRANSACTIONS,
                get(get_dashboard_transactions),
            )
            .with_state(state);
        let server = TestServer::try_new(app).unwrap();

        server
            .get(&format!("{}?status=bogus", endpoints::DASHBOARD_TRANSACTIONS))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}
