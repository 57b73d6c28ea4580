//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - State and query types used by the handler

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Database, Error,
    dashboard::{
        cards::summary_cards_view,
        charts::{
            DashboardChart, charts_script, charts_view, expenses_by_category_chart,
            monthly_totals_chart,
        },
        tables::recent_transactions_table,
    },
    endpoints,
    html::{BUTTON_SECONDARY_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, base},
    navigation::NavBar,
    timezone,
    transaction::{
        Totals, TransactionDto, TransactionSummary, get_recent_transactions, get_totals,
        summarise_by_category, summarise_by_month,
    },
};

/// How many transactions the recent transactions table shows.
const RECENT_TRANSACTION_LIMIT: u32 = 5;

const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database handle for reading transactions.
    pub database: Database,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            database: state.database.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The year to chart monthly totals for, the current year if omitted.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub year: Option<i32>,
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    totals: Totals,
    by_category: Vec<TransactionSummary>,
    /// The monthly totals, or the reason they could not be shown.
    by_month: Result<Vec<TransactionSummary>, Error>,
    recent_transactions: Vec<TransactionDto>,
}

/// Display a page with an overview of the customers' spending.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Response {
    let year = query
        .year
        .unwrap_or_else(|| timezone::today(&state.local_timezone).year());

    match state
        .database
        .run(|connection| build_dashboard_data(year, connection))
    {
        Ok(data) => dashboard_view(year, &data).into_response(),
        Err(error) => {
            tracing::error!("Failed to build dashboard data: {error}");
            error.into_page_response()
        }
    }
}

/// Fetches all the data needed for the dashboard.
///
/// An out of range `year` is not an error for the page as a whole, it is
/// kept in [DashboardData::by_month] so the rest of the dashboard can still
/// be shown.
fn build_dashboard_data(year: i32, connection: &Connection) -> Result<DashboardData, Error> {
    let by_month = match summarise_by_month(year, connection) {
        Err(error) if !matches!(error, Error::YearOutOfRange(_)) => return Err(error),
        result => result,
    };

    Ok(DashboardData {
        totals: get_totals(connection)?,
        by_category: summarise_by_category(connection)?,
        by_month,
        recent_transactions: get_recent_transactions(RECENT_TRANSACTION_LIMIT, connection)?,
    })
}

fn year_form(year: i32) -> Markup {
    html!(
        form
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex gap-2 items-center"
        {
            label for="year" class="text-sm font-medium" { "Year" }

            input
                id="year"
                type="number"
                name="year"
                value=(year)
                min="1900"
                max="2100"
                class={(FORM_TEXT_INPUT_STYLE) " max-w-32"};

            button type="submit" class=(BUTTON_SECONDARY_STYLE) { "Show" }
        }
    )
}

/// Renders the dashboard page with the summary cards, charts and the recent
/// transactions table.
fn dashboard_view(year: i32, data: &DashboardData) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let mut charts = vec![DashboardChart {
        id: "expenses-by-category-chart",
        options: expenses_by_category_chart(&data.by_category).to_string(),
    }];

    if let Ok(by_month) = &data.by_month {
        charts.push(DashboardChart {
            id: "monthly-totals-chart",
            options: monthly_totals_chart(year, by_month).to_string(),
        });
    }

    let content = html!(
        (nav_bar)

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="flex justify-between flex-wrap items-end w-full mb-4"
            {
                h1 class="text-xl font-bold" { "Dashboard" }

                (year_form(year))
            }

            (summary_cards_view(&data.totals))

            @if let Err(error) = &data.by_month {
                p id="year-error" class="w-full mb-4 text-red-600 dark:text-red-400"
                {
                    (error)
                }
            }

            (charts_view(&charts))

            (recent_transactions_table(&data.recent_transactions))
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_SCRIPT.to_owned()),
        charts_script(&charts),
    ];

    base("Dashboard", &scripts, &content)
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::test_utils::{assert_valid_html, get_seeded_server, get_test_server, parse_html_text};

    #[track_caller]
    fn assert_chart_exists(html: &Html, chart_id: &str) {
        let selector = Selector::parse(&format!("#{chart_id}")).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Chart with id '{chart_id}' not found"
        );
    }

    fn card_values(html: &Html) -> Vec<String> {
        html.select(&Selector::parse("#summary-cards p").unwrap())
            .map(|p| p.text().collect())
            .collect()
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let server = get_seeded_server();

        let response = server.get("/dashboard").await;

        response.assert_status_ok();
        let html = parse_html_text(&response.text());
        assert_valid_html(&html);
        let values = card_values(&html);
        assert_eq!(values.len(), 4);
        assert_eq!(values[1], "-$111.50");
        assert_eq!(values[3], "5");
        assert_chart_exists(&html, "expenses-by-category-chart");
        assert_chart_exists(&html, "monthly-totals-chart");
        let recent_rows = html
            .select(&Selector::parse("#recent-transactions tbody tr").unwrap())
            .count();
        assert_eq!(recent_rows, 5);
    }

    #[tokio::test]
    async fn empty_database_shows_zero_totals() {
        let server = get_test_server();

        let response = server.get("/dashboard").await;

        response.assert_status_ok();
        let html = parse_html_text(&response.text());
        assert_valid_html(&html);
        assert_eq!(card_values(&html), ["$0.00", "$0.00", "$0.00", "0"]);
        assert!(response.text().contains("No transactions yet."));
    }

    #[tokio::test]
    async fn year_out_of_range_shows_message() {
        let server = get_seeded_server();

        let response = server.get("/dashboard?year=1800").await;

        response.assert_status_ok();
        let html = parse_html_text(&response.text());
        assert_valid_html(&html);
        let message: String = html
            .select(&Selector::parse("#year-error").unwrap())
            .next()
            .expect("No year error message")
            .text()
            .collect();
        assert_eq!(message.trim(), "Year must be between 1900 and 2100");
        assert!(
            html.select(&Selector::parse("#monthly-totals-chart").unwrap())
                .next()
                .is_none()
        );
        assert_chart_exists(&html, "expenses-by-category-chart");
    }
}
