//! Chart generation and rendering for the dashboard.
//!
//! This module creates interactive ECharts visualizations for the transaction
//! summaries:
//! - **Expenses by category**: Bar chart of the spending in each category
//! - **Monthly totals**: Net amount per month for the selected year
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Title, VisualMap, VisualMapPiece},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, JsFunction, Tooltip, Trigger},
    series::{Line, bar::Bar},
};
use maud::{Markup, PreEscaped, html};
use rust_decimal::prelude::ToPrimitive;

use crate::{html::HeadElement, transaction::TransactionSummary};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the HTML containers for dashboard charts.
pub(super) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div
                        id=(chart.id)
                        class="min-h-[380px] rounded dark:bg-gray-100"
                    {}
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// A bar per category with spending, largest spend first.
///
/// Expenses are stored as negative amounts, so they are negated to plot
/// spending as positive bars. Categories with a net income are left out.
pub(super) fn expenses_by_category_chart(summaries: &[TransactionSummary]) -> Chart {
    let mut expenses: Vec<(String, f64)> = summaries
        .iter()
        .filter(|summary| summary.total_amount.is_sign_negative() && !summary.total_amount.is_zero())
        .map(|summary| {
            (
                summary.category.clone(),
                (-summary.total_amount).to_f64().unwrap_or_default(),
            )
        })
        .collect();
    expenses.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    let (labels, values): (Vec<String>, Vec<f64>) = expenses.into_iter().unzip();

    Chart::new()
        .title(Title::new().text("Expenses by category").subtext("All transactions"))
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(Bar::new().name("Expenses").data(values))
}

/// The net amount of each month in `year` that has transactions.
pub(super) fn monthly_totals_chart(year: i32, summaries: &[TransactionSummary]) -> Chart {
    let labels: Vec<String> = summaries
        .iter()
        .map(|summary| summary.category.clone())
        .collect();
    let values: Vec<f64> = summaries
        .iter()
        .map(|summary| summary.total_amount.to_f64().unwrap_or_default())
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly totals")
                .subtext(year.to_string()),
        )
        .tooltip(currency_tooltip())
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .visual_map(VisualMap::new().show(false).pieces(vec![
            VisualMapPiece::new().lte(-1).color("red"),
            VisualMapPiece::new().gte(0).color("green"),
        ]))
        .series(Line::new().name("Net amount").data(values))
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use crate::transaction::TransactionSummary;

    use super::{DashboardChart, charts_script, expenses_by_category_chart, monthly_totals_chart};

    fn summary(category: &str, cents: i64) -> TransactionSummary {
        TransactionSummary {
            category: category.to_owned(),
            total_amount: Decimal::new(cents, 2),
            transaction_count: 1,
        }
    }

    #[test]
    fn expenses_chart_leaves_out_income() {
        let summaries = [
            summary("Salary", 270000),
            summary("Dining Out", -2575),
            summary("Groceries", -5025),
        ];

        let options = expenses_by_category_chart(&summaries).to_string();

        assert!(!options.contains("Salary"));
        let groceries = options.find("Groceries").unwrap();
        let dining_out = options.find("Dining Out").unwrap();
        assert!(groceries < dining_out, "largest expense should come first");
        assert!(options.contains("50.25"));
    }

    #[test]
    fn monthly_chart_uses_month_names() {
        let summaries = [summary("January", 100), summary("March", -2000)];

        let options = monthly_totals_chart(2025, &summaries).to_string();

        assert!(options.contains("January"));
        assert!(options.contains("March"));
        assert!(options.contains("2025"));
    }

    #[test]
    fn script_initializes_each_chart() {
        let charts = [
            DashboardChart {
                id: "first-chart",
                options: "{}".to_owned(),
            },
            DashboardChart {
                id: "second-chart",
                options: "{}".to_owned(),
            },
        ];

        let crate::html::HeadElement::ScriptSource(script) = charts_script(&charts) else {
            panic!("expected an inline script");
        };

        assert!(script.0.contains("getElementById(\"first-chart\")"));
        assert!(script.0.contains("getElementById(\"second-chart\")"));
    }
}
