//! The transaction map drawn with ECharts.
//!
//! Each transaction is plotted at its merchant's coordinates, coloured by its
//! fraud flag. The chart is generated as JSON configuration for the ECharts
//! library and initialised by a script in the page head.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisType, ItemStyle, Tooltip, Trigger},
    series::Scatter,
};
use maud::{Markup, PreEscaped, html};

use crate::{html::HeadElement, transaction::Transaction};

pub(super) const FRAUD_COLOR: &str = "#ef4444";
pub(super) const LEGITIMATE_COLOR: &str = "#22c55e";
const POINT_OPACITY: f64 = 0.7;

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// Renders the container the chart is drawn into.
pub(super) fn chart_container(chart: &DashboardChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[500px] w-full rounded-lg bg-white dark:bg-gray-800 shadow-md"
        {}
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Charts follow the system colour scheme and resize with the window.
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

/// Split transactions into `[longitude, latitude]` points for the fraudulent
/// and legitimate series.
fn map_points(transactions: &[Transaction]) -> (Vec<Vec<f64>>, Vec<Vec<f64>>) {
    transactions
        .iter()
        .map(|transaction| {
            (
                transaction.is_fraud,
                vec![transaction.merch_long, transaction.merch_lat],
            )
        })
        .fold(
            (Vec::new(), Vec::new()),
            |(mut fraud, mut legitimate), (is_fraud, point)| {
                if is_fraud {
                    fraud.push(point);
                } else {
                    legitimate.push(point);
                }
                (fraud, legitimate)
            },
        )
}

pub(super) fn fraud_map_chart(transactions: &[Transaction]) -> Chart {
    let (fraud_points, legitimate_points) = map_points(transactions);

    Chart::new()
        .title(
            Title::new()
                .text("Merchant locations")
                .subtext("Longitude and latitude of each transaction"),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().right("4%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Longitude")
                .scale(true),
        )
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Latitude")
                .scale(true),
        )
        .series(
            Scatter::new()
                .name("Legitimate")
                .symbol_size(8)
                .item_style(
                    ItemStyle::new()
                        .color(LEGITIMATE_COLOR)
                        .opacity(POINT_OPACITY),
                )
                .data(legitimate_points),
        )
        .series(
            Scatter::new()
                .name("Fraudulent")
                .symbol_size(8)
                .item_style(ItemStyle::new().color(FRAUD_COLOR).opacity(POINT_OPACITY))
                .data(fraud_points),
        )
}
