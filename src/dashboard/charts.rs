//! Chart generation and rendering for the dashboard.
//!
//! This module creates ECharts visualizations for one month of sales:
//! - **Price Range Chart**: a bar chart of the price histogram
//! - **Category Chart**: a pie chart of the category breakdown
//!
//! Each chart is generated as JSON configuration for the ECharts library and
//! rendered with corresponding HTML containers and JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Bar, Pie},
};
use maud::{Markup, PreEscaped, html};
use time::Month;

use crate::{
    html::HeadElement,
    statistics::{CategoryBreakdown, HistogramBucket},
};

/// The ECharts build loaded by the dashboard page.
pub(super) const ECHARTS_SCRIPT_URL: &str =
    "https://cdn.jsdelivr.net/npm/echarts@6.0.0/dist/echarts.min.js";

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
                        class="min-h-[380px] rounded bg-white dark:bg-gray-100"
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
                    const chart = echarts.init(document.getElementById("{}"));
                    chart.setOption({});

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        chart.setTheme(darkModeMediaQuery.matches ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id,
                // Keep data such as "</script>" in a category name from ending the script early.
                chart.options.replace("</", "<\\/")
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    HeadElement::ScriptSource(PreEscaped(format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{script_content}\n}});"
    )))
}

/// A bar chart with one bar per price range.
pub(super) fn price_range_chart(month: Month, histogram: &[HistogramBucket]) -> Chart {
    let labels: Vec<String> = histogram
        .iter()
        .map(|bucket| bucket.range_label.clone())
        .collect();
    let counts: Vec<f64> = histogram.iter().map(|bucket| bucket.count as f64).collect();

    Chart::new()
        .title(
            Title::new()
                .text("Transactions by Price Range")
                .subtext(format!("{month}, all years")),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(Axis::new().type_(AxisType::Value))
        .series(Bar::new().name("Items").data(counts))
}

/// A pie chart with one slice per category.
pub(super) fn category_chart(month: Month, breakdown: &CategoryBreakdown) -> Chart {
    let slices: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|(category, &count)| (count as f64, category.as_str()))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Transactions by Category")
                .subtext(format!("{month}, all years")),
        )
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(Pie::new().name("Items").radius("60%").data(slices))
}
