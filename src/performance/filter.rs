//! Year and name filtering for the performance page.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::StudentPerformance;

/// Year selector value meaning "no year filter".
pub const ALL_YEARS: &str = "All";
/// Year selector value meaning "years after the current one".
pub const UPCOMING: &str = "upcoming";

/// Layout used to present the filtered records.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DisplayMode {
    /// Continuously scrolling showcase, only when no filter is active
    Marquee,
    /// Static grid of results
    Grid,
}

/// Point on the performance trend chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartPoint {
    pub year: i32,
    pub agg: f64,
    pub student: String,
}

/// Distinct years present, newest first.
pub fn available_years(records: &[StudentPerformance]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    years.into_iter().rev().collect()
}

/// Whether any record is dated after `current_year`.
pub fn has_future_data(records: &[StudentPerformance], current_year: i32) -> bool {
    records.iter().any(|r| r.year > current_year)
}

/// Whether a record passes the year selector and the name search.
pub fn matches(
    record: &StudentPerformance,
    selected_year: &str,
    search: &str,
    current_year: i32,
) -> bool {
    let year_ok = match selected_year {
        ALL_YEARS => true,
        UPCOMING => record.year > current_year,
        year => record.year.to_string() == year,
    };

    year_ok
        && record
            .student_name
            .to_lowercase()
            .contains(&search.to_lowercase())
}

/// Records passing the filter, sorted by year descending.
pub fn filter_records(
    records: &[StudentPerformance],
    selected_year: &str,
    search: &str,
    current_year: i32,
) -> Vec<StudentPerformance> {
    let mut result: Vec<StudentPerformance> = records
        .iter()
        .filter(|r| matches(r, selected_year, search, current_year))
        .cloned()
        .collect();
    result.sort_by(|a, b| b.year.cmp(&a.year));
    result
}

/// Showcase layout only for the unfiltered, non-empty view.
pub fn display_mode(selected_year: &str, search: &str, result_count: usize) -> DisplayMode {
    if selected_year == ALL_YEARS && search.is_empty() && result_count > 0 {
        DisplayMode::Marquee
    } else {
        DisplayMode::Grid
    }
}

/// Trend chart data, oldest year first.
pub fn chart_points(records: &[StudentPerformance]) -> Vec<ChartPoint> {
    let mut sorted: Vec<&StudentPerformance> = records.iter().collect();
    sorted.sort_by_key(|r| r.year);
    sorted
        .into_iter()
        .map(|r| ChartPoint {
            year: r.year,
            agg: r.agg,
            student: r.student_name.clone(),
        })
        .collect()
}

/// Everything the performance page needs for one selector/search state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceView {
    pub current_year: i32,
    pub available_years: Vec<i32>,
    pub has_future_data: bool,
    pub selected_year: String,
    pub search: String,
    pub display_mode: DisplayMode,
    pub records: Vec<StudentPerformance>,
    pub chart: Vec<ChartPoint>,
}

impl PerformanceView {
    pub fn build(
        records: &[StudentPerformance],
        selected_year: &str,
        search: &str,
        current_year: i32,
    ) -> Self {
        let filtered = filter_records(records, selected_year, search, current_year);
        Self {
            current_year,
            available_years: available_years(records),
            has_future_data: has_future_data(records, current_year),
            selected_year: selected_year.to_string(),
            search: search.to_string(),
            display_mode: display_mode(selected_year, search, filtered.len()),
            records: filtered,
            chart: chart_points(records),
        }
    }
}
