//! Client-side sort and pagination over record collections.
//!
//! Both functions are total: any collection and any state produce a result.

pub mod view;

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::records::{FieldValue, Fielded};

pub const DEFAULT_ROWS_PER_PAGE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// `direction` only matters when `field` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: Option<String>,
    pub direction: SortDirection,
}

impl SortState {
    pub fn by(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: Some(field.into()),
            direction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    /// 1-based.
    pub current_page: usize,
    pub rows_per_page: usize,
}

impl PageState {
    pub fn new(current_page: usize, rows_per_page: usize) -> Self {
        Self {
            current_page: current_page.max(1),
            rows_per_page: rows_per_page.max(1),
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(1, DEFAULT_ROWS_PER_PAGE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a, T> {
    pub rows: &'a [T],
    /// 1-based inclusive bounds of `rows` in the full sequence, 0 when empty.
    pub first_index: usize,
    pub last_index: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// Orders `records` by `state` without touching the input.
///
/// Nulls sort last in both directions. Fields whose name mentions `Date` or
/// `Time` compare as timestamps when both sides parse, strings compare
/// case-insensitively, anything else by natural order. The sort is stable.
pub fn sort<'a, R: Fielded>(records: &'a [R], state: &SortState) -> Vec<&'a R> {
    let mut ordered: Vec<&R> = records.iter().collect();
    let Some(field) = state.field.as_deref() else {
        return ordered;
    };

    let temporal = field.contains("Date") || field.contains("Time");
    ordered.sort_by(|a, b| {
        compare_fields(a.field(field), b.field(field), temporal, state.direction)
    });
    ordered
}

pub fn paginate<'a, T>(ordered: &'a [T], state: &PageState) -> Page<'a, T> {
    let total_count = ordered.len();
    let rows_per_page = state.rows_per_page.max(1);
    let total_pages = total_count.div_ceil(rows_per_page);

    let start = state
        .current_page
        .saturating_sub(1)
        .saturating_mul(rows_per_page)
        .min(total_count);
    let end = start.saturating_add(rows_per_page).min(total_count);
    let rows = &ordered[start..end];

    let (first_index, last_index) = if rows.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        rows,
        first_index,
        last_index,
        total_pages,
        total_count,
    }
}

fn compare_fields(
    a: FieldValue<'_>,
    b: FieldValue<'_>,
    temporal: bool,
    direction: SortDirection,
) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }

    let ordering = compare_present(a, b, temporal);
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

fn compare_present(a: FieldValue<'_>, b: FieldValue<'_>, temporal: bool) -> Ordering {
    if temporal {
        if let (FieldValue::Text(x), FieldValue::Text(y)) = (a, b) {
            if let (Some(x), Some(y)) = (parse_timestamp(x), parse_timestamp(y)) {
                return x.cmp(&y);
            }
        }
    }

    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => x
            .chars()
            .flat_map(char::to_lowercase)
            .cmp(y.chars().flat_map(char::to_lowercase)),
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Bool(x), FieldValue::Bool(y)) => x.cmp(&y),
        _ => kind_rank(a).cmp(&kind_rank(b)),
    }
}

// Mixed scalar kinds: booleans, then numbers, then text.
fn kind_rank(value: FieldValue<'_>) -> u8 {
    match value {
        FieldValue::Bool(_) => 0,
        FieldValue::Number(_) => 1,
        FieldValue::Text(_) => 2,
        FieldValue::Null => 3,
    }
}

/// Milliseconds since the epoch for the date shapes the API and the forms
/// produce. Anything else is not a date.
pub(crate) fn parse_timestamp(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.timestamp_millis());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn records(values: Value) -> Vec<Map<String, Value>> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().unwrap().clone())
            .collect()
    }

    fn column<'a>(ordered: &[&'a Map<String, Value>], field: &str) -> Vec<&'a Value> {
        ordered.iter().map(|&r| &r[field]).collect()
    }

    #[test]
    fn unsorted_state_keeps_insertion_order() {
        let rows = records(json!([{"n": "b"}, {"n": "a"}, {"n": "c"}]));
        let ordered = sort(&rows, &SortState::default());
        assert_eq!(column(&ordered, "n"), vec!["b", "a", "c"]);
    }

    #[test]
    fn strings_sort_case_insensitively() {
        let rows = records(json!([
            {"leadName": "bob"},
            {"leadName": "Alice"},
            {"leadName": "carol"}
        ]));

        let ordered = sort(&rows, &SortState::by("leadName", SortDirection::Asc));
        assert_eq!(column(&ordered, "leadName"), vec!["Alice", "bob", "carol"]);

        let ordered = sort(&rows, &SortState::by("leadName", SortDirection::Desc));
        assert_eq!(column(&ordered, "leadName"), vec!["carol", "bob", "Alice"]);
    }

    #[test]
    fn dates_compare_as_timestamps_with_nulls_last() {
        let rows = records(json!([
            {"lastContactDate": "2023-03-01"},
            {"lastContactDate": "2023-01-15"},
            {"lastContactDate": null}
        ]));

        let ordered = sort(&rows, &SortState::by("lastContactDate", SortDirection::Asc));
        assert_eq!(
            column(&ordered, "lastContactDate"),
            vec![&json!("2023-01-15"), &json!("2023-03-01"), &Value::Null]
        );

        let ordered = sort(&rows, &SortState::by("lastContactDate", SortDirection::Desc));
        assert_eq!(
            column(&ordered, "lastContactDate"),
            vec![&json!("2023-03-01"), &json!("2023-01-15"), &Value::Null]
        );
    }

    #[test]
    fn mixed_date_shapes_order_chronologically() {
        let rows = records(json!([
            {"meetingDate": "2023-01-02T08:00:00"},
            {"meetingDate": "2023-01-01T23:00:00Z"},
            {"meetingDate": "2023-01-02"}
        ]));

        let ordered = sort(&rows, &SortState::by("meetingDate", SortDirection::Asc));
        assert_eq!(
            column(&ordered, "meetingDate"),
            vec!["2023-01-01T23:00:00Z", "2023-01-02", "2023-01-02T08:00:00"]
        );
    }

    #[test]
    fn malformed_dates_fall_back_to_text_order() {
        let rows = records(json!([
            {"nextFollowUpDate": "soon"},
            {"nextFollowUpDate": "2023-01-01"},
            {"nextFollowUpDate": "Later"}
        ]));

        let ordered = sort(&rows, &SortState::by("nextFollowUpDate", SortDirection::Asc));
        assert_eq!(
            column(&ordered, "nextFollowUpDate"),
            vec!["2023-01-01", "Later", "soon"]
        );
    }

    #[test]
    fn missing_fields_count_as_null() {
        let rows = records(json!([{"x": 1}, {"companyName": "zeta"}, {"companyName": "Acme"}]));

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let ordered = sort(&rows, &SortState::by("companyName", direction));
            assert_eq!(ordered.last().unwrap()["x"], json!(1));
        }
    }

    #[test]
    fn numbers_use_natural_order() {
        let rows = records(json!([{"latitude": 28.7}, {"latitude": -3.5}, {"latitude": 12}]));
        let ordered = sort(&rows, &SortState::by("latitude", SortDirection::Asc));
        assert_eq!(
            column(&ordered, "latitude"),
            vec![&json!(-3.5), &json!(12), &json!(28.7)]
        );
    }

    #[test]
    fn equal_keys_keep_input_order_in_both_directions() {
        let rows = records(json!([
            {"s": "b", "id": 1},
            {"s": "A", "id": 2},
            {"s": "a", "id": 3},
            {"s": "B", "id": 4},
            {"s": null, "id": 5},
            {"s": null, "id": 6}
        ]));

        let ids = |direction| {
            sort(&rows, &SortState::by("s", direction))
                .iter()
                .map(|r| r["id"].as_i64().unwrap())
                .collect::<Vec<_>>()
        };

        assert_eq!(ids(SortDirection::Asc), vec![2, 3, 1, 4, 5, 6]);
        assert_eq!(ids(SortDirection::Desc), vec![1, 4, 2, 3, 5, 6]);
    }

    #[test]
    fn sort_does_not_mutate_input() {
        let rows = records(json!([{"n": "b"}, {"n": "a"}]));
        let before = rows.clone();
        let _ = sort(&rows, &SortState::by("n", SortDirection::Asc));
        assert_eq!(rows, before);
    }

    #[test]
    fn pages_cover_every_record_exactly_once() {
        for count in [0usize, 1, 9, 10, 11, 20, 35] {
            let rows: Vec<usize> = (0..count).collect();
            let first = paginate(&rows, &PageState::new(1, 10));
            assert_eq!(first.total_pages, count.div_ceil(10));

            let mut seen = Vec::new();
            for page in 1..=first.total_pages {
                seen.extend_from_slice(paginate(&rows, &PageState::new(page, 10)).rows);
            }
            assert_eq!(seen, rows, "count {}", count);
        }
    }

    #[test]
    fn empty_collection_reports_zero_bounds() {
        let rows: Vec<u8> = Vec::new();
        let page = paginate(&rows, &PageState::default());

        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 0);
        assert_eq!((page.first_index, page.last_index), (0, 0));
    }

    #[test]
    fn bounds_are_one_based_and_inclusive() {
        let rows: Vec<usize> = (0..23).collect();

        let page = paginate(&rows, &PageState::new(3, 10));
        assert_eq!(page.rows, &[20, 21, 22]);
        assert_eq!((page.first_index, page.last_index), (21, 23));
        assert_eq!(page.total_pages, 3);

        let page = paginate(&rows, &PageState::new(4, 10));
        assert!(page.rows.is_empty());
        assert_eq!(page.total_pages, 3);
    }

    #[test]
    fn timestamp_parsing_rejects_non_dates() {
        assert!(parse_timestamp("2023-02-30").is_none());
        assert!(parse_timestamp("14:30").is_none());
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("2023-02-28").is_some());
    }
}
