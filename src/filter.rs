//! Area-token extraction and substring filtering.

use crate::{heuristics::Heuristics, record::Record};

/// Reduces a free-text query to the area fragment it names.
///
/// Filler phrases are removed wherever they occur, one phrase at a time in
/// configured order, so `"show me baner"` loses `"show"` before `"show me"`
/// is considered.
pub fn extract_area_token(query: &str, heuristics: &Heuristics) -> String {
    let mut remainder = query.to_lowercase();
    for filler in &heuristics.query_fillers {
        if filler.is_empty() {
            continue;
        }
        remainder = remainder.replace(filler.as_str(), "");
    }
    remainder.trim().to_string()
}

/// The area to filter by: the explicit one when given, else the query's.
pub fn resolve_area(explicit: Option<&str>, query: &str, heuristics: &Heuristics) -> String {
    match explicit.map(str::trim).filter(|a| !a.is_empty()) {
        Some(area) => area.to_string(),
        None => extract_area_token(query, heuristics),
    }
}

pub fn record_matches(record: &Record, needle: &str) -> bool {
    record
        .values()
        .filter(|v| !v.is_null())
        .any(|v| v.as_display().to_lowercase().contains(needle))
}

/// Records where any field contains `area`, case-insensitively.
/// A blank area keeps every record.
pub fn filter_by_area<'a>(records: &'a [Record], area: &str) -> Vec<&'a Record> {
    let needle = area.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }
    records
        .iter()
        .filter(|r| record_matches(r, &needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Scalar;

    #[test]
    fn extraction_removes_fillers_anywhere() {
        let heuristics = Heuristics::default();
        assert_eq!(extract_area_token("Analyze Wakad", &heuristics), "wakad");
        assert_eq!(extract_area_token("Compare Baner", &heuristics), "baner");
        assert_eq!(extract_area_token("  Kothrud  ", &heuristics), "kothrud");
        assert_eq!(extract_area_token("show me Aundh", &heuristics), "me aundh");
        assert_eq!(extract_area_token("", &heuristics), "");
    }

    #[test]
    fn explicit_area_bypasses_extraction() {
        let heuristics = Heuristics::default();
        assert_eq!(resolve_area(Some("Show Area"), "find x", &heuristics), "Show Area");
        assert_eq!(resolve_area(Some("  "), "find baner", &heuristics), "baner");
        assert_eq!(resolve_area(None, "find baner", &heuristics), "baner");
    }

    #[test]
    fn filter_matches_substrings_case_insensitively() {
        let records = vec![
            [("area", Scalar::Text("Pune West".to_string()))]
                .into_iter()
                .collect::<Record>(),
            [("area", Scalar::Text("Mumbai".to_string()))]
                .into_iter()
                .collect::<Record>(),
        ];
        assert_eq!(filter_by_area(&records, "pune").len(), 1);
        assert_eq!(filter_by_area(&records, "PUNE ").len(), 1);
        assert_eq!(filter_by_area(&records, "").len(), 2);
        assert!(filter_by_area(&records, "delhi").is_empty());
    }
}
