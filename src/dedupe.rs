//! Removes records repeated across overlapping tiles and pages.
//!
//! Each record yields up to three identity keys. A record whose keys were
//! already seen is dropped; a kept record registers all of its keys, so a
//! later record matching on a different key is still caught. This is a
//! greedy single pass, not a transitive clustering: chains of matches found
//! later are not merged.

use hashbrown::HashSet;
use tracing::debug;

use crate::models::NormalizedRecord;

/// Lower-case, turn `, . \n \t \r ; :` into spaces, collapse whitespace.
pub fn normalize_text(value: Option<&str>) -> String {
    let Some(value) = value else {
        return String::new();
    };
    let replaced: String = value
        .to_lowercase()
        .chars()
        .map(|c| match c {
            ',' | '.' | '\n' | '\t' | '\r' | ';' | ':' => ' ',
            other => other,
        })
        .collect();
    replaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Coordinate rounded to 4 decimals (about 11 m).
fn coord_key(value: Option<f64>) -> String {
    value.map(|v| format!("{:.4}", v)).unwrap_or_default()
}

/// The non-empty identity keys of a record.
///
/// A composite key whose parts are all empty is omitted.
pub fn dedupe_keys(record: &NormalizedRecord) -> Vec<String> {
    let name = normalize_text(record.name.as_deref());
    let address = normalize_text(record.address.as_deref());
    let lat = coord_key(record.lat());
    let lon = coord_key(record.lon());

    let mut keys = Vec::with_capacity(3);
    if let Some(id) = record.id.as_deref().filter(|id| !id.is_empty()) {
        keys.push(id.to_string());
    }
    if !(name.is_empty() && address.is_empty()) {
        keys.push(format!("name_addr::{}|{}", name, address));
    }
    if !(name.is_empty() && lat.is_empty()) {
        keys.push(format!("name_coord::{}|{},{}", name, lat, lon));
    }
    keys
}

/// Keep the first occurrence of each entity, preserving input order.
pub fn dedupe(records: Vec<NormalizedRecord>) -> Vec<NormalizedRecord> {
    let input_len = records.len();
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(input_len);

    for record in records {
        let keys = dedupe_keys(&record);
        if keys.iter().any(|k| seen.contains(k)) {
            continue;
        }
        seen.extend(keys);
        result.push(record);
    }

    debug!(
        "Deduplicated {} records down to {}",
        input_len,
        result.len()
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use serde_json::Value;

    fn record(
        id: Option<&str>,
        name: Option<&str>,
        address: Option<&str>,
        coords: Option<(f64, f64)>,
    ) -> NormalizedRecord {
        NormalizedRecord {
            id: id.map(String::from),
            name: name.map(String::from),
            address: address.map(String::from),
            location: coords.map(|(lat, lon)| GeoPoint { lat, lon }),
            phones: None,
            categories_list: Vec::new(),
            categories: None,
            hours_text: None,
            site_url: None,
            raw: Value::Null,
        }
    }

    fn names(records: &[NormalizedRecord]) -> Vec<Option<&str>> {
        records.iter().map(|r| r.name.as_deref()).collect()
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(
            normalize_text(Some("  Бишкек,\tул.  Токтогула;85:\r\n ")),
            "бишкек ул токтогула 85"
        );
        assert_eq!(normalize_text(None), "");
        assert_eq!(normalize_text(Some(" ,.; ")), "");
    }

    #[test]
    fn test_keys() {
        let r = record(
            Some("42"),
            Some("Школа №1"),
            Some("Бишкек, Ленина 1"),
            Some((42.87461, 74.56981)),
        );
        assert_eq!(
            dedupe_keys(&r),
            vec![
                "42".to_string(),
                "name_addr::школа №1|бишкек ленина 1".to_string(),
                "name_coord::школа №1|42.8746,74.5698".to_string(),
            ]
        );
    }

    #[test]
    fn test_same_id_keeps_first() {
        let records = vec![
            record(Some("42"), Some("A"), None, None),
            record(Some("7"), Some("B"), None, None),
            record(Some("42"), Some("C"), None, None),
        ];
        assert_eq!(names(&dedupe(records)), vec![Some("A"), Some("B")]);
    }

    #[test]
    fn test_same_name_and_address() {
        let records = vec![
            record(None, Some("Школа № 5"), Some("Ош, Ленина 10"), None),
            record(None, Some("школа № 5."), Some("Ош,  Ленина 10"), None),
        ];
        let kept = dedupe(records);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].name.as_deref(), Some("Школа № 5"));
    }

    #[test]
    fn test_same_name_and_rounded_coords() {
        let records = vec![
            record(None, Some("Лицей"), Some("Бишкек"), Some((42.87461, 74.56981))),
            record(None, Some("Лицей"), Some("Другой адрес"), Some((42.87459, 74.56979))),
        ];
        assert_eq!(dedupe(records).len(), 1);
    }

    #[test]
    fn test_match_on_different_dimension() {
        // Second shares the id with the first, third shares name+address
        // with the second only; the second is dropped, so the third survives.
        let records = vec![
            record(Some("1"), Some("A"), Some("x"), None),
            record(Some("1"), Some("B"), Some("y"), None),
            record(Some("3"), Some("B"), Some("y"), None),
        ];
        assert_eq!(names(&dedupe(records)), vec![Some("A"), Some("B")]);
    }

    #[test]
    fn test_keyless_records_always_kept() {
        let records = vec![
            record(None, None, None, None),
            record(None, None, None, None),
            record(None, Some(""), Some(" ; "), None),
        ];
        assert_eq!(dedupe(records).len(), 3);
    }

    #[test]
    fn test_idempotent_and_order_preserving() {
        let records = vec![
            record(Some("1"), Some("A"), None, None),
            record(None, Some("B"), Some("b"), None),
            record(Some("1"), Some("A2"), None, None),
            record(None, Some("C"), None, Some((1.0, 2.0))),
            record(None, Some("b"), Some("B"), None),
            record(None, Some("D"), None, None),
        ];
        let once = dedupe(records);
        assert_eq!(names(&once), vec![Some("A"), Some("B"), Some("C"), Some("D")]);
        let twice = dedupe(once.clone());
        assert_eq!(once, twice);
    }
}
