//! Flattens raw search features into [`NormalizedRecord`]s.
//!
//! Normalization never fails: any missing or oddly-typed field degrades to
//! an absent value.

use serde_json::Value;

use crate::models::{GeoPoint, NormalizedRecord, RawResult};

/// Convert one backend feature into the canonical record.
pub fn normalize(raw: RawResult) -> NormalizedRecord {
    let properties = raw.get("properties");
    let company = properties.and_then(|p| p.get("CompanyMetaData"));

    let id = field_text(properties, "id").or_else(|| field_text(company, "id"));
    let name = field_text(company, "name").or_else(|| field_text(properties, "name"));
    let address =
        field_text(company, "address").or_else(|| field_text(properties, "description"));

    let location = raw
        .get("geometry")
        .and_then(|g| g.get("coordinates"))
        .and_then(coordinate_pair);

    let phones = collect_first_of(company, "Phones", &["formatted", "number", "value"]);
    let categories_list = collect_first_of(company, "Categories", &["name", "class"]);

    let hours_text = company
        .and_then(|c| c.get("Hours"))
        .filter(|h| h.is_object())
        .and_then(|h| text(h.get("text")));

    let site_url = company
        .and_then(|c| c.get("Links"))
        .and_then(Value::as_array)
        .and_then(|links| links.first())
        .and_then(|link| text(link.get("href")));

    NormalizedRecord {
        id,
        name,
        address,
        location,
        phones: join(&phones),
        categories: join(&categories_list),
        categories_list,
        hours_text,
        site_url,
        raw,
    }
}

/// Non-empty string or number value as text.
fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_text(object: Option<&Value>, key: &str) -> Option<String> {
    text(object.and_then(|o| o.get(key)))
}

/// `[lon, lat]` with exactly two numeric members.
fn coordinate_pair(value: &Value) -> Option<GeoPoint> {
    match value.as_array()?.as_slice() {
        [lon, lat] => Some(GeoPoint {
            lat: lat.as_f64()?,
            lon: lon.as_f64()?,
        }),
        _ => None,
    }
}

/// For each entry of the array `list_key`, take the first non-empty of `keys`.
fn collect_first_of(company: Option<&Value>, list_key: &str, keys: &[&str]) -> Vec<String> {
    company
        .and_then(|c| c.get(list_key))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| keys.iter().find_map(|key| text(entry.get(*key))))
                .collect()
        })
        .unwrap_or_default()
}

fn join(items: &[String]) -> Option<String> {
    if items.is_empty() {
        None
    } else {
        Some(items.join(", "))
    }
}
