//! CSV and JSON export of collected records.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ExportError;
use crate::models::{ExportRecord, NormalizedRecord, EXPORT_COLUMNS};

/// Paths of the files written by [`export_all`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub csv: PathBuf,
    pub json: PathBuf,
}

/// `<dir>/<region>_schools.{csv,json}` with the region code lower-cased.
pub fn export_paths(output_dir: &Path, region: &str) -> ExportPaths {
    let stem = format!("{}_schools", region.trim().to_lowercase());
    ExportPaths {
        csv: output_dir.join(format!("{stem}.csv")),
        json: output_dir.join(format!("{stem}.json")),
    }
}

pub fn write_csv(path: &Path, records: &[NormalizedRecord]) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    // Written explicitly so an empty export still has its header row.
    writer.write_record(EXPORT_COLUMNS)?;
    for record in records {
        writer.serialize(record.to_export())?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_json(path: &Path, records: &[NormalizedRecord]) -> Result<(), ExportError> {
    let rows: Vec<ExportRecord<'_>> = records.iter().map(NormalizedRecord::to_export).collect();
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &rows)?;
    writer.flush()?;
    Ok(())
}

/// Create `output_dir` if needed and write both exports.
pub fn export_all(
    output_dir: &Path,
    region: &str,
    records: &[NormalizedRecord],
) -> Result<ExportPaths, ExportError> {
    fs::create_dir_all(output_dir)?;
    let paths = export_paths(output_dir, region);

    write_csv(&paths.csv, records)?;
    write_json(&paths.json, records)?;

    info!(
        "Wrote {} records to {} and {}",
        records.len(),
        paths.csv.display(),
        paths.json.display()
    );
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GeoPoint;
    use serde_json::{json, Value};

    fn school() -> NormalizedRecord {
        NormalizedRecord {
            id: Some("42".into()),
            name: Some("Школа №1, им. Ленина".into()),
            address: Some("Бишкек".into()),
            location: Some(GeoPoint {
                lat: 42.87,
                lon: 74.59,
            }),
            phones: None,
            categories_list: vec!["Школа".into()],
            categories: Some("Школа".into()),
            hours_text: None,
            site_url: Some("https://school1.kg".into()),
            raw: json!({ "secret": "raw payload" }),
        }
    }

    #[test]
    fn test_paths_lowercase_region() {
        let paths = export_paths(Path::new("/tmp/out"), "KG");
        assert_eq!(paths.csv, PathBuf::from("/tmp/out/kg_schools.csv"));
        assert_eq!(paths.json, PathBuf::from("/tmp/out/kg_schools.json"));
    }

    #[test]
    fn test_csv_projection() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_csv(&path, &[school()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,address,lat,lon,phones,categories,hours_text,site_url")
        );
        assert_eq!(
            lines.next(),
            Some("42,\"Школа №1, им. Ленина\",Бишкек,42.87,74.59,,Школа,,https://school1.kg")
        );
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_empty_csv_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        write_csv(&path, &[]).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content.trim_end(),
            "id,name,address,lat,lon,phones,categories,hours_text,site_url"
        );
    }

    #[test]
    fn test_json_projection_omits_internal_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        write_json(&path, &[school()]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("Школа №1"), "non-ASCII must not be escaped");

        let parsed: Value = serde_json::from_str(&content).unwrap();
        let row = &parsed[0];
        let keys: Vec<_> = row.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 9);
        assert!(row.get("raw").is_none());
        assert!(row.get("categories_list").is_none());
        assert_eq!(row["phones"], Value::Null);
        assert_eq!(row["lat"], json!(42.87));
    }

    #[test]
    fn test_export_all_creates_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        let paths = export_all(&out, "uz", &[school()]).unwrap();
        assert!(paths.csv.exists());
        assert!(paths.json.exists());
        assert!(paths.json.ends_with("uz_schools.json"));
    }
}
