//! Writers - stream query results to CSV or JSON
//!
//! Both writers consume the result stream lazily and return the number of
//! approaches written. Unknown values are written as empty names, `NaN`
//! (CSV) or `null` (JSON). Unlinked approaches carry their own designation
//! and blank NEO attributes.

use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use serde::{Serialize, Serializer};
use crate::approach::ApproachView;
use crate::config::ensure_parent_dir;
use crate::{Error, Result};

/// Flat CSV row; one per close approach
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    datetime_utc: String,
    distance_au: f64,
    velocity_km_s: f64,
    designation: &'a str,
    name: &'a str,
    diameter_km: f64,
    potentially_hazardous: bool,
}

impl<'a> From<&ApproachView<'a>> for CsvRow<'a> {
    fn from(view: &ApproachView<'a>) -> Self {
        let neo = view.neo;
        Self {
            datetime_utc: view.approach.time_str(),
            distance_au: view.distance(),
            velocity_km_s: view.velocity(),
            designation: neo.map(|n| n.designation()).unwrap_or_else(|| view.designation()),
            name: neo.and_then(|n| n.name.as_deref()).unwrap_or(""),
            diameter_km: neo.map(|n| n.diameter).unwrap_or(f64::NAN),
            potentially_hazardous: neo.map(|n| n.hazardous).unwrap_or(false),
        }
    }
}

/// Write approaches to a CSV file with a header row
pub fn write_to_csv<'a>(
    results: impl IntoIterator<Item = ApproachView<'a>>,
    path: &Path,
) -> Result<usize> {
    ensure_parent_dir(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    let mut written = 0;

    for view in results {
        writer.serialize(CsvRow::from(&view))?;
        written += 1;
    }
    if written == 0 {
        // serialize() emits the header with the first row; write it for empty results too
        writer.write_record([
            "datetime_utc",
            "distance_au",
            "velocity_km_s",
            "designation",
            "name",
            "diameter_km",
            "potentially_hazardous",
        ])?;
    }
    writer.flush()?;

    tracing::info!("Wrote {} close approaches to {}", written, path.display());
    Ok(written)
}

/// Write approaches to a JSON file as a pretty-printed array
pub fn write_to_json<'a>(
    results: impl IntoIterator<Item = ApproachView<'a>>,
    path: &Path,
) -> Result<usize> {
    ensure_parent_dir(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    let written = Cell::new(0usize);

    {
        let rows = results.into_iter().map(|view| {
            written.set(written.get() + 1);
            view.serialize()
        });
        let mut serializer = serde_json::Serializer::pretty(&mut writer);
        serializer.collect_seq(rows)?;
    }
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!("Wrote {} close approaches to {}", written.get(), path.display());
    Ok(written.get())
}

/// Write approaches to `path`, choosing the format from its extension
pub fn write_results<'a>(
    results: impl IntoIterator<Item = ApproachView<'a>>,
    path: &Path,
) -> Result<usize> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => write_to_csv(results, path),
        "json" => write_to_json(results, path),
        _ => Err(Error::UnsupportedOutput(path.display().to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approach::{ApproachRecord, CloseApproach};
    use crate::linker::build_database;
    use crate::neo::{NearEarthObject, NeoRecord};
    use crate::NeoDatabase;
    use chrono::NaiveDate;

    fn sample_db() -> NeoDatabase {
        let time = NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let neos = vec![NearEarthObject::new(
            NeoRecord::new("433").with_name("Eros").with_diameter(16.84),
        )];
        let approaches = vec![
            CloseApproach::new(
                ApproachRecord::new("433")
                    .with_time(time)
                    .with_distance(0.42)
                    .with_velocity(5.3),
            ),
            CloseApproach::new(ApproachRecord::new("999999").with_time(time).with_distance(0.1)),
        ];
        build_database(neos, approaches).0
    }

    #[test]
    fn test_write_csv() {
        let db = sample_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("results.csv");

        let written = write_to_csv(db.query(&[]), &path).unwrap();
        assert_eq!(written, 2);

        let text = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "datetime_utc,distance_au,velocity_km_s,designation,name,diameter_km,potentially_hazardous"
        );
        assert_eq!(lines[1], "2020-01-01 00:00,0.42,5.3,433,Eros,16.84,false");
        assert!(lines[2].starts_with("2020-01-01 00:00,0.1,NaN,999999,,NaN,false"));
    }

    #[test]
    fn test_write_csv_empty_has_header() {
        let db = sample_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        let never = [crate::Filter::new("never", |_| false)];

        assert_eq!(write_to_csv(db.query(&never), &path).unwrap(), 0);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("datetime_utc,"));
    }

    #[test]
    fn test_write_json() {
        let db = sample_db();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        assert_eq!(write_to_json(db.query(&[]), &path).unwrap(), 2);

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let rows = value.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["datetime_utc"], "2020-01-01 00:00");
        assert_eq!(rows[0]["neo"]["name"], "Eros");
        assert_eq!(rows[0]["neo"]["potentially_hazardous"], false);
        assert_eq!(rows[1]["neo"]["designation"], "999999");
        assert_eq!(rows[1]["neo"]["name"], "");
        assert!(rows[1]["velocity_km_s"].is_null());
        assert!(rows[1]["neo"]["diameter_km"].is_null());
    }

    #[test]
    fn test_write_results_dispatch() {
        let db = sample_db();
        let dir = tempfile::tempdir().unwrap();

        assert_eq!(write_results(db.query(&[]), &dir.path().join("a.JSON")).unwrap(), 2);
        assert_eq!(write_results(db.query(&[]), &dir.path().join("a.csv")).unwrap(), 2);
        assert!(matches!(
            write_results(db.query(&[]), &dir.path().join("a.txt")),
            Err(Error::UnsupportedOutput(_))
        ));
    }
}
