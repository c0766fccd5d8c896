//! Extraction - NEO and close-approach datasets into typed records
//!
//! - NEOs come from a CSV file with a header row; the `pdes`, `name`,
//!   `diameter` and `pha` columns are used and everything else is ignored.
//! - Close approaches come from a JSON document of the form
//!   `{"fields": [...], "data": [[...], ...]}`; the `des`, `cd`, `dist` and
//!   `v_rel` columns are used.
//!
//! A value that cannot be coerced is logged and replaced by the field's
//! default. Only I/O and syntax errors abort a load.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use serde::Deserialize;
use serde_json::Value;
use crate::approach::{ApproachRecord, CloseApproach};
use crate::datetime::parse_cd;
use crate::neo::{NearEarthObject, NeoRecord};
use crate::{Error, Result};

/// Load NEOs from a CSV file
pub fn load_neos(path: &Path) -> Result<Vec<NearEarthObject>> {
    tracing::debug!("Loading NEOs from {}", path.display());
    let file = File::open(path)?;
    let neos = read_neos(BufReader::new(file))?;
    tracing::info!("Loaded {} NEOs from {}", neos.len(), path.display());
    Ok(neos)
}

/// Read NEOs from CSV text
pub fn read_neos<R: Read>(reader: R) -> Result<Vec<NearEarthObject>> {
    let mut csv = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h.trim() == name);
    let pdes = column("pdes");
    let name = column("name");
    let diameter = column("diameter");
    let pha = column("pha");

    if pdes.is_none() {
        tracing::warn!("NEO file has no pdes column; every designation will be unknown");
    }

    let mut neos = Vec::new();
    for (index, row) in csv.records().enumerate() {
        let row = row?;
        let line = index + 2;
        let cell = |col: Option<usize>| col.and_then(|c| row.get(c));

        let record = NeoRecord {
            designation: cell(pdes).map(str::to_string),
            name: cell(name).map(str::to_string),
            diameter: coerce_float(line, "diameter", cell(diameter)),
            hazardous: coerce_flag(line, "pha", cell(pha)),
        };
        neos.push(NearEarthObject::new(record));
    }

    Ok(neos)
}

#[derive(Debug, Deserialize)]
struct CadDocument {
    fields: Vec<String>,
    data: Vec<Vec<Value>>,
}

/// Load close approaches from a JSON file
pub fn load_approaches(path: &Path) -> Result<Vec<CloseApproach>> {
    tracing::debug!("Loading close approaches from {}", path.display());
    let file = File::open(path)?;
    let approaches = read_approaches(BufReader::new(file))?;
    tracing::info!("Loaded {} close approaches from {}", approaches.len(), path.display());
    Ok(approaches)
}

/// Read close approaches from JSON text
pub fn read_approaches<R: Read>(reader: R) -> Result<Vec<CloseApproach>> {
    let document: CadDocument = serde_json::from_reader(reader)?;

    let column = |name: &str| {
        document
            .fields
            .iter()
            .position(|f| f == name)
            .ok_or_else(|| Error::MissingColumn(name.to_string()))
    };
    let des = column("des")?;
    let cd = column("cd")?;
    let dist = column("dist")?;
    let v_rel = column("v_rel")?;
    tracing::debug!("Close approach columns: des={}, cd={}, dist={}, v_rel={}", des, cd, dist, v_rel);

    let approaches = document
        .data
        .iter()
        .enumerate()
        .map(|(index, row)| {
            let cell = |col: usize| row.get(col).and_then(value_text);
            let record = ApproachRecord {
                designation: cell(des),
                time: coerce_time(index, cell(cd).as_deref()),
                distance: coerce_float(index, "dist", cell(dist).as_deref()),
                velocity: coerce_float(index, "v_rel", cell(v_rel).as_deref()),
            };
            CloseApproach::new(record)
        })
        .collect();

    Ok(approaches)
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn blank(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|s| !s.is_empty())
}

fn coerce_float(row: usize, field: &str, raw: Option<&str>) -> Option<f64> {
    let raw = blank(raw)?;
    match raw.parse::<f64>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Row {}: cannot read {} from {:?}; treating as unknown", row, field, raw);
            None
        }
    }
}

fn coerce_flag(row: usize, field: &str, raw: Option<&str>) -> Option<bool> {
    let raw = blank(raw)?;
    match raw {
        "Y" | "y" => Some(true),
        "N" | "n" => Some(false),
        _ => {
            tracing::warn!("Row {}: cannot read {} from {:?}; treating as false", row, field, raw);
            None
        }
    }
}

fn coerce_time(row: usize, raw: Option<&str>) -> Option<chrono::NaiveDateTime> {
    let raw = blank(raw)?;
    match parse_cd(raw) {
        Ok(time) => Some(time),
        Err(_) => {
            tracing::warn!("Row {}: cannot read cd from {:?}; treating as unknown", row, raw);
            None
        }
    }
}
