use crate::directory::VillageDirectory;
use crate::error::{FiaError, Result};
use crate::types::{MetricKey, RawDataset, VillageInfo};
use csv::ReaderBuilder;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub villages: usize,
    pub year_records: usize,
    pub metric_values: usize,
    pub null_values: usize,
    pub ignored_fields: usize,
}

enum Field {
    Metric(MetricKey),
    Adm,
    Total,
    Cv,
}

fn classify(name: &str) -> Option<Field> {
    match name {
        "adm" => Some(Field::Adm),
        "total" => Some(Field::Total),
        "cv" => Some(Field::Cv),
        other => other.parse::<MetricKey>().ok().map(Field::Metric),
    }
}

/// Read and validate the income dataset from a JSON file.
pub fn load_dataset(path: impl AsRef<Path>) -> Result<(RawDataset, LoadReport)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| FiaError::io(e, path))?;
    let (raw, report) = parse_dataset(&text)?;
    info!(
        path = %path.display(),
        villages = report.villages,
        year_records = report.year_records,
        metric_values = report.metric_values,
        "dataset loaded"
    );
    Ok((raw, report))
}

pub fn parse_dataset(text: &str) -> Result<(RawDataset, LoadReport)> {
    let value: Value = serde_json::from_str(text)?;
    dataset_from_value(&value)
}

/// Validate a decoded JSON document into a [`RawDataset`].
///
/// `null` field values count as "no data"; any other non-numeric value in a
/// known field aborts the load.
pub fn dataset_from_value(value: &Value) -> Result<(RawDataset, LoadReport)> {
    let root = value
        .as_object()
        .ok_or_else(|| FiaError::malformed("$", format!("expected an object, found {}", kind(value))))?;

    let mut raw = RawDataset::new();
    let mut report = LoadReport::default();

    for (code, years) in root {
        let years = as_object(years, || format!("$.{}", code))?;
        raw.villages.entry(code.clone()).or_default();
        report.villages += 1;

        for (year, fields) in years {
            let fields = as_object(fields, || format!("$.{}.{}", code, year))?;
            let mut created = false;

            for (name, field_value) in fields {
                let Some(field) = classify(name) else {
                    report.ignored_fields += 1;
                    continue;
                };
                let number = match field_value {
                    Value::Null => {
                        report.null_values += 1;
                        continue;
                    }
                    Value::Number(n) => n.as_f64().ok_or_else(|| {
                        FiaError::malformed(format!("$.{}.{}.{}", code, year, name), "number out of range")
                    })?,
                    other => {
                        return Err(FiaError::malformed(
                            format!("$.{}.{}.{}", code, year, name),
                            format!("expected a number, found {}", kind(other)),
                        ))
                    }
                };

                let record = raw.record_mut(code, year);
                created = true;
                match field {
                    Field::Metric(metric) => {
                        record.metrics.insert(metric, number);
                        report.metric_values += 1;
                    }
                    Field::Adm => record.adm = Some(number),
                    Field::Total => record.total = Some(number),
                    Field::Cv => record.cv = Some(number),
                }
            }

            if created {
                report.year_records += 1;
            }
        }
    }

    if report.ignored_fields > 0 {
        warn!(ignored = report.ignored_fields, "dataset contains unknown fields");
    }
    Ok((raw, report))
}

fn as_object<'a>(value: &'a Value, path: impl FnOnce() -> String) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| FiaError::malformed(path(), format!("expected an object, found {}", kind(value))))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Load village names from a CSV with `VILLCODE,COUNTYNAME,TOWNNAME,VILLNAME` headers.
///
/// Rows that fail to deserialize are skipped and counted.
pub fn load_directory(path: impl AsRef<Path>) -> Result<VillageDirectory> {
    let path = path.as_ref();
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;
    let mut directory = VillageDirectory::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize::<VillageInfo>() {
        match result {
            Ok(info) => directory.insert(info),
            Err(_) => skipped += 1,
        }
    }

    if skipped > 0 {
        warn!(skipped, path = %path.display(), "skipped unreadable village rows");
    }
    info!(villages = directory.len(), "village directory loaded");
    Ok(directory)
}
