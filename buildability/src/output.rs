use crate::{batch::Entry, error::ErrorKind, report::Report};
use anyhow::{Context, Error as AnyError};
use serde::Serialize;
use std::{fs::OpenOptions, path::Path};

/// Formats `val` with `decimals` places and comma thousands separators.
fn thousands(val: f64, decimals: usize) -> String {
    let s = format!("{val:.decimals$}");
    let (sign, s) = s.strip_prefix('-').map_or(("", s.as_str()), |s| ("-", s));
    let (int, frac) = s.split_once('.').map_or((s, None), |(i, f)| (i, Some(f)));
    let mut out = String::with_capacity(s.len() + int.len() / 3 + 1);
    out.push_str(sign);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    if let Some(frac) = frac {
        out.push('.');
        out.push_str(frac);
    }
    out
}

fn yes_no(val: bool) -> &'static str {
    if val {
        "yes"
    } else {
        "no"
    }
}

/// Renders a single report as a two column Metric/Value table.
pub fn report_table(report: &Report) -> String {
    let mut rows: Vec<(&str, String)> = Vec::with_capacity(12);
    if let Some(address) = &report.address {
        rows.push(("Address", address.clone()));
    }
    rows.extend([
        ("APN", report.apn.clone()),
        (
            "Area",
            format!(
                "{} ft² ({:.4} ac)",
                thousands(report.area, 1),
                report.area_acres
            ),
        ),
        (
            "Contours",
            format!("{} @ {} ft", report.contour_count, report.interval),
        ),
        (
            "Contour length",
            format!("{} ft", thousands(report.contour_length, 1)),
        ),
        ("Average slope", format!("{:.2}%", report.average_slope)),
        ("LUF", format!("{:.6}", report.luf)),
        ("MDA", format!("{} ft²", thousands(report.mda, 1))),
        ("MFA", format!("{} ft²", thousands(report.mfa, 1))),
        ("CDP required", yes_no(report.requires_cdp).to_owned()),
    ]);
    if let Some(dem_slope) = report.dem_slope {
        rows.push(("DEM slope", format!("{dem_slope:.2}%")));
    }

    let mut out = format!("{:<16}{}\n", "Metric", "Value");
    for (metric, value) in rows {
        out.push_str(&format!("{metric:<16}{value}\n"));
    }
    out
}

/// Renders batch entries one per row, failures included.
pub fn batch_table(entries: &[Entry]) -> String {
    let width = entries
        .iter()
        .map(|e| e.input.chars().count())
        .chain(std::iter::once("Input".len()))
        .max()
        .unwrap_or_default();

    let mut out = format!(
        "{:<width$}  {:<10}  {:>12}  {:>7}  {:>8}  {:>10}  {:>9}  Status\n",
        "Input", "APN", "Area", "Slope", "LUF", "MDA", "MFA"
    );
    for entry in entries {
        let row = match &entry.outcome {
            Ok(r) => format!(
                "{:<width$}  {:<10}  {:>12}  {:>7.2}  {:>8.4}  {:>10}  {:>9}  ok\n",
                entry.input,
                r.apn,
                thousands(r.area, 1),
                r.average_slope,
                r.luf,
                thousands(r.mda, 1),
                thousands(r.mfa, 1),
            ),
            Err(e) => format!(
                "{:<width$}  {:<10}  {:>12}  {:>7}  {:>8}  {:>10}  {:>9}  {}: {e}\n",
                entry.input,
                "-",
                "-",
                "-",
                "-",
                "-",
                "-",
                e.kind(),
            ),
        };
        out.push_str(&row);
    }
    out
}

pub fn report_json(report: &Report) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

#[derive(Serialize)]
#[serde(untagged)]
enum JsonEntry<'a> {
    Ok(&'a Report),
    Err {
        input: &'a str,
        kind: ErrorKind,
        error: String,
    },
}

impl<'a> From<&'a Entry> for JsonEntry<'a> {
    fn from(entry: &'a Entry) -> Self {
        match &entry.outcome {
            Ok(report) => Self::Ok(report),
            Err(e) => Self::Err {
                input: &entry.input,
                kind: e.kind(),
                error: e.to_string(),
            },
        }
    }
}

pub fn batch_json(entries: &[Entry]) -> Result<String, serde_json::Error> {
    let entries: Vec<JsonEntry> = entries.iter().map(JsonEntry::from).collect();
    serde_json::to_string_pretty(&entries)
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    input: &'a str,
    apn: Option<&'a str>,
    area: Option<f64>,
    average_slope: Option<f64>,
    luf: Option<f64>,
    mda: Option<f64>,
    mfa: Option<f64>,
    requires_cdp: Option<bool>,
    status: &'static str,
    error: Option<String>,
}

impl<'a> From<&'a Entry> for CsvRow<'a> {
    fn from(entry: &'a Entry) -> Self {
        match &entry.outcome {
            Ok(r) => Self {
                input: &entry.input,
                apn: Some(&r.apn),
                area: Some(r.area),
                average_slope: Some(r.average_slope),
                luf: Some(r.luf),
                mda: Some(r.mda),
                mfa: Some(r.mfa),
                requires_cdp: Some(r.requires_cdp),
                status: "ok",
                error: None,
            },
            Err(e) => Self {
                input: &entry.input,
                apn: None,
                area: None,
                average_slope: None,
                luf: None,
                mda: None,
                mfa: None,
                requires_cdp: None,
                status: "error",
                error: Some(format!("{}: {e}", e.kind())),
            },
        }
    }
}

/// Appends one row per entry to the CSV file at `path`, writing the
/// header only when the file is new or empty.
pub fn append_csv(path: &Path, entries: &[Entry]) -> Result<(), AnyError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let empty = file.metadata()?.len() == 0;
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(empty)
        .from_writer(file);
    for entry in entries {
        wtr.serialize(CsvRow::from(entry))?;
    }
    wtr.flush()?;
    Ok(())
}
