//! Output formatting and persistence for board snapshots.
//!
//! Supports log lines, JSON serialization, and CSV append.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::board::{BoardSnapshot, DirectionLine};
use crate::display::Palette;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;

/// One CSV row: a single ranked arrival, or an empty direction.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub generated_at: DateTime<Utc>,
    pub feed_timestamp: Option<u64>,
    pub label: String,
    pub stop_id: String,
    pub rank: Option<usize>,
    pub trip_id: Option<String>,
    pub minutes_until: Option<i64>,
}

/// Flattens a snapshot into CSV rows, one per arrival. A direction with no
/// arrivals still yields one row so gaps are visible in the log.
pub fn records(snapshot: &BoardSnapshot) -> Vec<ArrivalRecord> {
    let mut rows = Vec::new();

    for line in &snapshot.lines {
        let base = || ArrivalRecord {
            generated_at: snapshot.generated_at,
            feed_timestamp: snapshot.feed_timestamp,
            label: line.label.clone(),
            stop_id: line.stop_id.clone(),
            rank: None,
            trip_id: None,
            minutes_until: None,
        };

        if line.arrivals.is_empty() {
            rows.push(base());
        }

        for (rank, arrival) in line.arrivals.iter().enumerate() {
            rows.push(ArrivalRecord {
                rank: Some(rank + 1),
                trip_id: Some(arrival.trip_id.clone()),
                minutes_until: Some(arrival.minutes_until),
                ..base()
            });
        }
    }

    rows
}

/// A board line together with its colors resolved through a [`Palette`].
#[derive(Debug, Serialize)]
pub struct RgbLine<'a> {
    #[serde(flatten)]
    pub line: &'a DirectionLine,
    pub rgb: Vec<u32>,
}

#[derive(Debug, Serialize)]
pub struct RgbSnapshot<'a> {
    pub generated_at: DateTime<Utc>,
    pub feed_timestamp: Option<u64>,
    pub lines: Vec<RgbLine<'a>>,
}

/// Attaches packed `0xRRGGBB` values for every character of every line.
pub fn with_rgb<'a>(snapshot: &'a BoardSnapshot, palette: &Palette) -> RgbSnapshot<'a> {
    RgbSnapshot {
        generated_at: snapshot.generated_at,
        feed_timestamp: snapshot.feed_timestamp,
        lines: snapshot
            .lines
            .iter()
            .map(|line| RgbLine {
                line,
                rgb: line.line.rgb(palette),
            })
            .collect(),
    }
}

/// Logs each board line.
pub fn print_lines(snapshot: &BoardSnapshot) {
    for line in &snapshot.lines {
        info!(stop_id = %line.stop_id, "{}", line.line.text);
    }
}

/// Logs the snapshot using Rust's debug pretty-print format.
pub fn print_pretty(snapshot: &BoardSnapshot) {
    debug!("{:#?}", snapshot);
}

/// Renders any serializable value as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Appends every arrival of `snapshot` as rows of a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_record(path: &str, snapshot: &BoardSnapshot) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending CSV records");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for record in records(snapshot) {
        writer.serialize(record)?;
    }
    writer.flush()?;

    Ok(())
}
