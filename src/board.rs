//! One refresh cycle of the two-line arrival board.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::arrivals::{Arrival, extract_arrivals};
use crate::config::Direction;
use crate::display::{Color, DisplayLine, format_display};
use crate::error::DecodeError;
use crate::parser::parse_feed;

/// Text shown on the first line when no feed has ever been decoded.
pub const ERROR_TEXT: &str = "Error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionLine {
    pub label: String,
    pub stop_id: String,
    pub arrivals: Vec<Arrival>,
    #[serde(flatten)]
    pub line: DisplayLine,
}

/// Everything the board shows after one successful decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub generated_at: DateTime<Utc>,
    pub feed_timestamp: Option<u64>,
    pub lines: Vec<DirectionLine>,
}

/// Decodes `bytes` once and builds a line for every direction.
///
/// # Errors
///
/// Returns the decode error; no snapshot is produced from a corrupt feed.
pub fn render_board(
    bytes: &[u8],
    directions: &[Direction],
    now: DateTime<Utc>,
) -> Result<BoardSnapshot, DecodeError> {
    let feed = parse_feed(bytes)?;
    let epoch = now.timestamp();

    let lines = directions
        .iter()
        .map(|d| {
            let arrivals = extract_arrivals(&feed, &d.stop_id, epoch);
            let line = format_display(&arrivals, &d.label);
            DirectionLine {
                label: d.label.clone(),
                stop_id: d.stop_id.clone(),
                arrivals,
                line,
            }
        })
        .collect();

    Ok(BoardSnapshot {
        generated_at: now,
        feed_timestamp: feed.header.timestamp,
        lines,
    })
}

/// What the board currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardState {
    /// Nothing fetched yet.
    Empty,
    Showing(BoardSnapshot),
    /// No snapshot to fall back on; holds the last error message.
    Failed(String),
}

/// Holds the last good snapshot across refresh cycles.
#[derive(Debug, Clone)]
pub struct Board {
    state: BoardState,
    consecutive_failures: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            state: BoardState::Empty,
            consecutive_failures: 0,
        }
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Applies the outcome of one fetch-and-render attempt. A failure keeps
    /// the previous snapshot on screen.
    pub fn refresh<E: std::fmt::Display>(&mut self, outcome: Result<BoardSnapshot, E>) {
        match outcome {
            Ok(snapshot) => {
                info!(
                    lines = snapshot.lines.len(),
                    feed_timestamp = snapshot.feed_timestamp,
                    "Board refreshed"
                );
                self.consecutive_failures = 0;
                self.state = BoardState::Showing(snapshot);
            }
            Err(e) => {
                self.consecutive_failures += 1;
                warn!(
                    error = %e,
                    failures = self.consecutive_failures,
                    "Refresh failed, keeping previous board"
                );
                if !matches!(self.state, BoardState::Showing(_)) {
                    self.state = BoardState::Failed(e.to_string());
                }
            }
        }
    }

    /// The two lines to hand to the renderer.
    pub fn lines(&self) -> Vec<DisplayLine> {
        match &self.state {
            BoardState::Showing(snapshot) => {
                snapshot.lines.iter().map(|l| l.line.clone()).collect()
            }
            BoardState::Failed(message) => vec![
                solid_line(ERROR_TEXT, Color::Urgent),
                solid_line(message, Color::Urgent),
            ],
            BoardState::Empty => Vec::new(),
        }
    }
}

fn solid_line(text: &str, color: Color) -> DisplayLine {
    DisplayLine {
        text: text.to_string(),
        colors: vec![color; text.chars().count()],
    }
}
