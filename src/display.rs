//! Turns ranked arrivals into a board line with one color per character.

use serde::{Deserialize, Serialize};

use crate::arrivals::Arrival;

const NO_TRAINS: &str = " No trains";

/// Color tiers understood by the board. The concrete encoding lives in
/// [`Palette`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Label,
    Urgent,
    Caution,
    Default,
}

/// Urgency tier for a train `minutes_until` away.
pub fn urgency_color(minutes_until: i64) -> Color {
    if minutes_until < 2 {
        Color::Urgent
    } else if minutes_until < 5 {
        Color::Caution
    } else {
        Color::Default
    }
}

/// Rendered text for one direction; `colors[i]` belongs to the `i`th char of `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayLine {
    pub text: String,
    pub colors: Vec<Color>,
}

impl DisplayLine {
    fn push(&mut self, s: &str, color: Color) {
        self.text.push_str(s);
        self.colors.extend(std::iter::repeat_n(color, s.chars().count()));
    }

    /// Packed RGB value for every character.
    pub fn rgb(&self, palette: &Palette) -> Vec<u32> {
        self.colors.iter().map(|&c| palette.rgb(c)).collect()
    }
}

/// Formats `arrivals` behind `direction_label`, e.g. `"City 1m,9m"`.
///
/// The space after the label and each `"<n>m"` take the urgency color of
/// their train; commas between trains take the default color.
/// Later arrivals follow the comma directly, with no leading space.
pub fn format_display(arrivals: &[Arrival], direction_label: &str) -> DisplayLine {
    let mut line = DisplayLine {
        text: String::new(),
        colors: Vec::new(),
    };
    line.push(direction_label, Color::Label);

    if arrivals.is_empty() {
        line.push(NO_TRAINS, Color::Default);
        return line;
    }

    for (i, arrival) in arrivals.iter().enumerate() {
        let color = urgency_color(arrival.minutes_until);
        if i == 0 {
            line.push(" ", color);
        } else {
            line.push(",", Color::Default);
        }
        line.push(&arrival.minutes_until.to_string(), color);
        line.push("m", color);
    }

    line
}

/// Packed `0xRRGGBB` values for each [`Color`] tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub label: u32,
    pub urgent: u32,
    pub caution: u32,
    pub default: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            label: 0x00FF66,
            urgent: 0xFF0000,
            caution: 0xFF00FF,
            default: 0xFFFFFF,
        }
    }
}

impl Palette {
    pub fn rgb(&self, color: Color) -> u32 {
        match color {
            Color::Label => self.label,
            Color::Urgent => self.urgent,
            Color::Caution => self.caution,
            Color::Default => self.default,
        }
    }
}
