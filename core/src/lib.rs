#![no_std]

extern crate alloc;

use alloc::string::String;
use serde::{Deserialize, Serialize};

pub use card::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use message::*;
pub use timer::*;
pub use types::*;

mod card;
mod engine;
mod error;
mod grid;
mod message;
mod timer;
mod types;

/// How long the whole grid stays face up before a round starts.
pub const PREVIEW_MS: u32 = 2000;

/// Default lifetime of a banner message.
pub const MESSAGE_MS: u32 = 3000;

/// Period of one countdown tick.
pub const TICK_MS: u32 = 1000;

/// Inline style applied to the grid container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardTheme {
    pub background: String,
    pub color: String,
    pub font_size: String,
}

impl Default for CardTheme {
    fn default() -> Self {
        Self {
            background: String::from("rgb(145, 140, 144)"),
            color: String::from("white"),
            font_size: String::from("30px"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Grid width in pixels.
    pub width: u16,
    /// Grid height in pixels.
    pub height: u16,
    pub cols: Dim,
    pub rows: Dim,
    /// Countdown length in seconds.
    pub time_limit: u32,
    pub theme: Option<CardTheme>,
}

impl GameConfig {
    pub const fn new_unchecked(cols: Dim, rows: Dim, time_limit: u32) -> Self {
        Self {
            width: 500,
            height: 500,
            cols,
            rows,
            time_limit,
            theme: None,
        }
    }

    pub fn new(cols: Dim, rows: Dim, time_limit: u32) -> Self {
        let cols = cols.clamp(1, Dim::MAX);
        let rows = rows.clamp(1, Dim::MAX);
        Self::new_unchecked(cols, rows, time_limit)
    }

    pub fn with_theme(mut self, theme: CardTheme) -> Self {
        self.theme = Some(theme);
        self
    }

    pub const fn total_cards(&self) -> CardCount {
        mult(self.cols, self.rows)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(3, 2, 20).with_theme(CardTheme::default())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub const fn message(self) -> &'static str {
        match self {
            Self::Win => "You Win !",
            Self::Lose => "You Lose !",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FlipOutcome {
    NoChange,
    Pending,
    Matched,
    Won,
    Lost,
}

impl FlipOutcome {
    pub const fn has_update(self) -> bool {
        use FlipOutcome::*;
        match self {
            NoChange => false,
            Pending => true,
            Matched => true,
            Won => true,
            Lost => true,
        }
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}
