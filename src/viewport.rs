//! Browser viewport used when capturing computed styles.
//!
//! Written as `WIDTHxHEIGHT` on the command line and in config files; a
//! `{ width, height }` table is accepted too.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ViewportRepr", into = "String")]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ViewportParseError {
    #[error("Invalid viewport format: expected WIDTHxHEIGHT (e.g., 1440x900)")]
    InvalidFormat,
    #[error("Invalid width: {0}")]
    InvalidWidth(String),
    #[error("Invalid height: {0}")]
    InvalidHeight(String),
    #[error("Viewport dimensions must be positive")]
    Zero,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Result<Self, ViewportParseError> {
        if width == 0 || height == 0 {
            return Err(ViewportParseError::Zero);
        }
        Ok(Self { width, height })
    }
}

impl FromStr for Viewport {
    type Err = ViewportParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        let (width, height) = lower
            .split_once('x')
            .ok_or(ViewportParseError::InvalidFormat)?;
        if height.contains('x') {
            return Err(ViewportParseError::InvalidFormat);
        }

        let width: u32 = width
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidWidth(width.trim().to_string()))?;
        let height: u32 = height
            .trim()
            .parse()
            .map_err(|_| ViewportParseError::InvalidHeight(height.trim().to_string()))?;

        Viewport::new(width, height)
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ViewportRepr {
    Text(String),
    Size { width: u32, height: u32 },
}

impl TryFrom<ViewportRepr> for Viewport {
    type Error = ViewportParseError;

    fn try_from(repr: ViewportRepr) -> Result<Self, Self::Error> {
        match repr {
            ViewportRepr::Text(text) => text.parse(),
            ViewportRepr::Size { width, height } => Viewport::new(width, height),
        }
    }
}

impl From<Viewport> for String {
    fn from(viewport: Viewport) -> Self {
        viewport.to_string()
    }
}
