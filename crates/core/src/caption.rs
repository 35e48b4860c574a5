//! Caption handling for delivered episodes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::EpisodeRecord;

/// Settings key holding the active caption mode.
pub const CAPTION_MODE_KEY: &str = "caption_mode";

/// How a delivered file is captioned.
///
/// Persisted as its integer code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CaptionMode {
    /// Keep the source caption.
    Original = 1,
    /// Replace with series, episode code and quality.
    #[default]
    Clean = 2,
    /// Send without a caption.
    Empty = 3,
}

impl CaptionMode {
    /// Next mode in the 1 -> 2 -> 3 -> 1 cycle.
    pub fn next(self) -> Self {
        match self {
            CaptionMode::Original => CaptionMode::Clean,
            CaptionMode::Clean => CaptionMode::Empty,
            CaptionMode::Empty => CaptionMode::Original,
        }
    }

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CaptionMode::Original => "original",
            CaptionMode::Clean => "clean",
            CaptionMode::Empty => "empty",
        }
    }
}

impl fmt::Display for CaptionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<u8> for CaptionMode {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(CaptionMode::Original),
            2 => Ok(CaptionMode::Clean),
            3 => Ok(CaptionMode::Empty),
            other => Err(format!("unknown caption mode: {}", other)),
        }
    }
}

impl From<CaptionMode> for u8 {
    fn from(mode: CaptionMode) -> Self {
        mode.code()
    }
}

/// Caption to send with `record`, or `None` to keep the original one.
pub fn render_caption(mode: CaptionMode, record: &EpisodeRecord) -> Option<String> {
    match mode {
        CaptionMode::Original => None,
        CaptionMode::Clean => Some(format!(
            "{}\n{}\nQuality: {}",
            record.series_name,
            record.code(),
            record.quality
        )),
        CaptionMode::Empty => Some(String::new()),
    }
}
