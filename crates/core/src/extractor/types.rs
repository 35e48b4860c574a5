//! Types produced by the episode extractor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Video resolution tag detected in a release name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quality {
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "480p")]
    P480,
    #[serde(rename = "unknown")]
    Unknown,
}

impl Quality {
    /// Detection order: the highest resolution wins when several co-occur.
    pub const PRIORITY: [Quality; 3] = [Quality::P1080, Quality::P720, Quality::P480];

    pub fn as_str(&self) -> &'static str {
        match self {
            Quality::P1080 => "1080p",
            Quality::P720 => "720p",
            Quality::P480 => "480p",
            Quality::Unknown => "unknown",
        }
    }

    /// Sort key, lower is better.
    pub fn rank(&self) -> u8 {
        match self {
            Quality::P1080 => 0,
            Quality::P720 => 1,
            Quality::P480 => 2,
            Quality::Unknown => 3,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Quality {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1080p" => Ok(Quality::P1080),
            "720p" => Ok(Quality::P720),
            "480p" => Ok(Quality::P480),
            "unknown" => Ok(Quality::Unknown),
            other => Err(UnknownTagError(other.to_string())),
        }
    }
}

/// Audio track label detected in a release name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Audio {
    Multi,
    Dual,
    Japanese,
    English,
    Tamil,
    Original,
}

impl Audio {
    /// Detection order with the lowercase needles that select each label.
    pub const PRIORITY: [(Audio, &'static [&'static str]); 5] = [
        (Audio::Multi, &["multi"]),
        (Audio::Dual, &["dual"]),
        (Audio::Japanese, &["japanese", "jap"]),
        (Audio::English, &["english", "eng"]),
        (Audio::Tamil, &["tamil"]),
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Audio::Multi => "multi",
            Audio::Dual => "dual",
            Audio::Japanese => "japanese",
            Audio::English => "english",
            Audio::Tamil => "tamil",
            Audio::Original => "original",
        }
    }
}

impl fmt::Display for Audio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Audio {
    type Err = UnknownTagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multi" => Ok(Audio::Multi),
            "dual" => Ok(Audio::Dual),
            "japanese" => Ok(Audio::Japanese),
            "english" => Ok(Audio::English),
            "tamil" => Ok(Audio::Tamil),
            "original" => Ok(Audio::Original),
            other => Err(UnknownTagError(other.to_string())),
        }
    }
}

/// A stored tag that doesn't name any known variant.
#[derive(Debug, Error)]
#[error("Unknown tag: {0}")]
pub struct UnknownTagError(pub String);

/// Structured description of one episode, as read from free-form text.
///
/// Carries no locator and no timestamps; the caller attaches those before
/// handing the descriptor to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeDescriptor {
    /// Normalized series name. May be empty.
    pub series_name: String,
    pub season: u32,
    pub episode: u32,
    pub quality: Quality,
    pub audio: Audio,
}

impl EpisodeDescriptor {
    /// Short `S01E02` code.
    pub fn code(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.episode)
    }
}
