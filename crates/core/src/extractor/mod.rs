//! Episode metadata extraction from file names and captions.
//!
//! The extractor is a pure function: it reads one piece of free-form text and
//! either produces an [`EpisodeDescriptor`] or reports that the text doesn't
//! describe an episode (`None`). It performs no I/O and holds no state.
//!
//! The `S<digits>E<digits>` marker is the hard gate: everything before it is
//! the series name, everything after it is discarded. Quality and audio are
//! priority-ordered substring scans, first matching category wins.

mod types;

pub use types::*;

use once_cell::sync::Lazy;
use regex_lite::Regex;
use tracing::trace;

/// Bracketed runs such as `[Group]` or `[Dual Audio]`.
static BRACKETED_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());

/// Container extension at the end of the text.
static EXTENSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.(?:mkv|mp4|avi|flv|webm)\s*$").unwrap());

/// Season/episode marker: S1E1, S01E01, s2e110 ...
static SEASON_EPISODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)S(\d+)E(\d+)").unwrap());

/// Characters stripped from the end of a series name. Besides plain and
/// typographic dashes this covers the pieces of a UTF-8 en dash that was
/// decoded as cp1252 (`â€“`).
const TRAILING_SEPARATORS: &[char] = &['-', '\u{2013}', '\u{2014}', 'â', '€', '\u{201C}'];

/// Extract an episode descriptor from a file name and its caption.
///
/// A non-empty caption is parsed instead of the file name; the two are never
/// merged. Returns `None` when the chosen text is empty or carries no
/// season/episode marker.
pub fn extract(filename: &str, caption: &str) -> Option<EpisodeDescriptor> {
    let source = if caption.is_empty() { filename } else { caption };
    if source.is_empty() {
        return None;
    }

    let without_brackets = BRACKETED_RE.replace_all(source, "");
    let cleaned = EXTENSION_RE.replace(&without_brackets, "");

    let Some(captures) = SEASON_EPISODE_RE.captures(&cleaned) else {
        trace!(text = source, "no season/episode marker");
        return None;
    };
    let marker = captures.get(0)?;
    let season: u32 = captures[1].parse().ok()?;
    let episode: u32 = captures[2].parse().ok()?;

    let series_name = normalize_series_name(&cleaned[..marker.start()]);

    Some(EpisodeDescriptor {
        series_name,
        season,
        episode,
        quality: detect_quality(source),
        audio: detect_audio(source),
    })
}

/// Turn the raw text preceding the marker into a display name.
fn normalize_series_name(raw: &str) -> String {
    let spaced = raw.replace(['.', '_'], " ");
    spaced
        .trim()
        .trim_end_matches(TRAILING_SEPARATORS)
        .trim()
        .to_string()
}

/// Quality tags are matched literally; bracketed tags count.
fn detect_quality(text: &str) -> Quality {
    Quality::PRIORITY
        .into_iter()
        .find(|quality| text.contains(quality.as_str()))
        .unwrap_or(Quality::Unknown)
}

fn detect_audio(text: &str) -> Audio {
    let lower = text.to_lowercase();
    Audio::PRIORITY
        .iter()
        .find(|(_, needles)| needles.iter().any(|needle| lower.contains(needle)))
        .map(|(audio, _)| *audio)
        .unwrap_or(Audio::Original)
}
