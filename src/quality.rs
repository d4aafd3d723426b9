//! Quality preference and stream variant selection.
//!
//! Pages embed a list of progressive variants, each a loose JSON object
//! carrying a `height` and/or a textual `quality` label plus a `url`.
//! [`select`] orders the variants by a derived rank and picks one according
//! to a [`QualityPreference`].

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

static DIGITS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

/// Which of the available variants to resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(into = "String")]
pub enum QualityPreference {
    /// Smallest rank.
    Lowest,
    /// Element at index `len / 2` of the ascending order.
    Medium,
    /// Largest rank.
    #[default]
    Highest,
}

impl QualityPreference {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lowest => "lowest",
            Self::Medium => "medium",
            Self::Highest => "highest",
        }
    }

    /// Parse a preference token. Unknown tokens fall back to [`Self::Highest`].
    pub fn parse_lenient(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "lowest" => Self::Lowest,
            "medium" => Self::Medium,
            "highest" => Self::Highest,
            other => {
                tracing::debug!(token = other, "Unknown quality preference, using highest");
                Self::Highest
            }
        }
    }
}

impl FromStr for QualityPreference {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_lenient(s))
    }
}

/// Any JSON value is accepted: strings go through [`QualityPreference::parse_lenient`],
/// everything else (including `null`) means highest.
impl<'de> Deserialize<'de> for QualityPreference {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(token) => Self::parse_lenient(&token),
            other => {
                tracing::debug!(value = %other, "Non-string quality preference, using highest");
                Self::Highest
            }
        })
    }
}

impl From<QualityPreference> for String {
    fn from(value: QualityPreference) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for QualityPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One candidate stream as found in page metadata.
///
/// All attributes are best-effort; the raw object is kept so unknown keys
/// survive untouched.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(transparent)]
pub struct StreamDescriptor {
    attrs: Map<String, Value>,
}

impl StreamDescriptor {
    /// Numeric rank used for ordering.
    ///
    /// An integer `height` wins (values beyond `i64::MAX` saturate).
    /// Otherwise the first run of ASCII digits in the `quality` label is
    /// used (`"720p"` -> 720), else 0.
    pub fn rank(&self) -> i64 {
        if let Some(height) = self.attrs.get("height") {
            if let Some(height) = height.as_i64() {
                return height;
            }
            if height.as_u64().is_some() {
                return i64::MAX;
            }
        }

        let label = match self.attrs.get("quality") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => return 0,
        };

        DIGITS
            .find(&label)
            // Digit runs too long for i64 saturate instead of collapsing to 0
            .map_or(0, |m| m.as_str().parse::<i64>().unwrap_or(i64::MAX))
    }

    /// The stream URL, if present as a non-empty string.
    pub fn url(&self) -> Option<&str> {
        self.attrs
            .get("url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
    }
}

/// Pick one descriptor by preference.
///
/// Descriptors are sorted ascending by [`StreamDescriptor::rank`] with a
/// stable sort, so equal ranks keep their page order. Returns `None` only for
/// an empty input; the chosen descriptor may still lack a URL.
pub fn select(
    streams: &[StreamDescriptor],
    preference: QualityPreference,
) -> Option<&StreamDescriptor> {
    if streams.is_empty() {
        return None;
    }

    let mut sorted: Vec<&StreamDescriptor> = streams.iter().collect();
    sorted.sort_by_key(|stream| stream.rank());

    let index = match preference {
        QualityPreference::Lowest => 0,
        QualityPreference::Medium => sorted.len() / 2,
        QualityPreference::Highest => sorted.len() - 1,
    };

    Some(sorted[index])
}
