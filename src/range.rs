//! Named lookback windows for progress aggregation.

use serde::{Serialize, Serializer};

/// A progress range: `7d`, `30d` or `6m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProgressRange {
    #[default]
    Week,
    Month,
    HalfYear,
}

impl ProgressRange {
    /// Recognized labels only.
    pub fn from_label(raw: &str) -> Option<Self> {
        match raw.trim() {
            "7d" => Some(Self::Week),
            "30d" => Some(Self::Month),
            "6m" => Some(Self::HalfYear),
            _ => None,
        }
    }

    /// Unrecognized labels fall back to `7d`.
    pub fn parse_lenient(raw: &str) -> Self {
        Self::from_label(raw).unwrap_or_else(|| {
            tracing::warn!(range = raw, "unrecognized progress range, using 7d");
            Self::Week
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Week => "7d",
            Self::Month => "30d",
            Self::HalfYear => "6m",
        }
    }

    /// Number of calendar days covered, ending at the reference day.
    pub fn days(self) -> usize {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::HalfYear => 180,
        }
    }
}

impl std::fmt::Display for ProgressRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ProgressRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
