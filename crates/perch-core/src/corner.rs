#![forbid(unsafe_code)]

//! Screen corners used as independent stacking lanes.

use std::fmt;
use std::str::FromStr;

/// One of the four screen corners a notification can be anchored to.
///
/// Each corner is an independent stacking lane: notifications only stack
/// against other notifications in the same corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "kebab-case"))]
pub enum Corner {
    /// Top-left corner.
    TopLeft,
    /// Top-right corner.
    TopRight,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom-right corner (default).
    #[default]
    BottomRight,
}

impl Corner {
    /// All corners, in ledger slot order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::TopRight,
        Corner::BottomLeft,
        Corner::BottomRight,
    ];

    /// Whether the corner hugs the right screen edge.
    #[inline]
    #[must_use]
    pub const fn is_right(self) -> bool {
        matches!(self, Corner::TopRight | Corner::BottomRight)
    }

    /// Whether the corner hugs the bottom screen edge.
    #[inline]
    #[must_use]
    pub const fn is_bottom(self) -> bool {
        matches!(self, Corner::BottomLeft | Corner::BottomRight)
    }

    /// Dense index into per-corner tables.
    #[inline]
    pub(crate) const fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::TopRight => 1,
            Corner::BottomLeft => 2,
            Corner::BottomRight => 3,
        }
    }

    /// Stable kebab-case name, as used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Corner::TopLeft => "top-left",
            Corner::TopRight => "top-right",
            Corner::BottomLeft => "bottom-left",
            Corner::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Corner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string does not name a corner.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown corner `{0}` (expected top-left, top-right, bottom-left or bottom-right)")]
pub struct ParseCornerError(String);

impl FromStr for Corner {
    type Err = ParseCornerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        Corner::ALL
            .into_iter()
            .find(|corner| corner.as_str() == normalized)
            .ok_or_else(|| ParseCornerError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edges_match_corner_names() {
        assert!(Corner::TopRight.is_right());
        assert!(Corner::BottomRight.is_right());
        assert!(!Corner::TopLeft.is_right());
        assert!(!Corner::BottomLeft.is_right());

        assert!(Corner::BottomLeft.is_bottom());
        assert!(Corner::BottomRight.is_bottom());
        assert!(!Corner::TopLeft.is_bottom());
        assert!(!Corner::TopRight.is_bottom());
    }

    #[test]
    fn indices_are_dense_and_unique() {
        let mut seen = [false; 4];
        for corner in Corner::ALL {
            assert!(!seen[corner.index()], "duplicate index for {corner}");
            seen[corner.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn parse_accepts_display_and_snake_forms() {
        for corner in Corner::ALL {
            assert_eq!(corner.to_string().parse::<Corner>(), Ok(corner));
        }
        assert_eq!("Bottom_Right".parse::<Corner>(), Ok(Corner::BottomRight));
        assert_eq!(" top-left ".parse::<Corner>(), Ok(Corner::TopLeft));
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = "middle".parse::<Corner>().unwrap_err();
        assert!(err.to_string().contains("middle"));
    }
}
