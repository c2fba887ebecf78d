//! Pixel points and colors as they appear in annotation files.

use serde::{Deserialize, Serialize};

/// A pixel coordinate pair from a `P=<x>,<y>` line.
///
/// A coordinate that failed to parse is `None`. Such a point is kept in its
/// record so that point counts stay faithful to the file, but every derived
/// metric treats it as missing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: Option<i64>,
    pub y: Option<i64>,
}

impl Point {
    /// Creates a point from two parsed coordinates.
    #[inline]
    pub fn new(x: i64, y: i64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
        }
    }

    /// Returns true if both coordinates parsed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some()
    }

    /// The vertical coordinate as a float, if present.
    #[inline]
    pub fn y_f64(&self) -> Option<f64> {
        self.y.map(|y| y as f64)
    }
}

/// A cosmetic RGBA color from a `C=<r>,<g>,<b>,<a>` line.
///
/// Components are stored as parsed; nothing downstream reads them.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: Option<i64>,
    pub g: Option<i64>,
    pub b: Option<i64>,
    pub a: Option<i64>,
}
