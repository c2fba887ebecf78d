//! FDI tooth numbering and dental arches.
//!
//! Tooth numbers are kept as a newtype so they cannot be confused with
//! coordinates or counts. Any integer is representable; membership in the
//! permanent-dentition FDI set is checked separately so that documents with
//! unusual numbers still parse.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maxillary teeth in chart order: right third molar to left third molar.
pub const MAXILLARY_ORDER: [u8; 16] = [
    18, 17, 16, 15, 14, 13, 12, 11, 21, 22, 23, 24, 25, 26, 27, 28,
];

/// Mandibular teeth in chart order: right third molar to left third molar.
pub const MANDIBULAR_ORDER: [u8; 16] = [
    48, 47, 46, 45, 44, 43, 42, 41, 31, 32, 33, 34, 35, 36, 37, 38,
];

/// A tooth number in FDI two-digit notation (quadrant digit + position digit).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToothNumber(pub i64);

impl ToothNumber {
    /// Creates a new ToothNumber.
    #[inline]
    pub fn new(number: i64) -> Self {
        Self(number)
    }

    /// Returns the underlying integer.
    #[inline]
    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns true if this is one of the 32 permanent teeth
    /// (11-18, 21-28, 31-38, 41-48).
    pub fn is_fdi(&self) -> bool {
        let quadrant = self.0 / 10;
        let position = self.0 % 10;
        (1..=4).contains(&quadrant) && (1..=8).contains(&position)
    }

    /// The arch this tooth belongs to, or `None` outside the FDI set.
    pub fn arch(&self) -> Option<Arch> {
        if !self.is_fdi() {
            return None;
        }
        match self.0 / 10 {
            1 | 2 => Some(Arch::Maxillary),
            _ => Some(Arch::Mandibular),
        }
    }
}

impl fmt::Debug for ToothNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ToothNumber({})", self.0)
    }
}

impl fmt::Display for ToothNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ToothNumber {
    fn from(number: i64) -> Self {
        ToothNumber::new(number)
    }
}

/// One half of the dentition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    /// Upper jaw.
    Maxillary,
    /// Lower jaw.
    Mandibular,
}

impl Arch {
    /// The fixed 16-tooth chart order for this arch.
    pub fn teeth(&self) -> impl Iterator<Item = ToothNumber> {
        let order = match self {
            Arch::Maxillary => &MAXILLARY_ORDER,
            Arch::Mandibular => &MANDIBULAR_ORDER,
        };
        order.iter().map(|&n| ToothNumber::new(i64::from(n)))
    }

    /// Lowercase display name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arch::Maxillary => "maxillary",
            Arch::Mandibular => "mandibular",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
