//! Term codes for the catalog's `YYYYSS` scheme.
//!
//! The catalog identifies offering periods by a six-digit code: a four-digit
//! year followed by a two-digit season suffix (`10` = Fall, `20` = Spring,
//! `30` = Summer). Users type the short human form instead (`F21`, `Sp20`,
//! `Sm22`); this module converts between the two and renders display labels
//! like "Fall 2021".

use std::fmt;
use thiserror::Error;

/// Offering period within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Fall,
    Spring,
    Summer,
}

impl Season {
    /// The two-digit suffix the catalog uses in term codes.
    pub fn suffix(self) -> &'static str {
        match self {
            Season::Fall => "10",
            Season::Spring => "20",
            Season::Summer => "30",
        }
    }

    /// Display name, capitalized the way the catalog prints it.
    pub fn name(self) -> &'static str {
        match self {
            Season::Fall => "Fall",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Season> {
        match suffix {
            "10" => Some(Season::Fall),
            "20" => Some(Season::Spring),
            "30" => Some(Season::Summer),
            _ => None,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors from decoding term input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TermParseError {
    /// Input matches neither accepted shape (`F`+2 digits, `Sp`/`Sm`+2 digits).
    #[error("unrecognized term {0:?}; expected F, Sp, or Sm followed by a 2-digit year (e.g. F21)")]
    Shape(String),

    /// A six-digit code whose season suffix is outside the known table.
    #[error("unknown season suffix in term code {0:?}")]
    Suffix(String),
}

/// A resolved catalog term, e.g. Fall 2021 (`202110`).
///
/// Values are only constructed through [`TermCode::parse`] and
/// [`TermCode::from_code`], so the season is always one of the three the
/// catalog knows and rendering never fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TermCode {
    year: u16,
    season: Season,
}

impl TermCode {
    /// Parses the short human form: `F` plus a 2-digit year for Fall, `Sp` or
    /// `Sm` plus a 2-digit year for Spring/Summer. Case-insensitive;
    /// surrounding whitespace is ignored.
    ///
    /// Two-digit years are taken to be 20xx, matching the span of terms the
    /// catalog serves.
    pub fn parse(raw: &str) -> Result<TermCode, TermParseError> {
        let lower = raw.trim().to_ascii_lowercase();
        let shape_err = || TermParseError::Shape(raw.trim().to_string());

        let (season, digits) = match lower.len() {
            3 => match lower.strip_prefix('f') {
                Some(digits) => (Season::Fall, digits),
                None => return Err(shape_err()),
            },
            4 => {
                if let Some(digits) = lower.strip_prefix("sp") {
                    (Season::Spring, digits)
                } else if let Some(digits) = lower.strip_prefix("sm") {
                    (Season::Summer, digits)
                } else {
                    return Err(shape_err());
                }
            }
            _ => return Err(shape_err()),
        };

        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(shape_err());
        }
        let year: u16 = digits.parse().map_err(|_| shape_err())?;

        Ok(TermCode {
            year: 2000 + year,
            season,
        })
    }

    /// Decodes the catalog's six-digit numeric form (e.g. `202110`).
    pub fn from_code(raw: &str) -> Result<TermCode, TermParseError> {
        let trimmed = raw.trim();
        if trimmed.len() != 6 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TermParseError::Shape(trimmed.to_string()));
        }

        let year: u16 = trimmed[..4]
            .parse()
            .map_err(|_| TermParseError::Shape(trimmed.to_string()))?;
        let season = Season::from_suffix(&trimmed[4..])
            .ok_or_else(|| TermParseError::Suffix(trimmed.to_string()))?;

        Ok(TermCode { year, season })
    }

    /// The six-digit code used in catalog queries, e.g. `"202110"`.
    pub fn code(&self) -> String {
        format!("{:04}{}", self.year, self.season.suffix())
    }

    /// Human display label, e.g. `"Fall 2021"`.
    pub fn label(&self) -> String {
        format!("{} {}", self.season.name(), self.year)
    }

    /// The term's season.
    pub fn season(&self) -> Season {
        self.season
    }

    /// The term's four-digit year.
    pub fn year(&self) -> u16 {
        self.year
    }
}

impl fmt::Display for TermCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season.name(), self.year)
    }
}
