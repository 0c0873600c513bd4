//! Response types for the catalog's OData endpoints.
//!
//! Field names on the wire are PascalCase; everything here is deserialized
//! with `rename` so the rest of the crate sees ordinary Rust naming. Nested
//! collections (`Classes`, `Sections`, `Meetings`) default to empty because
//! they only appear when the corresponding `$expand` was requested.

use crate::duration::parse_duration;
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fmt;

/// Top-level shape of every collection answer: the records live in a
/// `value` array. A response without it fails deserialization and surfaces
/// as a malformed-catalog error.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub value: Vec<T>,
}

/// A subject record, e.g. `CS` / "Computer Science".
#[derive(Debug, Clone, Deserialize)]
pub struct Subject {
    #[serde(rename = "Abbreviation")]
    pub abbreviation: String,

    #[serde(rename = "Name")]
    pub name: Option<String>,
}

/// A course record, optionally expanded with the classes offered in the
/// queried term. Cross-listed offerings appear as separate `Course` records
/// sharing one `number`.
#[derive(Debug, Clone, Deserialize)]
pub struct Course {
    #[serde(rename = "Number")]
    pub number: String,

    #[serde(rename = "Title")]
    pub title: String,

    #[serde(rename = "CreditHours")]
    pub credit_hours: Option<f64>,

    #[serde(rename = "Classes", default)]
    pub classes: Vec<ClassRecord>,
}

impl Course {
    /// True if the course has at least one schedulable section in the
    /// queried term. The underlying query returns subject-wide course
    /// records regardless of term, so display and selection both filter
    /// on this.
    pub fn is_offered(&self) -> bool {
        self.classes.iter().any(|class| !class.sections.is_empty())
    }

    /// Every section of every class of this course, in catalog order.
    pub fn sections(&self) -> impl Iterator<Item = &Section> {
        self.classes.iter().flat_map(|class| class.sections.iter())
    }
}

/// One scheduled class of a course within a term.
#[derive(Debug, Clone, Deserialize)]
pub struct ClassRecord {
    #[serde(rename = "Sections", default)]
    pub sections: Vec<Section>,
}

/// One schedulable section of a class, carrying its own seat count.
#[derive(Debug, Clone, Deserialize)]
pub struct Section {
    #[serde(rename = "Crn")]
    pub crn: String,

    #[serde(rename = "RemainingSpace")]
    pub remaining_space: i64,

    #[serde(rename = "Meetings", default)]
    pub meetings: Vec<Meeting>,
}

impl Section {
    /// The section's primary meeting, which carries its type, days, and
    /// timeslot. Sections without meetings exist (e.g. asynchronous ones).
    pub fn first_meeting(&self) -> Option<&Meeting> {
        self.meetings.first()
    }
}

/// A meeting of a section: what kind, which days, and when.
#[derive(Debug, Clone, Deserialize)]
pub struct Meeting {
    #[serde(rename = "Type")]
    pub kind: Option<String>,

    #[serde(rename = "DaysOfWeek")]
    pub days_of_week: Option<String>,

    /// Wall-clock start, `2021-08-23T14:30:00Z` style.
    #[serde(rename = "StartTime")]
    pub start_time: Option<String>,

    /// ISO-8601 duration string, `PT50M` style.
    #[serde(rename = "Duration")]
    pub duration: Option<String>,
}

impl Meeting {
    /// Computes the meeting's display timeslot from its start time plus its
    /// duration. Returns `None` whenever either half is absent or fails to
    /// parse; callers render a "time unknown" placeholder instead of
    /// dropping the section.
    pub fn display_window(&self) -> Option<DisplayWindow> {
        let start = parse_start_time(self.start_time.as_deref()?)?;
        let span = parse_duration(self.duration.as_deref()?).ok()?;
        let end = start.checked_add_signed(span)?;

        Some(DisplayWindow {
            start_label: format_clock(start),
            end_label: format_clock(end),
        })
    }
}

/// A rendered meeting timeslot in 12-hour clock form. Derived fresh on
/// every display, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayWindow {
    pub start_label: String,
    pub end_label: String,
}

impl fmt::Display for DisplayWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.start_label, self.end_label)
    }
}

/// Parses the catalog's start-time string as wall-clock time. The usual
/// shape is RFC 3339 with a `Z`; older records omit the suffix.
fn parse_start_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(with_offset) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(with_offset.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").ok()
}

fn format_clock(at: NaiveDateTime) -> String {
    at.format("%I:%M %p").to_string()
}
