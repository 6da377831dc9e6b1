use serde::{Deserialize, Serialize};

use super::Cell;
use crate::leave::LeaveRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LeaveMarker {
    AfternoonLeave,
    ForenoonLeave,
    FullDayLeave,
    OtherLeave,
}

impl LeaveMarker {
    /// Maps a leave session tag. Unknown or empty tags are `OtherLeave`.
    pub fn from_session(session: &str) -> Self {
        match session {
            "AN" => Self::AfternoonLeave,
            "FN" => Self::ForenoonLeave,
            "Day" => Self::FullDayLeave,
            _ => Self::OtherLeave,
        }
    }

    /// Display token. `OtherLeave` has no fixed token; renderers pick one.
    pub fn token(self) -> Option<&'static str> {
        match self {
            Self::AfternoonLeave => Some("AN"),
            Self::ForenoonLeave => Some("FN"),
            Self::FullDayLeave => Some("DAY"),
            Self::OtherLeave => None,
        }
    }
}

/// Cell for `day`, overlaid with the first leave whose `date` equals it.
///
/// Records are matched on day of month only. Callers must scope `leaves`
/// to the displayed month and year beforehand, see
/// [`LeaveSource::records_for`](crate::source::LeaveSource::records_for).
pub fn resolve_day(day: u32, leaves: &[LeaveRecord]) -> Cell {
    match leaves.iter().find(|leave| leave.date == day) {
        Some(leave) => Cell::LeaveMarker(LeaveMarker::from_session(&leave.session)),
        None => Cell::Day(day),
    }
}
