//! Month calendar construction: day counts, first-weekday offset, leave
//! overlay and the Sunday-first week grid built from them.
//!
//! Everything here is pure. A [`Grid`] is rebuilt from scratch on every
//! call and inputs are never mutated.

mod month_length;
mod overlay;
mod weekday;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

pub use self::month_length::{days_in_month, is_leap_year};
pub use self::overlay::{LeaveMarker, resolve_day};
pub use self::weekday::{first_weekday_of_month, weekday_offset};
use crate::error::CalendarError;
use crate::leave::LeaveRecord;

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CalendarQuery {
    pub year: i64,
    pub month: u32,
}

impl CalendarQuery {
    pub fn new(year: i64, month: u32) -> Result<Self, CalendarError> {
        month_length::check_month(month)?;
        Ok(Self { year, month })
    }

    /// Moves by whole months, rolling the year over in both directions.
    pub fn shifted(self, months: i64) -> Self {
        let index = self
            .year
            .saturating_mul(12)
            .saturating_add(i64::from(self.month) - 1)
            .saturating_add(months);
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn contains(&self, leave: &LeaveRecord) -> bool {
        leave.is_in_month(self.year, self.month)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Cell {
    Blank,
    Day(u32),
    LeaveMarker(LeaveMarker),
}

impl Cell {
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Blank)
    }
}

pub type Row = Vec<Cell>;

/// Week rows of a month. Every row has seven cells except possibly the
/// last one, which is never padded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Row>,
    offset: u32,
}

impl Grid {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.rows.iter().flatten()
    }

    /// Blank cells before day 1.
    pub fn leading_blanks(&self) -> u32 {
        self.offset
    }

    pub fn day_cell_count(&self) -> usize {
        self.cells().filter(|cell| !cell.is_blank()).count()
    }

    /// Cell that holds `day`, whether plain or overlaid by a leave marker.
    pub fn cell_for_day(&self, day: u32) -> Option<&Cell> {
        if day == 0 {
            return None;
        }
        let index = self.offset as usize + day as usize - 1;
        self.cells().nth(index).filter(|cell| !cell.is_blank())
    }
}

#[tracing::instrument(skip(leaves), fields(leaves = leaves.len()))]
pub fn build_grid(query: &CalendarQuery, leaves: &[LeaveRecord]) -> Result<Grid, CalendarError> {
    let offset = weekday_offset(query.month, query.year)?;
    let days = days_in_month(query.month, query.year)?;

    let mut cells = Vec::with_capacity(offset as usize + days as usize);
    cells.extend((0..offset).map(|_| Cell::Blank));

    if leaves.is_empty() {
        trace!("no leaves; emitting plain days");
        cells.extend((1..=days).map(Cell::Day));
    } else {
        cells.extend((1..=days).map(|day| resolve_day(day, leaves)));
    }

    let rows: Vec<Row> = cells.chunks(DAYS_PER_WEEK).map(<[Cell]>::to_vec).collect();

    debug!(offset, days, rows = rows.len(), "built calendar grid");
    Ok(Grid { rows, offset })
}
