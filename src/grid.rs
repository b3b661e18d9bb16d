//! Flat cell index to date mapping.
//!
//! A page is a row-major grid of `DAYS_PER_WEEK` columns. From the top:
//! an optional month banner row (banner in column 0, fillers after it), an
//! optional weekday header row, then the body rows holding one day each.

use crate::layout::PageLayout;
use crate::{ConfigurationError, DAYS_PER_WEEK, Week, YearMonth, YearMonthDay};

/// Date shown at body index `flat_index` of the page for `anchor`.
///
/// The 1st of the month sits at the column of its weekday; earlier indices
/// resolve to the tail of the previous month and indices past the month's
/// last day to the head of the next one. Every index maps to a date, and
/// consecutive indices map to consecutive days.
pub fn cell_to_date(flat_index: usize, anchor: YearMonth, start_with_monday: bool) -> YearMonthDay {
    let offset = anchor.offset(start_with_monday) as i64;
    anchor
        .first_day()
        .add_days(flat_index as i64 - offset)
        .with_focus(anchor)
}

/// Weekday labelling header column `column_index`.
///
/// Sunday leads unless `start_with_monday`, in which case Monday leads and
/// Sunday closes the row. Columns past the row wrap around.
pub const fn header_slot(column_index: usize, start_with_monday: bool) -> Week {
    if start_with_monday {
        Week::from_ordinal(column_index + 1)
    } else {
        Week::from_ordinal(column_index)
    }
}

/// What occupies one position of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellSlot {
    /// The banner naming the page's month, first cell of the banner row.
    MonthHeader(YearMonth),
    /// Empty remainder of the banner row.
    MonthHeaderFiller,
    /// Weekday label.
    Header(Week),
    /// A day, possibly spilling over from a neighbouring month.
    Day(YearMonthDay),
}

impl CellSlot {
    pub const fn date(self) -> Option<YearMonthDay> {
        match self {
            Self::Day(date) => Some(date),
            Self::MonthHeader(_) | Self::MonthHeaderFiller | Self::Header(_) => None,
        }
    }

    pub const fn is_header(self) -> bool {
        !matches!(self, Self::Day(_))
    }
}

/// The geometry of one month page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalendarPage {
    anchor: YearMonth,
    start_with_monday: bool,
    row_count: usize,
    layout: PageLayout,
}

impl CalendarPage {
    /// A page for `anchor` with just enough body rows for its days.
    pub const fn new(anchor: YearMonth, start_with_monday: bool, layout: PageLayout) -> Self {
        Self {
            anchor,
            start_with_monday,
            row_count: anchor.row_count(start_with_monday),
            layout,
        }
    }

    pub const fn anchor(&self) -> YearMonth {
        self.anchor
    }

    pub const fn start_with_monday(&self) -> bool {
        self.start_with_monday
    }

    /// Body (week) rows.
    pub const fn row_count(&self) -> usize {
        self.row_count
    }

    pub const fn column_count(&self) -> usize {
        DAYS_PER_WEEK
    }

    pub const fn layout(&self) -> PageLayout {
        self.layout
    }

    /// Rows of every kind, headers included.
    pub const fn total_rows(&self) -> usize {
        self.layout.header_rows() + self.row_count
    }

    pub const fn cell_count(&self) -> usize {
        self.total_rows() * DAYS_PER_WEEK
    }

    /// Index of the first body cell.
    pub const fn body_start(&self) -> usize {
        self.layout.header_rows() * DAYS_PER_WEEK
    }

    /// Resolves a page index, or `None` past the last cell.
    pub fn slot(&self, index: usize) -> Option<CellSlot> {
        let mut index = index;
        if self.layout.month_header {
            if index < DAYS_PER_WEEK {
                return Some(if index == 0 {
                    CellSlot::MonthHeader(self.anchor)
                } else {
                    CellSlot::MonthHeaderFiller
                });
            }
            index -= DAYS_PER_WEEK;
        }
        if self.layout.header.is_some() {
            if index < DAYS_PER_WEEK {
                return Some(CellSlot::Header(header_slot(index, self.start_with_monday)));
            }
            index -= DAYS_PER_WEEK;
        }
        (index < self.row_count * DAYS_PER_WEEK)
            .then(|| CellSlot::Day(cell_to_date(index, self.anchor, self.start_with_monday)))
    }

    /// Every cell of the page with its index, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, CellSlot)> + '_ {
        (0..self.cell_count()).filter_map(|index| self.slot(index).map(|slot| (index, slot)))
    }

    /// Every day of the page, spillover days included.
    pub fn days(&self) -> impl Iterator<Item = YearMonthDay> + '_ {
        (0..self.row_count * DAYS_PER_WEEK)
            .map(|index| cell_to_date(index, self.anchor, self.start_with_monday))
    }

    /// Page index showing `date`, if the page shows it at all.
    pub fn day_index_of(&self, date: YearMonthDay) -> Option<usize> {
        let first_shown = cell_to_date(0, self.anchor, self.start_with_monday);
        let distance = usize::try_from(date.to_days() - first_shown.to_days()).ok()?;
        (distance < self.row_count * DAYS_PER_WEEK).then(|| self.body_start() + distance)
    }

    /// Extent of the row holding `index` when the page is `total_extent` tall.
    ///
    /// # Errors
    /// See [`PageLayout::row_extents`]; also fails for an index past the page.
    pub fn cell_extent(&self, index: usize, total_extent: f32) -> Result<f32, ConfigurationError> {
        self.layout.cell_extent(index, total_extent, self.row_count)
    }

    /// Extents of every row, headers first.
    ///
    /// # Errors
    /// See [`PageLayout::row_extents`].
    pub fn row_extents(&self, total_extent: f32) -> Result<Vec<f32>, ConfigurationError> {
        self.layout.row_extents(total_extent, self.row_count)
    }
}
