//! Row extents of a page.
//!
//! Extents are in whatever unit the caller measures the container in. The
//! row extents of a page always add up to the extent it was given.

use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, DAYS_PER_WEEK, DEFAULT_HEADER_HEIGHT, MONTH_HEADER_EXTENT};

/// How tall the weekday header row is.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderSize {
    /// The header row collapses to nothing.
    Zero,
    /// The header row is as tall as one body row would be with one extra row.
    Ratio,
    /// The header row has a fixed height.
    FixHeight(f32),
}

impl Default for HeaderSize {
    fn default() -> Self {
        Self::FixHeight(DEFAULT_HEADER_HEIGHT)
    }
}

impl HeaderSize {
    /// Checks that a fixed height is usable.
    ///
    /// # Errors
    /// Returns `ConfigurationError::InvalidHeaderHeight` for a negative or
    /// non-finite fixed height.
    pub fn validate(self) -> Result<(), ConfigurationError> {
        match self {
            Self::FixHeight(value) if !value.is_finite() || value < 0.0 => {
                Err(ConfigurationError::InvalidHeaderHeight(value))
            }
            Self::Zero | Self::Ratio | Self::FixHeight(_) => Ok(()),
        }
    }

    /// Header row extent for a page `total_extent` tall with `row_count` body rows.
    ///
    /// # Errors
    /// Returns `ConfigurationError` for zero rows or an invalid fixed height.
    pub fn extent(self, total_extent: f32, row_count: usize) -> Result<f32, ConfigurationError> {
        if row_count == 0 {
            return Err(ConfigurationError::ZeroRows);
        }
        self.validate()?;
        Ok(match self {
            Self::Zero => 0.0,
            Self::Ratio => total_extent / (row_count + 1) as f32,
            Self::FixHeight(value) => value,
        })
    }
}

/// Which header rows a page has.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PageLayout {
    /// Weekday header row and its size, `None` for no header row.
    pub header: Option<HeaderSize>,
    /// Month banner row above the weekday header.
    pub month_header: bool,
}

impl PageLayout {
    /// Body rows only.
    pub const fn plain() -> Self {
        Self {
            header: None,
            month_header: false,
        }
    }

    /// Month banner and weekday header, the header sized by `header_size`.
    pub const fn with_headers(header_size: HeaderSize) -> Self {
        Self {
            header: Some(header_size),
            month_header: true,
        }
    }

    pub const fn header_rows(&self) -> usize {
        self.month_header as usize + self.header.is_some() as usize
    }

    /// Row of a page index, whatever the row holds.
    pub const fn row_of(&self, index: usize, row_count: usize) -> Option<usize> {
        let row = index / DAYS_PER_WEEK;
        if row < self.header_rows() + row_count {
            Some(row)
        } else {
            None
        }
    }

    /// Extents of every row, top to bottom: banner, weekday header, body rows.
    ///
    /// Body rows share what the headers leave; the last body row takes the
    /// rounding remainder so the extents sum to `total_extent`.
    ///
    /// # Errors
    /// Returns `ConfigurationError` when `row_count` is zero, `total_extent` is
    /// negative or not finite, the fixed header height is invalid, or the
    /// header rows alone are taller than `total_extent`.
    pub fn row_extents(
        &self,
        total_extent: f32,
        row_count: usize,
    ) -> Result<Vec<f32>, ConfigurationError> {
        if row_count == 0 {
            return Err(ConfigurationError::ZeroRows);
        }
        if !total_extent.is_finite() || total_extent < 0.0 {
            return Err(ConfigurationError::InvalidExtent(total_extent));
        }

        let banner = if self.month_header {
            Some(MONTH_HEADER_EXTENT)
        } else {
            None
        };
        let header = self
            .header
            .map(|size| size.extent(total_extent, row_count))
            .transpose()?;
        let headers = banner.unwrap_or(0.0) + header.unwrap_or(0.0);
        if headers > total_extent {
            return Err(ConfigurationError::HeadersExceedExtent {
                headers,
                total: total_extent,
            });
        }

        let body = (total_extent - headers) / row_count as f32;
        let mut rows = Vec::with_capacity(self.header_rows() + row_count);
        rows.extend(banner);
        rows.extend(header);
        rows.extend(std::iter::repeat_n(body, row_count - 1));
        let placed: f32 = rows.iter().sum();
        rows.push(total_extent - placed);
        Ok(rows)
    }

    /// Extent of the row holding page index `index`.
    ///
    /// # Errors
    /// As [`Self::row_extents`], plus `ConfigurationError::IndexOutOfRange`
    /// for an index past the last cell.
    pub fn cell_extent(
        &self,
        index: usize,
        total_extent: f32,
        row_count: usize,
    ) -> Result<f32, ConfigurationError> {
        let rows = self.row_extents(total_extent, row_count)?;
        self.row_of(index, row_count)
            .and_then(|row| rows.get(row).copied())
            .ok_or(ConfigurationError::IndexOutOfRange {
                index,
                cell_count: rows.len() * DAYS_PER_WEEK,
            })
    }
}

/// Extent of the row holding page index `index`.
///
/// `header` is `None` when the page has no weekday header row. With a month
/// banner the banner row comes first and takes `MONTH_HEADER_EXTENT`.
///
/// # Errors
/// See [`PageLayout::cell_extent`].
pub fn cell_extent(
    index: usize,
    total_extent: f32,
    row_count: usize,
    header: Option<HeaderSize>,
    has_month_header: bool,
) -> Result<f32, ConfigurationError> {
    PageLayout {
        header,
        month_header: has_month_header,
    }
    .cell_extent(index, total_extent, row_count)
}
