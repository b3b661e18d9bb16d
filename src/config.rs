use serde::{Deserialize, Serialize};

use crate::{ConfigurationError, HeaderSize, YearMonth, YearMonthDay, today};

/// Axis along which pages are swiped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Horizontal,
    #[default]
    Vertical,
}

/// Calendar settings, fixed for the lifetime of a controller.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarConfig {
    /// Start every week row on Monday instead of Sunday.
    #[serde(default)]
    pub start_with_monday: bool,

    /// Paging axis.
    #[serde(default)]
    pub orientation: Orientation,

    /// Weekday header height policy.
    #[serde(default)]
    pub header_size: HeaderSize,

    /// Date whose month is shown first. Today when unset.
    #[serde(default)]
    pub initial_date: Option<YearMonthDay>,
}

impl CalendarConfig {
    /// # Errors
    /// Returns `ConfigurationError::InvalidHeaderHeight` for an unusable
    /// fixed header height.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.header_size.validate()
    }

    /// Month of `initial_date`, or the current month.
    pub fn initial_anchor(&self) -> YearMonth {
        self.initial_date.unwrap_or_else(today).year_month()
    }
}
