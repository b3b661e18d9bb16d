use crate::ParseError;

/// Error type for invalid calendar configuration or page geometry.
///
/// Navigation and date resolution never fail; only the inputs that set a
/// calendar up can be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigurationError {
    /// A page needs at least one body row.
    #[error("Invalid row count: a page needs at least one week row")]
    ZeroRows,

    /// The extent to lay out is negative, infinite or NaN.
    #[error("Invalid total extent: {0} (must be finite and non-negative)")]
    InvalidExtent(f32),

    /// A fixed header height is negative, infinite or NaN.
    #[error("Invalid header height: {0} (must be finite and non-negative)")]
    InvalidHeaderHeight(f32),

    /// Header rows would leave negative room for the body rows.
    #[error("Header rows need {headers} but the page is only {total} tall")]
    HeadersExceedExtent { headers: f32, total: f32 },

    /// A cell index past the last cell of the page.
    #[error("Cell index {index} is outside the page ({cell_count} cells)")]
    IndexOutOfRange { index: usize, cell_count: usize },

    /// Malformed date components.
    #[error(transparent)]
    Parse(#[from] ParseError),
}
