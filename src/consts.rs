/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Days in a week, and therefore columns in every page
pub const DAYS_PER_WEEK: usize = 7;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Short English month labels, 1-indexed like `DAYS_IN_MONTH`
pub const MONTH_SHORT_NAMES: [&str; 13] = [
    "", "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: i32 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: i32 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: i32 = 400;

/// Days in one full 400-year Gregorian cycle
pub(crate) const DAYS_PER_ERA: i64 = 146_097;
/// Serial day number of 0000-03-01 relative to 1970-01-01
pub(crate) const ERA_EPOCH_SHIFT: i64 = 719_468;
/// 1970-01-01 was a Thursday
pub(crate) const EPOCH_WEEKDAY: i64 = 4;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';

/// Default fixed height of the weekday header row
pub const DEFAULT_HEADER_HEIGHT: f32 = 40.0;

/// Height of the month banner row shown above the weekday header
pub const MONTH_HEADER_EXTENT: f32 = 24.0;

/// Number of pages kept materialized around the current one
pub const WINDOW_SIZE: usize = 3;
