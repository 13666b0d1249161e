/// Maximum valid year (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

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

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Separator between the start and end year of a label (`2024-2025`)
pub const LABEL_SEPARATOR: char = '-';
/// Separator between date components of a `--today` override (`2025-05`)
pub const DATE_SEPARATOR: char = '-';

/// Header carrying the backend API key
pub const API_KEY_HEADER: &str = "x-api-key";
/// Header carrying the front-end application version
pub const APP_VERSION_HEADER: &str = "x-app-version";

/// Lookup endpoint listing the configured academic years
pub const DEFAULT_ACADEMIC_YEAR_PATH: &str = "/lookup/academic-years";
/// Request timeout used when none is configured
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Shown to the user when a failed fetch carries no server message
pub const FETCH_FAILED_MESSAGE: &str = "Failed to load academic years";
/// Placeholder option shown before anything is chosen
pub const PLACEHOLDER: &str = "Select academic year";
