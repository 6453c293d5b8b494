//! Serial number parsing and formatting.
//!
//! Serial numbers are human-facing sequential identifiers of the form
//! `YYYY-N-NNNN`. The numeric suffix is zero-padded to four digits and
//! widens naturally once a year crosses 9999 issuances; there is no
//! overflow error.

/// Width the numeric suffix is zero-padded to.
pub const SERIAL_PAD_WIDTH: usize = 4;

/// Format a serial number for the given year and sequence number.
///
/// ```
/// use receipt_cloud_core::format_serial;
/// assert_eq!(format_serial(2026, 7), "2026-N-0007");
/// assert_eq!(format_serial(2026, 12345), "2026-N-12345");
/// ```
#[must_use]
pub fn format_serial(year: i32, number: u64) -> String {
    format!("{year}-N-{number:0width$}", width = SERIAL_PAD_WIDTH)
}

/// The `like` prefix matching every serial issued in `year`.
#[must_use]
pub fn year_prefix(year: i32) -> String {
    format!("{year}-N-")
}

/// Extract the trailing decimal group of a serial number, if any.
///
/// Mirrors a trailing-digits match: `"2026-N-0042"` yields `Some(42)`,
/// a serial with no trailing digits yields `None`. Suffixes too large for
/// `u64` also yield `None` rather than panicking.
#[must_use]
pub fn trailing_number(serial: &str) -> Option<u64> {
    let count = serial
        .chars()
        .rev()
        .take_while(char::is_ascii_digit)
        .count();
    if count == 0 {
        return None;
    }
    // ASCII digits are one byte each, so this slice is on a char boundary.
    serial[serial.len() - count..].parse().ok()
}
