//! Date arithmetic for the outfit calendar.

use chrono::NaiveDate;

use crate::error::CoreError;

/// First and last day of the given month, inclusive.
///
/// The month view queries entries with `entry_date BETWEEN first AND last`,
/// so both bounds land inside the month.
pub fn month_range(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        CoreError::Validation(format!("Invalid calendar month: {year}-{month}"))
    })?;
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| CoreError::Validation(format!("Invalid calendar month: {year}-{month}")))?;
    let last = next_month.pred_opt().ok_or_else(|| {
        CoreError::Validation(format!("Invalid calendar month: {year}-{month}"))
    })?;
    Ok((first, last))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
