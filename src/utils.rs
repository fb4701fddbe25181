use chrono::NaiveDate;

/// Bounds for the year query parameter on calendar-scoped listings.
pub const MIN_QUERY_YEAR: i32 = 2023;
pub const MAX_QUERY_YEAR: i32 = 2050;

/// Half-open date range covering one calendar month.
pub fn month_range(year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
    let start = NaiveDate::from_ymd_opt(year, month, 1)?;
    let end = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };

    Some((start, end))
}
