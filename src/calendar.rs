use chrono::{Days, Months, NaiveDate};

/// Last calendar day of the given month.
///
/// Steps to the first day of the following month and backs up one day, so
/// month lengths and leap years come out of the calendar rules instead of a
/// days-per-month table. `None` only when (year, month) does not name a
/// calendar month, e.g. a month of 0 from a defaulted settings field.
pub fn end_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.checked_add_months(Months::new(1)))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
}
