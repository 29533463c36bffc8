use chrono::{
  Datelike,
  Duration,
  NaiveDate
};

pub const MONTH_NAMES: [&str; 12] = [
  "January",
  "February",
  "March",
  "April",
  "May",
  "June",
  "July",
  "August",
  "September",
  "October",
  "November",
  "December"
];

pub const WEEKDAY_LABELS: [&str; 7] = [
  "Sun", "Mon", "Tue", "Wed", "Thu",
  "Fri", "Sat"
];

pub fn month_name(
  month: u32
) -> &'static str {
  month
    .checked_sub(1)
    .and_then(|idx| {
      MONTH_NAMES.get(idx as usize)
    })
    .copied()
    .unwrap_or("")
}

/// `2024-05-10`
#[must_use]
pub fn format_iso(
  date: NaiveDate
) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn parse_iso(
  raw: &str
) -> Option<NaiveDate> {
  NaiveDate::parse_from_str(
    raw.trim(),
    "%Y-%m-%d"
  )
  .ok()
}

/// `May 10, 2024`
#[must_use]
pub fn format_display(
  date: NaiveDate
) -> String {
  date.format("%b %-d, %Y").to_string()
}

/// Moves `months` calendar months away
/// from `date`. The day of month is kept
/// when the target month has it and is
/// clamped to the month's last day
/// otherwise.
#[must_use]
pub fn shift_months(
  date: NaiveDate,
  months: i32
) -> NaiveDate {
  let index = date.year() as i64 * 12
    + date.month0() as i64
    + months as i64;
  let year = index.div_euclid(12) as i32;
  let month =
    index.rem_euclid(12) as u32 + 1;

  let day = date
    .day()
    .min(days_in_month(year, month));
  NaiveDate::from_ymd_opt(
    year, month, day
  )
  .unwrap_or(date)
}

pub fn first_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  NaiveDate::from_ymd_opt(
    year, month, 1
  )
  .unwrap_or(NaiveDate::MIN)
}

pub fn last_day_of_month(
  year: i32,
  month: u32
) -> NaiveDate {
  let (next_year, next_month) =
    if month >= 12 {
      (year.saturating_add(1), 1_u32)
    } else {
      (year, month + 1)
    };
  let first =
    first_day_of_month(next_year, next_month);
  first.pred_opt().unwrap_or(first)
}

pub fn days_in_month(
  year: i32,
  month: u32
) -> u32 {
  last_day_of_month(year, month).day()
}

/// `None` when the result falls outside
/// the representable date range.
pub fn add_days(
  date: NaiveDate,
  days: i64
) -> Option<NaiveDate> {
  Duration::try_days(days).and_then(
    |delta| date.checked_add_signed(delta)
  )
}
