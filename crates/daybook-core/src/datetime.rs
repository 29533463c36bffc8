use anyhow::{
  Context,
  anyhow
};
use chrono::{
  Datelike,
  Local,
  NaiveDate,
  Utc,
  Weekday
};
use chrono_tz::Tz;
use daybook_model::datetime::{
  add_days,
  parse_iso
};
use regex::Regex;

use crate::config::Config;

pub const TIMEZONE_ENV_VAR: &str =
  "DAYBOOK_TIMEZONE";

/// Timezone used to decide what "today"
/// is. `$DAYBOOK_TIMEZONE` wins over the
/// `timezone` config key; `None` means
/// the system local time.
pub fn resolve_timezone(
  cfg: &Config
) -> Option<Tz> {
  if let Ok(raw) =
    std::env::var(TIMEZONE_ENV_VAR)
    && let Some(tz) =
      parse_timezone(&raw, TIMEZONE_ENV_VAR)
  {
    return Some(tz);
  }

  cfg.get("timezone").and_then(|raw| {
    parse_timezone(raw, "config")
  })
}

fn parse_timezone(
  raw: &str,
  source: &str
) -> Option<Tz> {
  let trimmed = raw.trim();
  if trimmed.is_empty() {
    tracing::warn!(
      source,
      "timezone source was empty"
    );
    return None;
  }

  match trimmed.parse::<Tz>() {
    | Ok(tz) => {
      tracing::debug!(
        source,
        timezone = %trimmed,
        "configured timezone"
      );
      Some(tz)
    }
    | Err(err) => {
      tracing::error!(
        source,
        timezone = %trimmed,
        error = %err,
        "failed to parse timezone id"
      );
      None
    }
  }
}

#[must_use]
pub fn today(
  timezone: Option<Tz>
) -> NaiveDate {
  match timezone {
    | Some(tz) => {
      Utc::now()
        .with_timezone(&tz)
        .date_naive()
    }
    | None => Local::now().date_naive()
  }
}

/// Resolves a user-supplied day relative
/// to `today`.
#[tracing::instrument(skip(today), fields(input = input))]
pub fn parse_date_expr(
  input: &str,
  today: NaiveDate
) -> anyhow::Result<NaiveDate> {
  let token = input.trim();
  let lower = token.to_ascii_lowercase();

  match lower.as_str() {
    | "today" => return Ok(today),
    | "tomorrow" => {
      return offset_from(today, 1, input);
    }
    | "yesterday" => {
      return offset_from(today, -1, input);
    }
    | _ => {}
  }

  if let Some(weekday) =
    parse_weekday_name(&lower)
  {
    return next_weekday_date(
      today, weekday
    )
    .ok_or_else(|| out_of_range(input));
  }

  let rel_re = Regex::new(
    r"^(?P<sign>[+-])(?P<num>\d+)(?P<unit>[dw])$"
  )
  .map_err(|e| {
    anyhow!(
      "internal regex compile \
       failure: {e}"
    )
  })?;
  if let Some(caps) =
    rel_re.captures(&lower)
  {
    let num: i64 = caps["num"]
      .parse()
      .context("invalid relative number")?;
    let days = match &caps["unit"] {
      | "w" => num.saturating_mul(7),
      | _ => num
    };
    let days = if &caps["sign"] == "-" {
      -days
    } else {
      days
    };
    return offset_from(today, days, input);
  }

  parse_iso(token).ok_or_else(|| {
    anyhow!(
      "unrecognized date expression: \
       {input} (expected YYYY-MM-DD, \
       today, tomorrow, yesterday, a \
       weekday name or +Nd/-Nd/+Nw/-Nw)"
    )
  })
}

fn offset_from(
  today: NaiveDate,
  days: i64,
  input: &str
) -> anyhow::Result<NaiveDate> {
  add_days(today, days)
    .ok_or_else(|| out_of_range(input))
}

fn out_of_range(
  input: &str
) -> anyhow::Error {
  anyhow!(
    "date offset out of range: {input}"
  )
}

fn parse_weekday_name(
  token: &str
) -> Option<Weekday> {
  match token {
    | "monday" | "mon" => {
      Some(Weekday::Mon)
    }
    | "tuesday" | "tue" | "tues" => {
      Some(Weekday::Tue)
    }
    | "wednesday" | "wed" => {
      Some(Weekday::Wed)
    }
    | "thursday" | "thu" | "thur"
    | "thurs" => Some(Weekday::Thu),
    | "friday" | "fri" => {
      Some(Weekday::Fri)
    }
    | "saturday" | "sat" => {
      Some(Weekday::Sat)
    }
    | "sunday" | "sun" => {
      Some(Weekday::Sun)
    }
    | _ => None
  }
}

/// The next `target` strictly after
/// `from`.
fn next_weekday_date(
  from: NaiveDate,
  target: Weekday
) -> Option<NaiveDate> {
  let from_idx = from
    .weekday()
    .num_days_from_monday()
    as i64;
  let target_idx =
    target.num_days_from_monday() as i64;
  let mut delta =
    (7 + target_idx - from_idx) % 7;
  if delta == 0 {
    delta = 7;
  }
  add_days(from, delta)
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::parse_date_expr;

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn parses_named_days() {
    let today = ymd(2026, 2, 17);
    assert_eq!(
      parse_date_expr("Today", today)
        .expect("today"),
      today
    );
    assert_eq!(
      parse_date_expr("tomorrow", today)
        .expect("tomorrow"),
      ymd(2026, 2, 18)
    );
    assert_eq!(
      parse_date_expr("yesterday", today)
        .expect("yesterday"),
      ymd(2026, 2, 16)
    );
  }

  #[test]
  fn parses_weekday_name() {
    let today = ymd(2026, 2, 17);
    assert_eq!(
      parse_date_expr("wednesday", today)
        .expect("weekday"),
      ymd(2026, 2, 18)
    );
    assert_eq!(
      parse_date_expr("tue", today)
        .expect("same weekday"),
      ymd(2026, 2, 24)
    );
  }

  #[test]
  fn parses_relative_offsets() {
    let today = ymd(2024, 5, 10);
    assert_eq!(
      parse_date_expr("+3d", today)
        .expect("plus days"),
      ymd(2024, 5, 13)
    );
    assert_eq!(
      parse_date_expr("-2w", today)
        .expect("minus weeks"),
      ymd(2024, 4, 26)
    );
  }

  #[test]
  fn parses_iso_and_rejects_garbage() {
    let today = ymd(2024, 5, 10);
    assert_eq!(
      parse_date_expr("2024-12-25", today)
        .expect("iso"),
      ymd(2024, 12, 25)
    );
    assert!(
      parse_date_expr("someday", today)
        .is_err()
    );
    assert!(
      parse_date_expr("2024-02-30", today)
        .is_err()
    );
  }

  #[test]
  fn rejects_offsets_past_the_calendar() {
    let today = ymd(2024, 5, 10);
    let err = parse_date_expr(
      "+999999999999999d",
      today
    )
    .expect_err("huge offset");
    assert!(
      err
        .to_string()
        .contains("date offset out of range")
    );
    assert!(
      parse_date_expr("+99999999d", today)
        .is_err()
    );
    assert!(
      parse_date_expr("-99999999w", today)
        .is_err()
    );
  }

  #[test]
  fn named_days_fail_at_the_calendar_edge() {
    assert!(
      parse_date_expr(
        "tomorrow",
        NaiveDate::MAX
      )
      .is_err()
    );
    assert!(
      parse_date_expr(
        "yesterday",
        NaiveDate::MIN
      )
      .is_err()
    );
    assert!(
      parse_date_expr(
        "monday",
        NaiveDate::MAX
      )
      .is_err()
    );
  }
}
