use chrono::{
  Datelike,
  NaiveDate
};

use crate::datetime::{
  WEEKDAY_LABELS,
  days_in_month,
  first_day_of_month,
  month_name
};

pub const GRID_ROWS: usize = 6;
pub const GRID_COLUMNS: usize = 7;

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum DayCell {
  /// Padding before the 1st or after the
  /// last day of the month.
  Disabled,
  Day {
    date:      NaiveDate,
    selected:  bool,
    has_tasks: bool
  }
}

impl DayCell {
  pub fn date(&self) -> Option<NaiveDate> {
    match self {
      | Self::Day { date, .. } => {
        Some(*date)
      }
      | Self::Disabled => None
    }
  }

  pub fn is_selected(&self) -> bool {
    matches!(
      self,
      Self::Day { selected: true, .. }
    )
  }

  pub fn has_marker(&self) -> bool {
    matches!(
      self,
      Self::Day { has_tasks: true, .. }
    )
  }

  pub fn aria_label(
    &self
  ) -> Option<String> {
    self.date().map(|date| {
      format!(
        "Select date {} {}, {}",
        month_name(date.month()),
        date.day(),
        date.year()
      )
    })
  }
}

/// A month laid out on a fixed
/// Sunday-first 6x7 grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
  pub year:  i32,
  pub month: u32,
  pub rows:
    [[DayCell; GRID_COLUMNS]; GRID_ROWS]
}

impl MonthGrid {
  pub fn build<F>(
    year: i32,
    month: u32,
    selected: NaiveDate,
    has_task_on: F
  ) -> Self
  where
    F: Fn(NaiveDate) -> bool
  {
    let first =
      first_day_of_month(year, month);
    let leading = first
      .weekday()
      .num_days_from_sunday()
      as usize;
    let total = days_in_month(year, month);

    let mut rows = [[DayCell::Disabled;
      GRID_COLUMNS];
      GRID_ROWS];
    let mut day = 1_u32;
    for (row_idx, row) in
      rows.iter_mut().enumerate()
    {
      for (col_idx, cell) in
        row.iter_mut().enumerate()
      {
        if (row_idx == 0 && col_idx < leading)
          || day > total
        {
          continue;
        }
        let Some(date) =
          NaiveDate::from_ymd_opt(
            year, month, day
          )
        else {
          continue;
        };
        *cell = DayCell::Day {
          date,
          selected: date == selected,
          has_tasks: has_task_on(date)
        };
        day += 1;
      }
    }

    Self { year, month, rows }
  }

  /// The month containing `selected`.
  pub fn around<F>(
    selected: NaiveDate,
    has_task_on: F
  ) -> Self
  where
    F: Fn(NaiveDate) -> bool
  {
    Self::build(
      selected.year(),
      selected.month(),
      selected,
      has_task_on
    )
  }

  /// `May 2024`
  pub fn title(&self) -> String {
    format!(
      "{} {}",
      month_name(self.month),
      self.year
    )
  }

  pub fn weekday_labels()
  -> [&'static str; GRID_COLUMNS] {
    WEEKDAY_LABELS
  }

  pub fn cells(
    &self
  ) -> impl Iterator<Item = &DayCell> {
    self.rows.iter().flatten()
  }

  pub fn selected_date(
    &self
  ) -> Option<NaiveDate> {
    self
      .cells()
      .find(|cell| cell.is_selected())
      .and_then(DayCell::date)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::{
    DayCell,
    GRID_COLUMNS,
    MonthGrid
  };

  fn ymd(
    y: i32,
    m: u32,
    d: u32
  ) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d)
      .expect("valid date")
  }

  #[test]
  fn may_2024_starts_on_wednesday() {
    let grid = MonthGrid::build(
      2024,
      5,
      ymd(2024, 5, 10),
      |_| false
    );

    assert_eq!(grid.title(), "May 2024");
    for col in 0..3 {
      assert_eq!(
        grid.rows[0][col],
        DayCell::Disabled
      );
    }
    assert_eq!(
      grid.rows[0][3].date(),
      Some(ymd(2024, 5, 1))
    );
    assert_eq!(
      grid.rows[4][5].date(),
      Some(ymd(2024, 5, 31))
    );
    assert_eq!(
      grid.rows[4][6],
      DayCell::Disabled
    );
    assert!(
      grid.rows[5]
        .iter()
        .all(|cell| *cell == DayCell::Disabled)
    );
    assert_eq!(
      grid
        .cells()
        .filter(|cell| cell.date().is_some())
        .count(),
      31
    );
  }

  #[test]
  fn only_the_selected_day_is_highlighted()
  {
    let grid = MonthGrid::build(
      2024,
      5,
      ymd(2024, 5, 10),
      |_| false
    );
    let selected: Vec<_> = grid
      .cells()
      .filter(|cell| cell.is_selected())
      .collect();
    assert_eq!(selected.len(), 1);
    assert_eq!(
      grid.selected_date(),
      Some(ymd(2024, 5, 10))
    );

    let other_month = MonthGrid::build(
      2024,
      6,
      ymd(2024, 5, 10),
      |_| false
    );
    assert_eq!(
      other_month.selected_date(),
      None
    );
  }

  #[test]
  fn markers_follow_the_predicate() {
    let busy =
      [ymd(2024, 2, 1), ymd(2024, 2, 29)];
    let grid = MonthGrid::build(
      2024,
      2,
      ymd(2024, 2, 14),
      |date| busy.contains(&date)
    );

    for cell in grid.cells() {
      let expected = cell
        .date()
        .is_some_and(|date| busy.contains(&date));
      assert_eq!(cell.has_marker(), expected);
    }
  }

  #[test]
  fn cells_carry_accessible_labels() {
    let grid = MonthGrid::around(
      ymd(2026, 2, 17),
      |_| false
    );
    assert_eq!(
      grid.rows[0][0].aria_label().as_deref(),
      Some("Select date February 1, 2026")
    );
    assert_eq!(
      MonthGrid::weekday_labels()[0],
      "Sun"
    );
    assert_eq!(grid.rows[0].len(), GRID_COLUMNS);
  }
}
