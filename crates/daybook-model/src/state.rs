use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use tracing::{
  debug,
  info
};

use crate::calendar::MonthGrid;
use crate::datetime::shift_months;
use crate::error::StoreError;
use crate::storage::KeyValueStore;
use crate::store::TaskStore;
use crate::summary::DaySummary;
use crate::task::{
  Task,
  TaskId
};
use crate::task_list::TaskListView;
use crate::theme::ThemeMode;

/// Everything a front-end needs: the task
/// store, the selected day and the theme.
/// Front-ends call one method per user
/// action and then re-render every view.
#[derive(Debug)]
pub struct AppState<S> {
  tasks:    TaskStore<S>,
  selected: NaiveDate,
  theme:    ThemeMode
}

impl<S: KeyValueStore> AppState<S> {
  #[tracing::instrument(skip(storage))]
  pub fn load(
    storage: S,
    today: NaiveDate
  ) -> Self {
    let theme = ThemeMode::load(&storage);
    let tasks = TaskStore::load(storage);
    info!(
      tasks = tasks.len(),
      dark = theme.is_dark(),
      "application state ready"
    );
    Self {
      tasks,
      selected: today,
      theme
    }
  }

  /// Creates a task on `date`, or on the
  /// selected day when no date is given.
  pub fn add_task(
    &mut self,
    text: &str,
    date: Option<NaiveDate>,
    now: DateTime<Utc>
  ) -> Result<TaskId, StoreError> {
    let date =
      date.unwrap_or(self.selected);
    self.tasks.create(text, date, now)
  }

  pub fn toggle_task(
    &mut self,
    id: TaskId
  ) -> Result<Option<bool>, StoreError>
  {
    self.tasks.toggle_completion(id)
  }

  pub fn remove_task(
    &mut self,
    id: TaskId
  ) -> Result<Option<Task>, StoreError>
  {
    self.tasks.remove(id)
  }

  pub fn select_date(
    &mut self,
    date: NaiveDate
  ) {
    debug!(date = %date, "selected date");
    self.selected = date;
  }

  pub fn shift_month(
    &mut self,
    step: i32
  ) {
    let target =
      shift_months(self.selected, step);
    debug!(
      from = %self.selected,
      to = %target,
      step,
      "navigated month"
    );
    self.selected = target;
  }

  pub fn previous_month(&mut self) {
    self.shift_month(-1);
  }

  pub fn next_month(&mut self) {
    self.shift_month(1);
  }

  /// Flips and persists the theme,
  /// returning the new mode.
  pub fn toggle_theme(
    &mut self
  ) -> Result<ThemeMode, StoreError> {
    self.theme = self.theme.next();
    self
      .theme
      .save(self.tasks.storage_mut())?;
    info!(
      dark = self.theme.is_dark(),
      "toggled theme"
    );
    Ok(self.theme)
  }

  pub fn selected_date(&self) -> NaiveDate {
    self.selected
  }

  pub fn theme(&self) -> ThemeMode {
    self.theme
  }

  pub fn tasks(&self) -> &TaskStore<S> {
    &self.tasks
  }

  pub fn calendar(&self) -> MonthGrid {
    MonthGrid::around(self.selected, |date| {
      self.tasks.has_task_on(date)
    })
  }

  pub fn task_list(&self) -> TaskListView {
    TaskListView::from_tasks(
      self.tasks.filter_by_date(self.selected)
    )
  }

  pub fn summary(&self) -> DaySummary {
    DaySummary::from_tasks(
      self.tasks.filter_by_date(self.selected)
    )
  }

  pub fn summary_message(&self) -> String {
    self.summary().message(self.selected)
  }
}
