use chrono::NaiveDate;

use crate::datetime::format_display;
use crate::task::Task;

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub struct DaySummary {
  pub total:     usize,
  pub completed: usize,
  pub pending:   usize
}

impl DaySummary {
  pub fn from_tasks<'a, I>(
    tasks: I
  ) -> Self
  where
    I: IntoIterator<Item = &'a Task>
  {
    let (total, completed) =
      tasks.into_iter().fold(
        (0_usize, 0_usize),
        |(total, completed), task| {
          (
            total + 1,
            completed
              + usize::from(task.completed)
          )
        }
      );
    Self {
      total,
      completed,
      pending: total - completed
    }
  }

  pub fn message(
    &self,
    date: NaiveDate
  ) -> String {
    let display = format_display(date);
    if self.total == 0 {
      format!(
        "No tasks scheduled for \
         {display}."
      )
    } else {
      format!(
        "Summary for {display}: Total \
         tasks: {}, Completed: {}, \
         Pending: {}.",
        self.total,
        self.completed,
        self.pending
      )
    }
  }
}
