use crate::task::{
  Task,
  TaskId
};

pub const EMPTY_PLACEHOLDER: &str =
  "No tasks for this date.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskListEntry {
  pub id:        TaskId,
  pub text:      String,
  pub completed: bool
}

impl From<&Task> for TaskListEntry {
  fn from(task: &Task) -> Self {
    Self {
      id:        task.id,
      text:      task.text.clone(),
      completed: task.completed
    }
  }
}

/// What the task list region shows for
/// one day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskListView {
  /// A single inert placeholder row.
  Empty,
  Entries(Vec<TaskListEntry>)
}

impl TaskListView {
  pub fn from_tasks<'a, I>(
    tasks: I
  ) -> Self
  where
    I: IntoIterator<Item = &'a Task>
  {
    let entries: Vec<TaskListEntry> =
      tasks
        .into_iter()
        .map(TaskListEntry::from)
        .collect();
    if entries.is_empty() {
      Self::Empty
    } else {
      Self::Entries(entries)
    }
  }

  pub fn entries(&self) -> &[TaskListEntry] {
    match self {
      | Self::Empty => &[],
      | Self::Entries(entries) => entries
    }
  }

  pub fn is_empty(&self) -> bool {
    matches!(self, Self::Empty)
  }
}
