//! Pure state for the daybook to-do list: task records, the persisted
//! task store, month calendar layout, per-day summaries and the theme
//! flag. Nothing in this crate touches a terminal or a browser; both
//! front-ends drive an [`AppState`] and render the views it produces.

pub mod calendar;
pub mod datetime;
pub mod error;
pub mod state;
pub mod storage;
pub mod store;
pub mod summary;
pub mod task;
pub mod task_list;
pub mod theme;

pub use calendar::{
  DayCell,
  MonthGrid
};
pub use error::{
  StorageError,
  StoreError,
  ValidationError
};
pub use state::AppState;
pub use storage::{
  KeyValueStore,
  MemoryStorage
};
pub use store::TaskStore;
pub use summary::DaySummary;
pub use task::{
  Task,
  TaskId
};
pub use task_list::{
  TaskListEntry,
  TaskListView
};
pub use theme::ThemeMode;
