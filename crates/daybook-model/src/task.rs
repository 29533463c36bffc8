use std::fmt;
use std::str::FromStr;

use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use serde::{
  Deserialize,
  Serialize
};

/// Creation timestamp in milliseconds since the Unix epoch.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
)]
#[serde(transparent)]
pub struct TaskId(pub i64);

impl TaskId {
  #[must_use]
  pub fn from_timestamp(
    now: DateTime<Utc>
  ) -> Self {
    Self(now.timestamp_millis())
  }

  #[must_use]
  pub fn next(self) -> Self {
    Self(self.0.saturating_add(1))
  }
}

impl fmt::Display for TaskId {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>
  ) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl FromStr for TaskId {
  type Err = std::num::ParseIntError;

  fn from_str(
    s: &str
  ) -> Result<Self, Self::Err> {
    s.trim().parse::<i64>().map(Self)
  }
}

#[derive(
  Debug,
  Clone,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
)]
pub struct Task {
  pub id:        TaskId,
  pub text:      String,
  /// Serialized as `YYYY-MM-DD`.
  pub date:      NaiveDate,
  #[serde(default)]
  pub completed: bool
}

impl Task {
  pub fn new_pending(
    id: TaskId,
    text: String,
    date: NaiveDate
  ) -> Self {
    Self {
      id,
      text,
      date,
      completed: false
    }
  }

  pub fn is_on(
    &self,
    date: NaiveDate
  ) -> bool {
    self.date == date
  }
}
