use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::anyhow;
use clap::{ArgAction, Parser, Subcommand};
use daybook_model::TaskId;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone)]
pub struct KeyVal {
    pub key: String,
    pub value: String,
}

impl std::str::FromStr for KeyVal {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (k, v) = s
            .split_once('=')
            .ok_or_else(|| anyhow!("expected KEY=VALUE, got: {s}"))?;
        Ok(Self {
            key: k.trim().to_string(),
            value: v.trim().to_string(),
        })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "daybook",
    version,
    about = "Daybook: a dated to-do list with a month calendar",
    disable_help_subcommand = true
)]
pub struct GlobalCli {
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", action = ArgAction::Count, global = true)]
    pub quiet: u8,

    #[arg(
        long = "rc",
        value_parser = clap::builder::ValueParser::new(|s: &str| s.parse::<KeyVal>()),
        action = ArgAction::Append,
        global = true
    )]
    pub rc_overrides: Vec<KeyVal>,

    #[arg(long = "daybookrc", global = true)]
    pub daybookrc: Option<PathBuf>,

    #[arg(long = "data", global = true)]
    pub data: Option<PathBuf>,

    /// Selected day: YYYY-MM-DD, today, tomorrow, a weekday name or +Nd/-Nw.
    #[arg(long = "on", global = true)]
    pub on: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Calendar, task list and summary for the selected day.
    Show,
    /// Add a task to the selected day, or to --date.
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
        #[arg(long = "date")]
        date: Option<String>,
    },
    /// Flip a task between pending and completed.
    Toggle { id: TaskId },
    /// Delete a task.
    #[command(alias = "rm")]
    Remove { id: TaskId },
    /// Tasks on the selected day.
    List,
    /// Completion counts for the selected day.
    Summary,
    /// Month grid around the selected day.
    #[command(alias = "cal")]
    Calendar {
        /// Months to move away from the selected day.
        #[arg(long = "shift", default_value_t = 0, allow_hyphen_values = true)]
        shift: i32,
    },
    /// Show the theme, or switch it with --toggle.
    Theme {
        #[arg(long = "toggle")]
        toggle: bool,
    },
}

pub fn init_tracing(verbose: u8, quiet: u8) -> anyhow::Result<()> {
    let default_level = if quiet >= 2 {
        "error"
    } else if quiet == 1 {
        "warn"
    } else if verbose >= 3 {
        "trace"
    } else if verbose == 2 {
        "debug"
    } else if verbose == 1 {
        "info"
    } else {
        "warn"
    };

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .map_err(|e| anyhow!("invalid RUST_LOG / log filter: {e}"))?;

    let init_result = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .try_init();

    if let Err(err) = init_result {
        debug!(error = %err, "tracing subscriber already set, continuing");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use daybook_model::TaskId;

    use super::{Command, GlobalCli};

    #[test]
    fn parses_add_with_date_and_globals() {
        let cli = GlobalCli::parse_from([
            "daybook", "--on", "2024-05-10", "add", "Buy", "milk", "--date", "tomorrow",
        ]);
        assert_eq!(cli.on.as_deref(), Some("2024-05-10"));
        assert_eq!(
            cli.command,
            Some(Command::Add {
                text: vec!["Buy".to_string(), "milk".to_string()],
                date: Some("tomorrow".to_string()),
            })
        );
    }

    #[test]
    fn parses_ids_and_negative_shift() {
        let cli = GlobalCli::parse_from(["daybook", "rm", "1715299200000"]);
        assert_eq!(
            cli.command,
            Some(Command::Remove {
                id: TaskId(1_715_299_200_000)
            })
        );

        let cli = GlobalCli::parse_from(["daybook", "calendar", "--shift", "-2", "-v"]);
        assert_eq!(cli.command, Some(Command::Calendar { shift: -2 }));
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn rc_overrides_split_on_equals() {
        let cli = GlobalCli::parse_from(["daybook", "--rc", "color=off"]);
        assert_eq!(cli.rc_overrides.len(), 1);
        assert_eq!(cli.rc_overrides[0].key, "color");
        assert_eq!(cli.rc_overrides[0].value, "off");
        assert_eq!(cli.command, None);
    }
}
