use std::io::Write;

use chrono::{DateTime, NaiveDate, Utc};
use daybook_model::datetime::format_iso;
use daybook_model::{AppState, KeyValueStore};
use tracing::{debug, info};

use crate::cli::Command;
use crate::datetime::parse_date_expr;
use crate::render::Renderer;

/// Runs one command against the loaded state and writes the regions it
/// affects to `out`.
#[tracing::instrument(skip(state, renderer, out, now))]
pub fn dispatch<S, W>(
    state: &mut AppState<S>,
    renderer: &mut Renderer,
    command: Command,
    today: NaiveDate,
    now: DateTime<Utc>,
    out: &mut W,
) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Show => write_all_views(state, renderer, out),
        Command::Add { text, date } => {
            let date = date
                .map(|raw| parse_date_expr(&raw, today))
                .transpose()?;
            let id = state.add_task(&text.join(" "), date, now)?;
            let stored_on = state
                .tasks()
                .get(id)
                .map(|task| task.date)
                .unwrap_or_else(|| state.selected_date());
            info!(id = %id, date = %stored_on, "added task from cli");
            writeln!(out, "Created task {id} on {}.", format_iso(stored_on))?;
            if stored_on == state.selected_date() {
                write_day(state, renderer, out)?;
            }
            Ok(())
        }
        Command::Toggle { id } => {
            if state.toggle_task(id)?.is_none() {
                debug!(id = %id, "toggle ignored; no such task");
            }
            write_day(state, renderer, out)
        }
        Command::Remove { id } => {
            if state.remove_task(id)?.is_none() {
                debug!(id = %id, "remove ignored; no such task");
            }
            write_day(state, renderer, out)
        }
        Command::List => renderer.write_task_list(out, state.selected_date(), &state.task_list()),
        Command::Summary => renderer.write_summary(out, &state.summary_message()),
        Command::Calendar { shift } => {
            state.shift_month(shift);
            renderer.write_calendar(out, &state.calendar())
        }
        Command::Theme { toggle } => {
            if !toggle {
                return renderer.write_theme(out);
            }
            let theme = state.toggle_theme()?;
            renderer.set_theme(theme);
            renderer.write_theme(out)?;
            writeln!(out)?;
            renderer.write_calendar(out, &state.calendar())?;
            writeln!(out)?;
            renderer.write_task_list(out, state.selected_date(), &state.task_list())
        }
    }
}

fn write_day<S, W>(state: &AppState<S>, renderer: &Renderer, out: &mut W) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    renderer.write_task_list(out, state.selected_date(), &state.task_list())?;
    writeln!(out)?;
    renderer.write_summary(out, &state.summary_message())
}

fn write_all_views<S, W>(state: &AppState<S>, renderer: &Renderer, out: &mut W) -> anyhow::Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    renderer.write_calendar(out, &state.calendar())?;
    writeln!(out)?;
    write_day(state, renderer, out)
}
