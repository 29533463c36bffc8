pub mod cli;
pub mod commands;
pub mod config;
pub mod datastore;
pub mod datetime;
pub mod render;

use std::ffi::OsString;
use std::io::{self, IsTerminal, Write};

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use daybook_model::{
  AppState,
  StoreError
};
use tracing::{
  debug,
  info
};

/// Line printed on stderr when `run`
/// fails. An empty task description is
/// reported by its bare message.
pub fn error_message(
  err: &anyhow::Error
) -> String {
  match err.downcast_ref::<StoreError>() {
    | Some(store_err)
      if store_err.is_validation() =>
    {
      store_err.to_string()
    }
    | _ => format!("error: {err:#}")
  }
}

#[tracing::instrument(skip_all)]
pub fn run(
  raw_args: Vec<OsString>
) -> anyhow::Result<()> {
  let cli =
    cli::GlobalCli::parse_from(raw_args);

  cli::init_tracing(
    cli.verbose,
    cli.quiet
  )?;

  info!(
    verbose = cli.verbose,
    quiet = cli.quiet,
    "starting daybook CLI"
  );

  let mut cfg = config::Config::load(
    cli.daybookrc.as_deref()
  )?;
  cfg.apply_overrides(
    cli
      .rc_overrides
      .into_iter()
      .map(|kv| (kv.key, kv.value))
  );

  let data_dir =
    config::resolve_data_dir(
      &cfg,
      cli.data.as_deref()
    )
    .context(
      "failed to resolve data \
       directory"
    )?;

  let storage =
    datastore::FileStorage::open(
      &data_dir
    )
    .with_context(|| {
      format!(
        "failed to open data directory \
         {}",
        data_dir.display()
      )
    })?;

  let today = datetime::today(
    datetime::resolve_timezone(&cfg)
  );
  let selected = match cli.on.as_deref() {
    | Some(raw) => {
      datetime::parse_date_expr(raw, today)
        .context("invalid --on date")?
    }
    | None => today
  };
  debug!(%today, %selected, "resolved selected date");

  let mut state =
    AppState::load(storage, selected);

  let stdout = io::stdout();
  let color = cfg
    .get_bool("color")?
    .unwrap_or(true)
    && stdout.is_terminal();
  let mut renderer =
    render::Renderer::new(
      color,
      state.theme()
    );

  let mut out = stdout.lock();
  commands::dispatch(
    &mut state,
    &mut renderer,
    cli
      .command
      .unwrap_or(cli::Command::Show),
    today,
    Utc::now(),
    &mut out
  )?;
  out.flush()?;

  info!("done");
  Ok(())
}
