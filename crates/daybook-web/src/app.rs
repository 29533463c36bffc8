use chrono::{
  DateTime,
  NaiveDate,
  Utc
};
use daybook_model::datetime::{
  format_display,
  parse_iso
};
use daybook_model::theme::ICON_SPIN_MS;
use daybook_model::{
  AppState,
  TaskId,
  ThemeMode
};
use gloo::timers::callback::Timeout;
use yew::{
  Callback,
  Html,
  classes,
  function_component,
  html,
  use_effect_with,
  use_force_update,
  use_mut_ref,
  use_state
};

use crate::components::{
  CalendarPanel,
  TaskForm,
  TaskListPanel,
  ThemeToggle
};
use crate::storage::BrowserStorage;

#[function_component(App)]
pub fn app() -> Html {
  let state = use_mut_ref(|| {
    AppState::load(
      BrowserStorage::open(),
      today_local()
    )
  });
  let force_update = use_force_update();
  let draft_text = use_state(String::new);
  let draft_date = use_state(String::new);
  let icon_spinning =
    use_state(|| false);

  let theme = state.borrow().theme();
  {
    use_effect_with(theme, |theme| {
      apply_body_theme(*theme);
      tracing::debug!(
        dark = theme.is_dark(),
        "applied body theme"
      );
      || ()
    });
  }

  let on_submit = {
    let state = state.clone();
    let draft_text = draft_text.clone();
    let draft_date = draft_date.clone();
    let force_update = force_update.clone();
    Callback::from(move |()| {
      let date = parse_iso(&draft_date);
      let result = state
        .borrow_mut()
        .add_task(&draft_text, date, now_utc());
      match result {
        | Ok(id) => {
          tracing::debug!(id = %id, "task added");
          draft_text.set(String::new());
          draft_date.set(String::new());
        }
        | Err(err) if err.is_validation() => {
          gloo::dialogs::alert(
            &err.to_string()
          );
        }
        | Err(err) => {
          tracing::error!(
            error = %err,
            "failed to store new task"
          );
        }
      }
      force_update.force_update();
    })
  };

  let on_toggle = {
    let state = state.clone();
    let force_update = force_update.clone();
    Callback::from(move |id: TaskId| {
      if let Err(err) =
        state.borrow_mut().toggle_task(id)
      {
        tracing::error!(
          error = %err,
          "failed to store toggled task"
        );
      }
      force_update.force_update();
    })
  };

  let on_remove = {
    let state = state.clone();
    let force_update = force_update.clone();
    Callback::from(move |id: TaskId| {
      if let Err(err) =
        state.borrow_mut().remove_task(id)
      {
        tracing::error!(
          error = %err,
          "failed to store task removal"
        );
      }
      force_update.force_update();
    })
  };

  let on_select = {
    let state = state.clone();
    let force_update = force_update.clone();
    Callback::from(move |date: NaiveDate| {
      state.borrow_mut().select_date(date);
      force_update.force_update();
    })
  };

  let on_shift = |step: i32| {
    let state = state.clone();
    let force_update = force_update.clone();
    Callback::from(move |()| {
      state.borrow_mut().shift_month(step);
      force_update.force_update();
    })
  };
  let on_prev = on_shift(-1);
  let on_next = on_shift(1);

  let on_toggle_theme = {
    let state = state.clone();
    let icon_spinning = icon_spinning.clone();
    let force_update = force_update.clone();
    Callback::from(move |()| {
      if let Err(err) =
        state.borrow_mut().toggle_theme()
      {
        tracing::error!(
          error = %err,
          "failed to store theme flag"
        );
      }
      icon_spinning.set(true);
      let icon_spinning =
        icon_spinning.clone();
      Timeout::new(ICON_SPIN_MS, move || {
        icon_spinning.set(false);
      })
      .forget();
      force_update.force_update();
    })
  };

  let on_text = {
    let draft_text = draft_text.clone();
    Callback::from(move |value: String| {
      draft_text.set(value);
    })
  };
  let on_date = {
    let draft_date = draft_date.clone();
    Callback::from(move |value: String| {
      draft_date.set(value);
    })
  };

  let snapshot = state.borrow();
  let selected = snapshot.selected_date();

  html! {
      <div class={classes!("app", theme.as_class())}>
          <header class="topbar">
              <h1>{ "Daybook" }</h1>
              <ThemeToggle
                  theme={theme}
                  spinning={*icon_spinning}
                  on_toggle={on_toggle_theme}
              />
          </header>
          <section>
              <CalendarPanel
                  grid={snapshot.calendar()}
                  theme={theme}
                  on_select={on_select}
                  on_prev={on_prev}
                  on_next={on_next}
              />
          </section>
          <section>
              <TaskForm
                  text={(*draft_text).clone()}
                  date={(*draft_date).clone()}
                  on_text={on_text}
                  on_date={on_date}
                  on_submit={on_submit}
              />
              <h2>{ format!("Tasks for {}", format_display(selected)) }</h2>
              <TaskListPanel
                  view={snapshot.task_list()}
                  on_toggle={on_toggle}
                  on_remove={on_remove}
              />
              <p class="daily-summary" aria-live="polite">
                  { snapshot.summary_message() }
              </p>
          </section>
      </div>
  }
}

fn apply_body_theme(theme: ThemeMode) {
  if let Some(body) = web_sys::window()
    .and_then(|window| window.document())
    .and_then(|document| document.body())
  {
    let _ = body
      .class_list()
      .toggle_with_force(
        "dark-mode",
        theme.is_dark()
      );
  }
}

/// The browser's local calendar day.
fn today_local() -> NaiveDate {
  let now = js_sys::Date::new_0();
  NaiveDate::from_ymd_opt(
    now.get_full_year() as i32,
    now.get_month() + 1,
    now.get_date()
  )
  .unwrap_or_default()
}

fn now_utc() -> DateTime<Utc> {
  DateTime::from_timestamp_millis(
    js_sys::Date::now() as i64
  )
  .unwrap_or_default()
}
