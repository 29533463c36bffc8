use chrono::{Datelike, NaiveDate};
use daybook_model::calendar::{DayCell, MonthGrid};
use daybook_model::task_list::{EMPTY_PLACEHOLDER, TaskListEntry, TaskListView};
use daybook_model::{TaskId, ThemeMode};
use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, TargetCast, classes, function_component, html};

/// Enter and Space activate focusable cells and rows.
fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " ")
}

/// A row toggles from the keyboard only while the row itself has focus.
/// Keys aimed at its remove button never toggle it.
fn row_key_toggles(key: &str, focused_on_row: bool) -> bool {
    focused_on_row && is_activation_key(key)
}

#[derive(Properties, PartialEq)]
pub struct CalendarPanelProps {
    pub grid: MonthGrid,
    pub theme: ThemeMode,
    pub on_select: Callback<NaiveDate>,
    pub on_prev: Callback<()>,
    pub on_next: Callback<()>,
}

#[function_component(CalendarPanel)]
pub fn calendar_panel(props: &CalendarPanelProps) -> Html {
    let on_prev = props.on_prev.clone();
    let on_next = props.on_next.clone();

    html! {
        <div class="calendar">
            <div class="calendar-header">
                <button
                    class="calendar-nav"
                    title="Previous Month"
                    aria-label="Previous month"
                    onclick={move |_| on_prev.emit(())}
                >
                    { "‹" }
                </button>
                <h3>{ props.grid.title() }</h3>
                <button
                    class="calendar-nav"
                    title="Next Month"
                    aria-label="Next month"
                    onclick={move |_| on_next.emit(())}
                >
                    { "›" }
                </button>
            </div>
            <table>
                <thead>
                    <tr>
                        {
                            for MonthGrid::weekday_labels().into_iter().map(|label| html! {
                                <th>{ label }</th>
                            })
                        }
                    </tr>
                </thead>
                <tbody>
                    {
                        for props.grid.rows.iter().map(|row| html! {
                            <tr>
                                {
                                    for row.iter().map(|cell| {
                                        render_day_cell(cell, props.theme, &props.on_select)
                                    })
                                }
                            </tr>
                        })
                    }
                </tbody>
            </table>
        </div>
    }
}

fn render_day_cell(cell: &DayCell, theme: ThemeMode, on_select: &Callback<NaiveDate>) -> Html {
    let DayCell::Day {
        date,
        selected,
        has_tasks,
    } = *cell
    else {
        return html! { <td class="disabled"></td> };
    };

    let on_click = {
        let on_select = on_select.clone();
        Callback::from(move |_: yew::MouseEvent| on_select.emit(date))
    };
    let on_keydown = {
        let on_select = on_select.clone();
        Callback::from(move |event: yew::KeyboardEvent| {
            if is_activation_key(&event.key()) {
                event.prevent_default();
                on_select.emit(date);
            }
        })
    };
    let marker_style = format!("background-color:{};", theme.marker_color());

    html! {
        <td
            class={classes!(selected.then_some("selected"))}
            tabindex="0"
            role="button"
            aria-label={cell.aria_label()}
            aria-current={selected.then_some("date")}
            onclick={on_click}
            onkeydown={on_keydown}
        >
            { date.day() }
            {
                if has_tasks {
                    html! { <span class="calendar-marker" style={marker_style}></span> }
                } else {
                    html! {}
                }
            }
        </td>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskListPanelProps {
    pub view: TaskListView,
    pub on_toggle: Callback<TaskId>,
    pub on_remove: Callback<TaskId>,
}

#[function_component(TaskListPanel)]
pub fn task_list_panel(props: &TaskListPanelProps) -> Html {
    html! {
        <ul class="todo-list">
            {
                match &props.view {
                    TaskListView::Empty => html! {
                        <li class="placeholder" aria-disabled="true">{ EMPTY_PLACEHOLDER }</li>
                    },
                    TaskListView::Entries(entries) => html! {
                        <>
                            {
                                for entries.iter().cloned().map(|entry| html! {
                                    <TaskRow
                                        key={entry.id.0}
                                        entry={entry.clone()}
                                        on_toggle={props.on_toggle.clone()}
                                        on_remove={props.on_remove.clone()}
                                    />
                                })
                            }
                        </>
                    },
                }
            }
        </ul>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskRowProps {
    pub entry: TaskListEntry,
    pub on_toggle: Callback<TaskId>,
    pub on_remove: Callback<TaskId>,
}

#[function_component(TaskRow)]
pub fn task_row(props: &TaskRowProps) -> Html {
    let id = props.entry.id;
    let on_click = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |_: yew::MouseEvent| on_toggle.emit(id))
    };
    let on_keydown = {
        let on_toggle = props.on_toggle.clone();
        Callback::from(move |event: yew::KeyboardEvent| {
            let focused_on_row = event.target() == event.current_target();
            if row_key_toggles(&event.key(), focused_on_row) {
                event.prevent_default();
                on_toggle.emit(id);
            }
        })
    };
    let on_remove = {
        let on_remove = props.on_remove.clone();
        Callback::from(move |event: yew::MouseEvent| {
            event.stop_propagation();
            on_remove.emit(id);
        })
    };
    // The remove button must not forward Enter/Space to the row.
    let on_remove_keydown = Callback::from(|event: yew::KeyboardEvent| {
        event.stop_propagation();
    });

    html! {
        <li
            class={classes!(props.entry.completed.then_some("completed"))}
            tabindex="0"
            onclick={on_click}
            onkeydown={on_keydown}
        >
            <span>{ &props.entry.text }</span>
            <button
                class="remove-btn"
                aria-label="Remove task"
                onclick={on_remove}
                onkeydown={on_remove_keydown}
            >
                { "✕" }
            </button>
        </li>
    }
}

#[derive(Properties, PartialEq)]
pub struct TaskFormProps {
    pub text: String,
    pub date: String,
    pub on_text: Callback<String>,
    pub on_date: Callback<String>,
    pub on_submit: Callback<()>,
}

#[function_component(TaskForm)]
pub fn task_form(props: &TaskFormProps) -> Html {
    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: yew::SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };
    let on_text = {
        let on_text = props.on_text.clone();
        Callback::from(move |event: yew::InputEvent| {
            on_text.emit(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };
    let on_date = {
        let on_date = props.on_date.clone();
        Callback::from(move |event: yew::InputEvent| {
            on_date.emit(event.target_unchecked_into::<HtmlInputElement>().value());
        })
    };

    html! {
        <form class="todo-form" onsubmit={on_submit}>
            <input
                type="text"
                placeholder="What needs doing?"
                aria-label="Task description"
                value={props.text.clone()}
                oninput={on_text}
            />
            <input
                type="date"
                aria-label="Task date"
                value={props.date.clone()}
                oninput={on_date}
            />
            <button type="submit">{ "Add" }</button>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct ThemeToggleProps {
    pub theme: ThemeMode,
    pub spinning: bool,
    pub on_toggle: Callback<()>,
}

#[function_component(ThemeToggle)]
pub fn theme_toggle(props: &ThemeToggleProps) -> Html {
    let on_toggle = props.on_toggle.clone();
    html! {
        <button class="theme-toggle" onclick={move |_| on_toggle.emit(())}>
            <span class={classes!("theme-icon", props.spinning.then_some("spin"))}>
                { props.theme.icon() }
            </span>
            <span>{ props.theme.toggle_label() }</span>
        </button>
    }
}
