use chrono::NaiveDate;
use leptos::prelude::*;

use crate::shared::date_utils::{parse_input_value, to_input_value};

/// Поле даты с нативным календарём браузера.
///
/// Браузер сам показывает дату в формате локали (dd.mm.yyyy для RU),
/// очистка поля даёт `None`.
#[component]
pub fn DateInput(
    #[prop(into)]
    value: Signal<Option<NaiveDate>>,
    on_change: Callback<Option<NaiveDate>>,
    #[prop(optional, into)]
    disabled: MaybeProp<bool>,
) -> impl IntoView {
    view! {
        <input
            type="date"
            class="form-control form-control--date"
            prop:value=move || to_input_value(value.get().as_ref())
            disabled=move || disabled.get().unwrap_or(false)
            on:change=move |ev| on_change.run(parse_input_value(&event_target_value(&ev)))
        />
    }
}
