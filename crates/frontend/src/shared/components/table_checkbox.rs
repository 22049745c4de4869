use contracts::shared::selection::HeaderCheckState;
use leptos::prelude::*;
use wasm_bindgen::JsCast;

/// Ячейка `<td>` с чекбоксом строки.
///
/// Клик не всплывает до строки, чтобы выбор не открывал карточку.
#[component]
pub fn TableCheckbox(
    #[prop(into)]
    checked: Signal<bool>,
    on_change: Callback<bool>,
    #[prop(optional)]
    disabled: bool,
) -> impl IntoView {
    view! {
        <td
            class="table__cell table__cell--checkbox"
            on:click=|e| e.stop_propagation()
        >
            <input
                type="checkbox"
                class="table__checkbox"
                prop:checked=checked
                prop:disabled=disabled
                on:change=move |ev| on_change.run(event_target_checked(&ev))
            />
        </td>
    }
}

/// Чекбокс «выбрать все» с тремя состояниями
#[component]
pub fn HeaderCheckbox(
    #[prop(into)]
    state: Signal<HeaderCheckState>,
    on_toggle: Callback<()>,
) -> impl IntoView {
    let input_ref = NodeRef::<leptos::html::Input>::new();

    // indeterminate есть только у DOM-свойства, атрибута нет
    Effect::new(move |_| {
        let partial = state.get() == HeaderCheckState::Partial;
        if let Some(input) = input_ref.get() {
            if let Some(el) = input.dyn_ref::<web_sys::HtmlInputElement>() {
                el.set_indeterminate(partial);
            }
        }
    });

    view! {
        <input
            node_ref=input_ref
            type="checkbox"
            class="table__checkbox"
            title="Выбрать все на странице"
            prop:checked=move || state.get() == HeaderCheckState::All
            on:click=|e| e.stop_propagation()
            on:change=move |_| on_toggle.run(())
        />
    }
}
