use leptos::prelude::*;

/// Нативный `<select>` по списку пар `(значение, подпись)`.
///
/// `placeholder` добавляет пустой первый пункт (значение `""`).
#[component]
pub fn OptionSelect(
    #[prop(into)]
    value: Signal<String>,
    on_change: Callback<String>,
    #[prop(into)]
    options: Signal<Vec<(String, String)>>,
    #[prop(optional, into)]
    placeholder: Option<String>,
    #[prop(optional, into)]
    disabled: MaybeProp<bool>,
) -> impl IntoView {
    view! {
        <select
            class="form-select"
            prop:value=move || value.get()
            disabled=move || disabled.get().unwrap_or(false)
            on:change=move |ev| on_change.run(event_target_value(&ev))
        >
            {placeholder.map(|p| view! { <option value="">{p}</option> })}
            {move || {
                let current = value.get();
                options
                    .get()
                    .into_iter()
                    .map(|(id, label)| {
                        let selected = id == current;
                        view! { <option value=id selected=selected>{label}</option> }
                    })
                    .collect_view()
            }}
        </select>
    }
}

/// Варианты для перечисления: `(as_str, label)`
pub fn enum_options<T: Copy>(
    all: &[T],
    as_str: impl Fn(&T) -> &'static str,
    label: impl Fn(&T) -> &'static str,
) -> Vec<(String, String)> {
    all.iter()
        .map(|v| (as_str(v).to_string(), label(v).to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a002_equipment::Criticality;

    #[test]
    fn test_enum_options() {
        let opts = enum_options(Criticality::all(), Criticality::as_str, Criticality::label);
        assert_eq!(opts.len(), 3);
        assert_eq!(opts[2], ("high".to_string(), "Высокая".to_string()));
    }
}
