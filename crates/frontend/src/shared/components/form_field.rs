use contracts::shared::validation::{error_for, FieldError};
use leptos::prelude::*;

/// Поле формы с подписью и сообщением валидации под ним.
///
/// Ошибки показываются только после первой попытки сохранения
/// (`errors` пуст до этого момента).
#[component]
pub fn FormField(
    #[prop(into)]
    label: String,
    /// Имя поля в `FieldError::field`
    #[prop(into)]
    field: String,
    #[prop(into)]
    errors: Signal<Vec<FieldError>>,
    #[prop(optional)]
    required: bool,
    children: Children,
) -> impl IntoView {
    let field = StoredValue::new(field);
    let message = move || {
        errors.with(|errs| error_for(errs, &field.get_value()).map(str::to_string))
    };

    view! {
        <div class="form-group" class:form-group--invalid=move || message().is_some()>
            <label>
                {label}
                {required.then(|| view! { <span class="form-group__required">" *"</span> })}
            </label>
            {children()}
            {move || message().map(|m| view! { <div class="field-error">{m}</div> })}
        </div>
    }
}
