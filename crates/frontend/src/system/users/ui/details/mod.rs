use contracts::shared::validation::FieldError;
use contracts::system::users::{
    validate_password, ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UserRole,
};
use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::shared::components::form_field::FormField;
use crate::shared::toast::{notify_error, notify_success};
use crate::system::users::api;

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Форма пользователя: создание (`user = None`) или правка
#[component]
pub fn UserForm(
    user: Option<User>,
    on_close: Callback<()>,
    on_saved: Callback<()>,
) -> impl IntoView {
    let is_edit = user.is_some();
    let user_id = user.as_ref().map(|u| u.id.clone()).unwrap_or_default();

    let username = RwSignal::new(user.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let password = RwSignal::new(String::new());
    let email = RwSignal::new(user.as_ref().and_then(|u| u.email.clone()).unwrap_or_default());
    let full_name = RwSignal::new(
        user.as_ref()
            .and_then(|u| u.full_name.clone())
            .unwrap_or_default(),
    );
    let role = RwSignal::new(
        user.as_ref()
            .map(|u| u.role.as_str().to_string())
            .unwrap_or_else(|| UserRole::Technician.as_str().to_string()),
    );
    let is_active = RwSignal::new(user.as_ref().map(|u| u.is_active).unwrap_or(true));
    let errors = RwSignal::new(Vec::<FieldError>::new());
    let is_saving = RwSignal::new(false);

    let save = move |_| {
        let selected_role = UserRole::parse(&role.get_untracked()).unwrap_or_default();
        is_saving.set(true);

        if is_edit {
            let dto = UpdateUserDto {
                id: user_id.clone(),
                email: non_empty(email.get_untracked()),
                full_name: non_empty(full_name.get_untracked()),
                is_active: is_active.get_untracked(),
                role: selected_role,
            };
            spawn_local(async move {
                match api::update_user(&dto).await {
                    Ok(()) => {
                        notify_success("Пользователь сохранён");
                        on_saved.run(());
                    }
                    Err(e) => notify_error(e),
                }
                is_saving.set(false);
            });
            return;
        }

        let dto = CreateUserDto {
            username: username.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            email: non_empty(email.get_untracked()),
            full_name: non_empty(full_name.get_untracked()),
            role: selected_role,
        };
        let field_errors = dto.validate_fields();
        if !field_errors.is_empty() {
            errors.set(field_errors);
            is_saving.set(false);
            return;
        }
        errors.set(Vec::new());
        spawn_local(async move {
            match api::create_user(&dto).await {
                Ok(_) => {
                    notify_success(format!("Создан пользователь {}", dto.username));
                    on_saved.run(());
                }
                Err(e) => notify_error(e),
            }
            is_saving.set(false);
        });
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal-content" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>{if is_edit { "Пользователь" } else { "Новый пользователь" }}</h3>
                    <button class="btn-close" on:click=move |_| on_close.run(())>"×"</button>
                </div>

                <div class="details-form">
                    <FormField label="Логин" field="username" errors=errors required=true>
                        <Input value=username disabled=is_edit/>
                    </FormField>
                    {(!is_edit).then(|| view! {
                        <FormField label="Пароль" field="password" errors=errors required=true>
                            <Input value=password input_type=InputType::Password/>
                        </FormField>
                    })}
                    <FormField label="ФИО" field="full_name" errors=errors>
                        <Input value=full_name/>
                    </FormField>
                    <FormField label="Email" field="email" errors=errors>
                        <Input value=email/>
                    </FormField>
                    <FormField label="Роль" field="role" errors=errors>
                        <Select value=role>
                            {UserRole::all().iter().map(|r| view! {
                                <option value=r.as_str()>{r.label()}</option>
                            }).collect_view()}
                        </Select>
                    </FormField>
                    {is_edit.then(|| view! { <Checkbox checked=is_active label="Активен"/> })}
                </div>

                <div class="form-actions">
                    <Button appearance=ButtonAppearance::Primary on_click=save disabled=is_saving>
                        "Сохранить"
                    </Button>
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| on_close.run(())>
                        "Отмена"
                    </Button>
                </div>
            </div>
        </div>
    }
}

/// Смена пароля. Администратор меняет чужой пароль без старого.
#[component]
pub fn ChangePasswordForm(
    user_id: String,
    #[prop(into)]
    title: String,
    /// Требовать текущий пароль (смена своего пароля)
    require_old: bool,
    on_close: Callback<()>,
) -> impl IntoView {
    let old_password = RwSignal::new(String::new());
    let new_password = RwSignal::new(String::new());
    let confirm = RwSignal::new(String::new());
    let errors = RwSignal::new(Vec::<FieldError>::new());

    let save = move |_| {
        let new_value = new_password.get_untracked();
        let mut found = Vec::new();
        if require_old && old_password.get_untracked().is_empty() {
            found.push(FieldError::new("old_password", "Введите текущий пароль"));
        }
        if let Err(msg) = validate_password(&new_value) {
            found.push(FieldError::new("new_password", msg));
        }
        if new_value != confirm.get_untracked() {
            found.push(FieldError::new("confirm", "Пароли не совпадают"));
        }
        if !found.is_empty() {
            errors.set(found);
            return;
        }
        errors.set(Vec::new());

        let dto = ChangePasswordDto {
            user_id: user_id.clone(),
            old_password: require_old.then(|| old_password.get_untracked()),
            new_password: new_value,
        };
        spawn_local(async move {
            match api::change_password(&dto).await {
                Ok(()) => {
                    notify_success("Пароль изменён");
                    on_close.run(());
                }
                Err(e) => notify_error(e),
            }
        });
    };

    view! {
        <div class="modal-overlay" on:click=move |_| on_close.run(())>
            <div class="modal-content" on:click=move |ev| ev.stop_propagation()>
                <div class="modal-header">
                    <h3>{title}</h3>
                    <button class="btn-close" on:click=move |_| on_close.run(())>"×"</button>
                </div>
                <div class="details-form">
                    {require_old.then(|| view! {
                        <FormField label="Текущий пароль" field="old_password" errors=errors>
                            <Input value=old_password input_type=InputType::Password/>
                        </FormField>
                    })}
                    <FormField label="Новый пароль" field="new_password" errors=errors required=true>
                        <Input value=new_password input_type=InputType::Password/>
                    </FormField>
                    <FormField label="Повтор пароля" field="confirm" errors=errors required=true>
                        <Input value=confirm input_type=InputType::Password/>
                    </FormField>
                </div>
                <div class="form-actions">
                    <Button appearance=ButtonAppearance::Primary on_click=save>"Сменить"</Button>
                </div>
            </div>
        </div>
    }
}
