use leptos::prelude::*;
use leptos::task::spawn_local;
use thaw::*;

use crate::system::auth::context::{do_login, use_auth};

#[component]
pub fn LoginPage() -> impl IntoView {
    let username = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let error_message = RwSignal::new(Option::<String>::None);
    let is_loading = RwSignal::new(false);

    let (auth_state, set_auth_state) = use_auth();

    let submit = move || {
        let login = username.get_untracked().trim().to_string();
        let pass = password.get_untracked();
        if login.is_empty() || pass.is_empty() {
            error_message.set(Some("Введите логин и пароль".to_string()));
            return;
        }

        is_loading.set(true);
        error_message.set(None);
        spawn_local(async move {
            if let Err(e) = do_login(set_auth_state, login, pass).await {
                error_message.set(Some(e));
            }
            is_loading.set(false);
        });
    };

    view! {
        <div class="login-container">
            <div class="login-box">
                <h1>"CMMS"</h1>
                <h2>"Вход в систему"</h2>

                <Show when=move || auth_state.with(|s| s.restoring)>
                    <div class="login-restoring"><Spinner size=SpinnerSize::Small/>" Восстановление сессии..."</div>
                </Show>

                <Show when=move || error_message.get().is_some()>
                    <div class="error-message">
                        {move || error_message.get().unwrap_or_default()}
                    </div>
                </Show>

                <form on:submit=move |ev: leptos::ev::SubmitEvent| {
                    ev.prevent_default();
                    submit();
                }>
                    <div class="form-group">
                        <label for="username">"Логин"</label>
                        <Input id="username" value=username disabled=is_loading/>
                    </div>

                    <div class="form-group">
                        <label for="password">"Пароль"</label>
                        <Input
                            id="password"
                            value=password
                            input_type=InputType::Password
                            disabled=is_loading
                        />
                    </div>

                    <Button
                        button_type=ButtonType::Submit
                        appearance=ButtonAppearance::Primary
                        block=true
                        disabled=is_loading
                    >
                        {move || if is_loading.get() { "Вход..." } else { "Войти" }}
                    </Button>
                </form>

                <div class="login-info">
                    <p>"При первом запуске создаётся администратор "<strong>"admin / admin"</strong></p>
                </div>
            </div>
        </div>
    }
}
