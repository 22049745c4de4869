use contracts::system::auth::UserInfo;
use leptos::prelude::*;
use leptos::task::spawn_local;

use super::{api, storage};

#[derive(Clone, Debug, Default)]
pub struct AuthState {
    pub access_token: Option<String>,
    pub user_info: Option<UserInfo>,
    /// Идёт восстановление сессии из localStorage
    pub restoring: bool,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() && self.user_info.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user_info.as_ref().map(|u| u.is_admin).unwrap_or(false)
    }

    /// Может ли пользователь менять данные (все роли, кроме наблюдателя)
    pub fn can_edit(&self) -> bool {
        self.user_info.as_ref().map(|u| u.can_edit()).unwrap_or(false)
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_info.as_ref().map(|u| u.id.clone())
    }
}

/// Восстановить сессию: сначала текущий токен, затем refresh
async fn restore_session() -> Option<AuthState> {
    let access_token = storage::get_access_token()?;
    if let Ok(user_info) = api::get_current_user(&access_token).await {
        return Some(AuthState {
            access_token: Some(access_token),
            user_info: Some(user_info),
            restoring: false,
        });
    }

    let refresh_token = storage::get_refresh_token()?;
    let refreshed = api::refresh_token(refresh_token).await.ok()?;
    storage::save_access_token(&refreshed.access_token);
    let user_info = api::get_current_user(&refreshed.access_token).await.ok()?;
    Some(AuthState {
        access_token: Some(refreshed.access_token),
        user_info: Some(user_info),
        restoring: false,
    })
}

#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let (auth_state, set_auth_state) = signal(AuthState {
        restoring: storage::get_access_token().is_some(),
        ..Default::default()
    });

    Effect::new(move |_| {
        if !auth_state.get_untracked().restoring {
            return;
        }
        spawn_local(async move {
            match restore_session().await {
                Some(state) => {
                    log::info!("session restored");
                    set_auth_state.set(state);
                }
                None => {
                    storage::clear_tokens();
                    set_auth_state.set(AuthState::default());
                }
            }
        });
    });

    provide_context(auth_state);
    provide_context(set_auth_state);

    children()
}

pub fn use_auth() -> (ReadSignal<AuthState>, WriteSignal<AuthState>) {
    let auth_state =
        use_context::<ReadSignal<AuthState>>().expect("AuthProvider not found in component tree");
    let set_auth_state =
        use_context::<WriteSignal<AuthState>>().expect("AuthProvider not found in component tree");
    (auth_state, set_auth_state)
}

/// Сигнал «можно редактировать» для кнопок и форм
pub fn use_can_edit() -> Signal<bool> {
    let (auth_state, _) = use_auth();
    Signal::derive(move || auth_state.with(|s| s.can_edit()))
}

pub async fn do_login(
    set_auth_state: WriteSignal<AuthState>,
    username: String,
    password: String,
) -> Result<(), String> {
    let response = api::login(username, password).await?;
    storage::save_tokens(&response.access_token, &response.refresh_token);
    log::info!("logged in as {}", response.user.username);
    set_auth_state.set(AuthState {
        access_token: Some(response.access_token),
        user_info: Some(response.user),
        restoring: false,
    });
    Ok(())
}

pub async fn do_logout(set_auth_state: WriteSignal<AuthState>) {
    if let Some(refresh_token) = storage::get_refresh_token() {
        if let Err(e) = api::logout(refresh_token).await {
            log::warn!("logout: {}", e);
        }
    }
    storage::clear_tokens();
    set_auth_state.set(AuthState::default());
}
