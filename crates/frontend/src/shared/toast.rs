//! Всплывающие уведомления поверх `ToasterProvider`
//!
//! Уведомления вызываются из `spawn_local` после `await`, где реактивного
//! владельца уже нет, поэтому `ToasterInjection` запоминается один раз
//! компонентом `ToastBridge`.

use std::cell::RefCell;

use leptos::prelude::*;
use thaw::*;

thread_local! {
    static TOASTER: RefCell<Option<ToasterInjection>> = const { RefCell::new(None) };
}

/// Ставится внутрь `ToasterProvider`
#[component]
pub fn ToastBridge(children: Children) -> impl IntoView {
    let toaster = ToasterInjection::expect_context();
    TOASTER.with(|t| *t.borrow_mut() = Some(toaster));
    children()
}

fn dispatch(intent: ToastIntent, title: String, body: Option<String>) {
    let toaster = TOASTER.with(|t| t.borrow().clone());
    let Some(toaster) = toaster else {
        log::warn!("toaster is not installed: {}", title);
        return;
    };
    toaster.dispatch_toast(
        move || {
            view! {
                <Toast>
                    <ToastTitle>{title}</ToastTitle>
                    {body.map(|b| view! { <ToastBody>{b}</ToastBody> })}
                </Toast>
            }
        },
        ToastOptions::default().with_intent(intent),
    );
}

/// Ошибка запроса или валидации на сервере
pub fn notify_error(message: impl Into<String>) {
    let message = message.into();
    log::error!("{}", message);
    dispatch(ToastIntent::Error, "Ошибка".to_string(), Some(message));
}

pub fn notify_success(message: impl Into<String>) {
    dispatch(ToastIntent::Success, message.into(), None);
}

/// Подтверждение через диалог браузера
pub fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}
