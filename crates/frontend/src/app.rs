use crate::layout::global_context::AppGlobalContext;
use crate::routes::routes::AppRoutes;
use crate::shared::toast::ToastBridge;
use crate::system::auth::context::AuthProvider;
use leptos::prelude::*;
use thaw::*;

#[component]
pub fn App() -> impl IntoView {
    // Provide the AppGlobalContext store to the whole app via context.
    provide_context(AppGlobalContext::new());

    view! {
        <ConfigProvider>
            <ToasterProvider>
                <ToastBridge>
                    <AuthProvider>
                        <AppRoutes />
                    </AuthProvider>
                </ToastBridge>
            </ToasterProvider>
        </ConfigProvider>
    }
}
