use contracts::domain::a005_work_order::aggregate::WorkOrderStatus;
use contracts::domain::a006_corrective_maintenance::aggregate::Priority;
use contracts::domain::common::StatusWorkflow;
use leptos::prelude::*;
use thaw::*;

/// Цвет бейджа по строковому значению статуса
pub fn status_color(status: &str) -> BadgeColor {
    match status {
        "active" | "completed" | "closed" => BadgeColor::Success,
        "in_progress" | "under_maintenance" => BadgeColor::Warning,
        "retired" | "critical" => BadgeColor::Danger,
        "new" | "draft" => BadgeColor::Brand,
        _ => BadgeColor::Informative,
    }
}

/// Бейдж статуса любого агрегата
#[component]
pub fn StatusBadge<S>(status: S) -> impl IntoView
where
    S: StatusWorkflow + Send + Sync,
{
    view! {
        <Badge appearance=BadgeAppearance::Tint color=status_color(status.as_str())>
            {status.label()}
        </Badge>
    }
}

#[component]
pub fn PriorityBadge(priority: Priority) -> impl IntoView {
    let color = match priority {
        Priority::Low => BadgeColor::Informative,
        Priority::Medium => BadgeColor::Brand,
        Priority::High => BadgeColor::Warning,
        Priority::Critical => BadgeColor::Danger,
    };
    view! {
        <Badge appearance=BadgeAppearance::Filled color=color>
            {priority.label()}
        </Badge>
    }
}

/// Кнопки допустимых переходов из текущего статуса
#[component]
pub fn StatusActions<S>(
    #[prop(into)]
    current: Signal<S>,
    on_change: Callback<S>,
    #[prop(optional, into)]
    disabled: Signal<bool>,
) -> impl IntoView
where
    S: StatusWorkflow + Send + Sync,
{
    view! {
        <Flex gap=FlexGap::Small>
            {move || {
                current
                    .get()
                    .next_statuses()
                    .into_iter()
                    .map(|next| {
                        view! {
                            <Button
                                size=ButtonSize::Small
                                appearance=ButtonAppearance::Secondary
                                disabled=disabled
                                on_click=move |_| on_change.run(next)
                            >
                                {next.label()}
                            </Button>
                        }
                    })
                    .collect_view()
            }}
        </Flex>
    }
}

/// Подпись статуса наряда в карточке: просроченный помечается отдельно
pub fn work_order_caption(status: WorkOrderStatus, overdue: bool) -> String {
    if overdue && status.is_open() {
        format!("{} (просрочен)", status.label())
    } else {
        status.label().to_string()
    }
}
