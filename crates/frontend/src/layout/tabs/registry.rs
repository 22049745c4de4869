//! Tab registry - маппинг tab.key → View

use super::tab_labels::parse_detail_key;
use crate::dashboards::d100_overview::ui::OverviewDashboard;
use crate::domain::a001_factory::ui::details::FactoryDetails;
use crate::domain::a001_factory::ui::list::FactoryList;
use crate::domain::a002_equipment::ui::details::EquipmentDetails;
use crate::domain::a002_equipment::ui::list::EquipmentList;
use crate::domain::a003_checklist_template::ui::details::ChecklistTemplateDetails;
use crate::domain::a003_checklist_template::ui::list::ChecklistTemplateList;
use crate::domain::a004_pm_plan::ui::details::PmPlanDetails;
use crate::domain::a004_pm_plan::ui::list::PmPlanList;
use crate::domain::a005_work_order::ui::details::WorkOrderDetails;
use crate::domain::a005_work_order::ui::list::WorkOrderList;
use crate::domain::a006_corrective_maintenance::ui::details::IncidentDetails;
use crate::domain::a006_corrective_maintenance::ui::list::IncidentList;
use crate::layout::global_context::AppGlobalContext;
use crate::system::logs::ui::SystemLogPage;
use crate::system::scheduler::SchedulerPage;
use crate::system::users::ui::list::UsersListPage;
use crate::usecases::u100_pm_plan_wizard::PmPlanWizardPage;
use leptos::prelude::*;

/// Рендерит контент таба по его ключу.
///
/// # Arguments
/// * `key` - ключ таба (например "a002_equipment" или "a002_equipment_detail_<id>")
/// * `tabs_store` - контекст для закрытия detail-таба после сохранения/отмены
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    match key {
        "d100_overview" => view! { <OverviewDashboard /> }.into_any(),

        "a001_factory" => view! { <FactoryList /> }.into_any(),
        "a002_equipment" => view! { <EquipmentList /> }.into_any(),
        "a003_checklist_template" => view! { <ChecklistTemplateList /> }.into_any(),
        "a004_pm_plan" => view! { <PmPlanList /> }.into_any(),
        "a005_work_order" => view! { <WorkOrderList /> }.into_any(),
        "a006_corrective_maintenance" => view! { <IncidentList /> }.into_any(),

        "u100_pm_plan_wizard" => view! { <PmPlanWizardPage /> }.into_any(),

        "sys_users" => view! { <UsersListPage /> }.into_any(),
        "sys_logs" => view! { <SystemLogPage /> }.into_any(),
        "sys_scheduler" => view! { <SchedulerPage /> }.into_any(),

        k => match parse_detail_key(k) {
            Some((aggregate, id)) => render_detail(aggregate, id.map(str::to_string), k, tabs_store),
            None => {
                log::warn!("unknown tab key: {}", k);
                view! { <div class="placeholder">"Раздел не найден"</div> }.into_any()
            }
        },
    }
}

fn render_detail(
    aggregate: &str,
    id: Option<String>,
    key: &str,
    tabs_store: AppGlobalContext,
) -> AnyView {
    let key_for_close = key.to_string();
    let close = Callback::new(move |_| tabs_store.close_tab(&key_for_close));

    match aggregate {
        "a001_factory" => {
            view! { <FactoryDetails id=id on_saved=close on_cancel=close /> }.into_any()
        }
        "a002_equipment" => {
            view! { <EquipmentDetails id=id on_saved=close on_cancel=close /> }.into_any()
        }
        "a003_checklist_template" => {
            view! { <ChecklistTemplateDetails id=id on_saved=close on_cancel=close /> }.into_any()
        }
        "a004_pm_plan" => {
            view! { <PmPlanDetails id=id on_saved=close on_cancel=close /> }.into_any()
        }
        "a005_work_order" => {
            view! { <WorkOrderDetails id=id on_saved=close on_cancel=close /> }.into_any()
        }
        "a006_corrective_maintenance" => {
            view! { <IncidentDetails id=id on_saved=close on_cancel=close /> }.into_any()
        }
        _ => view! { <div class="placeholder">"Раздел не найден"</div> }.into_any(),
    }
}
