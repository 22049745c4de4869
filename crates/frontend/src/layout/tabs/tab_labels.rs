//! Tab labels - единственный источник правды для заголовков табов.
//!
//! Для агрегатов заголовки берутся из `AggregateRoot::list_name/element_name`,
//! для юзкейсов из `UseCaseMetadata::display_name`, остальное хардкод.

use contracts::domain::a001_factory::Factory;
use contracts::domain::a002_equipment::Equipment;
use contracts::domain::a003_checklist_template::ChecklistTemplate;
use contracts::domain::a004_pm_plan::PmPlan;
use contracts::domain::a005_work_order::WorkOrder;
use contracts::domain::a006_corrective_maintenance::CorrectiveMaintenance;
use contracts::domain::common::AggregateRoot;
use contracts::usecases::common::UseCaseMetadata;
use contracts::usecases::u100_pm_plan_wizard::PmPlanWizard;

const DETAIL_MARKER: &str = "_detail_";
const NEW_ID: &str = "new";

/// Возвращает читаемый заголовок таба для данного ключа.
///
/// Fallback: пустая строка.
pub fn tab_label_for_key(key: &str) -> &'static str {
    match key {
        // ── Дашборды ──────────────────────────────────────────────────────
        "d100_overview" => "Обзор",

        // ── Агрегаты ──────────────────────────────────────────────────────
        "a001_factory" => Factory::list_name(),
        "a002_equipment" => Equipment::list_name(),
        "a003_checklist_template" => ChecklistTemplate::list_name(),
        "a004_pm_plan" => PmPlan::list_name(),
        "a005_work_order" => WorkOrder::list_name(),
        "a006_corrective_maintenance" => CorrectiveMaintenance::list_name(),

        // ── Юзкейсы ───────────────────────────────────────────────────────
        "u100_pm_plan_wizard" => PmPlanWizard::display_name(),

        // ── Система ───────────────────────────────────────────────────────
        "sys_users" => "Пользователи",
        "sys_logs" => "Журнал событий",
        "sys_scheduler" => "Планировщик",

        _ => "",
    }
}

/// Возвращает element_name для агрегата по ключу (для detail-табов).
pub fn entity_element_name(aggregate_key: &str) -> &'static str {
    match aggregate_key {
        "a001_factory" => Factory::element_name(),
        "a002_equipment" => Equipment::element_name(),
        "a003_checklist_template" => ChecklistTemplate::element_name(),
        "a004_pm_plan" => PmPlan::element_name(),
        "a005_work_order" => WorkOrder::element_name(),
        "a006_corrective_maintenance" => CorrectiveMaintenance::element_name(),
        _ => "",
    }
}

/// Возвращает первый непустой идентификатор: код → наименование → id
pub fn pick_identifier<'a>(code: Option<&'a str>, description: Option<&'a str>, id: &'a str) -> &'a str {
    [code, description]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .unwrap_or(id)
}

/// Формирует заголовок detail-таба: «<entity> · <identifier>».
///
/// Пример: `detail_tab_label("Завод", "FAC-0001")` → `"Завод · FAC-0001"`
pub fn detail_tab_label(entity_label: &'static str, identifier: &str) -> String {
    format!("{} · {}", entity_label, identifier)
}

/// Ключ detail-таба: `a001_factory_detail_<id>` или `a001_factory_detail_new`
pub fn detail_key(aggregate_key: &str, id: Option<&str>) -> String {
    format!("{}{}{}", aggregate_key, DETAIL_MARKER, id.unwrap_or(NEW_ID))
}

/// Разбор ключа detail-таба на (агрегат, id). `None` у id означает новый элемент.
pub fn parse_detail_key(key: &str) -> Option<(&str, Option<&str>)> {
    let (aggregate, id) = key.split_once(DETAIL_MARKER)?;
    if aggregate.is_empty() || id.is_empty() || entity_element_name(aggregate).is_empty() {
        return None;
    }
    Some((aggregate, (id != NEW_ID).then_some(id)))
}

/// Заголовок для любого ключа, включая detail-табы, открытые по ссылке
pub fn title_for_key(key: &str) -> String {
    let label = tab_label_for_key(key);
    if !label.is_empty() {
        return label.to_string();
    }
    match parse_detail_key(key) {
        Some((aggregate, Some(id))) => {
            let short: String = id.chars().take(8).collect();
            detail_tab_label(entity_element_name(aggregate), &short)
        }
        Some((aggregate, None)) => detail_tab_label(entity_element_name(aggregate), "новый"),
        None => key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_key_roundtrip() {
        let key = detail_key("a002_equipment", Some("4f1c-77"));
        assert_eq!(key, "a002_equipment_detail_4f1c-77");
        assert_eq!(parse_detail_key(&key), Some(("a002_equipment", Some("4f1c-77"))));

        let key = detail_key("a005_work_order", None);
        assert_eq!(parse_detail_key(&key), Some(("a005_work_order", None)));
    }

    #[test]
    fn test_parse_detail_key_rejects_unknown() {
        assert_eq!(parse_detail_key("a001_factory"), None);
        assert_eq!(parse_detail_key("zzz_detail_1"), None);
        assert_eq!(parse_detail_key("a001_factory_detail_"), None);
    }

    #[test]
    fn test_title_for_key() {
        assert_eq!(title_for_key("sys_logs"), "Журнал событий");
        assert_eq!(title_for_key("a001_factory"), "Заводы");
        assert_eq!(title_for_key("a001_factory_detail_new"), "Завод · новый");
        assert_eq!(
            title_for_key("a001_factory_detail_0123456789ab"),
            "Завод · 01234567"
        );
        assert_eq!(title_for_key("unknown"), "unknown");
    }

    #[test]
    fn test_pick_identifier() {
        assert_eq!(pick_identifier(Some("EQ-0001"), Some("Насос"), "id"), "EQ-0001");
        assert_eq!(pick_identifier(Some(" "), Some("Насос"), "id"), "Насос");
        assert_eq!(pick_identifier(None, None, "id"), "id");
    }
}
