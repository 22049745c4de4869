//! Выгрузка списка заказ-нарядов в CSV (разделитель `;`, UTF-8 с BOM для Excel)

use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use contracts::domain::a005_work_order::aggregate::WorkOrder;
use contracts::domain::common::StatusWorkflow;

const HEADERS: [&str; 9] = [
    "Код",
    "Наименование",
    "Оборудование",
    "Плановая дата",
    "Статус",
    "Исполнитель",
    "Просрочен",
    "Не в норме",
    "Выполнен",
];

/// Отображаемые имена для ссылок (оборудование, пользователи)
#[derive(Debug, Default)]
pub struct Lookups {
    pub equipment: HashMap<String, String>,
    pub users: HashMap<String, String>,
}

impl Lookups {
    fn name<'a>(map: &'a HashMap<String, String>, id: &'a str) -> &'a str {
        map.get(id).map(String::as_str).unwrap_or(id)
    }
}

pub fn render(orders: &[WorkOrder], lookups: &Lookups, today: NaiveDate) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for w in orders {
        let assignee = w
            .assignee_id
            .as_deref()
            .map(|id| Lookups::name(&lookups.users, id))
            .unwrap_or("");
        let completed = w
            .completed_at
            .map(|d| d.format("%d.%m.%Y %H:%M").to_string())
            .unwrap_or_default();
        let planned = w.planned_date.format("%d.%m.%Y").to_string();
        let failed = w.failed_count().to_string();
        writer.write_record([
            w.base.code.as_str(),
            w.base.description.as_str(),
            Lookups::name(&lookups.equipment, &w.equipment_id),
            planned.as_str(),
            w.status.label(),
            assignee,
            if w.is_overdue(today) { "да" } else { "" },
            failed.as_str(),
            completed.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(format!("\u{FEFF}{}", String::from_utf8(bytes)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a005_work_order::aggregate::{ChecklistResult, WorkOrderStatus};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_render_header_and_rows() {
        let mut w = WorkOrder::new_for_insert(
            "WO-0001".into(),
            "ТО насоса; плановое".into(),
            "eq1".into(),
            "cl1".into(),
            d(2024, 3, 1),
        );
        w.assignee_id = Some("u1".into());
        w.results = vec![ChecklistResult {
            item_id: "i1".into(),
            passed: Some(false),
            ..Default::default()
        }];

        let mut lookups = Lookups::default();
        lookups.equipment.insert("eq1".into(), "EQ-0001 Насос".into());
        lookups.users.insert("u1".into(), "Иванов".into());

        let csv = render(&[w], &lookups, d(2024, 3, 5)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert!(lines[0].starts_with("\u{FEFF}Код;Наименование"));
        assert_eq!(
            lines[1],
            "WO-0001;\"ТО насоса; плановое\";EQ-0001 Насос;01.03.2024;Новый;Иванов;да;1;"
        );
    }

    #[test]
    fn test_unknown_references_fall_back_to_id() {
        let mut w = WorkOrder::new_for_insert(
            "WO-0002".into(),
            "ТО".into(),
            "eq-x".into(),
            "cl1".into(),
            d(2024, 3, 10),
        );
        w.status = WorkOrderStatus::Closed;
        let csv = render(&[w], &Lookups::default(), d(2024, 3, 20)).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(row, "WO-0002;ТО;eq-x;10.03.2024;Закрыт;;;0;");
    }
}
