//! Выгрузка журнала инцидентов в CSV

use std::collections::HashMap;

use anyhow::Result;
use contracts::domain::a006_corrective_maintenance::aggregate::CorrectiveMaintenance;
use contracts::domain::common::StatusWorkflow;

use crate::shared::format::format_minutes;

const HEADERS: [&str; 9] = [
    "Код",
    "Инцидент",
    "Оборудование",
    "Приоритет",
    "Статус",
    "Зарегистрирован",
    "Устранён",
    "Простой",
    "Причина",
];

pub fn render(
    incidents: &[CorrectiveMaintenance],
    equipment_names: &HashMap<String, String>,
) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for c in incidents {
        let equipment = equipment_names
            .get(&c.equipment_id)
            .map(String::as_str)
            .unwrap_or(&c.equipment_id);
        let reported = c.reported_at.format("%d.%m.%Y %H:%M").to_string();
        let resolved = c
            .resolved_at
            .map(|d| d.format("%d.%m.%Y %H:%M").to_string())
            .unwrap_or_default();
        let downtime = c.effective_downtime().map(format_minutes).unwrap_or_default();
        writer.write_record([
            c.base.code.as_str(),
            c.base.description.as_str(),
            equipment,
            c.priority.label(),
            c.status.label(),
            reported.as_str(),
            resolved.as_str(),
            downtime.as_str(),
            c.root_cause.as_str(),
        ])?;
    }

    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(format!("\u{FEFF}{}", String::from_utf8(bytes)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use contracts::domain::a006_corrective_maintenance::aggregate::{IncidentStatus, Priority};

    #[test]
    fn test_render_incident_row() {
        let mut c = CorrectiveMaintenance::new_for_insert(
            "CM-0001".into(),
            "Течь сальника".into(),
            "eq1".into(),
            "u1".into(),
        );
        c.priority = Priority::High;
        c.status = IncidentStatus::Completed;
        c.reported_at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        c.started_at = Some(Utc.with_ymd_and_hms(2024, 5, 2, 9, 0, 0).unwrap());
        c.resolved_at = Some(Utc.with_ymd_and_hms(2024, 5, 2, 11, 15, 0).unwrap());
        c.root_cause = "Износ".into();

        let mut names = HashMap::new();
        names.insert("eq1".to_string(), "EQ-0001 Насос".to_string());

        let csv = render(&[c], &names).unwrap();
        let row = csv.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "CM-0001;Течь сальника;EQ-0001 Насос;Высокий;Устранён;02.05.2024 08:30;02.05.2024 11:15;2 ч 15 мин;Износ"
        );
    }
}
