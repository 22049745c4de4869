use crate::domain::a001_factory::Factory;
use crate::domain::a002_equipment::{Equipment, EquipmentStatus};
use crate::domain::a005_work_order::{WorkOrder, WorkOrderStatus};
use crate::domain::a006_corrective_maintenance::{CorrectiveMaintenance, IncidentStatus, Priority};
use crate::domain::common::{AggregateId, StatusWorkflow};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Горизонт «ближайших» нарядов, дней
pub const DUE_SOON_DAYS: i64 = 7;

/// Сколько последних инцидентов показывать
pub const RECENT_INCIDENTS_LIMIT: usize = 10;

/// Количество по ключу (статус, приоритет)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountByKey {
    /// Значение для API, например "in_progress"
    pub key: String,
    /// Подпись для UI
    pub label: String,
    pub count: usize,
}

/// Краткая строка инцидента для ленты на дашборде
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentIncident {
    pub id: String,
    pub code: String,
    pub description: String,
    pub equipment_id: String,
    pub priority: Priority,
    pub status: IncidentStatus,
    pub reported_at: DateTime<Utc>,
}

/// Ответ дашборда «Обзор»
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewResponse {
    /// Дата расчёта
    pub as_of: NaiveDate,
    pub factory_count: usize,
    pub equipment_count: usize,
    pub equipment_by_status: Vec<CountByKey>,
    pub work_orders_by_status: Vec<CountByKey>,
    pub overdue_work_orders: usize,
    pub due_soon_work_orders: usize,
    pub open_incidents_by_priority: Vec<CountByKey>,
    /// Доля выполненных нарядов среди тех, чей срок наступил, %
    pub pm_compliance_percent: f64,
    pub recent_incidents: Vec<RecentIncident>,
}

impl OverviewResponse {
    /// Собрать показатели по уже загруженным (не удалённым) данным
    pub fn build(
        factories: &[Factory],
        equipment: &[Equipment],
        work_orders: &[WorkOrder],
        incidents: &[CorrectiveMaintenance],
        today: NaiveDate,
    ) -> Self {
        let equipment_by_status = EquipmentStatus::all()
            .iter()
            .map(|s| CountByKey {
                key: s.as_str().to_string(),
                label: s.label().to_string(),
                count: equipment.iter().filter(|e| e.status == *s).count(),
            })
            .collect();

        let work_orders_by_status = WorkOrderStatus::all()
            .iter()
            .map(|s| CountByKey {
                key: s.as_str().to_string(),
                label: s.label().to_string(),
                count: work_orders.iter().filter(|w| w.status == *s).count(),
            })
            .collect();

        let horizon = today + Duration::days(DUE_SOON_DAYS);
        let overdue_work_orders = work_orders.iter().filter(|w| w.is_overdue(today)).count();
        let due_soon_work_orders = work_orders
            .iter()
            .filter(|w| w.status.is_open() && w.planned_date >= today && w.planned_date <= horizon)
            .count();

        // Приоритеты от критического к низкому
        let open_incidents_by_priority = Priority::all()
            .iter()
            .rev()
            .map(|p| CountByKey {
                key: p.as_str().to_string(),
                label: p.label().to_string(),
                count: incidents
                    .iter()
                    .filter(|c| c.status.is_open() && c.priority == *p)
                    .count(),
            })
            .collect();

        let mut recent: Vec<&CorrectiveMaintenance> = incidents.iter().collect();
        recent.sort_by(|a, b| b.reported_at.cmp(&a.reported_at));
        let recent_incidents = recent
            .into_iter()
            .take(RECENT_INCIDENTS_LIMIT)
            .map(|c| RecentIncident {
                id: c.base.id.as_string(),
                code: c.base.code.clone(),
                description: c.base.description.clone(),
                equipment_id: c.equipment_id.clone(),
                priority: c.priority,
                status: c.status,
                reported_at: c.reported_at,
            })
            .collect();

        Self {
            as_of: today,
            factory_count: factories.len(),
            equipment_count: equipment.len(),
            equipment_by_status,
            work_orders_by_status,
            overdue_work_orders,
            due_soon_work_orders,
            open_incidents_by_priority,
            pm_compliance_percent: pm_compliance(work_orders, today),
            recent_incidents,
        }
    }
}

/// Выполнение плана ТО: выполненные/закрытые среди нарядов со сроком до `today`.
/// Если срок ни у одного наряда не наступил — 100%.
pub fn pm_compliance(work_orders: &[WorkOrder], today: NaiveDate) -> f64 {
    let due: Vec<&WorkOrder> = work_orders
        .iter()
        .filter(|w| w.pm_plan_id.is_some() && w.planned_date <= today)
        .collect();
    if due.is_empty() {
        return 100.0;
    }
    let done = due.iter().filter(|w| w.status.is_done()).count();
    let percent = done as f64 * 100.0 / due.len() as f64;
    (percent * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, day).unwrap()
    }

    fn wo(planned: NaiveDate, status: WorkOrderStatus) -> WorkOrder {
        let mut w = WorkOrder::new_for_insert(
            "WO".into(),
            "Осмотр".into(),
            "eq".into(),
            "cl".into(),
            planned,
        );
        w.pm_plan_id = Some("plan".into());
        w.status = status;
        w
    }

    #[test]
    fn test_compliance_without_due_orders_is_full() {
        assert_eq!(pm_compliance(&[], d(10)), 100.0);
        assert_eq!(pm_compliance(&[wo(d(20), WorkOrderStatus::New)], d(10)), 100.0);
    }

    #[test]
    fn test_compliance_rounding() {
        let orders = vec![
            wo(d(1), WorkOrderStatus::Completed),
            wo(d(2), WorkOrderStatus::New),
            wo(d(3), WorkOrderStatus::InProgress),
        ];
        assert_eq!(pm_compliance(&orders, d(10)), 33.3);
    }

    #[test]
    fn test_build_counts() {
        let orders = vec![
            wo(d(1), WorkOrderStatus::New),
            wo(d(12), WorkOrderStatus::New),
            wo(d(30), WorkOrderStatus::New),
            wo(d(2), WorkOrderStatus::Closed),
        ];
        let mut incident = CorrectiveMaintenance::new_for_insert(
            "CM".into(),
            "Поломка".into(),
            "eq".into(),
            "tech".into(),
        );
        incident.priority = Priority::Critical;
        let overview = OverviewResponse::build(&[], &[], &orders, &[incident], d(10));

        assert_eq!(overview.overdue_work_orders, 1);
        assert_eq!(overview.due_soon_work_orders, 1);
        assert_eq!(overview.work_orders_by_status[0].count, 3);
        assert_eq!(overview.open_incidents_by_priority[0].key, "critical");
        assert_eq!(overview.open_incidents_by_priority[0].count, 1);
        assert_eq!(overview.recent_incidents.len(), 1);
        assert_eq!(overview.pm_compliance_percent, 50.0);
    }
}
