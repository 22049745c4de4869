//! Расчёт нарядов по плану ТО: первичная генерация при активации
//! и продление повторяющихся планов планировщиком.

use chrono::{Duration, NaiveDate};
use contracts::domain::a004_pm_plan::aggregate::{PlanStatus, PmPlan};
use contracts::domain::a005_work_order::aggregate::WorkOrder;

/// Наряд, который нужно создать
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedOrder {
    pub equipment_id: String,
    pub checklist_template_id: String,
    pub planned_date: NaiveDate,
}

fn belongs_to(plan_id: &str, w: &WorkOrder, equipment_id: &str) -> bool {
    w.pm_plan_id.as_deref() == Some(plan_id) && w.equipment_id == equipment_id
}

fn already_planned(plan_id: &str, existing: &[WorkOrder], order: &PlannedOrder) -> bool {
    existing
        .iter()
        .any(|w| belongs_to(plan_id, w, &order.equipment_id) && w.planned_date == order.planned_date)
}

/// Наряды по строкам плана. Строки, для которых наряд на ту же дату уже есть, пропускаются.
///
/// Возвращает список к созданию и количество пропущенных строк.
pub fn initial_orders(plan: &PmPlan, existing: &[WorkOrder]) -> (Vec<PlannedOrder>, usize) {
    let plan_id = plan.to_string_id();
    let mut orders = Vec::new();
    let mut skipped = 0;

    for item in &plan.items {
        let (Some(checklist), Some(date)) = (
            item.checklist_template_id.as_deref().filter(|s| !s.trim().is_empty()),
            item.planned_date,
        ) else {
            skipped += 1;
            continue;
        };
        let order = PlannedOrder {
            equipment_id: item.equipment_id.clone(),
            checklist_template_id: checklist.to_string(),
            planned_date: date,
        };
        if already_planned(&plan_id, existing, &order) {
            skipped += 1;
        } else {
            orders.push(order);
        }
    }

    (orders, skipped)
}

/// Следующие наряды повторяющегося плана.
///
/// Для каждой строки берётся последний по дате наряд плана; если он выполнен или закрыт,
/// планируется следующий на `дата + периодичность`, при условии что дата укладывается
/// в срок действия плана и в горизонт `today + lookahead_days`.
pub fn rollover_orders(
    plan: &PmPlan,
    existing: &[WorkOrder],
    today: NaiveDate,
    lookahead_days: i64,
) -> Vec<PlannedOrder> {
    if plan.status != PlanStatus::Active || !plan.frequency.is_recurring() {
        return Vec::new();
    }
    let plan_id = plan.to_string_id();
    let horizon = today + Duration::days(lookahead_days.max(0));
    let mut orders = Vec::new();

    for item in &plan.items {
        let Some(last) = existing
            .iter()
            .filter(|w| belongs_to(&plan_id, w, &item.equipment_id))
            .max_by_key(|w| w.planned_date)
        else {
            continue;
        };
        if !last.status.is_done() {
            continue;
        }
        let Some(next_date) = plan.next_occurrence(last.planned_date) else {
            continue;
        };
        if next_date > horizon {
            continue;
        }
        let checklist = item
            .checklist_template_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| last.checklist_template_id.clone());

        orders.push(PlannedOrder {
            equipment_id: item.equipment_id.clone(),
            checklist_template_id: checklist,
            planned_date: next_date,
        });
    }

    orders
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a004_pm_plan::aggregate::{Frequency, PmPlanItem};
    use contracts::domain::a005_work_order::aggregate::WorkOrderStatus;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn plan(frequency: Frequency) -> PmPlan {
        let mut p = PmPlan::new_for_insert("PM-0001".into(), "План".into(), "f1".into(), d(2024, 1, 1));
        p.frequency = frequency;
        p.status = PlanStatus::Active;
        p.items = vec![
            PmPlanItem {
                equipment_id: "eq1".into(),
                checklist_template_id: Some("cl1".into()),
                planned_date: Some(d(2024, 1, 15)),
            },
            PmPlanItem {
                equipment_id: "eq2".into(),
                checklist_template_id: Some("cl2".into()),
                planned_date: Some(d(2024, 1, 20)),
            },
        ];
        p
    }

    fn order(p: &PmPlan, equipment: &str, date: NaiveDate, status: WorkOrderStatus) -> WorkOrder {
        let mut w = WorkOrder::new_for_insert(
            "WO".into(),
            "ТО".into(),
            equipment.into(),
            "cl1".into(),
            date,
        );
        w.pm_plan_id = Some(p.to_string_id());
        w.status = status;
        w
    }

    #[test]
    fn test_initial_orders_for_new_plan() {
        let p = plan(Frequency::Monthly);
        let (orders, skipped) = initial_orders(&p, &[]);
        assert_eq!(skipped, 0);
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].planned_date, d(2024, 1, 15));
        assert_eq!(orders[1].checklist_template_id, "cl2");
    }

    #[test]
    fn test_initial_orders_is_idempotent() {
        let p = plan(Frequency::Monthly);
        let existing = vec![order(&p, "eq1", d(2024, 1, 15), WorkOrderStatus::New)];
        let (orders, skipped) = initial_orders(&p, &existing);
        assert_eq!(skipped, 1);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].equipment_id, "eq2");
    }

    #[test]
    fn test_initial_orders_ignores_other_plans() {
        let p = plan(Frequency::Monthly);
        let mut foreign = order(&p, "eq1", d(2024, 1, 15), WorkOrderStatus::New);
        foreign.pm_plan_id = Some("other".into());
        let (orders, _) = initial_orders(&p, &[foreign]);
        assert_eq!(orders.len(), 2);
    }

    #[test]
    fn test_rollover_after_completion() {
        let p = plan(Frequency::Monthly);
        let existing = vec![
            order(&p, "eq1", d(2024, 1, 15), WorkOrderStatus::Completed),
            order(&p, "eq2", d(2024, 1, 20), WorkOrderStatus::InProgress),
        ];
        let orders = rollover_orders(&p, &existing, d(2024, 1, 25), 30);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].equipment_id, "eq1");
        assert_eq!(orders[0].planned_date, d(2024, 2, 15));
    }

    #[test]
    fn test_rollover_respects_horizon_and_end_date() {
        let mut p = plan(Frequency::Quarterly);
        let existing = vec![order(&p, "eq1", d(2024, 1, 15), WorkOrderStatus::Closed)];
        assert!(rollover_orders(&p, &existing, d(2024, 1, 25), 30).is_empty());
        assert_eq!(rollover_orders(&p, &existing, d(2024, 3, 20), 30).len(), 1);

        p.end_date = Some(d(2024, 3, 31));
        assert!(rollover_orders(&p, &existing, d(2024, 3, 20), 30).is_empty());
    }

    #[test]
    fn test_rollover_skips_once_and_inactive_plans() {
        let mut p = plan(Frequency::Once);
        let existing = vec![order(&p, "eq1", d(2024, 1, 15), WorkOrderStatus::Completed)];
        assert!(rollover_orders(&p, &existing, d(2024, 1, 25), 365).is_empty());

        p.frequency = Frequency::Weekly;
        p.status = PlanStatus::Inactive;
        assert!(rollover_orders(&p, &existing, d(2024, 1, 25), 365).is_empty());
    }

    #[test]
    fn test_rollover_uses_latest_order() {
        let p = plan(Frequency::Weekly);
        let existing = vec![
            order(&p, "eq1", d(2024, 1, 15), WorkOrderStatus::Closed),
            order(&p, "eq1", d(2024, 1, 22), WorkOrderStatus::New),
        ];
        assert!(rollover_orders(&p, &existing, d(2024, 1, 25), 30).is_empty());
    }
}
