use std::collections::HashSet;

use anyhow::Result;
use chrono::Utc;
use contracts::dashboards::d100_overview::OverviewResponse;

use crate::domain::{a001_factory, a002_equipment, a005_work_order, a006_corrective_maintenance};

/// Показатели дашборда «Обзор». При заданном `factory_id` учитывается только этот завод.
pub async fn get_overview(factory_id: Option<&str>) -> Result<OverviewResponse> {
    let mut factories = a001_factory::repository::list_all().await?;
    let mut equipment = a002_equipment::repository::list_all().await?;
    let mut work_orders = a005_work_order::repository::list_all().await?;
    let mut incidents = a006_corrective_maintenance::repository::list_all().await?;

    if let Some(factory_id) = factory_id.filter(|s| !s.is_empty()) {
        factories.retain(|f| f.to_string_id() == factory_id);
        equipment.retain(|e| e.factory_id == factory_id);
        let ids: HashSet<String> = equipment.iter().map(|e| e.to_string_id()).collect();
        work_orders.retain(|w| ids.contains(&w.equipment_id));
        incidents.retain(|c| ids.contains(&c.equipment_id));
    }

    Ok(OverviewResponse::build(
        &factories,
        &equipment,
        &work_orders,
        &incidents,
        Utc::now().date_naive(),
    ))
}
