use std::collections::HashMap;

use super::{csv_export, repository};
use crate::domain::a002_equipment;
use crate::shared::error::{parse_id, ServiceError};
use crate::shared::logger;
use chrono::Utc;
use contracts::domain::a006_corrective_maintenance::aggregate::{
    CorrectiveMaintenance, CorrectiveMaintenanceDto, IncidentListQuery, IncidentStatus, Priority,
};
use contracts::domain::common::{AggregateRoot, StatusWorkflow};
use uuid::Uuid;

fn category() -> String {
    CorrectiveMaintenance::full_name()
}

async fn ensure_equipment_exists(equipment_id: &str) -> anyhow::Result<String> {
    let id = parse_id(equipment_id)?;
    let equipment = a002_equipment::repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::validation("Оборудование не найдено"))?;
    Ok(equipment.base.code)
}

/// Регистрация инцидента от имени пользователя `reported_by`
pub async fn create(dto: CorrectiveMaintenanceDto, reported_by: &str) -> anyhow::Result<Uuid> {
    let equipment_code = ensure_equipment_exists(&dto.equipment_id).await?;

    let code = match dto.code.clone().filter(|c| !c.trim().is_empty()) {
        Some(code) => code,
        None => CorrectiveMaintenance::format_code(repository::count_all().await? + 1),
    };

    let mut aggregate = CorrectiveMaintenance::new_for_insert(
        code,
        dto.description.clone(),
        dto.equipment_id.clone(),
        reported_by.to_string(),
    );
    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;

    let message = format!(
        "Зарегистрирован инцидент {} ({}) по {}: {}",
        aggregate.base.code,
        aggregate.priority.label(),
        equipment_code,
        aggregate.base.description
    );
    if aggregate.priority == Priority::Critical {
        logger::warn(&category(), &message);
    } else {
        logger::log(&category(), &message);
    }
    Ok(id)
}

/// Обновление инцидента. Закрытый инцидент не редактируется.
pub async fn update(dto: CorrectiveMaintenanceDto) -> anyhow::Result<()> {
    let id = parse_id(dto.id.as_deref().unwrap_or_default())?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Инцидент не найден"))?;

    if aggregate.status == IncidentStatus::Closed {
        return Err(ServiceError::conflict("Закрытый инцидент не редактируется"));
    }
    if aggregate.equipment_id != dto.equipment_id {
        ensure_equipment_exists(&dto.equipment_id).await?;
    }

    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

/// Смена статуса инцидента
pub async fn change_status(
    id: Uuid,
    next: IncidentStatus,
    actor: &str,
) -> anyhow::Result<CorrectiveMaintenance> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Инцидент не найден"))?;

    aggregate
        .status
        .check_transition(next)
        .map_err(ServiceError::conflict)?;

    let previous = aggregate.status;
    aggregate
        .transition(next, Utc::now())
        .map_err(ServiceError::validation)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;

    logger::log(
        &category(),
        &format!(
            "Инцидент {}: {} → {} ({})",
            aggregate.base.code,
            previous.label(),
            next.label(),
            actor
        ),
    );
    Ok(aggregate)
}

/// Мягкое удаление. Удалить можно только новый инцидент.
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    if let Some(c) = repository::get_by_id(id).await? {
        if c.status != IncidentStatus::New {
            return Err(ServiceError::conflict(
                "Удалить можно только инцидент в статусе «Зарегистрирован»",
            ));
        }
    }
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<CorrectiveMaintenance>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<CorrectiveMaintenance>> {
    repository::list_all().await
}

/// Список с фильтрами
pub async fn list(query: &IncidentListQuery) -> anyhow::Result<Vec<CorrectiveMaintenance>> {
    Ok(repository::list_all()
        .await?
        .into_iter()
        .filter(|c| query.matches(c))
        .collect())
}

/// CSV текущего (отфильтрованного) списка
pub async fn export_csv(query: &IncidentListQuery) -> anyhow::Result<String> {
    let incidents = list(query).await?;
    let names: HashMap<String, String> = a002_equipment::repository::list_all()
        .await?
        .into_iter()
        .map(|e| {
            let name = format!("{} {}", e.base.code, e.base.description);
            (e.to_string_id(), name)
        })
        .collect();
    csv_export::render(&incidents, &names)
}

/// Вставка тестовых данных: два инцидента, один из них устранён
pub async fn insert_test_data(reported_by: &str) -> anyhow::Result<()> {
    if repository::get_by_code("CM-0001").await?.is_some() {
        return Ok(());
    }
    let Some(compressor) = a002_equipment::repository::get_by_code("EQ-0003").await? else {
        return Err(ServiceError::conflict("Сначала создайте тестовое оборудование"));
    };
    let pump = a002_equipment::repository::get_by_code("EQ-0002")
        .await?
        .unwrap_or_else(|| compressor.clone());

    create(
        CorrectiveMaintenanceDto {
            code: Some("CM-0001".into()),
            description: "Компрессор не набирает давление".into(),
            equipment_id: compressor.to_string_id(),
            details: "Давление в ресивере не поднимается выше 5 бар".into(),
            priority: Priority::Critical,
            ..Default::default()
        },
        reported_by,
    )
    .await?;

    let id = create(
        CorrectiveMaintenanceDto {
            code: Some("CM-0002".into()),
            description: "Течь по торцевому уплотнению".into(),
            equipment_id: pump.to_string_id(),
            priority: Priority::Medium,
            ..Default::default()
        },
        reported_by,
    )
    .await?;
    change_status(id, IncidentStatus::InProgress, reported_by).await?;

    let mut incident = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Инцидент не найден"))?;
    incident.root_cause = "Износ торцевого уплотнения".into();
    incident.action_taken = "Заменено уплотнение".into();
    incident.downtime_minutes = Some(95);
    incident.before_write();
    repository::update(&incident).await?;
    change_status(id, IncidentStatus::Completed, reported_by).await?;

    Ok(())
}
