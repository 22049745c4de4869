use super::repository;
use crate::domain::{a001_factory, a005_work_order};
use crate::shared::error::{parse_id, ServiceError};
use crate::shared::logger;
use contracts::domain::a002_equipment::aggregate::{
    Criticality, Equipment, EquipmentDto, EquipmentListQuery,
};
use contracts::domain::common::{AggregateRoot, StatusWorkflow};
use contracts::shared::pagination::{ListResponse, PageRequest, DEFAULT_PAGE_SIZE};
use uuid::Uuid;

/// Оборудование можно закрепить только за существующим заводом
async fn ensure_factory_exists(factory_id: &str) -> anyhow::Result<()> {
    let id = parse_id(factory_id)?;
    if a001_factory::repository::get_by_id(id).await?.is_none() {
        return Err(ServiceError::validation("Указанный завод не найден"));
    }
    Ok(())
}

/// Создание новой единицы оборудования
pub async fn create(dto: EquipmentDto) -> anyhow::Result<Uuid> {
    ensure_factory_exists(&dto.factory_id).await?;

    let code = match dto.code.clone().filter(|c| !c.trim().is_empty()) {
        Some(code) => code,
        None => Equipment::format_code(repository::count_all().await? + 1),
    };
    if repository::get_by_code(&code).await?.is_some() {
        return Err(ServiceError::conflict(format!("Код {} уже занят", code)));
    }

    let mut aggregate =
        Equipment::new_for_insert(code, dto.description.clone(), dto.factory_id.clone());
    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Обновление оборудования
pub async fn update(dto: EquipmentDto) -> anyhow::Result<()> {
    let id = parse_id(dto.id.as_deref().unwrap_or_default())?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Оборудование не найдено"))?;

    if aggregate.factory_id != dto.factory_id {
        ensure_factory_exists(&dto.factory_id).await?;
    }
    if aggregate.status != dto.status {
        aggregate
            .status
            .check_transition(dto.status)
            .map_err(ServiceError::conflict)?;
    }

    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::update(&aggregate).await?;
    logger::log(
        Equipment::full_name().as_str(),
        &format!("Изменено оборудование {}", aggregate.base.code),
    );
    Ok(())
}

/// Мягкое удаление. Оборудование с открытыми нарядами удалить нельзя.
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let open = a005_work_order::repository::list_by_equipment(&id.to_string())
        .await?
        .into_iter()
        .filter(|w| w.status.is_open())
        .count();
    if open > 0 {
        return Err(ServiceError::conflict(format!(
            "По оборудованию есть незакрытые наряды: {}",
            open
        )));
    }
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Equipment>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Equipment>> {
    repository::list_all().await
}

/// Постраничный список по параметрам запроса
pub async fn list_paginated(query: EquipmentListQuery) -> anyhow::Result<ListResponse<Equipment>> {
    let page = PageRequest::new(
        query.page.unwrap_or(0),
        query.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
    );
    repository::list_paginated(&query, page).await
}

pub async fn list_by_factory(factory_id: &str) -> anyhow::Result<Vec<Equipment>> {
    repository::list_by_factory(factory_id).await
}

/// Вставка тестовых данных (нужны заводы FAC-0001 и FAC-0002)
pub async fn insert_test_data() -> anyhow::Result<()> {
    let Some(foundry) = a001_factory::repository::get_by_code("FAC-0001").await? else {
        return Err(ServiceError::conflict("Сначала создайте тестовые заводы"));
    };
    let mechanical = a001_factory::repository::get_by_code("FAC-0002").await?;

    let foundry_id = foundry.to_string_id();
    let mechanical_id = mechanical
        .map(|f| f.to_string_id())
        .unwrap_or_else(|| foundry_id.clone());

    let rows = [
        ("EQ-0001", "Насос циркуляционный №1", &foundry_id, "Насос", "Grundfos", "NB 65-200", "Цех 1", Criticality::High),
        ("EQ-0002", "Насос циркуляционный №2", &foundry_id, "Насос", "Grundfos", "NB 65-200", "Цех 1", Criticality::Medium),
        ("EQ-0003", "Компрессор воздушный", &foundry_id, "Компрессор", "Atlas Copco", "GA 30", "Компрессорная", Criticality::High),
        ("EQ-0004", "Токарный станок", &mechanical_id, "Станок", "DMG Mori", "CLX 450", "Участок 3", Criticality::Medium),
        ("EQ-0005", "Кран-балка 5 т", &mechanical_id, "Подъёмное оборудование", "Demag", "EKDR 5", "Склад", Criticality::Low),
    ];

    for (code, name, factory_id, category, manufacturer, model, location, criticality) in rows {
        if repository::get_by_code(code).await?.is_some() {
            continue;
        }
        create(EquipmentDto {
            code: Some(code.into()),
            description: name.into(),
            factory_id: factory_id.clone(),
            category: category.into(),
            manufacturer: manufacturer.into(),
            model: model.into(),
            serial_number: format!("SN-{}", &code[3..]),
            location: location.into(),
            criticality,
            ..Default::default()
        })
        .await?;
    }

    Ok(())
}
