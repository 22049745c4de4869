use super::repository;
use crate::domain::a002_equipment;
use crate::shared::error::{parse_id, ServiceError};
use crate::shared::logger;
use contracts::domain::a001_factory::aggregate::{Factory, FactoryDto, FactoryStatus};
use contracts::domain::common::AggregateRoot;
use uuid::Uuid;

/// Создание нового завода
pub async fn create(dto: FactoryDto) -> anyhow::Result<Uuid> {
    let code = match dto.code.clone().filter(|c| !c.trim().is_empty()) {
        Some(code) => code,
        None => Factory::format_code(repository::count_all().await? + 1),
    };
    if repository::get_by_code(&code).await?.is_some() {
        return Err(ServiceError::conflict(format!("Код {} уже занят", code)));
    }

    let mut aggregate = Factory::new_for_insert(code, dto.description.clone());
    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    logger::log(
        Factory::full_name().as_str(),
        &format!("Создан завод {} «{}»", aggregate.base.code, aggregate.base.description),
    );
    Ok(id)
}

/// Обновление существующего завода
pub async fn update(dto: FactoryDto) -> anyhow::Result<()> {
    let id = parse_id(dto.id.as_deref().unwrap_or_default())?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Завод не найден"))?;

    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

/// Мягкое удаление завода. Завод с оборудованием удалить нельзя.
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    let equipment = a002_equipment::repository::list_by_factory(&id.to_string()).await?;
    if !equipment.is_empty() {
        return Err(ServiceError::conflict(format!(
            "На заводе числится оборудование ({} ед.), удаление невозможно",
            equipment.len()
        )));
    }
    repository::soft_delete(id).await
}

/// Получение завода по ID
pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Factory>> {
    repository::get_by_id(id).await
}

/// Получение списка всех заводов
pub async fn list_all() -> anyhow::Result<Vec<Factory>> {
    repository::list_all().await
}

/// Вставка тестовых данных
pub async fn insert_test_data() -> anyhow::Result<()> {
    let data = vec![
        FactoryDto {
            code: Some("FAC-0001".into()),
            description: "Литейный завод".into(),
            address: "г. Екатеринбург, ул. Заводская, 1".into(),
            manager_name: "Петров П.П.".into(),
            status: FactoryStatus::Active,
            ..Default::default()
        },
        FactoryDto {
            code: Some("FAC-0002".into()),
            description: "Механический завод".into(),
            address: "г. Челябинск, пр. Победы, 12".into(),
            manager_name: "Сидорова А.В.".into(),
            status: FactoryStatus::Active,
            ..Default::default()
        },
    ];

    for dto in data {
        if let Some(code) = dto.code.as_deref() {
            if repository::get_by_code(code).await?.is_some() {
                continue;
            }
        }
        create(dto).await?;
    }

    Ok(())
}
