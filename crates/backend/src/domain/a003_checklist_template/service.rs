use super::repository;
use crate::shared::error::{parse_id, ServiceError};
use crate::shared::logger;
use contracts::domain::a003_checklist_template::aggregate::{
    ChecklistItem, ChecklistItemKind, ChecklistTemplate, ChecklistTemplateDto, TemplateStatus,
};
use contracts::domain::common::{AggregateRoot, StatusWorkflow};
use uuid::Uuid;

fn category() -> String {
    ChecklistTemplate::full_name()
}

/// Создание нового шаблона (версия 1, черновик)
pub async fn create(dto: ChecklistTemplateDto) -> anyhow::Result<Uuid> {
    let code = match dto.code.clone().filter(|c| !c.trim().is_empty()) {
        Some(code) => code,
        None => ChecklistTemplate::format_code(repository::count_all().await? + 1),
    };
    if !repository::list_versions(&code).await?.is_empty() {
        return Err(ServiceError::conflict(format!("Код {} уже занят", code)));
    }

    let mut aggregate = ChecklistTemplate::new_for_insert(code, dto.description.clone());
    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Обновление шаблона.
///
/// Изменение пунктов действующего шаблона сохраняется как новая версия-черновик,
/// возвращается ID записи, в которую попали изменения.
pub async fn update(dto: ChecklistTemplateDto) -> anyhow::Result<Uuid> {
    let id = parse_id(dto.id.as_deref().unwrap_or_default())?;

    let current = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Шаблон чек-листа не найден"))?;

    if current.requires_new_version(&dto) {
        let mut next = next_version_of(&current).await?;
        next.update(&dto);
        next.validate().map_err(ServiceError::validation)?;
        next.before_write();
        let new_id = repository::insert(&next).await?;
        logger::log(
            &category(),
            &format!(
                "Шаблон {}: изменения сохранены как версия {}",
                next.base.code, next.version
            ),
        );
        return Ok(new_id);
    }

    let mut aggregate = current;
    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::update(&aggregate).await?;
    Ok(id)
}

/// Новая версия без изменений пунктов
pub async fn new_version(id: Uuid) -> anyhow::Result<Uuid> {
    let current = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Шаблон чек-листа не найден"))?;

    let mut next = next_version_of(&current).await?;
    next.validate().map_err(ServiceError::validation)?;
    next.before_write();
    let new_id = repository::insert(&next).await?;

    logger::log(
        &category(),
        &format!("Шаблон {}: создана версия {}", next.base.code, next.version),
    );
    Ok(new_id)
}

/// Следующая версия кода; отказ, если `current` не последняя
async fn next_version_of(current: &ChecklistTemplate) -> anyhow::Result<ChecklistTemplate> {
    let versions = repository::list_versions(&current.base.code).await?;
    current.new_version(&versions).map_err(ServiceError::conflict)
}

/// Смена статуса. При активации остальные действующие версии того же кода выводятся из действия.
pub async fn change_status(id: Uuid, next: TemplateStatus) -> anyhow::Result<ChecklistTemplate> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Шаблон чек-листа не найден"))?;

    aggregate
        .status
        .check_transition(next)
        .map_err(ServiceError::conflict)?;

    if next == TemplateStatus::Active {
        aggregate.validate().map_err(ServiceError::validation)?;
        for mut other in repository::list_versions(&aggregate.base.code).await? {
            if other.base.id != aggregate.base.id && other.status == TemplateStatus::Active {
                other.status = TemplateStatus::Inactive;
                other.before_write();
                repository::update(&other).await?;
            }
        }
    }

    let previous = aggregate.status;
    aggregate.status = next;
    aggregate.before_write();
    repository::update(&aggregate).await?;

    logger::log(
        &category(),
        &format!(
            "Шаблон {} v{}: {} → {}",
            aggregate.base.code,
            aggregate.version,
            previous.label(),
            next.label()
        ),
    );
    Ok(aggregate)
}

/// Мягкое удаление. Действующий шаблон удалить нельзя.
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    if let Some(t) = repository::get_by_id(id).await? {
        if t.status == TemplateStatus::Active {
            return Err(ServiceError::conflict(
                "Действующий шаблон нельзя удалить, сначала выведите его из действия",
            ));
        }
    }
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ChecklistTemplate>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<ChecklistTemplate>> {
    repository::list_all().await
}

/// Вставка тестовых данных: два действующих шаблона
pub async fn insert_test_data() -> anyhow::Result<()> {
    let pump_items = vec![
        ChecklistItem::new("Внешний осмотр, отсутствие течей", ChecklistItemKind::Check),
        ChecklistItem::new(
            "Давление на выходе",
            ChecklistItemKind::Measurement {
                unit: "бар".into(),
                min: Some(2.0),
                max: Some(6.0),
            },
        ),
        ChecklistItem::new(
            "Температура подшипника",
            ChecklistItemKind::Measurement {
                unit: "°C".into(),
                min: None,
                max: Some(80.0),
            },
        ),
        ChecklistItem {
            required: false,
            ..ChecklistItem::new("Замечания", ChecklistItemKind::Text)
        },
    ];
    let compressor_items = vec![
        ChecklistItem::new("Проверка уровня масла", ChecklistItemKind::Check),
        ChecklistItem::new("Слив конденсата", ChecklistItemKind::Check),
        ChecklistItem::new(
            "Рабочее давление",
            ChecklistItemKind::Measurement {
                unit: "бар".into(),
                min: Some(6.0),
                max: Some(8.5),
            },
        ),
    ];

    let data = [
        ("CL-0001", "Осмотр насоса", "Насос", pump_items),
        ("CL-0002", "ТО компрессора", "Компрессор", compressor_items),
    ];

    for (code, name, equipment_category, items) in data {
        if !repository::list_versions(code).await?.is_empty() {
            continue;
        }
        let id = create(ChecklistTemplateDto {
            code: Some(code.into()),
            description: name.into(),
            equipment_category: equipment_category.into(),
            items,
            ..Default::default()
        })
        .await?;
        change_status(id, TemplateStatus::Active).await?;
    }

    Ok(())
}
