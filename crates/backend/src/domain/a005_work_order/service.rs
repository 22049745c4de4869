use super::{csv_export, repository};
use crate::domain::a002_equipment;
use crate::domain::a003_checklist_template;
use crate::domain::a004_pm_plan::generator::PlannedOrder;
use crate::shared::error::{parse_id, ServiceError};
use crate::shared::logger;
use crate::system::users::repository as users_repository;
use chrono::{Duration, Utc};
use contracts::domain::a003_checklist_template::aggregate::{ChecklistTemplate, TemplateStatus};
use contracts::domain::a004_pm_plan::aggregate::PmPlan;
use contracts::domain::a005_work_order::aggregate::{
    ChecklistResult, WorkOrder, WorkOrderDto, WorkOrderListQuery, WorkOrderStatus,
};
use contracts::domain::common::{AggregateRoot, StatusWorkflow};
use uuid::Uuid;

fn category() -> String {
    WorkOrder::full_name()
}

async fn load_template(id: &str) -> anyhow::Result<ChecklistTemplate> {
    a003_checklist_template::repository::get_by_ref(id)
        .await?
        .ok_or_else(|| ServiceError::validation("Шаблон чек-листа не найден"))
}

async fn check_references(dto: &WorkOrderDto) -> anyhow::Result<()> {
    let equipment_id = parse_id(&dto.equipment_id)?;
    let equipment = a002_equipment::repository::get_by_id(equipment_id)
        .await?
        .ok_or_else(|| ServiceError::validation("Оборудование не найдено"))?;
    if !equipment.is_serviceable() {
        return Err(ServiceError::validation(format!(
            "Оборудование {} списано",
            equipment.base.code
        )));
    }

    let template = load_template(&dto.checklist_template_id).await?;
    if template.status == TemplateStatus::Inactive {
        return Err(ServiceError::validation(format!(
            "Шаблон {} выведен из действия",
            template.display_name()
        )));
    }

    if let Some(assignee) = dto.assignee_id.as_deref().filter(|s| !s.is_empty()) {
        match users_repository::get_by_id(assignee).await? {
            Some(u) if u.is_active => {}
            _ => return Err(ServiceError::validation("Исполнитель не найден или заблокирован")),
        }
    }
    Ok(())
}

/// Создание заказ-наряда вручную
pub async fn create(dto: WorkOrderDto) -> anyhow::Result<Uuid> {
    let planned_date = dto
        .planned_date
        .ok_or_else(|| ServiceError::validation("Не указана плановая дата"))?;
    check_references(&dto).await?;

    let code = match dto.code.clone().filter(|c| !c.trim().is_empty()) {
        Some(code) => code,
        None => WorkOrder::format_code(repository::count_all().await? + 1),
    };

    let mut aggregate = WorkOrder::new_for_insert(
        code,
        dto.description.clone(),
        dto.equipment_id.clone(),
        dto.checklist_template_id.clone(),
        planned_date,
    );
    aggregate.update(&dto);
    aggregate.pm_plan_id = dto.pm_plan_id.clone().filter(|s| !s.is_empty());

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Наряд по строке плана ТО
pub async fn create_for_plan(plan: &PmPlan, order: &PlannedOrder) -> anyhow::Result<Uuid> {
    let code = WorkOrder::format_code(repository::count_all().await? + 1);
    let mut aggregate = WorkOrder::new_for_insert(
        code,
        format!("ТО по плану {}", plan.base.code),
        order.equipment_id.clone(),
        order.checklist_template_id.clone(),
        order.planned_date,
    );
    aggregate.pm_plan_id = Some(plan.to_string_id());

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Обновление реквизитов. Закрытые и выполненные наряды не редактируются.
pub async fn update(dto: WorkOrderDto) -> anyhow::Result<()> {
    let id = parse_id(dto.id.as_deref().unwrap_or_default())?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Заказ-наряд не найден"))?;

    if !aggregate.status.is_open() {
        return Err(ServiceError::conflict(format!(
            "Наряд в статусе «{}» не редактируется",
            aggregate.status.label()
        )));
    }
    check_references(&dto).await?;

    let checklist_changed = aggregate.checklist_template_id != dto.checklist_template_id;
    aggregate.update(&dto);
    if checklist_changed {
        aggregate.results.clear();
    }

    aggregate.validate().map_err(ServiceError::validation)?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

/// Смена статуса наряда
pub async fn change_status(
    id: Uuid,
    next: WorkOrderStatus,
    actor: &str,
) -> anyhow::Result<WorkOrder> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Заказ-наряд не найден"))?;

    aggregate
        .status
        .check_transition(next)
        .map_err(ServiceError::conflict)?;

    let template = if next == WorkOrderStatus::Completed {
        Some(load_template(&aggregate.checklist_template_id).await?)
    } else {
        None
    };

    let previous = aggregate.status;
    aggregate
        .transition(next, template.as_ref(), Utc::now())
        .map_err(ServiceError::validation)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;

    logger::log(
        &category(),
        &format!(
            "Наряд {}: {} → {} ({})",
            aggregate.base.code,
            previous.label(),
            next.label(),
            actor
        ),
    );
    Ok(aggregate)
}

/// Запись результатов выполнения чек-листа
pub async fn record_results(id: Uuid, results: Vec<ChecklistResult>) -> anyhow::Result<WorkOrder> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Заказ-наряд не найден"))?;
    let template = load_template(&aggregate.checklist_template_id).await?;

    aggregate
        .record_results(results, &template)
        .map_err(ServiceError::validation)?;
    aggregate.before_write();
    repository::update(&aggregate).await?;

    let failed = aggregate.failed_count();
    if failed > 0 {
        logger::warn(
            &category(),
            &format!(
                "Наряд {}: пунктов вне нормы — {}",
                aggregate.base.code, failed
            ),
        );
    }
    Ok(aggregate)
}

/// Мягкое удаление. Удалить можно только новый наряд.
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    if let Some(w) = repository::get_by_id(id).await? {
        if w.status != WorkOrderStatus::New {
            return Err(ServiceError::conflict(
                "Удалить можно только наряд в статусе «Новый»",
            ));
        }
    }
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<WorkOrder>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<WorkOrder>> {
    repository::list_all().await
}

/// Список с фильтрами
pub async fn list(query: &WorkOrderListQuery) -> anyhow::Result<Vec<WorkOrder>> {
    let today = Utc::now().date_naive();
    Ok(repository::list_all()
        .await?
        .into_iter()
        .filter(|w| query.matches(w, today))
        .collect())
}

/// CSV текущего (отфильтрованного) списка
pub async fn export_csv(query: &WorkOrderListQuery) -> anyhow::Result<String> {
    let orders = list(query).await?;

    let mut lookups = csv_export::Lookups::default();
    for e in a002_equipment::repository::list_all().await? {
        lookups.equipment.insert(
            e.to_string_id(),
            format!("{} {}", e.base.code, e.base.description),
        );
    }
    for u in users_repository::list_all().await? {
        let name = u.display_name().to_string();
        lookups.users.insert(u.id, name);
    }

    csv_export::render(&orders, &lookups, Utc::now().date_naive())
}

/// Вставка тестовых данных: внеплановый наряд на токарный станок
pub async fn insert_test_data() -> anyhow::Result<()> {
    let Some(lathe) = a002_equipment::repository::get_by_code("EQ-0004").await? else {
        return Err(ServiceError::conflict("Сначала создайте тестовое оборудование"));
    };
    if !repository::list_by_equipment(&lathe.to_string_id()).await?.is_empty() {
        return Ok(());
    }
    let templates = a003_checklist_template::repository::list_all().await?;
    let Some(template) = templates.first() else {
        return Err(ServiceError::conflict("Сначала создайте тестовые шаблоны"));
    };

    create(WorkOrderDto {
        description: "Проверка после замены шпинделя".into(),
        equipment_id: lathe.to_string_id(),
        checklist_template_id: template.to_string_id(),
        planned_date: Some(Utc::now().date_naive() + Duration::days(2)),
        ..Default::default()
    })
    .await?;

    Ok(())
}
