use super::{generator, repository};
use crate::domain::{a001_factory, a002_equipment, a003_checklist_template, a005_work_order};
use crate::shared::error::{parse_id, ServiceError};
use crate::shared::logger;
use chrono::{Duration, Utc};
use contracts::domain::a003_checklist_template::aggregate::TemplateStatus;
use contracts::domain::a004_pm_plan::aggregate::{
    Frequency, GenerateResult, PlanStatus, PmPlan, PmPlanDto, PmPlanItem,
};
use contracts::domain::common::{AggregateRoot, StatusWorkflow};
use uuid::Uuid;

fn category() -> String {
    PmPlan::full_name()
}

/// Проверка ссылок плана: завод существует, оборудование с этого завода
async fn check_references(plan: &PmPlan) -> anyhow::Result<()> {
    let factory_id = parse_id(&plan.factory_id)?;
    if a001_factory::repository::get_by_id(factory_id).await?.is_none() {
        return Err(ServiceError::validation("Указанный завод не найден"));
    }

    let equipment = a002_equipment::repository::list_by_factory(&plan.factory_id).await?;
    for item in &plan.items {
        if !equipment.iter().any(|e| e.to_string_id() == item.equipment_id) {
            return Err(ServiceError::validation(format!(
                "Оборудование {} не относится к заводу плана",
                item.equipment_id
            )));
        }
    }
    Ok(())
}

/// Проверка перед активацией: все указанные шаблоны существуют и не выведены из действия
async fn check_checklists(plan: &PmPlan) -> anyhow::Result<()> {
    for item in &plan.items {
        let Some(checklist_id) = item.checklist_template_id.as_deref() else {
            continue;
        };
        match a003_checklist_template::repository::get_by_ref(checklist_id).await? {
            Some(t) if t.status != TemplateStatus::Inactive => {}
            Some(t) => {
                return Err(ServiceError::validation(format!(
                    "Шаблон {} выведен из действия",
                    t.display_name()
                )))
            }
            None => {
                return Err(ServiceError::validation(format!(
                    "Шаблон чек-листа не найден: {}",
                    checklist_id
                )))
            }
        }
    }
    Ok(())
}

/// Создание плана (черновик)
pub async fn create(dto: PmPlanDto) -> anyhow::Result<Uuid> {
    let start_date = dto
        .start_date
        .ok_or_else(|| ServiceError::validation("Не указана дата начала"))?;
    let code = match dto.code.clone().filter(|c| !c.trim().is_empty()) {
        Some(code) => code,
        None => PmPlan::format_code(repository::count_all().await? + 1),
    };
    if repository::get_by_code(&code).await?.is_some() {
        return Err(ServiceError::conflict(format!("Код {} уже занят", code)));
    }

    let mut aggregate = PmPlan::new_for_insert(
        code,
        dto.description.clone(),
        dto.factory_id.clone(),
        start_date,
    );
    aggregate.update(&dto);

    aggregate.validate().map_err(ServiceError::validation)?;
    check_references(&aggregate).await?;
    aggregate.before_write();

    let id = repository::insert(&aggregate).await?;
    logger::log(
        &category(),
        &format!(
            "Создан план {} «{}», строк: {}",
            aggregate.base.code,
            aggregate.base.description,
            aggregate.items.len()
        ),
    );
    Ok(id)
}

/// Обновление плана. Действующий план после правки должен оставаться пригодным к работе.
pub async fn update(dto: PmPlanDto) -> anyhow::Result<()> {
    let id = parse_id(dto.id.as_deref().unwrap_or_default())?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("План ТО не найден"))?;

    aggregate.update(&dto);

    if aggregate.status == PlanStatus::Active {
        aggregate
            .validate_for_activation()
            .map_err(ServiceError::validation)?;
        check_checklists(&aggregate).await?;
    } else {
        aggregate.validate().map_err(ServiceError::validation)?;
    }
    check_references(&aggregate).await?;
    aggregate.before_write();

    repository::update(&aggregate).await
}

/// Смена статуса плана. Активация проверяет план и создаёт наряды по строкам.
pub async fn change_status(
    id: Uuid,
    next: PlanStatus,
) -> anyhow::Result<(PmPlan, Option<GenerateResult>)> {
    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("План ТО не найден"))?;

    aggregate
        .status
        .check_transition(next)
        .map_err(ServiceError::conflict)?;

    if next == PlanStatus::Active {
        aggregate
            .validate_for_activation()
            .map_err(ServiceError::validation)?;
        check_references(&aggregate).await?;
        check_checklists(&aggregate).await?;
    }

    let previous = aggregate.status;
    aggregate.status = next;
    aggregate.before_write();
    repository::update(&aggregate).await?;

    logger::log(
        &category(),
        &format!(
            "План {}: {} → {}",
            aggregate.base.code,
            previous.label(),
            next.label()
        ),
    );

    let generated = if next == PlanStatus::Active {
        Some(generate_for(&aggregate).await?)
    } else {
        None
    };

    Ok((aggregate, generated))
}

/// Повторная генерация нарядов по действующему плану
pub async fn generate(id: Uuid) -> anyhow::Result<GenerateResult> {
    let plan = repository::get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("План ТО не найден"))?;
    if plan.status != PlanStatus::Active {
        return Err(ServiceError::conflict(
            "Наряды создаются только по действующему плану",
        ));
    }
    generate_for(&plan).await
}

async fn generate_for(plan: &PmPlan) -> anyhow::Result<GenerateResult> {
    let existing = a005_work_order::repository::list_by_plan(&plan.to_string_id()).await?;
    let (orders, skipped) = generator::initial_orders(plan, &existing);

    for order in &orders {
        a005_work_order::service::create_for_plan(plan, order).await?;
    }

    let result = GenerateResult {
        created: orders.len(),
        skipped,
    };
    logger::log(
        &category(),
        &format!(
            "План {}: создано нарядов {}, пропущено {}",
            plan.base.code, result.created, result.skipped
        ),
    );
    Ok(result)
}

/// Мягкое удаление. Действующий план удалить нельзя.
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    if let Some(plan) = repository::get_by_id(id).await? {
        if plan.status == PlanStatus::Active {
            return Err(ServiceError::conflict(
                "Действующий план нельзя удалить, сначала выведите его из действия",
            ));
        }
    }
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<PmPlan>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<PmPlan>> {
    repository::list_all().await
}

/// Вставка тестовых данных: ежемесячный план по насосам и компрессору литейного завода
pub async fn insert_test_data() -> anyhow::Result<()> {
    if repository::get_by_code("PM-0001").await?.is_some() {
        return Ok(());
    }
    let Some(factory) = a001_factory::repository::get_by_code("FAC-0001").await? else {
        return Err(ServiceError::conflict("Сначала создайте тестовые заводы"));
    };
    let templates = a003_checklist_template::repository::list_all().await?;
    let equipment = a002_equipment::repository::list_by_factory(&factory.to_string_id()).await?;
    if equipment.is_empty() {
        return Err(ServiceError::conflict("Сначала создайте тестовое оборудование"));
    }

    let today = Utc::now().date_naive();
    let items: Vec<PmPlanItem> = equipment
        .iter()
        .enumerate()
        .map(|(idx, e)| PmPlanItem {
            equipment_id: e.to_string_id(),
            checklist_template_id: templates
                .iter()
                .find(|t| t.applies_to(&e.category))
                .map(|t| t.to_string_id()),
            planned_date: Some(today + Duration::days(idx as i64 * 3 - 2)),
        })
        .filter(|i| i.has_checklist())
        .collect();

    let id = create(PmPlanDto {
        code: Some("PM-0001".into()),
        description: "Ежемесячное ТО литейного цеха".into(),
        factory_id: factory.to_string_id(),
        frequency: Frequency::Monthly,
        start_date: Some(today - Duration::days(7)),
        items,
        ..Default::default()
    })
    .await?;
    change_status(id, PlanStatus::Active).await?;

    Ok(())
}
