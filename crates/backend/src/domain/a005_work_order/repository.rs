use chrono::{DateTime, NaiveDate, Utc};
use contracts::domain::a005_work_order::aggregate::{
    ChecklistResult, WorkOrder, WorkOrderId, WorkOrderStatus,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata, StatusWorkflow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_work_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub equipment_id: String,
    pub checklist_template_id: String,
    pub pm_plan_id: Option<String>,
    pub planned_date: NaiveDate,
    pub assignee_id: Option<String>,
    pub status: String,
    /// Результаты по пунктам чек-листа (JSON массив)
    pub results_json: String,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for WorkOrder {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let results: Vec<ChecklistResult> =
            serde_json::from_str(&m.results_json).unwrap_or_else(|e| {
                tracing::warn!("Broken results_json in work order {}: {}", m.id, e);
                Vec::new()
            });

        WorkOrder {
            base: BaseAggregate::with_metadata(
                WorkOrderId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            equipment_id: m.equipment_id,
            checklist_template_id: m.checklist_template_id,
            pm_plan_id: m.pm_plan_id,
            planned_date: m.planned_date,
            assignee_id: m.assignee_id,
            status: WorkOrderStatus::parse(&m.status).unwrap_or_default(),
            results,
            started_at: m.started_at,
            completed_at: m.completed_at,
            closed_at: m.closed_at,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &WorkOrder) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        equipment_id: Set(aggregate.equipment_id.clone()),
        checklist_template_id: Set(aggregate.checklist_template_id.clone()),
        pm_plan_id: Set(aggregate.pm_plan_id.clone()),
        planned_date: Set(aggregate.planned_date),
        assignee_id: Set(aggregate.assignee_id.clone()),
        status: Set(aggregate.status.as_str().to_string()),
        results_json: Set(serde_json::to_string(&aggregate.results)?),
        started_at: Set(aggregate.started_at),
        completed_at: Set(aggregate.completed_at),
        closed_at: Set(aggregate.closed_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

fn models_to_orders(models: Vec<Model>) -> Vec<WorkOrder> {
    models.into_iter().map(Into::into).collect()
}

pub async fn list_all() -> anyhow::Result<Vec<WorkOrder>> {
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::PlannedDate)
        .order_by_asc(Column::Code)
        .all(conn())
        .await?;
    Ok(models_to_orders(models))
}

pub async fn list_by_plan(pm_plan_id: &str) -> anyhow::Result<Vec<WorkOrder>> {
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::PmPlanId.eq(pm_plan_id))
        .order_by_asc(Column::PlannedDate)
        .all(conn())
        .await?;
    Ok(models_to_orders(models))
}

pub async fn list_by_equipment(equipment_id: &str) -> anyhow::Result<Vec<WorkOrder>> {
    let models = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::EquipmentId.eq(equipment_id))
        .order_by_desc(Column::PlannedDate)
        .all(conn())
        .await?;
    Ok(models_to_orders(models))
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<WorkOrder>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn count_all() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn insert(aggregate: &WorkOrder) -> anyhow::Result<Uuid> {
    to_active(aggregate)?.insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &WorkOrder) -> anyhow::Result<()> {
    let mut active = to_active(aggregate)?;
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .filter(Column::IsDeleted.eq(false))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
