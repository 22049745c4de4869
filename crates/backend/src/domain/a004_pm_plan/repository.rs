use chrono::{NaiveDate, Utc};
use contracts::domain::a004_pm_plan::aggregate::{
    Frequency, PlanStatus, PmPlan, PmPlanId, PmPlanItem,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata, StatusWorkflow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_pm_plan")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub factory_id: String,
    pub frequency: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub default_checklist_id: Option<String>,
    pub default_planned_date: Option<NaiveDate>,
    pub status: String,
    /// Строки плана (JSON массив)
    pub items_json: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PmPlan {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let items: Vec<PmPlanItem> = serde_json::from_str(&m.items_json).unwrap_or_else(|e| {
            tracing::warn!("Broken items_json in pm plan {}: {}", m.id, e);
            Vec::new()
        });

        PmPlan {
            base: BaseAggregate::with_metadata(
                PmPlanId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            factory_id: m.factory_id,
            frequency: Frequency::parse(&m.frequency).unwrap_or_default(),
            start_date: m.start_date,
            end_date: m.end_date,
            default_checklist_id: m.default_checklist_id,
            default_planned_date: m.default_planned_date,
            status: PlanStatus::parse(&m.status).unwrap_or_default(),
            items,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &PmPlan) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        factory_id: Set(aggregate.factory_id.clone()),
        frequency: Set(aggregate.frequency.as_str().to_string()),
        start_date: Set(aggregate.start_date),
        end_date: Set(aggregate.end_date),
        default_checklist_id: Set(aggregate.default_checklist_id.clone()),
        default_planned_date: Set(aggregate.default_planned_date),
        status: Set(aggregate.status.as_str().to_string()),
        items_json: Set(serde_json::to_string(&aggregate.items)?),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

pub async fn list_all() -> anyhow::Result<Vec<PmPlan>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::StartDate)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Действующие планы (для планировщика)
pub async fn list_active() -> anyhow::Result<Vec<PmPlan>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.eq(PlanStatus::Active.as_str()))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<PmPlan>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_code(code: &str) -> anyhow::Result<Option<PmPlan>> {
    let result = Entity::find()
        .filter(Column::Code.eq(code))
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn count_all() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn insert(aggregate: &PmPlan) -> anyhow::Result<Uuid> {
    to_active(aggregate)?.insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &PmPlan) -> anyhow::Result<()> {
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
