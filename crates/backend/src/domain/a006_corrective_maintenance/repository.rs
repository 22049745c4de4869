use chrono::{DateTime, Utc};
use contracts::domain::a006_corrective_maintenance::aggregate::{
    CorrectiveMaintenance, CorrectiveMaintenanceId, IncidentStatus, Priority,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata, StatusWorkflow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_corrective_maintenance")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub equipment_id: String,
    pub details: String,
    pub priority: String,
    pub status: String,
    pub reported_by: String,
    pub assigned_to: Option<String>,
    pub reported_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    pub root_cause: String,
    pub action_taken: String,
    pub downtime_minutes: Option<i64>,
    pub is_deleted: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for CorrectiveMaintenance {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        CorrectiveMaintenance {
            base: BaseAggregate::with_metadata(
                CorrectiveMaintenanceId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            equipment_id: m.equipment_id,
            details: m.details,
            priority: Priority::parse(&m.priority).unwrap_or_default(),
            status: IncidentStatus::parse(&m.status).unwrap_or_default(),
            reported_by: m.reported_by,
            assigned_to: m.assigned_to,
            reported_at: m.reported_at,
            started_at: m.started_at,
            resolved_at: m.resolved_at,
            closed_at: m.closed_at,
            root_cause: m.root_cause,
            action_taken: m.action_taken,
            downtime_minutes: m.downtime_minutes,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &CorrectiveMaintenance) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        equipment_id: Set(aggregate.equipment_id.clone()),
        details: Set(aggregate.details.clone()),
        priority: Set(aggregate.priority.as_str().to_string()),
        status: Set(aggregate.status.as_str().to_string()),
        reported_by: Set(aggregate.reported_by.clone()),
        assigned_to: Set(aggregate.assigned_to.clone()),
        reported_at: Set(aggregate.reported_at),
        started_at: Set(aggregate.started_at),
        resolved_at: Set(aggregate.resolved_at),
        closed_at: Set(aggregate.closed_at),
        root_cause: Set(aggregate.root_cause.clone()),
        action_taken: Set(aggregate.action_taken.clone()),
        downtime_minutes: Set(aggregate.downtime_minutes),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Все инциденты, новые сверху
pub async fn list_all() -> anyhow::Result<Vec<CorrectiveMaintenance>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::ReportedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<CorrectiveMaintenance>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_code(code: &str) -> anyhow::Result<Option<CorrectiveMaintenance>> {
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

pub async fn insert(aggregate: &CorrectiveMaintenance) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &CorrectiveMaintenance) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
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
