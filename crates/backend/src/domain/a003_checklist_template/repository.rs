use chrono::Utc;
use contracts::domain::a003_checklist_template::aggregate::{
    ChecklistItem, ChecklistTemplate, ChecklistTemplateId, TemplateStatus,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata, StatusWorkflow};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_checklist_template")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub equipment_category: String,
    pub template_version: i32,
    pub status: String,
    /// Пункты чек-листа (JSON массив)
    pub items_json: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ChecklistTemplate {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let items: Vec<ChecklistItem> = serde_json::from_str(&m.items_json).unwrap_or_else(|e| {
            tracing::warn!("Broken items_json in checklist template {}: {}", m.id, e);
            Vec::new()
        });

        ChecklistTemplate {
            base: BaseAggregate::with_metadata(
                ChecklistTemplateId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            equipment_category: m.equipment_category,
            version: m.template_version,
            status: TemplateStatus::parse(&m.status).unwrap_or_default(),
            items,
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &ChecklistTemplate) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        equipment_category: Set(aggregate.equipment_category.clone()),
        template_version: Set(aggregate.version),
        status: Set(aggregate.status.as_str().to_string()),
        items_json: Set(serde_json::to_string(&aggregate.items)?),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

pub async fn list_all() -> anyhow::Result<Vec<ChecklistTemplate>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Code)
        .order_by_desc(Column::TemplateVersion)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Все версии шаблона с данным кодом, от новой к старой
pub async fn list_versions(code: &str) -> anyhow::Result<Vec<ChecklistTemplate>> {
    let items = Entity::find()
        .filter(Column::Code.eq(code))
        .filter(Column::IsDeleted.eq(false))
        .order_by_desc(Column::TemplateVersion)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<ChecklistTemplate>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

/// Поиск по строковому ID (ссылки из планов и нарядов)
pub async fn get_by_ref(id: &str) -> anyhow::Result<Option<ChecklistTemplate>> {
    match Uuid::parse_str(id) {
        Ok(uuid) => get_by_id(uuid).await,
        Err(_) => Ok(None),
    }
}

pub async fn count_all() -> anyhow::Result<u64> {
    Ok(Entity::find().count(conn()).await?)
}

pub async fn insert(aggregate: &ChecklistTemplate) -> anyhow::Result<Uuid> {
    to_active(aggregate)?.insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &ChecklistTemplate) -> anyhow::Result<()> {
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
