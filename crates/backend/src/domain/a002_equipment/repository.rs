use chrono::{NaiveDate, Utc};
use contracts::domain::a002_equipment::aggregate::{
    Criticality, Equipment, EquipmentId, EquipmentListQuery, EquipmentStatus,
};
use contracts::domain::common::{BaseAggregate, EntityMetadata, StatusWorkflow};
use contracts::shared::pagination::{clamp_page, total_pages, ListResponse, PageRequest};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_equipment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub factory_id: String,
    pub category: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub location: String,
    pub install_date: Option<NaiveDate>,
    pub criticality: String,
    pub status: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Equipment {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Equipment {
            base: BaseAggregate::with_metadata(
                EquipmentId(uuid),
                m.code,
                m.description,
                m.comment,
                metadata,
            ),
            factory_id: m.factory_id,
            category: m.category,
            manufacturer: m.manufacturer,
            model: m.model,
            serial_number: m.serial_number,
            location: m.location,
            install_date: m.install_date,
            criticality: Criticality::parse(&m.criticality).unwrap_or_default(),
            status: EquipmentStatus::parse(&m.status).unwrap_or_default(),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Equipment) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        factory_id: Set(aggregate.factory_id.clone()),
        category: Set(aggregate.category.clone()),
        manufacturer: Set(aggregate.manufacturer.clone()),
        model: Set(aggregate.model.clone()),
        serial_number: Set(aggregate.serial_number.clone()),
        location: Set(aggregate.location.clone()),
        install_date: Set(aggregate.install_date),
        criticality: Set(aggregate.criticality.as_str().to_string()),
        status: Set(aggregate.status.as_str().to_string()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Условие отбора по параметрам списка
fn list_condition(query: &EquipmentListQuery) -> Condition {
    let mut cond = Condition::all().add(Column::IsDeleted.eq(false));
    if let Some(factory_id) = query.factory_id.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(Column::FactoryId.eq(factory_id));
    }
    if let Some(status) = query.status.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(Column::Status.eq(status));
    }
    if let Some(category) = query.category.as_deref().filter(|s| !s.is_empty()) {
        cond = cond.add(Column::Category.eq(category));
    }
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        cond = cond.add(
            Condition::any()
                .add(Column::Code.contains(q))
                .add(Column::Description.contains(q))
                .add(Column::Model.contains(q))
                .add(Column::SerialNumber.contains(q))
                .add(Column::Location.contains(q)),
        );
    }
    cond
}

pub async fn list_all() -> anyhow::Result<Vec<Equipment>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::Code)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Постраничный список с фильтрами
pub async fn list_paginated(
    query: &EquipmentListQuery,
    page: PageRequest,
) -> anyhow::Result<ListResponse<Equipment>> {
    let page_size = page.page_size.max(1);
    let paginator = Entity::find()
        .filter(list_condition(query))
        .order_by_asc(Column::Code)
        .paginate(conn(), page_size as u64);

    let total = paginator.num_items().await? as usize;
    let pages = total_pages(total, page_size);
    let current = clamp_page(page.page, pages);
    let items = paginator
        .fetch_page(current as u64)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(ListResponse {
        items,
        total,
        page: current,
        page_size,
        total_pages: pages,
    })
}

pub async fn list_by_factory(factory_id: &str) -> anyhow::Result<Vec<Equipment>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::FactoryId.eq(factory_id))
        .order_by_asc(Column::Code)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Equipment>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn())
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_code(code: &str) -> anyhow::Result<Option<Equipment>> {
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

pub async fn insert(aggregate: &Equipment) -> anyhow::Result<Uuid> {
    to_active(aggregate).insert(conn()).await?;
    Ok(aggregate.base.id.value())
}

pub async fn update(aggregate: &Equipment) -> anyhow::Result<()> {
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
