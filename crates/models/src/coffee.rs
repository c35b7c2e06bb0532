use sea_orm::{
    entity::prelude::*, sea_query::Expr, ActiveModelTrait, DatabaseConnection, PaginatorTrait, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};

use crate::errors::{self, ModelError};

pub const SEED_NAME: &str = "Espresso";
pub const SEED_DESCRIPTION: &str = "A strong, concentrated coffee beverage.";
pub const SEED_IMAGE_URL: &str = "/static/espresso.jpg";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "coffees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub votes: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_name(name: &str) -> Result<(), errors::ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name must not be empty".into()));
    }
    Ok(())
}

/// All rows in insertion order.
pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

/// Insert a new row; `votes` always starts at zero.
pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: Option<&str>,
    image_url: Option<&str>,
) -> Result<Model, ModelError> {
    validate_name(name)?;
    let am = ActiveModel {
        name: Set(name.to_string()),
        description: Set(description.map(str::to_string)),
        image_url: Set(image_url.map(str::to_string)),
        votes: Set(0),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

/// Overwrite the editable columns; returns false when no row has `id`.
pub async fn update_details(
    db: &DatabaseConnection,
    id: i32,
    name: &str,
    description: Option<&str>,
    image_url: Option<&str>,
) -> Result<bool, ModelError> {
    validate_name(name)?;
    let res = Entity::update_many()
        .col_expr(Column::Name, Expr::value(name.to_string()))
        .col_expr(Column::Description, Expr::value(description.map(str::to_string)))
        .col_expr(Column::ImageUrl, Expr::value(image_url.map(str::to_string)))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

/// `UPDATE coffees SET votes = votes + 1 WHERE id = ?` as one statement, so
/// concurrent votes cannot overwrite each other.
pub async fn increment_votes(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::update_many()
        .col_expr(Column::Votes, Expr::col(Column::Votes).add(1))
        .filter(Column::Id.eq(id))
        .exec(db)
        .await?;
    Ok(res.rows_affected > 0)
}

pub async fn hard_delete(db: &DatabaseConnection, id: i32) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Insert the default Espresso row when the table holds no rows at all.
pub async fn seed_if_empty(db: &DatabaseConnection) -> Result<Option<Model>, ModelError> {
    if Entity::find().count(db).await? > 0 {
        return Ok(None);
    }
    create(db, SEED_NAME, Some(SEED_DESCRIPTION), Some(SEED_IMAGE_URL)).await.map(Some)
}
