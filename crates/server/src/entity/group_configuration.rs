use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "group_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Comma-joined group-by fields.
    #[sea_orm(column_type = "Text", nullable)]
    pub fields: Option<String>,
    #[sea_orm(column_name = "type")]
    pub kind: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
