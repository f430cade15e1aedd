use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "template_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub template_id: Option<String>,
    pub lang: Option<String>,
    #[sea_orm(column_name = "type")]
    pub kind: Option<String>,
    pub version: Option<String>,
    /// JSON object text.
    #[sea_orm(column_type = "Text", nullable)]
    pub annotations: Option<String>,
    /// JSON object text.
    #[sea_orm(column_type = "Text", nullable)]
    pub tokens: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
