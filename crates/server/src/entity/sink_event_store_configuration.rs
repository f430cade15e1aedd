use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sink_event_store_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub event_store: Option<String>,
    pub project: Option<String>,
    pub role_arn: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
