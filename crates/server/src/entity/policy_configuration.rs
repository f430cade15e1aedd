use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "policy_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alert_policy_id: Option<String>,
    pub action_policy_id: Option<String>,
    pub repeat_interval: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
