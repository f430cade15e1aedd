use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "severity_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alert_config_id: i32,
    pub severity: Option<i32>,
    /// Optional condition row owned by this severity.
    pub eval_condition_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::alert_configuration::Entity",
        from = "Column::AlertConfigId",
        to = "super::alert_configuration::Column::Id",
        on_delete = "Cascade"
    )]
    Configuration,
    #[sea_orm(
        belongs_to = "super::condition_configuration::Entity",
        from = "Column::EvalConditionId",
        to = "super::condition_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    EvalCondition,
}

impl Related<super::alert_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Configuration.def()
    }
}

impl Related<super::condition_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvalCondition.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
