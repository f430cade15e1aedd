use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "join_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alert_config_id: i32,
    pub join_type: Option<String>,
    /// JSON object `{"condition": .., "type": ..}`.
    #[sea_orm(column_type = "Text", nullable)]
    pub join_config: Option<String>,
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
}

impl Related<super::alert_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Configuration.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
