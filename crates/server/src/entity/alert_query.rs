use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alert_queries")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub alert_id: i32,
    pub chart_title: Option<String>,
    pub dashboard_id: Option<String>,
    pub end: Option<String>,
    pub power_sql_mode: Option<String>,
    pub project: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub query: String,
    pub region: Option<String>,
    pub role_arn: Option<String>,
    pub start: Option<String>,
    pub store: Option<String>,
    pub store_type: Option<String>,
    pub time_span_type: Option<String>,
    pub ui: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::alert::Entity",
        from = "Column::AlertId",
        to = "super::alert::Column::Id",
        on_delete = "Cascade"
    )]
    Alert,
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
