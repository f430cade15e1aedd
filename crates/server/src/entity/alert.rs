//! Root row of the alert aggregate.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::sea_orm_active_enums::AlertStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alerts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub display_name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub status: AlertStatus,
    /// Creation instant as reported by the source of truth, not the row timestamp.
    pub create_time: Option<i64>,
    pub last_modified_time: Option<i64>,
    /// Back-pointer patched once the configuration row exists.
    pub configuration_id: Option<i32>,
    /// Back-pointer patched once the schedule row exists.
    pub schedule_id: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::alert_configuration::Entity")]
    Configuration,
    #[sea_orm(has_one = "super::alert_schedule::Entity")]
    Schedule,
    #[sea_orm(has_many = "super::alert_tag::Entity")]
    Tags,
    #[sea_orm(has_many = "super::alert_query::Entity")]
    Queries,
}

impl Related<super::alert_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Configuration.def()
    }
}

impl Related<super::alert_schedule::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Schedule.def()
    }
}

impl Related<super::alert_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tags.def()
    }
}

impl Related<super::alert_query::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Queries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
