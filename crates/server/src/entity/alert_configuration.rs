//! Configuration owned 1:1 by an alert.
//!
//! Scalar tuning fields live here; each optional block is its own table referenced
//! through a nullable `*_config_id` column.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "alert_configurations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub alert_id: i32,
    pub auto_annotation: Option<bool>,
    pub dashboard: Option<String>,
    pub mute_until: Option<i64>,
    pub no_data_fire: Option<bool>,
    pub no_data_severity: Option<i32>,
    pub threshold: Option<i32>,
    #[sea_orm(column_name = "type")]
    pub kind: Option<String>,
    pub version: Option<String>,
    pub send_resolved: Option<bool>,
    pub condition_config_id: Option<i32>,
    pub group_config_id: Option<i32>,
    pub policy_config_id: Option<i32>,
    pub template_config_id: Option<i32>,
    pub sink_alerthub_config_id: Option<i32>,
    pub sink_cms_config_id: Option<i32>,
    pub sink_event_store_config_id: Option<i32>,
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
    #[sea_orm(
        belongs_to = "super::condition_configuration::Entity",
        from = "Column::ConditionConfigId",
        to = "super::condition_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    Condition,
    #[sea_orm(
        belongs_to = "super::group_configuration::Entity",
        from = "Column::GroupConfigId",
        to = "super::group_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    Group,
    #[sea_orm(
        belongs_to = "super::policy_configuration::Entity",
        from = "Column::PolicyConfigId",
        to = "super::policy_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    Policy,
    #[sea_orm(
        belongs_to = "super::template_configuration::Entity",
        from = "Column::TemplateConfigId",
        to = "super::template_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    Template,
    #[sea_orm(
        belongs_to = "super::sink_alerthub_configuration::Entity",
        from = "Column::SinkAlerthubConfigId",
        to = "super::sink_alerthub_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    SinkAlerthub,
    #[sea_orm(
        belongs_to = "super::sink_cms_configuration::Entity",
        from = "Column::SinkCmsConfigId",
        to = "super::sink_cms_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    SinkCms,
    #[sea_orm(
        belongs_to = "super::sink_event_store_configuration::Entity",
        from = "Column::SinkEventStoreConfigId",
        to = "super::sink_event_store_configuration::Column::Id",
        on_delete = "SetNull"
    )]
    SinkEventStore,
    #[sea_orm(has_many = "super::severity_configuration::Entity")]
    Severities,
    #[sea_orm(has_many = "super::join_configuration::Entity")]
    Joins,
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl Related<super::severity_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Severities.def()
    }
}

impl Related<super::join_configuration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Joins.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
