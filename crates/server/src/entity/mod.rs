//! sea-orm entities, one per table of the alert aggregate.

pub mod alert;
pub mod alert_configuration;
pub mod alert_query;
pub mod alert_schedule;
pub mod alert_tag;
pub mod condition_configuration;
pub mod group_configuration;
pub mod join_configuration;
pub mod policy_configuration;
pub mod sea_orm_active_enums;
pub mod severity_configuration;
pub mod sink_alerthub_configuration;
pub mod sink_cms_configuration;
pub mod sink_event_store_configuration;
pub mod template_configuration;
