//! In-place refresh of configuration blocks that already exist.
//!
//! When an update finds a block slot occupied, only the columns listed here are
//! rewritten from the incoming block; everything else on the row is kept. The lists
//! are the contract, tests pin them.

use sea_orm::ActiveValue::Unchanged;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, EntityTrait};

use crate::aggregate::{
    Condition, Group, Policy, SinkAlerthub, SinkCms, SinkEventStore, Template,
};
use crate::entity::{
    condition_configuration, group_configuration, policy_configuration,
    sink_alerthub_configuration, sink_cms_configuration, sink_event_store_configuration,
    template_configuration,
};
use crate::error::AlertError;

pub const CONDITION_REFRESH: &[condition_configuration::Column] = &[
    condition_configuration::Column::Condition,
    condition_configuration::Column::CountCondition,
];

pub const GROUP_REFRESH: &[group_configuration::Column] = &[
    group_configuration::Column::Fields,
    group_configuration::Column::Kind,
];

pub const POLICY_REFRESH: &[policy_configuration::Column] = &[
    policy_configuration::Column::AlertPolicyId,
    policy_configuration::Column::ActionPolicyId,
    policy_configuration::Column::RepeatInterval,
];

/// Annotations and tokens are not refreshed.
pub const TEMPLATE_REFRESH: &[template_configuration::Column] = &[
    template_configuration::Column::TemplateId,
    template_configuration::Column::Lang,
    template_configuration::Column::Kind,
    template_configuration::Column::Version,
];

pub const SINK_ALERTHUB_REFRESH: &[sink_alerthub_configuration::Column] =
    &[sink_alerthub_configuration::Column::Enabled];

pub const SINK_CMS_REFRESH: &[sink_cms_configuration::Column] =
    &[sink_cms_configuration::Column::Enabled];

/// Endpoint, event store, project and role stay as first written.
pub const SINK_EVENT_STORE_REFRESH: &[sink_event_store_configuration::Column] =
    &[sink_event_store_configuration::Column::Enabled];

/// Copies `columns` from `incoming` onto `target`, leaving other columns untouched.
fn overlay<A>(target: &mut A, incoming: &A, columns: &[<A::Entity as EntityTrait>::Column])
where
    A: ActiveModelTrait,
{
    for &column in columns {
        if let Some(value) = incoming.get(column).into_value() {
            target.set(column, value);
        }
    }
}

pub(super) async fn condition(
    tx: &DatabaseTransaction,
    id: i32,
    block: &Condition,
) -> Result<(), AlertError> {
    let mut row = condition_configuration::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    overlay(&mut row, &block.into(), CONDITION_REFRESH);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("refreshing condition block"))?;
    Ok(())
}

pub(super) async fn group(
    tx: &DatabaseTransaction,
    id: i32,
    block: &Group,
) -> Result<(), AlertError> {
    let mut row = group_configuration::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    overlay(&mut row, &block.into(), GROUP_REFRESH);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("refreshing group block"))?;
    Ok(())
}

pub(super) async fn policy(
    tx: &DatabaseTransaction,
    id: i32,
    block: &Policy,
) -> Result<(), AlertError> {
    let mut row = policy_configuration::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    overlay(&mut row, &block.into(), POLICY_REFRESH);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("refreshing policy block"))?;
    Ok(())
}

pub(super) async fn template(
    tx: &DatabaseTransaction,
    id: i32,
    block: &Template,
) -> Result<(), AlertError> {
    let mut row = template_configuration::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    overlay(&mut row, &block.into(), TEMPLATE_REFRESH);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("refreshing template block"))?;
    Ok(())
}

pub(super) async fn sink_alerthub(
    tx: &DatabaseTransaction,
    id: i32,
    block: &SinkAlerthub,
) -> Result<(), AlertError> {
    let mut row = sink_alerthub_configuration::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    overlay(&mut row, &block.into(), SINK_ALERTHUB_REFRESH);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("refreshing alerthub sink block"))?;
    Ok(())
}

pub(super) async fn sink_cms(
    tx: &DatabaseTransaction,
    id: i32,
    block: &SinkCms,
) -> Result<(), AlertError> {
    let mut row = sink_cms_configuration::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    overlay(&mut row, &block.into(), SINK_CMS_REFRESH);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("refreshing cms sink block"))?;
    Ok(())
}

pub(super) async fn sink_event_store(
    tx: &DatabaseTransaction,
    id: i32,
    block: &SinkEventStore,
) -> Result<(), AlertError> {
    let mut row = sink_event_store_configuration::ActiveModel {
        id: Unchanged(id),
        ..Default::default()
    };
    overlay(&mut row, &block.into(), SINK_EVENT_STORE_REFRESH);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("refreshing event store sink block"))?;
    Ok(())
}
