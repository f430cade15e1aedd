//! Removal of a full graph, children before parents.

use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};

use super::read::{find_configuration_row, find_root_by_id};
use crate::entity::{
    alert, alert_configuration, alert_query, alert_schedule, alert_tag, condition_configuration,
    group_configuration, join_configuration, policy_configuration, severity_configuration,
    sink_alerthub_configuration, sink_cms_configuration, sink_event_store_configuration,
    template_configuration,
};
use crate::error::AlertError;

pub(super) async fn delete_graph(tx: &DatabaseTransaction, id: i32) -> Result<(), AlertError> {
    if find_root_by_id(tx, id).await?.is_none() {
        return Err(AlertError::not_found_id(id));
    }

    if let Some(cfg) = find_configuration_row(tx, id).await? {
        let eval_conditions = delete_severities(tx, cfg.id).await?;
        join_configuration::Entity::delete_many()
            .filter(join_configuration::Column::AlertConfigId.eq(cfg.id))
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting join configurations"))?;
        alert_configuration::Entity::delete_by_id(cfg.id)
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting configuration"))?;
        reclaim_blocks(tx, &cfg, eval_conditions).await?;
    }

    alert_schedule::Entity::delete_many()
        .filter(alert_schedule::Column::AlertId.eq(id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("deleting schedule"))?;
    alert_tag::Entity::delete_many()
        .filter(alert_tag::Column::AlertId.eq(id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("deleting tags"))?;
    alert_query::Entity::delete_many()
        .filter(alert_query::Column::AlertId.eq(id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("deleting queries"))?;
    alert::Entity::delete_by_id(id)
        .exec(tx)
        .await
        .map_err(AlertError::persistence("deleting alert"))?;
    Ok(())
}

/// Deletes every severity row of a configuration and returns the eval condition
/// ids they owned, which the caller must reclaim.
pub(super) async fn delete_severities(
    tx: &DatabaseTransaction,
    alert_config_id: i32,
) -> Result<Vec<i32>, AlertError> {
    let eval_conditions = severity_configuration::Entity::find()
        .filter(severity_configuration::Column::AlertConfigId.eq(alert_config_id))
        .all(tx)
        .await
        .map_err(AlertError::persistence("loading severity configurations"))?
        .into_iter()
        .filter_map(|s| s.eval_condition_id)
        .collect();
    severity_configuration::Entity::delete_many()
        .filter(severity_configuration::Column::AlertConfigId.eq(alert_config_id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("deleting severity configurations"))?;
    Ok(eval_conditions)
}

pub(super) async fn delete_conditions(
    tx: &DatabaseTransaction,
    ids: Vec<i32>,
) -> Result<(), AlertError> {
    if ids.is_empty() {
        return Ok(());
    }
    condition_configuration::Entity::delete_many()
        .filter(condition_configuration::Column::Id.is_in(ids))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("deleting condition blocks"))?;
    Ok(())
}

/// Deletes the block rows a configuration pointed at. Runs after the
/// configuration row itself is gone.
async fn reclaim_blocks(
    tx: &DatabaseTransaction,
    cfg: &alert_configuration::Model,
    mut conditions: Vec<i32>,
) -> Result<(), AlertError> {
    conditions.extend(cfg.condition_config_id);
    delete_conditions(tx, conditions).await?;

    if let Some(id) = cfg.group_config_id {
        group_configuration::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting group block"))?;
    }
    if let Some(id) = cfg.policy_config_id {
        policy_configuration::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting policy block"))?;
    }
    if let Some(id) = cfg.template_config_id {
        template_configuration::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting template block"))?;
    }
    if let Some(id) = cfg.sink_alerthub_config_id {
        sink_alerthub_configuration::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting alerthub sink block"))?;
    }
    if let Some(id) = cfg.sink_cms_config_id {
        sink_cms_configuration::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting cms sink block"))?;
    }
    if let Some(id) = cfg.sink_event_store_config_id {
        sink_event_store_configuration::Entity::delete_by_id(id)
            .exec(tx)
            .await
            .map_err(AlertError::persistence("deleting event store sink block"))?;
    }
    Ok(())
}
