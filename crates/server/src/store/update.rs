//! Update of an existing graph.
//!
//! Schedule, tags and queries are replaced wholesale. The configuration is merged:
//! scalars are rewritten, each block slot is upserted (see `refresh` for which
//! columns an existing block gets), and the severity and join sets are replaced.

use sea_orm::ActiveValue::Set;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter};
use time::OffsetDateTime;

use super::create::{
    insert_condition, insert_configuration, insert_group, insert_joins, insert_policy,
    insert_queries, insert_schedule, insert_severities, insert_sink_alerthub, insert_sink_cms,
    insert_sink_event_store, insert_tags, insert_template,
};
use super::delete::{delete_conditions, delete_severities};
use super::read::{find_configuration_row, find_root_by_id};
use super::refresh;
use super::rows::apply_configuration_scalars;
use crate::aggregate::{AlertAggregate, Configuration};
use crate::entity::{
    alert, alert_configuration, alert_query, alert_schedule, alert_tag, join_configuration,
};
use crate::error::AlertError;

/// Resolves one block slot: keep it when nothing comes in, insert when the slot is
/// empty, refresh in place when it is occupied.
macro_rules! upsert_block {
    ($tx:expr, $slot:expr, $incoming:expr, $insert:path, $refresh:path) => {
        match ($slot, $incoming) {
            (slot, None) => slot,
            (None, Some(block)) => $insert($tx, block).await?.id,
            (Some(id), Some(block)) => {
                $refresh($tx, id, block).await?;
                Some(id)
            }
        }
    };
}

pub(super) async fn update_graph(
    tx: &DatabaseTransaction,
    alert: &AlertAggregate,
) -> Result<i32, AlertError> {
    let id = alert
        .id
        .ok_or_else(|| AlertError::Validation("id is required for update".into()))?;
    let root = find_root_by_id(tx, id)
        .await?
        .ok_or_else(|| AlertError::not_found_id(id))?;
    if root.name != alert.name {
        return Err(AlertError::Validation(format!(
            "alert name is immutable ('{}' cannot become '{}')",
            root.name, alert.name
        )));
    }

    alert_schedule::Entity::delete_many()
        .filter(alert_schedule::Column::AlertId.eq(id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("replacing schedule"))?;
    let schedule_id = match &alert.schedule {
        Some(schedule) => insert_schedule(tx, id, schedule).await?.id,
        None => None,
    };

    alert_tag::Entity::delete_many()
        .filter(alert_tag::Column::AlertId.eq(id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("replacing tags"))?;
    insert_tags(tx, id, &alert.tags).await?;

    alert_query::Entity::delete_many()
        .filter(alert_query::Column::AlertId.eq(id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("replacing queries"))?;
    insert_queries(tx, id, &alert.queries).await?;

    let configuration_id = match &alert.configuration {
        Some(cfg) => merge_configuration(tx, id, cfg).await?,
        None => find_configuration_row(tx, id).await?.map(|c| c.id),
    };

    let mut root: alert::ActiveModel = root.into();
    root.display_name = Set(alert.display_name.clone());
    root.description = Set(alert.description.clone());
    root.status = Set(alert.status);
    root.create_time = Set(alert.create_time);
    root.last_modified_time = Set(alert.last_modified_time);
    root.configuration_id = Set(configuration_id);
    root.schedule_id = Set(schedule_id);
    root.updated_at = Set(OffsetDateTime::now_utc());
    root.update(tx)
        .await
        .map_err(AlertError::persistence("updating alert"))?;

    Ok(id)
}

async fn merge_configuration(
    tx: &DatabaseTransaction,
    alert_id: i32,
    cfg: &Configuration,
) -> Result<Option<i32>, AlertError> {
    let Some(existing) = find_configuration_row(tx, alert_id).await? else {
        return Ok(insert_configuration(tx, alert_id, cfg).await?.id);
    };

    let condition = upsert_block!(
        tx,
        existing.condition_config_id,
        cfg.condition.as_ref(),
        insert_condition,
        refresh::condition
    );
    let group = upsert_block!(
        tx,
        existing.group_config_id,
        cfg.group.as_ref(),
        insert_group,
        refresh::group
    );
    let policy = upsert_block!(
        tx,
        existing.policy_config_id,
        cfg.policy.as_ref(),
        insert_policy,
        refresh::policy
    );
    let template = upsert_block!(
        tx,
        existing.template_config_id,
        cfg.template.as_ref(),
        insert_template,
        refresh::template
    );
    let sink_alerthub = upsert_block!(
        tx,
        existing.sink_alerthub_config_id,
        cfg.sink_alerthub.as_ref(),
        insert_sink_alerthub,
        refresh::sink_alerthub
    );
    let sink_cms = upsert_block!(
        tx,
        existing.sink_cms_config_id,
        cfg.sink_cms.as_ref(),
        insert_sink_cms,
        refresh::sink_cms
    );
    let sink_event_store = upsert_block!(
        tx,
        existing.sink_event_store_config_id,
        cfg.sink_event_store.as_ref(),
        insert_sink_event_store,
        refresh::sink_event_store
    );

    let config_id = existing.id;
    let mut row: alert_configuration::ActiveModel = existing.into();
    apply_configuration_scalars(&mut row, cfg);
    row.condition_config_id = Set(condition);
    row.group_config_id = Set(group);
    row.policy_config_id = Set(policy);
    row.template_config_id = Set(template);
    row.sink_alerthub_config_id = Set(sink_alerthub);
    row.sink_cms_config_id = Set(sink_cms);
    row.sink_event_store_config_id = Set(sink_event_store);
    row.update(tx)
        .await
        .map_err(AlertError::persistence("updating configuration"))?;

    // replace-all: old severities and their eval conditions go first
    let stale_conditions = delete_severities(tx, config_id).await?;
    delete_conditions(tx, stale_conditions).await?;
    insert_severities(tx, config_id, &cfg.severities).await?;

    join_configuration::Entity::delete_many()
        .filter(join_configuration::Column::AlertConfigId.eq(config_id))
        .exec(tx)
        .await
        .map_err(AlertError::persistence("replacing join configurations"))?;
    insert_joins(tx, config_id, &cfg.joins).await?;

    Ok(Some(config_id))
}
