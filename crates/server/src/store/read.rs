//! Hydration of a root row into the full aggregate.

use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, PrimaryKeyTrait, QueryFilter,
    QueryOrder,
};

use super::rows::{configuration_scalars, severity_from_row};
use crate::aggregate::{
    AlertAggregate, Condition, Configuration, Group, Join, Policy, Query, Schedule, SinkAlerthub,
    SinkCms, SinkEventStore, Tag, Template,
};
use crate::entity::{
    alert, alert_configuration, alert_query, alert_schedule, alert_tag, condition_configuration,
    group_configuration, join_configuration, policy_configuration, severity_configuration,
    sink_alerthub_configuration, sink_cms_configuration, sink_event_store_configuration,
    template_configuration,
};
use crate::error::AlertError;

pub(super) async fn find_root_by_id<C: ConnectionTrait>(
    conn: &C,
    id: i32,
) -> Result<Option<alert::Model>, AlertError> {
    alert::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(AlertError::persistence("loading alert"))
}

pub(super) async fn find_root_by_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
) -> Result<Option<alert::Model>, AlertError> {
    alert::Entity::find()
        .filter(alert::Column::Name.eq(name))
        .one(conn)
        .await
        .map_err(AlertError::persistence("loading alert by name"))
}

pub(super) async fn find_configuration_row<C: ConnectionTrait>(
    conn: &C,
    alert_id: i32,
) -> Result<Option<alert_configuration::Model>, AlertError> {
    alert_configuration::Entity::find()
        .filter(alert_configuration::Column::AlertId.eq(alert_id))
        .one(conn)
        .await
        .map_err(AlertError::persistence("loading configuration"))
}

pub(super) async fn hydrate<C: ConnectionTrait>(
    conn: &C,
    root: alert::Model,
) -> Result<AlertAggregate, AlertError> {
    let configuration = match find_configuration_row(conn, root.id).await? {
        Some(row) => Some(hydrate_configuration(conn, row).await?),
        None => None,
    };

    let schedule = root
        .find_related(alert_schedule::Entity)
        .one(conn)
        .await
        .map_err(AlertError::persistence("loading schedule"))?
        .map(Schedule::from);

    let tags = root
        .find_related(alert_tag::Entity)
        .order_by_asc(alert_tag::Column::Id)
        .all(conn)
        .await
        .map_err(AlertError::persistence("loading tags"))?
        .into_iter()
        .map(Tag::from)
        .collect();

    let queries = root
        .find_related(alert_query::Entity)
        .order_by_asc(alert_query::Column::Id)
        .all(conn)
        .await
        .map_err(AlertError::persistence("loading queries"))?
        .into_iter()
        .map(Query::from)
        .collect();

    Ok(AlertAggregate {
        id: Some(root.id),
        name: root.name,
        display_name: root.display_name,
        description: root.description,
        status: root.status,
        create_time: root.create_time,
        last_modified_time: root.last_modified_time,
        configuration,
        schedule,
        tags,
        queries,
    })
}

async fn hydrate_configuration<C: ConnectionTrait>(
    conn: &C,
    row: alert_configuration::Model,
) -> Result<Configuration, AlertError> {
    let mut cfg = configuration_scalars(&row);

    cfg.condition = load_block::<condition_configuration::Entity, _, Condition>(
        conn,
        row.condition_config_id,
    )
    .await?;
    cfg.group = load_block::<group_configuration::Entity, _, Group>(conn, row.group_config_id)
        .await?;
    cfg.policy =
        load_block::<policy_configuration::Entity, _, Policy>(conn, row.policy_config_id).await?;
    cfg.template =
        load_block::<template_configuration::Entity, _, Template>(conn, row.template_config_id)
            .await?;
    cfg.sink_alerthub = load_block::<sink_alerthub_configuration::Entity, _, SinkAlerthub>(
        conn,
        row.sink_alerthub_config_id,
    )
    .await?;
    cfg.sink_cms =
        load_block::<sink_cms_configuration::Entity, _, SinkCms>(conn, row.sink_cms_config_id)
            .await?;
    cfg.sink_event_store = load_block::<sink_event_store_configuration::Entity, _, SinkEventStore>(
        conn,
        row.sink_event_store_config_id,
    )
    .await?;

    let severity_rows = row
        .find_related(severity_configuration::Entity)
        .order_by_asc(severity_configuration::Column::Id)
        .all(conn)
        .await
        .map_err(AlertError::persistence("loading severity configurations"))?;
    for severity in severity_rows {
        let eval = load_block::<condition_configuration::Entity, _, Condition>(
            conn,
            severity.eval_condition_id,
        )
        .await?;
        cfg.severities.push(severity_from_row(severity, eval));
    }

    cfg.joins = row
        .find_related(join_configuration::Entity)
        .order_by_asc(join_configuration::Column::Id)
        .all(conn)
        .await
        .map_err(AlertError::persistence("loading join configurations"))?
        .into_iter()
        .map(Join::from)
        .collect();

    Ok(cfg)
}

/// Loads an optional block row by the id held in a configuration slot. A dangling
/// id reads as an absent block.
async fn load_block<E, C, T>(conn: &C, id: Option<i32>) -> Result<Option<T>, AlertError>
where
    E: EntityTrait,
    E::PrimaryKey: PrimaryKeyTrait<ValueType = i32>,
    C: ConnectionTrait,
    T: From<E::Model>,
{
    let Some(id) = id else {
        return Ok(None);
    };
    E::find_by_id(id)
        .one(conn)
        .await
        .map(|row| row.map(T::from))
        .map_err(AlertError::persistence("loading configuration block"))
}
