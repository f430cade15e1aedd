//! Insertion of a full graph, in foreign-key dependency order.

use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::{ActiveModelTrait, DatabaseTransaction};
use time::OffsetDateTime;

use super::rows::{
    apply_configuration_scalars, join_row, query_row, schedule_row, severity_row, tag_row,
};
use crate::aggregate::{
    AlertAggregate, Condition, Configuration, Group, Join, Policy, Query, Schedule, Severity,
    SinkAlerthub, SinkCms, SinkEventStore, Tag, Template,
};
use crate::entity::{
    alert, alert_configuration, condition_configuration, group_configuration,
    policy_configuration, sink_alerthub_configuration, sink_cms_configuration,
    sink_event_store_configuration, template_configuration,
};
use crate::error::{AlertError, unique_as_validation};

pub(super) async fn insert_graph(
    tx: &DatabaseTransaction,
    alert: &AlertAggregate,
) -> Result<AlertAggregate, AlertError> {
    let now = OffsetDateTime::now_utc();

    // 1. bare root, no back-pointers yet
    let root = alert::ActiveModel {
        id: NotSet,
        name: Set(alert.name.clone()),
        display_name: Set(alert.display_name.clone()),
        description: Set(alert.description.clone()),
        status: Set(alert.status),
        create_time: Set(alert.create_time),
        last_modified_time: Set(alert.last_modified_time),
        configuration_id: Set(None),
        schedule_id: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(tx)
    .await
    .map_err(unique_as_validation("inserting alert", || {
        format!("alert name '{}' already exists", alert.name)
    }))?;

    let mut created = alert.clone();
    created.id = Some(root.id);

    // 2-4. configuration with its blocks and collections
    created.configuration = match &alert.configuration {
        Some(cfg) => Some(insert_configuration(tx, root.id, cfg).await?),
        None => None,
    };

    // 5-7. schedule, tags, queries
    created.schedule = match &alert.schedule {
        Some(schedule) => Some(insert_schedule(tx, root.id, schedule).await?),
        None => None,
    };
    created.tags = insert_tags(tx, root.id, &alert.tags).await?;
    created.queries = insert_queries(tx, root.id, &alert.queries).await?;

    // 8. back-pointers
    let mut root: alert::ActiveModel = root.into();
    root.configuration_id = Set(created.configuration.as_ref().and_then(|c| c.id));
    root.schedule_id = Set(created.schedule.as_ref().and_then(|s| s.id));
    root.update(tx)
        .await
        .map_err(AlertError::persistence("linking alert to its children"))?;

    Ok(created)
}

/// Blocks first, then the configuration row embedding their ids, then the
/// collections keyed on the configuration id.
pub(super) async fn insert_configuration(
    tx: &DatabaseTransaction,
    alert_id: i32,
    cfg: &Configuration,
) -> Result<Configuration, AlertError> {
    let mut out = cfg.clone();

    out.condition = match &cfg.condition {
        Some(b) => Some(insert_condition(tx, b).await?),
        None => None,
    };
    out.group = match &cfg.group {
        Some(b) => Some(insert_group(tx, b).await?),
        None => None,
    };
    out.policy = match &cfg.policy {
        Some(b) => Some(insert_policy(tx, b).await?),
        None => None,
    };
    out.template = match &cfg.template {
        Some(b) => Some(insert_template(tx, b).await?),
        None => None,
    };
    out.sink_alerthub = match &cfg.sink_alerthub {
        Some(b) => Some(insert_sink_alerthub(tx, b).await?),
        None => None,
    };
    out.sink_cms = match &cfg.sink_cms {
        Some(b) => Some(insert_sink_cms(tx, b).await?),
        None => None,
    };
    out.sink_event_store = match &cfg.sink_event_store {
        Some(b) => Some(insert_sink_event_store(tx, b).await?),
        None => None,
    };

    let mut row = alert_configuration::ActiveModel {
        id: NotSet,
        alert_id: Set(alert_id),
        condition_config_id: Set(out.condition.as_ref().and_then(|b| b.id)),
        group_config_id: Set(out.group.as_ref().and_then(|b| b.id)),
        policy_config_id: Set(out.policy.as_ref().and_then(|b| b.id)),
        template_config_id: Set(out.template.as_ref().and_then(|b| b.id)),
        sink_alerthub_config_id: Set(out.sink_alerthub.as_ref().and_then(|b| b.id)),
        sink_cms_config_id: Set(out.sink_cms.as_ref().and_then(|b| b.id)),
        sink_event_store_config_id: Set(out.sink_event_store.as_ref().and_then(|b| b.id)),
        ..Default::default()
    };
    apply_configuration_scalars(&mut row, cfg);
    let row = row
        .insert(tx)
        .await
        .map_err(AlertError::persistence("inserting configuration"))?;
    out.id = Some(row.id);

    out.severities = insert_severities(tx, row.id, &cfg.severities).await?;
    out.joins = insert_joins(tx, row.id, &cfg.joins).await?;
    Ok(out)
}

pub(super) async fn insert_condition(
    tx: &DatabaseTransaction,
    block: &Condition,
) -> Result<Condition, AlertError> {
    condition_configuration::ActiveModel::from(block)
        .insert(tx)
        .await
        .map(Condition::from)
        .map_err(AlertError::persistence("inserting condition block"))
}

pub(super) async fn insert_group(
    tx: &DatabaseTransaction,
    block: &Group,
) -> Result<Group, AlertError> {
    group_configuration::ActiveModel::from(block)
        .insert(tx)
        .await
        .map(Group::from)
        .map_err(AlertError::persistence("inserting group block"))
}

pub(super) async fn insert_policy(
    tx: &DatabaseTransaction,
    block: &Policy,
) -> Result<Policy, AlertError> {
    policy_configuration::ActiveModel::from(block)
        .insert(tx)
        .await
        .map(Policy::from)
        .map_err(AlertError::persistence("inserting policy block"))
}

pub(super) async fn insert_template(
    tx: &DatabaseTransaction,
    block: &Template,
) -> Result<Template, AlertError> {
    template_configuration::ActiveModel::from(block)
        .insert(tx)
        .await
        .map(Template::from)
        .map_err(AlertError::persistence("inserting template block"))
}

pub(super) async fn insert_sink_alerthub(
    tx: &DatabaseTransaction,
    block: &SinkAlerthub,
) -> Result<SinkAlerthub, AlertError> {
    sink_alerthub_configuration::ActiveModel::from(block)
        .insert(tx)
        .await
        .map(SinkAlerthub::from)
        .map_err(AlertError::persistence("inserting alerthub sink block"))
}

pub(super) async fn insert_sink_cms(
    tx: &DatabaseTransaction,
    block: &SinkCms,
) -> Result<SinkCms, AlertError> {
    sink_cms_configuration::ActiveModel::from(block)
        .insert(tx)
        .await
        .map(SinkCms::from)
        .map_err(AlertError::persistence("inserting cms sink block"))
}

pub(super) async fn insert_sink_event_store(
    tx: &DatabaseTransaction,
    block: &SinkEventStore,
) -> Result<SinkEventStore, AlertError> {
    sink_event_store_configuration::ActiveModel::from(block)
        .insert(tx)
        .await
        .map(SinkEventStore::from)
        .map_err(AlertError::persistence("inserting event store sink block"))
}

/// Each severity creates its own eval condition before its row.
pub(super) async fn insert_severities(
    tx: &DatabaseTransaction,
    alert_config_id: i32,
    severities: &[Severity],
) -> Result<Vec<Severity>, AlertError> {
    let mut out = Vec::with_capacity(severities.len());
    for severity in severities {
        let eval_condition = match &severity.eval_condition {
            Some(c) => Some(insert_condition(tx, c).await?),
            None => None,
        };
        let row = severity_row(
            alert_config_id,
            severity,
            eval_condition.as_ref().and_then(|c| c.id),
        )
        .insert(tx)
        .await
        .map_err(AlertError::persistence("inserting severity configuration"))?;
        out.push(Severity {
            id: Some(row.id),
            severity: row.severity,
            eval_condition,
        });
    }
    Ok(out)
}

pub(super) async fn insert_joins(
    tx: &DatabaseTransaction,
    alert_config_id: i32,
    joins: &[Join],
) -> Result<Vec<Join>, AlertError> {
    let mut out = Vec::with_capacity(joins.len());
    for join in joins {
        let row = join_row(alert_config_id, join)
            .insert(tx)
            .await
            .map_err(AlertError::persistence("inserting join configuration"))?;
        out.push(Join::from(row));
    }
    Ok(out)
}

pub(super) async fn insert_schedule(
    tx: &DatabaseTransaction,
    alert_id: i32,
    schedule: &Schedule,
) -> Result<Schedule, AlertError> {
    schedule_row(alert_id, schedule)
        .insert(tx)
        .await
        .map(Schedule::from)
        .map_err(AlertError::persistence("inserting schedule"))
}

pub(super) async fn insert_tags(
    tx: &DatabaseTransaction,
    alert_id: i32,
    tags: &[Tag],
) -> Result<Vec<Tag>, AlertError> {
    let mut out = Vec::with_capacity(tags.len());
    for tag in tags {
        let row = tag_row(alert_id, tag)
            .insert(tx)
            .await
            .map_err(unique_as_validation("inserting tag", || {
                format!("duplicate {:?} tag '{}'", tag.tag_type, tag.tag_key)
            }))?;
        out.push(Tag::from(row));
    }
    Ok(out)
}

pub(super) async fn insert_queries(
    tx: &DatabaseTransaction,
    alert_id: i32,
    queries: &[Query],
) -> Result<Vec<Query>, AlertError> {
    let mut out = Vec::with_capacity(queries.len());
    for query in queries {
        let row = query_row(alert_id, query)
            .insert(tx)
            .await
            .map_err(AlertError::persistence("inserting query"))?;
        out.push(Query::from(row));
    }
    Ok(out)
}
