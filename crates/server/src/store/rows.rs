//! Conversions between table rows and aggregate parts.
//!
//! `From<Model>` builds a part with its identity; `From<&Part>` builds an insertable
//! active model with the primary key left unset and no owner columns filled in.

use sea_orm::ActiveValue::{NotSet, Set};

use crate::aggregate::{
    Condition, Configuration, Group, Join, Policy, Query, Schedule, Severity, SinkAlerthub,
    SinkCms, SinkEventStore, Tag, Template,
};
use crate::entity::{
    alert_configuration, alert_query, alert_schedule, alert_tag, condition_configuration,
    group_configuration, join_configuration, policy_configuration, severity_configuration,
    sink_alerthub_configuration, sink_cms_configuration, sink_event_store_configuration,
    template_configuration,
};

impl From<condition_configuration::Model> for Condition {
    fn from(m: condition_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            condition: m.condition,
            count_condition: m.count_condition,
        }
    }
}

impl From<&Condition> for condition_configuration::ActiveModel {
    fn from(c: &Condition) -> Self {
        Self {
            id: NotSet,
            condition: Set(c.condition.clone()),
            count_condition: Set(c.count_condition.clone()),
        }
    }
}

impl From<group_configuration::Model> for Group {
    fn from(m: group_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            fields: m.fields,
            kind: m.kind,
        }
    }
}

impl From<&Group> for group_configuration::ActiveModel {
    fn from(g: &Group) -> Self {
        Self {
            id: NotSet,
            fields: Set(g.fields.clone()),
            kind: Set(g.kind.clone()),
        }
    }
}

impl From<policy_configuration::Model> for Policy {
    fn from(m: policy_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            alert_policy_id: m.alert_policy_id,
            action_policy_id: m.action_policy_id,
            repeat_interval: m.repeat_interval,
        }
    }
}

impl From<&Policy> for policy_configuration::ActiveModel {
    fn from(p: &Policy) -> Self {
        Self {
            id: NotSet,
            alert_policy_id: Set(p.alert_policy_id.clone()),
            action_policy_id: Set(p.action_policy_id.clone()),
            repeat_interval: Set(p.repeat_interval.clone()),
        }
    }
}

impl From<template_configuration::Model> for Template {
    fn from(m: template_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            template_id: m.template_id,
            lang: m.lang,
            kind: m.kind,
            version: m.version,
            annotations: m.annotations,
            tokens: m.tokens,
        }
    }
}

impl From<&Template> for template_configuration::ActiveModel {
    fn from(t: &Template) -> Self {
        Self {
            id: NotSet,
            template_id: Set(t.template_id.clone()),
            lang: Set(t.lang.clone()),
            kind: Set(t.kind.clone()),
            version: Set(t.version.clone()),
            annotations: Set(t.annotations.clone()),
            tokens: Set(t.tokens.clone()),
        }
    }
}

impl From<sink_alerthub_configuration::Model> for SinkAlerthub {
    fn from(m: sink_alerthub_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            enabled: m.enabled,
        }
    }
}

impl From<&SinkAlerthub> for sink_alerthub_configuration::ActiveModel {
    fn from(s: &SinkAlerthub) -> Self {
        Self {
            id: NotSet,
            enabled: Set(s.enabled),
        }
    }
}

impl From<sink_cms_configuration::Model> for SinkCms {
    fn from(m: sink_cms_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            enabled: m.enabled,
        }
    }
}

impl From<&SinkCms> for sink_cms_configuration::ActiveModel {
    fn from(s: &SinkCms) -> Self {
        Self {
            id: NotSet,
            enabled: Set(s.enabled),
        }
    }
}

impl From<sink_event_store_configuration::Model> for SinkEventStore {
    fn from(m: sink_event_store_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            enabled: m.enabled,
            endpoint: m.endpoint,
            event_store: m.event_store,
            project: m.project,
            role_arn: m.role_arn,
        }
    }
}

impl From<&SinkEventStore> for sink_event_store_configuration::ActiveModel {
    fn from(s: &SinkEventStore) -> Self {
        Self {
            id: NotSet,
            enabled: Set(s.enabled),
            endpoint: Set(s.endpoint.clone()),
            event_store: Set(s.event_store.clone()),
            project: Set(s.project.clone()),
            role_arn: Set(s.role_arn.clone()),
        }
    }
}

impl From<join_configuration::Model> for Join {
    fn from(m: join_configuration::Model) -> Self {
        Self {
            id: Some(m.id),
            join_type: m.join_type,
            join_config: m.join_config,
        }
    }
}

pub(super) fn join_row(alert_config_id: i32, j: &Join) -> join_configuration::ActiveModel {
    join_configuration::ActiveModel {
        id: NotSet,
        alert_config_id: Set(alert_config_id),
        join_type: Set(j.join_type.clone()),
        join_config: Set(j.join_config.clone()),
    }
}

/// The eval condition is loaded separately.
pub(super) fn severity_from_row(
    m: severity_configuration::Model,
    eval_condition: Option<Condition>,
) -> Severity {
    Severity {
        id: Some(m.id),
        severity: m.severity,
        eval_condition,
    }
}

pub(super) fn severity_row(
    alert_config_id: i32,
    s: &Severity,
    eval_condition_id: Option<i32>,
) -> severity_configuration::ActiveModel {
    severity_configuration::ActiveModel {
        id: NotSet,
        alert_config_id: Set(alert_config_id),
        severity: Set(s.severity),
        eval_condition_id: Set(eval_condition_id),
    }
}

impl From<alert_schedule::Model> for Schedule {
    fn from(m: alert_schedule::Model) -> Self {
        Self {
            id: Some(m.id),
            cron_expression: m.cron_expression,
            delay: m.delay,
            interval: m.interval,
            run_immediately: m.run_immediately,
            time_zone: m.time_zone,
            kind: m.kind,
        }
    }
}

pub(super) fn schedule_row(alert_id: i32, s: &Schedule) -> alert_schedule::ActiveModel {
    alert_schedule::ActiveModel {
        id: NotSet,
        alert_id: Set(alert_id),
        cron_expression: Set(s.cron_expression.clone()),
        delay: Set(s.delay),
        interval: Set(s.interval.clone()),
        run_immediately: Set(s.run_immediately),
        time_zone: Set(s.time_zone.clone()),
        kind: Set(s.kind.clone()),
    }
}

impl From<alert_tag::Model> for Tag {
    fn from(m: alert_tag::Model) -> Self {
        Self {
            id: Some(m.id),
            tag_type: m.tag_type,
            tag_key: m.tag_key,
            tag_value: m.tag_value,
        }
    }
}

pub(super) fn tag_row(alert_id: i32, t: &Tag) -> alert_tag::ActiveModel {
    alert_tag::ActiveModel {
        id: NotSet,
        alert_id: Set(alert_id),
        tag_type: Set(t.tag_type),
        tag_key: Set(t.tag_key.clone()),
        tag_value: Set(t.tag_value.clone()),
    }
}

impl From<alert_query::Model> for Query {
    fn from(m: alert_query::Model) -> Self {
        Self {
            id: Some(m.id),
            chart_title: m.chart_title,
            dashboard_id: m.dashboard_id,
            end: m.end,
            power_sql_mode: m.power_sql_mode,
            project: m.project,
            query: m.query,
            region: m.region,
            role_arn: m.role_arn,
            start: m.start,
            store: m.store,
            store_type: m.store_type,
            time_span_type: m.time_span_type,
            ui: m.ui,
        }
    }
}

pub(super) fn query_row(alert_id: i32, q: &Query) -> alert_query::ActiveModel {
    alert_query::ActiveModel {
        id: NotSet,
        alert_id: Set(alert_id),
        chart_title: Set(q.chart_title.clone()),
        dashboard_id: Set(q.dashboard_id.clone()),
        end: Set(q.end.clone()),
        power_sql_mode: Set(q.power_sql_mode.clone()),
        project: Set(q.project.clone()),
        query: Set(q.query.clone()),
        region: Set(q.region.clone()),
        role_arn: Set(q.role_arn.clone()),
        start: Set(q.start.clone()),
        store: Set(q.store.clone()),
        store_type: Set(q.store_type.clone()),
        time_span_type: Set(q.time_span_type.clone()),
        ui: Set(q.ui.clone()),
    }
}

/// Copies the scalar tuning fields; block slots are left to the caller.
pub(super) fn apply_configuration_scalars(
    row: &mut alert_configuration::ActiveModel,
    cfg: &Configuration,
) {
    row.auto_annotation = Set(cfg.auto_annotation);
    row.dashboard = Set(cfg.dashboard.clone());
    row.mute_until = Set(cfg.mute_until);
    row.no_data_fire = Set(cfg.no_data_fire);
    row.no_data_severity = Set(cfg.no_data_severity);
    row.threshold = Set(cfg.threshold);
    row.kind = Set(cfg.kind.clone());
    row.version = Set(cfg.version.clone());
    row.send_resolved = Set(cfg.send_resolved);
}

/// Scalars of a configuration row with every nested part left empty.
pub(super) fn configuration_scalars(m: &alert_configuration::Model) -> Configuration {
    Configuration {
        id: Some(m.id),
        auto_annotation: m.auto_annotation,
        dashboard: m.dashboard.clone(),
        mute_until: m.mute_until,
        no_data_fire: m.no_data_fire,
        no_data_severity: m.no_data_severity,
        threshold: m.threshold,
        kind: m.kind.clone(),
        version: m.version.clone(),
        send_resolved: m.send_resolved,
        ..Default::default()
    }
}
