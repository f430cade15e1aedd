//! Mapping between the remote representation and the local aggregate.
//!
//! The two sides differ in a handful of places: group fields are a list remotely
//! and one comma-joined string locally; template annotations and tokens are maps
//! remotely and JSON text locally; labels are bare strings and annotations
//! key/value pairs remotely while locally both are tag rows; a join's condition
//! and type are separate remotely and one JSON blob locally.

use serde_json::{Map, Value, json};

use super::types::{
    RemoteAlert, RemoteAnnotation, RemoteCondition, RemoteConfiguration, RemoteGroup, RemoteJoin,
    RemotePolicy, RemoteQuery, RemoteSchedule, RemoteSeverity, RemoteSinkEventStore,
    RemoteSinkToggle, RemoteTemplate,
};
use crate::aggregate::{
    AlertAggregate, Condition, Configuration, Group, Join, Policy, Query, Schedule, Severity,
    SinkAlerthub, SinkCms, SinkEventStore, Tag, Template,
};
use crate::error::AlertError;

impl TryFrom<RemoteAlert> for AlertAggregate {
    type Error = AlertError;

    fn try_from(remote: RemoteAlert) -> Result<Self, Self::Error> {
        let status = match remote.status.as_deref() {
            Some(s) => s.parse().map_err(AlertError::Validation)?,
            None => Default::default(),
        };

        let mut alert = AlertAggregate {
            id: None,
            name: remote.name,
            display_name: remote.display_name,
            description: remote.description,
            status,
            create_time: remote.create_time,
            last_modified_time: remote.last_modified_time,
            configuration: None,
            schedule: remote.schedule.map(Schedule::from),
            tags: Vec::new(),
            queries: Vec::new(),
        };

        if let Some(cfg) = remote.configuration {
            alert.queries = cfg.query_list.iter().map(Query::from).collect();
            alert.tags = cfg
                .tags
                .iter()
                .map(Tag::label)
                .chain(
                    cfg.annotations
                        .iter()
                        .map(|a| Tag::annotation(a.key.clone(), a.value.clone())),
                )
                .collect();
            alert.configuration = Some(Configuration::from(cfg));
        }

        Ok(alert)
    }
}

impl From<RemoteConfiguration> for Configuration {
    fn from(cfg: RemoteConfiguration) -> Self {
        Self {
            id: None,
            auto_annotation: cfg.auto_annotation,
            dashboard: cfg.dashboard,
            mute_until: cfg.mute_until,
            no_data_fire: cfg.no_data_fire,
            no_data_severity: cfg.no_data_severity,
            threshold: cfg.threshold,
            kind: cfg.kind,
            version: cfg.version,
            send_resolved: cfg.send_resolved,
            condition: cfg.condition_configuration.map(Condition::from),
            group: cfg.group_configuration.map(Group::from),
            policy: cfg.policy_configuration.map(Policy::from),
            template: cfg.template_configuration.map(Template::from),
            sink_alerthub: cfg.sink_alerthub.map(|s| SinkAlerthub {
                id: None,
                enabled: s.enabled,
            }),
            sink_cms: cfg.sink_cms.map(|s| SinkCms {
                id: None,
                enabled: s.enabled,
            }),
            sink_event_store: cfg.sink_event_store.map(SinkEventStore::from),
            severities: cfg
                .severity_configurations
                .into_iter()
                .map(|s| Severity {
                    id: None,
                    severity: s.severity,
                    eval_condition: s.eval_condition.map(Condition::from),
                })
                .collect(),
            joins: cfg.join_configurations.into_iter().map(Join::from).collect(),
        }
    }
}

impl From<RemoteCondition> for Condition {
    fn from(c: RemoteCondition) -> Self {
        Self {
            id: None,
            condition: c.condition,
            count_condition: c.count_condition,
        }
    }
}

impl From<RemoteGroup> for Group {
    fn from(g: RemoteGroup) -> Self {
        let fields: Vec<&str> = g
            .fields
            .iter()
            .map(|f| f.trim())
            .filter(|f| !f.is_empty())
            .collect();
        Self {
            id: None,
            fields: (!fields.is_empty()).then(|| fields.join(",")),
            kind: g.kind,
        }
    }
}

impl From<RemotePolicy> for Policy {
    fn from(p: RemotePolicy) -> Self {
        Self {
            id: None,
            alert_policy_id: p.alert_policy_id,
            action_policy_id: p.action_policy_id,
            repeat_interval: p.repeat_interval,
        }
    }
}

impl From<RemoteTemplate> for Template {
    fn from(t: RemoteTemplate) -> Self {
        Self {
            id: None,
            template_id: t.id,
            lang: t.lang,
            kind: t.kind,
            version: t.version,
            annotations: t.annotations.map(|m| Value::Object(m).to_string()),
            tokens: t.tokens.map(|m| Value::Object(m).to_string()),
        }
    }
}

impl From<RemoteSinkEventStore> for SinkEventStore {
    fn from(s: RemoteSinkEventStore) -> Self {
        Self {
            id: None,
            enabled: s.enabled,
            endpoint: s.endpoint,
            event_store: s.event_store,
            project: s.project,
            role_arn: s.role_arn,
        }
    }
}

impl From<RemoteJoin> for Join {
    fn from(j: RemoteJoin) -> Self {
        let join_config = (j.condition.is_some() || j.kind.is_some())
            .then(|| json!({ "condition": j.condition, "type": j.kind }).to_string());
        Self {
            id: None,
            join_type: j.kind,
            join_config,
        }
    }
}

impl From<&RemoteQuery> for Query {
    fn from(q: &RemoteQuery) -> Self {
        Self {
            id: None,
            chart_title: q.chart_title.clone(),
            dashboard_id: q.dashboard_id.clone(),
            end: q.end.clone(),
            power_sql_mode: q.power_sql_mode.clone(),
            project: q.project.clone(),
            query: q.query.clone(),
            region: q.region.clone(),
            role_arn: q.role_arn.clone(),
            start: q.start.clone(),
            store: q.store.clone(),
            store_type: q.store_type.clone(),
            time_span_type: q.time_span_type.clone(),
            ui: q.ui.clone(),
        }
    }
}

impl From<RemoteSchedule> for Schedule {
    fn from(s: RemoteSchedule) -> Self {
        Self {
            id: None,
            cron_expression: s.cron_expression,
            delay: s.delay,
            interval: s.interval,
            run_immediately: s.run_immediately,
            time_zone: s.time_zone,
            kind: s.kind,
        }
    }
}

impl From<&AlertAggregate> for RemoteAlert {
    fn from(alert: &AlertAggregate) -> Self {
        let has_config_parts =
            alert.configuration.is_some() || !alert.tags.is_empty() || !alert.queries.is_empty();
        let configuration = has_config_parts.then(|| {
            let mut cfg = alert
                .configuration
                .as_ref()
                .map(RemoteConfiguration::from)
                .unwrap_or_default();
            cfg.query_list = alert.queries.iter().map(RemoteQuery::from).collect();
            cfg.tags = alert.labels().map(|t| t.tag_key.clone()).collect();
            cfg.annotations = alert
                .annotations()
                .map(|t| RemoteAnnotation {
                    key: t.tag_key.clone(),
                    value: t.tag_value.clone(),
                })
                .collect();
            cfg
        });

        Self {
            name: alert.name.clone(),
            display_name: alert.display_name.clone(),
            description: alert.description.clone(),
            status: Some(alert.status.to_string()),
            create_time: alert.create_time,
            last_modified_time: alert.last_modified_time,
            configuration,
            schedule: alert.schedule.as_ref().map(RemoteSchedule::from),
        }
    }
}

impl From<&Configuration> for RemoteConfiguration {
    fn from(cfg: &Configuration) -> Self {
        Self {
            auto_annotation: cfg.auto_annotation,
            dashboard: cfg.dashboard.clone(),
            mute_until: cfg.mute_until,
            no_data_fire: cfg.no_data_fire,
            no_data_severity: cfg.no_data_severity,
            threshold: cfg.threshold,
            kind: cfg.kind.clone(),
            version: cfg.version.clone(),
            send_resolved: cfg.send_resolved,
            condition_configuration: cfg.condition.as_ref().map(RemoteCondition::from),
            group_configuration: cfg.group.as_ref().map(|g| RemoteGroup {
                fields: g.field_list(),
                kind: g.kind.clone(),
            }),
            policy_configuration: cfg.policy.as_ref().map(|p| RemotePolicy {
                alert_policy_id: p.alert_policy_id.clone(),
                action_policy_id: p.action_policy_id.clone(),
                repeat_interval: p.repeat_interval.clone(),
            }),
            template_configuration: cfg.template.as_ref().map(|t| RemoteTemplate {
                id: t.template_id.clone(),
                lang: t.lang.clone(),
                kind: t.kind.clone(),
                version: t.version.clone(),
                annotations: t.annotations.as_deref().map(json_object_or_empty),
                tokens: t.tokens.as_deref().map(json_object_or_empty),
            }),
            sink_alerthub: cfg.sink_alerthub.as_ref().map(|s| RemoteSinkToggle {
                enabled: s.enabled,
            }),
            sink_cms: cfg.sink_cms.as_ref().map(|s| RemoteSinkToggle {
                enabled: s.enabled,
            }),
            sink_event_store: cfg
                .sink_event_store
                .as_ref()
                .map(|s| RemoteSinkEventStore {
                    enabled: s.enabled,
                    endpoint: s.endpoint.clone(),
                    event_store: s.event_store.clone(),
                    project: s.project.clone(),
                    role_arn: s.role_arn.clone(),
                }),
            severity_configurations: cfg
                .severities
                .iter()
                .map(|s| RemoteSeverity {
                    severity: s.severity,
                    eval_condition: s.eval_condition.as_ref().map(RemoteCondition::from),
                })
                .collect(),
            join_configurations: cfg.joins.iter().map(RemoteJoin::from).collect(),
            query_list: Vec::new(),
            tags: Vec::new(),
            annotations: Vec::new(),
        }
    }
}

impl From<&Condition> for RemoteCondition {
    fn from(c: &Condition) -> Self {
        Self {
            condition: c.condition.clone(),
            count_condition: c.count_condition.clone(),
        }
    }
}

/// Unpacks the local JSON blob; the stored `join_type` wins when the blob has no type.
impl From<&Join> for RemoteJoin {
    fn from(j: &Join) -> Self {
        let blob = j
            .join_config
            .as_deref()
            .and_then(|text| serde_json::from_str::<Value>(text).ok());
        let field = |name: &str| {
            blob.as_ref()
                .and_then(|v| v.get(name))
                .and_then(Value::as_str)
                .map(str::to_owned)
        };
        Self {
            condition: field("condition"),
            kind: field("type").or_else(|| j.join_type.clone()),
        }
    }
}

impl From<&Query> for RemoteQuery {
    fn from(q: &Query) -> Self {
        Self {
            chart_title: q.chart_title.clone(),
            dashboard_id: q.dashboard_id.clone(),
            end: q.end.clone(),
            power_sql_mode: q.power_sql_mode.clone(),
            project: q.project.clone(),
            query: q.query.clone(),
            region: q.region.clone(),
            role_arn: q.role_arn.clone(),
            start: q.start.clone(),
            store: q.store.clone(),
            store_type: q.store_type.clone(),
            time_span_type: q.time_span_type.clone(),
            ui: q.ui.clone(),
        }
    }
}

impl From<&Schedule> for RemoteSchedule {
    fn from(s: &Schedule) -> Self {
        Self {
            cron_expression: s.cron_expression.clone(),
            delay: s.delay,
            interval: s.interval.clone(),
            run_immediately: s.run_immediately,
            time_zone: s.time_zone.clone(),
            kind: s.kind.clone(),
        }
    }
}

/// Stored JSON that is not an object is sent as an empty map.
fn json_object_or_empty(text: &str) -> Map<String, Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote_fixture() -> RemoteAlert {
        serde_json::from_value(json!({
            "name": "cpu-high",
            "displayName": "CPU high",
            "status": "DISABLED",
            "lastModifiedTime": 1700000000,
            "configuration": {
                "type": "default",
                "groupConfiguration": { "fields": [" host ", "region"], "type": "custom" },
                "templateConfiguration": {
                    "id": "tpl-1",
                    "aonotations": { "summary": "cpu" },
                    "tokens": { "k": "v" }
                },
                "joinConfigurations": [{ "condition": "$0.x == $1.x", "type": "left_join" }],
                "severityConfigurations": [
                    { "severity": 8, "evalCondition": { "condition": "cnt > 3" } }
                ],
                "queryList": [{ "query": "* | select count(1) as cnt", "store": "logs" }],
                "tags": ["team-infra"],
                "annotations": [{ "key": "runbook", "value": "https://wiki/cpu" }]
            },
            "schedule": { "type": "FixedRate", "interval": "1m" }
        }))
        .unwrap()
    }

    #[test]
    fn remote_to_local_bridges_representations() {
        let alert = AlertAggregate::try_from(remote_fixture()).unwrap();
        assert_eq!(alert.status, crate::aggregate::AlertStatus::Disabled);

        let cfg = alert.configuration.as_ref().unwrap();
        assert_eq!(cfg.group.as_ref().unwrap().fields.as_deref(), Some("host,region"));

        let template = cfg.template.as_ref().unwrap();
        assert_eq!(template.template_id.as_deref(), Some("tpl-1"));
        assert_eq!(template.annotations.as_deref(), Some(r#"{"summary":"cpu"}"#));

        let join = &cfg.joins[0];
        assert_eq!(join.join_type.as_deref(), Some("left_join"));
        let blob: Value = serde_json::from_str(join.join_config.as_deref().unwrap()).unwrap();
        assert_eq!(blob, json!({ "condition": "$0.x == $1.x", "type": "left_join" }));

        assert_eq!(
            alert.tags,
            vec![
                Tag::label("team-infra"),
                Tag::annotation("runbook", Some("https://wiki/cpu".into())),
            ]
        );
        assert_eq!(alert.queries[0].store.as_deref(), Some("logs"));
        assert_eq!(alert.schedule.as_ref().unwrap().kind, "FixedRate");
    }

    #[test]
    fn local_to_remote_restores_remote_shape() {
        let alert = AlertAggregate::try_from(remote_fixture()).unwrap();
        let back = RemoteAlert::from(&alert);
        assert_eq!(back, remote_fixture_with_status());
    }

    fn remote_fixture_with_status() -> RemoteAlert {
        let mut remote = remote_fixture();
        let cfg = remote.configuration.as_mut().unwrap();
        // whitespace is trimmed on the way in
        cfg.group_configuration.as_mut().unwrap().fields = vec!["host".into(), "region".into()];
        remote
    }

    #[test]
    fn unparseable_template_json_becomes_empty_map() {
        let mut alert = AlertAggregate::new("a", "A");
        alert.configuration = Some(Configuration {
            template: Some(Template {
                annotations: Some("not json".into()),
                tokens: None,
                ..Default::default()
            }),
            ..Default::default()
        });
        let remote = RemoteAlert::from(&alert);
        let template = remote
            .configuration
            .unwrap()
            .template_configuration
            .unwrap();
        assert_eq!(template.annotations, Some(Map::new()));
        assert_eq!(template.tokens, None);
    }

    #[test]
    fn join_without_blob_falls_back_to_join_type() {
        let join = Join {
            id: None,
            join_type: Some("cross_join".into()),
            join_config: None,
        };
        let remote = RemoteJoin::from(&join);
        assert_eq!(remote.kind.as_deref(), Some("cross_join"));
        assert_eq!(remote.condition, None);
    }

    #[test]
    fn unknown_remote_status_is_rejected() {
        let mut remote = remote_fixture();
        remote.status = Some("PAUSED".into());
        assert!(matches!(
            AlertAggregate::try_from(remote),
            Err(AlertError::Validation(_))
        ));
    }

    #[test]
    fn tags_split_by_type_on_push() {
        let mut alert = AlertAggregate::new("a", "A");
        alert.tags = vec![Tag::label("l1"), Tag::annotation("k", None)];
        let cfg = RemoteAlert::from(&alert).configuration.unwrap();
        assert_eq!(cfg.tags, vec!["l1".to_string()]);
        assert_eq!(cfg.annotations[0].key, "k");
    }
}
