//! The alert aggregate as the rest of the crate sees it.
//!
//! Every struct here mirrors one table, minus the foreign keys: ownership is
//! expressed by nesting. Identities are `None` until the store assigns them.

use serde::{Deserialize, Serialize};

use crate::error::AlertError;

pub use crate::entity::sea_orm_active_enums::{AlertStatus, TagType};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AlertAggregate {
    pub id: Option<i32>,
    pub name: String,
    pub display_name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: AlertStatus,
    pub create_time: Option<i64>,
    pub last_modified_time: Option<i64>,
    pub configuration: Option<Configuration>,
    pub schedule: Option<Schedule>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub queries: Vec<Query>,
}

impl AlertAggregate {
    pub fn new(name: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            ..Default::default()
        }
    }

    /// Checks the fields that must be present before any write is attempted.
    pub fn validate(&self) -> Result<(), AlertError> {
        if self.name.trim().is_empty() {
            return Err(AlertError::Validation("name is required".into()));
        }
        if self.display_name.trim().is_empty() {
            return Err(AlertError::Validation("display_name is required".into()));
        }
        if self
            .schedule
            .as_ref()
            .is_some_and(|s| s.kind.trim().is_empty())
        {
            return Err(AlertError::Validation("schedule type is required".into()));
        }
        if let Some(query) = self.queries.iter().find(|q| q.query.trim().is_empty()) {
            return Err(AlertError::Validation(format!(
                "query text is required (chart '{}')",
                query.chart_title.as_deref().unwrap_or_default()
            )));
        }
        for (i, tag) in self.tags.iter().enumerate() {
            if tag.tag_key.is_empty() {
                return Err(AlertError::Validation("tag key is required".into()));
            }
            if self.tags[..i]
                .iter()
                .any(|t| t.tag_type == tag.tag_type && t.tag_key == tag.tag_key)
            {
                return Err(AlertError::Validation(format!(
                    "duplicate {:?} tag '{}'",
                    tag.tag_type, tag.tag_key
                )));
            }
        }
        Ok(())
    }

    pub fn labels(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| t.tag_type == TagType::Label)
    }

    pub fn annotations(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(|t| t.tag_type == TagType::Annotation)
    }

    /// Clears every identity in the graph, e.g. before handing a read aggregate
    /// to `create` under a new name.
    pub fn without_ids(mut self) -> Self {
        self.id = None;
        if let Some(cfg) = self.configuration.as_mut() {
            cfg.clear_ids();
        }
        if let Some(schedule) = self.schedule.as_mut() {
            schedule.id = None;
        }
        self.tags.iter_mut().for_each(|t| t.id = None);
        self.queries.iter_mut().for_each(|q| q.id = None);
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub id: Option<i32>,
    pub auto_annotation: Option<bool>,
    pub dashboard: Option<String>,
    pub mute_until: Option<i64>,
    pub no_data_fire: Option<bool>,
    pub no_data_severity: Option<i32>,
    pub threshold: Option<i32>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub version: Option<String>,
    pub send_resolved: Option<bool>,
    pub condition: Option<Condition>,
    pub group: Option<Group>,
    pub policy: Option<Policy>,
    pub template: Option<Template>,
    pub sink_alerthub: Option<SinkAlerthub>,
    pub sink_cms: Option<SinkCms>,
    pub sink_event_store: Option<SinkEventStore>,
    #[serde(default)]
    pub severities: Vec<Severity>,
    #[serde(default)]
    pub joins: Vec<Join>,
}

impl Configuration {
    fn clear_ids(&mut self) {
        self.id = None;
        if let Some(b) = self.condition.as_mut() {
            b.id = None;
        }
        if let Some(b) = self.group.as_mut() {
            b.id = None;
        }
        if let Some(b) = self.policy.as_mut() {
            b.id = None;
        }
        if let Some(b) = self.template.as_mut() {
            b.id = None;
        }
        if let Some(b) = self.sink_alerthub.as_mut() {
            b.id = None;
        }
        if let Some(b) = self.sink_cms.as_mut() {
            b.id = None;
        }
        if let Some(b) = self.sink_event_store.as_mut() {
            b.id = None;
        }
        for severity in &mut self.severities {
            severity.id = None;
            if let Some(c) = severity.eval_condition.as_mut() {
                c.id = None;
            }
        }
        self.joins.iter_mut().for_each(|j| j.id = None);
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub id: Option<i32>,
    pub condition: Option<String>,
    pub count_condition: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Option<i32>,
    /// Comma-joined field names.
    pub fields: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl Group {
    pub fn field_list(&self) -> Vec<String> {
        self.fields
            .as_deref()
            .map(|f| {
                f.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Policy {
    pub id: Option<i32>,
    pub alert_policy_id: Option<String>,
    pub action_policy_id: Option<String>,
    pub repeat_interval: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: Option<i32>,
    pub template_id: Option<String>,
    pub lang: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub version: Option<String>,
    /// JSON object text.
    pub annotations: Option<String>,
    /// JSON object text.
    pub tokens: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkAlerthub {
    pub id: Option<i32>,
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkCms {
    pub id: Option<i32>,
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SinkEventStore {
    pub id: Option<i32>,
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub event_store: Option<String>,
    pub project: Option<String>,
    pub role_arn: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Severity {
    pub id: Option<i32>,
    pub severity: Option<i32>,
    pub eval_condition: Option<Condition>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Join {
    pub id: Option<i32>,
    pub join_type: Option<String>,
    /// JSON object `{"condition": .., "type": ..}`.
    pub join_config: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Option<i32>,
    pub cron_expression: Option<String>,
    pub delay: Option<i32>,
    pub interval: Option<String>,
    pub run_immediately: Option<bool>,
    pub time_zone: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: Option<i32>,
    pub tag_type: TagType,
    pub tag_key: String,
    pub tag_value: Option<String>,
}

impl Tag {
    pub fn label(key: impl Into<String>) -> Self {
        Self {
            id: None,
            tag_type: TagType::Label,
            tag_key: key.into(),
            tag_value: None,
        }
    }

    pub fn annotation(key: impl Into<String>, value: Option<String>) -> Self {
        Self {
            id: None,
            tag_type: TagType::Annotation,
            tag_key: key.into(),
            tag_value: value,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    pub id: Option<i32>,
    pub chart_title: Option<String>,
    pub dashboard_id: Option<String>,
    pub end: Option<String>,
    pub power_sql_mode: Option<String>,
    pub project: Option<String>,
    pub query: String,
    pub region: Option<String>,
    pub role_arn: Option<String>,
    pub start: Option<String>,
    pub store: Option<String>,
    pub store_type: Option<String>,
    pub time_span_type: Option<String>,
    pub ui: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_requires_name_and_display_name() {
        let err = AlertAggregate::new("", "Display").validate().unwrap_err();
        assert!(matches!(err, AlertError::Validation(m) if m.contains("name")));

        let err = AlertAggregate::new("cpu-high", " ").validate().unwrap_err();
        assert!(matches!(err, AlertError::Validation(m) if m.contains("display_name")));

        assert!(AlertAggregate::new("cpu-high", "CPU high").validate().is_ok());
    }

    #[test]
    fn validate_rejects_duplicate_tags_of_same_type() {
        let mut alert = AlertAggregate::new("cpu-high", "CPU high");
        alert.tags = vec![
            Tag::label("team"),
            Tag::annotation("team", Some("infra".into())),
        ];
        assert!(alert.validate().is_ok());

        alert.tags.push(Tag::label("team"));
        assert!(matches!(alert.validate(), Err(AlertError::Validation(_))));
    }

    #[test]
    fn group_field_list_trims_and_drops_empty() {
        let group = Group {
            fields: Some(" host, ,region ".into()),
            ..Default::default()
        };
        assert_eq!(group.field_list(), vec!["host", "region"]);
        assert!(Group::default().field_list().is_empty());
    }

    #[test]
    fn status_defaults_to_enabled() {
        let alert: AlertAggregate =
            serde_json::from_str(r#"{"name":"a","display_name":"A"}"#).unwrap();
        assert_eq!(alert.status, AlertStatus::Enabled);
        assert!(alert.tags.is_empty());
    }
}
