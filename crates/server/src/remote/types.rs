//! Wire shapes of the remote alerting API. Field names follow the service's
//! camelCase JSON, including its `aonotations` spelling on templates.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAlert {
    pub name: String,
    pub display_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub create_time: Option<i64>,
    #[serde(default)]
    pub last_modified_time: Option<i64>,
    #[serde(default)]
    pub configuration: Option<RemoteConfiguration>,
    #[serde(default)]
    pub schedule: Option<RemoteSchedule>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteConfiguration {
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
    pub condition_configuration: Option<RemoteCondition>,
    pub group_configuration: Option<RemoteGroup>,
    pub policy_configuration: Option<RemotePolicy>,
    pub template_configuration: Option<RemoteTemplate>,
    pub sink_alerthub: Option<RemoteSinkToggle>,
    pub sink_cms: Option<RemoteSinkToggle>,
    pub sink_event_store: Option<RemoteSinkEventStore>,
    pub severity_configurations: Vec<RemoteSeverity>,
    pub join_configurations: Vec<RemoteJoin>,
    pub query_list: Vec<RemoteQuery>,
    /// Labels, keys only.
    pub tags: Vec<String>,
    pub annotations: Vec<RemoteAnnotation>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteCondition {
    pub condition: Option<String>,
    pub count_condition: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteGroup {
    pub fields: Vec<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemotePolicy {
    pub alert_policy_id: Option<String>,
    pub action_policy_id: Option<String>,
    pub repeat_interval: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteTemplate {
    /// The template identifier, not a row id.
    pub id: Option<String>,
    pub lang: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub version: Option<String>,
    #[serde(rename = "aonotations")]
    pub annotations: Option<Map<String, Value>>,
    pub tokens: Option<Map<String, Value>>,
}

/// Used for both the alerthub and cms sinks.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSinkToggle {
    pub enabled: Option<bool>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSinkEventStore {
    pub enabled: Option<bool>,
    pub endpoint: Option<String>,
    pub event_store: Option<String>,
    pub project: Option<String>,
    pub role_arn: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSeverity {
    pub severity: Option<i32>,
    pub eval_condition: Option<RemoteCondition>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteJoin {
    pub condition: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteQuery {
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

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteAnnotation {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteSchedule {
    pub cron_expression: Option<String>,
    pub delay: Option<i32>,
    pub interval: Option<String>,
    pub run_immediately: Option<bool>,
    pub time_zone: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One page of `GET /projects/{project}/alerts`. Items stay raw so one bad entry
/// does not sink the page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RemoteAlertList {
    pub results: Vec<Value>,
    pub total: Option<u64>,
}

/// A listed entry that could not be read as a [`RemoteAlert`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MalformedAlert {
    /// The entry's `name` when it has one, else its position in the listing.
    pub name: String,
    pub reason: String,
}

impl MalformedAlert {
    pub fn from_value(value: &Value, position: u64, error: &serde_json::Error) -> Self {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("#{position}"));
        Self {
            name,
            reason: error.to_string(),
        }
    }
}
