#![allow(dead_code)]

use std::sync::Arc;

use alert_rule_sync::aggregate::{
    AlertAggregate, AlertStatus, Condition, Configuration, Group, Join, Policy, Query, Schedule,
    Severity, SinkAlerthub, SinkCms, SinkEventStore, Tag, Template,
};
use alert_rule_sync::open_database;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, Statement};

pub const ALL_TABLES: [&str; 14] = [
    "alerts",
    "alert_configurations",
    "alert_schedules",
    "alert_tags",
    "alert_queries",
    "condition_configurations",
    "group_configurations",
    "policy_configurations",
    "template_configurations",
    "severity_configurations",
    "join_configurations",
    "sink_alerthub_configurations",
    "sink_cms_configurations",
    "sink_event_store_configurations",
];

/// Fresh in-memory SQLite database with every table created.
pub async fn setup_test_db() -> Arc<DatabaseConnection> {
    Arc::new(
        open_database("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database"),
    )
}

pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            DbBackend::Sqlite,
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .expect("count query failed")
        .expect("count query returned no row");
    row.try_get::<i64>("", "n").expect("count column missing")
}

/// Makes every insert into `table` abort, optionally only when `when` holds.
pub async fn fail_inserts_into(db: &DatabaseConnection, table: &str, when: Option<&str>) {
    let condition = when.map(|w| format!("WHEN {w}")).unwrap_or_default();
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        format!(
            "CREATE TRIGGER fail_{table} BEFORE INSERT ON {table} {condition} \
             BEGIN SELECT RAISE(ABORT, 'injected failure'); END;"
        ),
    ))
    .await
    .expect("Failed to install trigger");
}

pub async fn clear_failure(db: &DatabaseConnection, table: &str) {
    db.execute(Statement::from_string(
        DbBackend::Sqlite,
        format!("DROP TRIGGER IF EXISTS fail_{table};"),
    ))
    .await
    .expect("Failed to drop trigger");
}

/// An aggregate with every part populated.
pub fn full_alert(name: &str) -> AlertAggregate {
    AlertAggregate {
        id: None,
        name: name.to_string(),
        display_name: format!("{name} display"),
        description: Some("CPU usage above threshold".into()),
        status: AlertStatus::Enabled,
        create_time: Some(1_700_000_000),
        last_modified_time: Some(1_700_000_100),
        configuration: Some(Configuration {
            id: None,
            auto_annotation: Some(true),
            dashboard: Some("internal-alert-analysis".into()),
            mute_until: Some(0),
            no_data_fire: Some(false),
            no_data_severity: Some(6),
            threshold: Some(1),
            kind: Some("default".into()),
            version: Some("2.0".into()),
            send_resolved: Some(true),
            condition: Some(Condition {
                id: None,
                condition: Some("cnt > 100".into()),
                count_condition: Some("__count__ > 0".into()),
            }),
            group: Some(Group {
                id: None,
                fields: Some("host,region".into()),
                kind: Some("custom".into()),
            }),
            policy: Some(Policy {
                id: None,
                alert_policy_id: Some("sls.builtin.dynamic".into()),
                action_policy_id: Some("ops-oncall".into()),
                repeat_interval: Some("5m".into()),
            }),
            template: Some(Template {
                id: None,
                template_id: Some("sls.builtin.cn".into()),
                lang: Some("cn".into()),
                kind: Some("sys".into()),
                version: Some("1".into()),
                annotations: Some(r#"{"summary":"cpu"}"#.into()),
                tokens: Some(r#"{"team":"infra"}"#.into()),
            }),
            sink_alerthub: Some(SinkAlerthub {
                id: None,
                enabled: Some(true),
            }),
            sink_cms: Some(SinkCms {
                id: None,
                enabled: Some(false),
            }),
            sink_event_store: Some(SinkEventStore {
                id: None,
                enabled: Some(true),
                endpoint: Some("cn-hangzhou-intranet.log.aliyuncs.com".into()),
                event_store: Some("alert-history".into()),
                project: Some("ops".into()),
                role_arn: Some("acs:ram::1:role/alert".into()),
            }),
            severities: vec![
                Severity {
                    id: None,
                    severity: Some(8),
                    eval_condition: Some(Condition {
                        id: None,
                        condition: Some("cnt > 500".into()),
                        count_condition: None,
                    }),
                },
                Severity {
                    id: None,
                    severity: Some(4),
                    eval_condition: None,
                },
            ],
            joins: vec![Join {
                id: None,
                join_type: Some("cross_join".into()),
                join_config: Some(r#"{"condition":"","type":"cross_join"}"#.into()),
            }],
        }),
        schedule: Some(Schedule {
            id: None,
            cron_expression: None,
            delay: Some(0),
            interval: Some("1m".into()),
            run_immediately: Some(false),
            time_zone: Some("+0800".into()),
            kind: "FixedRate".into(),
        }),
        tags: vec![
            Tag::label("team-infra"),
            Tag::annotation("runbook", Some("https://wiki.example.com/cpu".into())),
        ],
        queries: vec![
            Query {
                query: "* | select count(1) as cnt".into(),
                store: Some("nginx-access".into()),
                store_type: Some("log".into()),
                region: Some("cn-hangzhou".into()),
                start: Some("-15m".into()),
                end: Some("now".into()),
                time_span_type: Some("Truncated".into()),
                ..Default::default()
            },
            Query {
                query: "status >= 500".into(),
                chart_title: Some("errors".into()),
                ..Default::default()
            },
        ],
    }
}
