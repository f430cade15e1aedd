use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Creates the alert aggregate schema: the root `alerts` table, its 1:1 and 1:N
/// children, and the independently stored configuration sub-blocks.
///
/// `alerts.configuration_id` / `alerts.schedule_id` are plain columns without a
/// foreign key: they are back-pointers patched after the children exist, and the
/// children already reference the root through `alert_id`.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Sub-blocks first, they reference nothing.
        manager
            .create_table(
                Table::create()
                    .table(ConditionConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(ConditionConfigurations::Id))
                    .col(text_null(ConditionConfigurations::Condition))
                    .col(text_null(ConditionConfigurations::CountCondition))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(GroupConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(GroupConfigurations::Id))
                    .col(text_null(GroupConfigurations::Fields))
                    .col(string_len_null(GroupConfigurations::Type, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(PolicyConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(PolicyConfigurations::Id))
                    .col(string_null(PolicyConfigurations::AlertPolicyId))
                    .col(string_null(PolicyConfigurations::ActionPolicyId))
                    .col(string_len_null(PolicyConfigurations::RepeatInterval, 100))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TemplateConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(TemplateConfigurations::Id))
                    .col(string_null(TemplateConfigurations::TemplateId))
                    .col(string_len_null(TemplateConfigurations::Lang, 10))
                    .col(string_len_null(TemplateConfigurations::Type, 100))
                    .col(string_len_null(TemplateConfigurations::Version, 50))
                    .col(text_null(TemplateConfigurations::Annotations))
                    .col(text_null(TemplateConfigurations::Tokens))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SinkAlerthubConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(SinkAlerthubConfigurations::Id))
                    .col(boolean_null(SinkAlerthubConfigurations::Enabled))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SinkCmsConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(SinkCmsConfigurations::Id))
                    .col(boolean_null(SinkCmsConfigurations::Enabled))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SinkEventStoreConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(SinkEventStoreConfigurations::Id))
                    .col(boolean_null(SinkEventStoreConfigurations::Enabled))
                    .col(string_len_null(SinkEventStoreConfigurations::Endpoint, 500))
                    .col(string_null(SinkEventStoreConfigurations::EventStore))
                    .col(string_null(SinkEventStoreConfigurations::Project))
                    .col(string_len_null(SinkEventStoreConfigurations::RoleArn, 500))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Alerts::Table)
                    .if_not_exists()
                    .col(pk_auto(Alerts::Id))
                    .col(string(Alerts::Name).not_null().unique_key().to_owned())
                    .col(string(Alerts::DisplayName).not_null().to_owned())
                    .col(text_null(Alerts::Description))
                    .col(
                        string_len(Alerts::Status, 16)
                            .not_null()
                            .default("ENABLED")
                            .to_owned(),
                    )
                    .col(big_integer_null(Alerts::CreateTime))
                    .col(big_integer_null(Alerts::LastModifiedTime))
                    .col(integer_null(Alerts::ConfigurationId))
                    .col(integer_null(Alerts::ScheduleId))
                    .col(
                        timestamp_with_time_zone(Alerts::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .col(
                        timestamp_with_time_zone(Alerts::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp())
                            .to_owned(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlertConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(AlertConfigurations::Id))
                    .col(integer(AlertConfigurations::AlertId).not_null().to_owned())
                    .col(boolean_null(AlertConfigurations::AutoAnnotation))
                    .col(string_null(AlertConfigurations::Dashboard))
                    .col(big_integer_null(AlertConfigurations::MuteUntil))
                    .col(boolean_null(AlertConfigurations::NoDataFire))
                    .col(integer_null(AlertConfigurations::NoDataSeverity))
                    .col(integer_null(AlertConfigurations::Threshold))
                    .col(string_len_null(AlertConfigurations::Type, 100))
                    .col(string_len_null(AlertConfigurations::Version, 50))
                    .col(boolean_null(AlertConfigurations::SendResolved))
                    .col(integer_null(AlertConfigurations::ConditionConfigId))
                    .col(integer_null(AlertConfigurations::GroupConfigId))
                    .col(integer_null(AlertConfigurations::PolicyConfigId))
                    .col(integer_null(AlertConfigurations::TemplateConfigId))
                    .col(integer_null(AlertConfigurations::SinkAlerthubConfigId))
                    .col(integer_null(AlertConfigurations::SinkCmsConfigId))
                    .col(integer_null(AlertConfigurations::SinkEventStoreConfigId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_alert")
                            .from(AlertConfigurations::Table, AlertConfigurations::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_condition")
                            .from(
                                AlertConfigurations::Table,
                                AlertConfigurations::ConditionConfigId,
                            )
                            .to(ConditionConfigurations::Table, ConditionConfigurations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_group")
                            .from(AlertConfigurations::Table, AlertConfigurations::GroupConfigId)
                            .to(GroupConfigurations::Table, GroupConfigurations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_policy")
                            .from(
                                AlertConfigurations::Table,
                                AlertConfigurations::PolicyConfigId,
                            )
                            .to(PolicyConfigurations::Table, PolicyConfigurations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_template")
                            .from(
                                AlertConfigurations::Table,
                                AlertConfigurations::TemplateConfigId,
                            )
                            .to(TemplateConfigurations::Table, TemplateConfigurations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_sink_alerthub")
                            .from(
                                AlertConfigurations::Table,
                                AlertConfigurations::SinkAlerthubConfigId,
                            )
                            .to(
                                SinkAlerthubConfigurations::Table,
                                SinkAlerthubConfigurations::Id,
                            )
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_sink_cms")
                            .from(
                                AlertConfigurations::Table,
                                AlertConfigurations::SinkCmsConfigId,
                            )
                            .to(SinkCmsConfigurations::Table, SinkCmsConfigurations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_configurations_sink_event_store")
                            .from(
                                AlertConfigurations::Table,
                                AlertConfigurations::SinkEventStoreConfigId,
                            )
                            .to(
                                SinkEventStoreConfigurations::Table,
                                SinkEventStoreConfigurations::Id,
                            )
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(SeverityConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(SeverityConfigurations::Id))
                    .col(
                        integer(SeverityConfigurations::AlertConfigId)
                            .not_null()
                            .to_owned(),
                    )
                    .col(integer_null(SeverityConfigurations::Severity))
                    .col(integer_null(SeverityConfigurations::EvalConditionId))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_severity_configurations_alert_config")
                            .from(
                                SeverityConfigurations::Table,
                                SeverityConfigurations::AlertConfigId,
                            )
                            .to(AlertConfigurations::Table, AlertConfigurations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_severity_configurations_eval_condition")
                            .from(
                                SeverityConfigurations::Table,
                                SeverityConfigurations::EvalConditionId,
                            )
                            .to(ConditionConfigurations::Table, ConditionConfigurations::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JoinConfigurations::Table)
                    .if_not_exists()
                    .col(pk_auto(JoinConfigurations::Id))
                    .col(integer(JoinConfigurations::AlertConfigId).not_null().to_owned())
                    .col(string_len_null(JoinConfigurations::JoinType, 100))
                    .col(text_null(JoinConfigurations::JoinConfig))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_join_configurations_alert_config")
                            .from(JoinConfigurations::Table, JoinConfigurations::AlertConfigId)
                            .to(AlertConfigurations::Table, AlertConfigurations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlertSchedules::Table)
                    .if_not_exists()
                    .col(pk_auto(AlertSchedules::Id))
                    .col(integer(AlertSchedules::AlertId).not_null().to_owned())
                    .col(string_len_null(AlertSchedules::CronExpression, 100))
                    .col(integer_null(AlertSchedules::Delay))
                    .col(string_len_null(AlertSchedules::Interval, 50))
                    .col(boolean_null(AlertSchedules::RunImmediately))
                    .col(string_len_null(AlertSchedules::TimeZone, 50))
                    .col(string_len(AlertSchedules::Type, 50).not_null().to_owned())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_schedules_alert")
                            .from(AlertSchedules::Table, AlertSchedules::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlertTags::Table)
                    .if_not_exists()
                    .col(pk_auto(AlertTags::Id))
                    .col(integer(AlertTags::AlertId).not_null().to_owned())
                    .col(string_len(AlertTags::TagType, 16).not_null().to_owned())
                    .col(string(AlertTags::TagKey).not_null().to_owned())
                    .col(text_null(AlertTags::TagValue))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_tags_alert")
                            .from(AlertTags::Table, AlertTags::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(AlertQueries::Table)
                    .if_not_exists()
                    .col(pk_auto(AlertQueries::Id))
                    .col(integer(AlertQueries::AlertId).not_null().to_owned())
                    .col(string_null(AlertQueries::ChartTitle))
                    .col(string_null(AlertQueries::DashboardId))
                    .col(string_len_null(AlertQueries::End, 100))
                    .col(string_len_null(AlertQueries::PowerSqlMode, 50))
                    .col(string_null(AlertQueries::Project))
                    .col(text(AlertQueries::Query).not_null().to_owned())
                    .col(string_len_null(AlertQueries::Region, 100))
                    .col(string_len_null(AlertQueries::RoleArn, 500))
                    .col(string_len_null(AlertQueries::Start, 100))
                    .col(string_null(AlertQueries::Store))
                    .col(string_len_null(AlertQueries::StoreType, 100))
                    .col(string_len_null(AlertQueries::TimeSpanType, 50))
                    .col(string_null(AlertQueries::Ui))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_alert_queries_alert")
                            .from(AlertQueries::Table, AlertQueries::AlertId)
                            .to(Alerts::Table, Alerts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alert_configurations_alert_id_unique")
                    .table(AlertConfigurations::Table)
                    .col(AlertConfigurations::AlertId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alert_schedules_alert_id_unique")
                    .table(AlertSchedules::Table)
                    .col(AlertSchedules::AlertId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alert_tags_alert_type_key_unique")
                    .table(AlertTags::Table)
                    .col(AlertTags::AlertId)
                    .col(AlertTags::TagType)
                    .col(AlertTags::TagKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alert_queries_alert_id")
                    .table(AlertQueries::Table)
                    .col(AlertQueries::AlertId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_alerts_status_created_at")
                    .table(Alerts::Table)
                    .col(Alerts::Status)
                    .col(Alerts::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Children before parents.
        manager
            .drop_table(Table::drop().table(AlertQueries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AlertTags::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AlertSchedules::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(JoinConfigurations::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SeverityConfigurations::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(AlertConfigurations::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(Table::drop().table(Alerts::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(SinkEventStoreConfigurations::Table)
                    .table(SinkCmsConfigurations::Table)
                    .table(SinkAlerthubConfigurations::Table)
                    .table(TemplateConfigurations::Table)
                    .table(PolicyConfigurations::Table)
                    .table(GroupConfigurations::Table)
                    .table(ConditionConfigurations::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
pub enum Alerts {
    Table,
    Id,
    Name,
    DisplayName,
    Description,
    Status,
    CreateTime,
    LastModifiedTime,
    ConfigurationId,
    ScheduleId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum AlertConfigurations {
    Table,
    Id,
    AlertId,
    AutoAnnotation,
    Dashboard,
    MuteUntil,
    NoDataFire,
    NoDataSeverity,
    Threshold,
    Type,
    Version,
    SendResolved,
    ConditionConfigId,
    GroupConfigId,
    PolicyConfigId,
    TemplateConfigId,
    SinkAlerthubConfigId,
    SinkCmsConfigId,
    SinkEventStoreConfigId,
}

#[derive(Iden)]
pub enum AlertSchedules {
    Table,
    Id,
    AlertId,
    CronExpression,
    Delay,
    Interval,
    RunImmediately,
    TimeZone,
    Type,
}

#[derive(Iden)]
pub enum AlertTags {
    Table,
    Id,
    AlertId,
    TagType,
    TagKey,
    TagValue,
}

#[derive(Iden)]
pub enum AlertQueries {
    Table,
    Id,
    AlertId,
    ChartTitle,
    DashboardId,
    End,
    PowerSqlMode,
    Project,
    Query,
    Region,
    RoleArn,
    Start,
    Store,
    StoreType,
    TimeSpanType,
    Ui,
}

#[derive(Iden)]
pub enum ConditionConfigurations {
    Table,
    Id,
    Condition,
    CountCondition,
}

#[derive(Iden)]
pub enum GroupConfigurations {
    Table,
    Id,
    Fields,
    Type,
}

#[derive(Iden)]
pub enum PolicyConfigurations {
    Table,
    Id,
    AlertPolicyId,
    ActionPolicyId,
    RepeatInterval,
}

#[derive(Iden)]
pub enum TemplateConfigurations {
    Table,
    Id,
    TemplateId,
    Lang,
    Type,
    Version,
    Annotations,
    Tokens,
}

#[derive(Iden)]
pub enum SeverityConfigurations {
    Table,
    Id,
    AlertConfigId,
    Severity,
    EvalConditionId,
}

#[derive(Iden)]
pub enum JoinConfigurations {
    Table,
    Id,
    AlertConfigId,
    JoinType,
    JoinConfig,
}

#[derive(Iden)]
pub enum SinkAlerthubConfigurations {
    Table,
    Id,
    Enabled,
}

#[derive(Iden)]
pub enum SinkCmsConfigurations {
    Table,
    Id,
    Enabled,
}

#[derive(Iden)]
pub enum SinkEventStoreConfigurations {
    Table,
    Id,
    Enabled,
    Endpoint,
    EventStore,
    Project,
    RoleArn,
}
