use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres, types::Json};
use uuid::Uuid;

use crate::domain::{
    models::{
        AssignmentStrategy, DispatchConfiguration, InstanceStatus, MessagingInstance, TimeWindows,
    },
    repositories::{DispatchConfigurationRepository, MessagingInstanceRepository},
};

pub type PgPool = Pool<Postgres>;

const CONFIGURATION_COLUMNS: &str = r#"
    id, name, assigned_brokers, strategy, time_windows, interval_between_messages_ms,
    message_template, is_active, priority, created_at, updated_at
"#;

fn interval_column(interval_ms: u64) -> anyhow::Result<i64> {
    i64::try_from(interval_ms)
        .map_err(|_| anyhow::anyhow!("interval {interval_ms}ms does not fit the interval column"))
}

#[derive(Clone)]
pub struct PostgresDispatchConfigurationRepository {
    pool: PgPool,
}

impl PostgresDispatchConfigurationRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl DispatchConfigurationRepository for PostgresDispatchConfigurationRepository {
    async fn insert(&self, configuration: DispatchConfiguration) -> anyhow::Result<DispatchConfiguration> {
        let record = sqlx::query_as::<_, ConfigurationRecord>(&format!(
            r#"
            INSERT INTO dispatch_configurations (
                id, name, assigned_brokers, strategy, time_windows, interval_between_messages_ms,
                message_template, is_active, priority, created_at, updated_at
            ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9,$10,$11)
            RETURNING {CONFIGURATION_COLUMNS}
            "#
        ))
        .bind(configuration.id)
        .bind(&configuration.name)
        .bind(&configuration.assigned_brokers)
        .bind(configuration.strategy.as_str())
        .bind(configuration.time_windows.as_ref().map(Json))
        .bind(interval_column(configuration.interval_between_messages_ms)?)
        .bind(&configuration.message_template)
        .bind(configuration.is_active)
        .bind(configuration.priority)
        .bind(configuration.created_at)
        .bind(configuration.updated_at)
        .fetch_one(&self.pool)
        .await?;

        record.try_into()
    }

    async fn update(
        &self,
        configuration: DispatchConfiguration,
    ) -> anyhow::Result<Option<DispatchConfiguration>> {
        let record = sqlx::query_as::<_, ConfigurationRecord>(&format!(
            r#"
            UPDATE dispatch_configurations
            SET name = $2,
                assigned_brokers = $3,
                strategy = $4,
                time_windows = $5,
                interval_between_messages_ms = $6,
                message_template = $7,
                is_active = $8,
                priority = $9,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {CONFIGURATION_COLUMNS}
            "#
        ))
        .bind(configuration.id)
        .bind(&configuration.name)
        .bind(&configuration.assigned_brokers)
        .bind(configuration.strategy.as_str())
        .bind(configuration.time_windows.as_ref().map(Json))
        .bind(interval_column(configuration.interval_between_messages_ms)?)
        .bind(&configuration.message_template)
        .bind(configuration.is_active)
        .bind(configuration.priority)
        .fetch_optional(&self.pool)
        .await?;

        record.map(|record| record.try_into()).transpose()
    }

    async fn get(&self, id: Uuid) -> anyhow::Result<Option<DispatchConfiguration>> {
        let record = sqlx::query_as::<_, ConfigurationRecord>(&format!(
            "SELECT {CONFIGURATION_COLUMNS} FROM dispatch_configurations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        record.map(|record| record.try_into()).transpose()
    }

    async fn list(&self) -> anyhow::Result<Vec<DispatchConfiguration>> {
        let rows = sqlx::query_as::<_, ConfigurationRecord>(&format!(
            "SELECT {CONFIGURATION_COLUMNS} FROM dispatch_configurations ORDER BY priority DESC, name ASC"
        ))
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|record| record.try_into()).collect()
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM dispatch_configurations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_active(&self) -> anyhow::Result<Option<DispatchConfiguration>> {
        let record = sqlx::query_as::<_, ConfigurationRecord>(&format!(
            r#"
            SELECT {CONFIGURATION_COLUMNS}
            FROM dispatch_configurations
            WHERE is_active
            ORDER BY priority DESC, name ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(&self.pool)
        .await?;
        record.map(|record| record.try_into()).transpose()
    }
}

#[derive(Clone)]
pub struct PostgresMessagingInstanceRepository {
    pool: PgPool,
}

impl PostgresMessagingInstanceRepository {
    pub fn new(pool: PgPool) -> Arc<Self> {
        Arc::new(Self { pool })
    }
}

#[async_trait]
impl MessagingInstanceRepository for PostgresMessagingInstanceRepository {
    async fn list(&self) -> anyhow::Result<Vec<MessagingInstance>> {
        let rows = sqlx::query_as::<_, InstanceRecord>(
            r#"
            SELECT id, name, broker_id, status, phone
            FROM messaging_instances
            ORDER BY name ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(|record| record.try_into()).collect()
    }

    async fn upsert(&self, instance: MessagingInstance) -> anyhow::Result<MessagingInstance> {
        let record = sqlx::query_as::<_, InstanceRecord>(
            r#"
            INSERT INTO messaging_instances (id, name, broker_id, status, phone, updated_at)
            VALUES ($1,$2,$3,$4,$5,NOW())
            ON CONFLICT (id) DO UPDATE
            SET name = EXCLUDED.name,
                broker_id = EXCLUDED.broker_id,
                status = EXCLUDED.status,
                phone = EXCLUDED.phone,
                updated_at = EXCLUDED.updated_at
            RETURNING id, name, broker_id, status, phone
            "#,
        )
        .bind(instance.id)
        .bind(&instance.name)
        .bind(&instance.broker_id)
        .bind(instance.status.as_str())
        .bind(&instance.phone)
        .fetch_one(&self.pool)
        .await?;

        record.try_into()
    }
}

#[derive(FromRow)]
struct ConfigurationRecord {
    id: Uuid,
    name: String,
    assigned_brokers: Vec<String>,
    strategy: String,
    time_windows: Option<Json<TimeWindows>>,
    interval_between_messages_ms: i64,
    message_template: String,
    is_active: bool,
    priority: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<ConfigurationRecord> for DispatchConfiguration {
    type Error = anyhow::Error;

    fn try_from(value: ConfigurationRecord) -> Result<Self, Self::Error> {
        let strategy = AssignmentStrategy::from_str(&value.strategy)
            .ok_or_else(|| anyhow::anyhow!("unknown assignment strategy {}", value.strategy))?;
        let interval = u64::try_from(value.interval_between_messages_ms)
            .map_err(|_| anyhow::anyhow!("negative interval for configuration {}", value.id))?;
        Ok(Self {
            id: value.id,
            name: value.name,
            assigned_brokers: value.assigned_brokers,
            strategy,
            time_windows: value.time_windows.map(|windows| windows.0),
            interval_between_messages_ms: interval,
            message_template: value.message_template,
            is_active: value.is_active,
            priority: value.priority,
            created_at: value.created_at,
            updated_at: value.updated_at,
        })
    }
}

#[derive(FromRow)]
struct InstanceRecord {
    id: Uuid,
    name: String,
    broker_id: Option<String>,
    status: String,
    phone: Option<String>,
}

impl TryFrom<InstanceRecord> for MessagingInstance {
    type Error = anyhow::Error;

    fn try_from(value: InstanceRecord) -> Result<Self, Self::Error> {
        let status = InstanceStatus::from_str(&value.status)
            .ok_or_else(|| anyhow::anyhow!("unknown instance status {}", value.status))?;
        Ok(Self {
            id: value.id,
            name: value.name,
            broker_id: value.broker_id,
            status,
            phone: value.phone,
        })
    }
}
