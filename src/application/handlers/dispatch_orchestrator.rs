use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Datelike;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    application::services::{
        clock::Clock,
        distribution::{self, Bucket},
        messenger::{CreateChatParams, MessagingBackend, SendMessageParams, normalize_phone},
        template::resolve_template,
        time_window::is_within_time_window,
    },
    domain::{
        errors::DispatchError,
        models::{
            AssignmentStrategy, DayOfWeek, DispatchConfiguration, DispatchFailure, DispatchResult,
            DispatchRow, MessagingInstance,
        },
    },
};

pub const DEFAULT_BUCKET: &str = "default";

/// Everything a run reads but never mutates.
#[derive(Debug, Clone, Default)]
pub struct DispatchContext {
    pub configuration: Option<DispatchConfiguration>,
    pub instances: Vec<MessagingInstance>,
    /// Takes precedence over the configuration's template when set.
    pub message_template: Option<String>,
}

impl DispatchContext {
    pub fn new(instances: Vec<MessagingInstance>) -> Self {
        Self {
            instances,
            ..Default::default()
        }
    }

    pub fn with_configuration(mut self, configuration: DispatchConfiguration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.message_template = Some(template.into());
        self
    }

    pub fn effective_template(&self) -> &str {
        self.message_template
            .as_deref()
            .or(self.configuration.as_ref().map(|c| c.message_template.as_str()))
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchProgress {
    pub broker_id: String,
    pub processed: usize,
    pub total: usize,
    pub sent: usize,
    pub errors: usize,
}

/// Optional hooks invoked while a run is in progress.
pub trait DispatchObserver: Send + Sync {
    fn on_progress(&self, _progress: &DispatchProgress) {}
    fn on_error(&self, _failure: &DispatchFailure) {}
}

struct SilentObserver;

impl DispatchObserver for SilentObserver {}

pub struct DispatchOrchestrator {
    backend: Arc<dyn MessagingBackend>,
    clock: Arc<dyn Clock>,
    fallback_interval: Duration,
}

impl DispatchOrchestrator {
    pub fn new(backend: Arc<dyn MessagingBackend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            backend,
            clock,
            fallback_interval: Duration::ZERO,
        }
    }

    /// Pacing used when the run has no configuration.
    pub fn with_fallback_interval(mut self, interval: Duration) -> Self {
        self.fallback_interval = interval;
        self
    }

    pub async fn run(
        &self,
        rows: Vec<DispatchRow>,
        context: &DispatchContext,
    ) -> Result<DispatchResult, DispatchError> {
        self.run_observed(rows, context, &SilentObserver).await
    }

    pub async fn run_observed(
        &self,
        rows: Vec<DispatchRow>,
        context: &DispatchContext,
        observer: &dyn DispatchObserver,
    ) -> Result<DispatchResult, DispatchError> {
        let started = Instant::now();
        self.ensure_time_window(context.configuration.as_ref())?;

        let total = rows.len();
        let interval = context
            .configuration
            .as_ref()
            .map(|c| Duration::from_millis(c.interval_between_messages_ms))
            .unwrap_or(self.fallback_interval);
        let template = context.effective_template();

        let buckets = partition(rows, context.configuration.as_ref());
        info!(rows = total, buckets = buckets.len(), "starting dispatch run");

        let mut run = RunState {
            result: DispatchResult::default(),
            processed: 0,
            total,
            observer,
        };

        for bucket in buckets.into_iter().filter(|b| !b.items.is_empty()) {
            let Some(instance) = select_instance(&context.instances, &bucket.key) else {
                warn!(broker = %bucket.key, rows = bucket.items.len(), "no active instance for broker");
                run.fail(DispatchFailure {
                    message: format!("no active instance found for broker {}", bucket.key),
                    broker_id: bucket.key,
                    phone: None,
                    name: None,
                    rows: bucket.items.len(),
                });
                continue;
            };

            self.dispatch_bucket(&mut run, bucket, instance.id, template, interval)
                .await;
        }

        run.result.duration = started.elapsed();
        info!(
            sent = run.result.total_sent,
            errors = run.result.total_errors,
            duration_ms = run.result.duration.as_millis() as u64,
            "dispatch run finished"
        );
        Ok(run.result)
    }

    fn ensure_time_window(
        &self,
        configuration: Option<&DispatchConfiguration>,
    ) -> Result<(), DispatchError> {
        let Some(windows) = configuration.and_then(|c| c.time_windows.as_ref()) else {
            return Ok(());
        };
        let now = self.clock.now();
        if is_within_time_window(windows, now) {
            return Ok(());
        }
        Err(DispatchError::OutsideTimeWindow {
            day: DayOfWeek::from(now.weekday()),
            time: now.format("%H:%M").to_string(),
        })
    }

    async fn dispatch_bucket(
        &self,
        run: &mut RunState<'_>,
        bucket: Bucket<DispatchRow>,
        instance_id: Uuid,
        template: &str,
        interval: Duration,
    ) {
        let broker_id = bucket.key;
        let mut chats = match self.backend.load_chats(instance_id).await {
            Ok(chats) => chats
                .into_iter()
                .map(|chat| (normalize_phone(&chat.phone), chat.id))
                .collect::<HashMap<_, _>>(),
            Err(err) => {
                warn!(broker = %broker_id, %instance_id, error = %err, "failed to load chats");
                run.fail(DispatchFailure {
                    message: format!("failed to process broker {broker_id}: {err}"),
                    rows: bucket.items.len(),
                    broker_id,
                    phone: None,
                    name: None,
                });
                return;
            }
        };

        debug!(broker = %broker_id, %instance_id, rows = bucket.items.len(), "dispatching bucket");
        let mut sent = 0;
        let last = bucket.items.len().saturating_sub(1);

        for (position, row) in bucket.items.into_iter().enumerate() {
            let phone = normalize_phone(&row.phone);
            if phone.is_empty() {
                run.fail(DispatchFailure {
                    message: format!("missing phone number for {} <{}>", row.name, row.email),
                    broker_id: broker_id.clone(),
                    phone: None,
                    name: Some(row.name),
                    rows: 1,
                });
                continue;
            }

            let outcome = self
                .send_row(&mut chats, instance_id, &phone, &row, template)
                .await;
            match outcome {
                Ok(()) => {
                    sent += 1;
                    run.succeed(&broker_id);
                    if !interval.is_zero() && position < last {
                        self.clock.sleep(interval).await;
                    }
                }
                Err(err) => {
                    run.fail(DispatchFailure {
                        message: format!("failed to send message to {}: {err}", row.phone),
                        broker_id: broker_id.clone(),
                        phone: Some(row.phone),
                        name: Some(row.name),
                        rows: 1,
                    });
                }
            }
        }

        run.result.broker_distribution.insert(broker_id, sent);
    }

    async fn send_row(
        &self,
        chats: &mut HashMap<String, String>,
        instance_id: Uuid,
        phone: &str,
        row: &DispatchRow,
        template: &str,
    ) -> anyhow::Result<()> {
        let chat_id = match chats.get(phone) {
            Some(chat_id) => chat_id.clone(),
            None => {
                let chat = self
                    .backend
                    .create_chat(CreateChatParams {
                        instance_id,
                        phone: phone.to_string(),
                        name: Some(row.name.clone()).filter(|n| !n.trim().is_empty()),
                    })
                    .await?;
                chats.insert(phone.to_string(), chat.id.clone());
                chat.id
            }
        };

        let variables = HashMap::from([
            ("nome", row.name.as_str()),
            ("telefone", row.phone.as_str()),
            ("email", row.email.as_str()),
        ]);

        self.backend
            .send_message(SendMessageParams {
                instance_id,
                chat_id,
                phone: phone.to_string(),
                body: resolve_template(template, &variables),
            })
            .await
    }
}

struct RunState<'a> {
    result: DispatchResult,
    processed: usize,
    total: usize,
    observer: &'a dyn DispatchObserver,
}

impl RunState<'_> {
    fn fail(&mut self, failure: DispatchFailure) {
        self.processed += failure.rows;
        self.observer.on_error(&failure);
        let broker_id = failure.broker_id.clone();
        self.result.record_failure(failure);
        self.report(&broker_id);
    }

    fn succeed(&mut self, broker_id: &str) {
        self.processed += 1;
        self.result.total_sent += 1;
        self.report(broker_id);
    }

    fn report(&self, broker_id: &str) {
        self.observer.on_progress(&DispatchProgress {
            broker_id: broker_id.to_string(),
            processed: self.processed,
            total: self.total,
            sent: self.result.total_sent,
            errors: self.result.total_errors,
        });
    }
}

fn partition(
    rows: Vec<DispatchRow>,
    configuration: Option<&DispatchConfiguration>,
) -> Vec<Bucket<DispatchRow>> {
    let brokers = configuration
        .map(|c| c.assigned_brokers.as_slice())
        .unwrap_or_default();
    if brokers.is_empty() {
        return vec![Bucket {
            key: DEFAULT_BUCKET.to_string(),
            items: rows,
        }];
    }

    let strategy = configuration.map(|c| c.strategy).unwrap_or_default();
    match strategy {
        AssignmentStrategy::RoundRobin => distribution::round_robin(rows, brokers),
        AssignmentStrategy::Random => distribution::random(rows, brokers, &mut rand::rng()),
        AssignmentStrategy::LeastBusy => {
            warn!("least_busy strategy has no load source yet, using round_robin");
            distribution::round_robin(rows, brokers)
        }
    }
}

/// Prefers a connected instance owned by the broker, then any connected one.
fn select_instance<'a>(
    instances: &'a [MessagingInstance],
    broker_id: &str,
) -> Option<&'a MessagingInstance> {
    instances
        .iter()
        .find(|i| i.is_connected() && i.is_owned_by(broker_id))
        .or_else(|| instances.iter().find(|i| i.is_connected()))
}
