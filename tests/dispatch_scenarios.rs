use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, Utc};
use uuid::Uuid;

use dispatch::{
    application::{
        handlers::dispatch_orchestrator::{
            DEFAULT_BUCKET, DispatchContext, DispatchObserver, DispatchOrchestrator,
            DispatchProgress,
        },
        services::{
            clock::Clock,
            messenger::{CreateChatParams, MessagingBackend, SendMessageParams},
        },
    },
    domain::{
        errors::DispatchError,
        models::{
            AssignmentStrategy, Chat, DayOfWeek, DispatchConfiguration, DispatchFailure,
            DispatchResult, DispatchRow, InstanceStatus, MessagingInstance, TimeWindow,
            TimeWindows,
        },
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    LoadChats(Uuid),
    CreateChat { instance_id: Uuid, phone: String },
    Send { instance_id: Uuid, chat_id: String, body: String },
}

#[derive(Default)]
struct FakeBackend {
    chats: Mutex<HashMap<Uuid, Vec<Chat>>>,
    failing_loads: HashSet<Uuid>,
    failing_phones: HashSet<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    fn with_chat(self, instance_id: Uuid, chat_id: &str, phone: &str) -> Self {
        self.chats
            .lock()
            .unwrap()
            .entry(instance_id)
            .or_default()
            .push(Chat {
                id: chat_id.to_string(),
                instance_id,
                phone: phone.to_string(),
                name: None,
            });
        self
    }

    fn failing_load(mut self, instance_id: Uuid) -> Self {
        self.failing_loads.insert(instance_id);
        self
    }

    fn failing_phone(mut self, phone: &str) -> Self {
        self.failing_phones.insert(phone.to_string());
        self
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn sends(&self) -> Vec<(Uuid, String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Send {
                    instance_id,
                    chat_id,
                    body,
                } => Some((instance_id, chat_id, body)),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl MessagingBackend for FakeBackend {
    async fn load_chats(&self, instance_id: Uuid) -> anyhow::Result<Vec<Chat>> {
        self.calls.lock().unwrap().push(Call::LoadChats(instance_id));
        if self.failing_loads.contains(&instance_id) {
            anyhow::bail!("backend unavailable");
        }
        Ok(self
            .chats
            .lock()
            .unwrap()
            .get(&instance_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_chat(&self, params: CreateChatParams) -> anyhow::Result<Chat> {
        self.calls.lock().unwrap().push(Call::CreateChat {
            instance_id: params.instance_id,
            phone: params.phone.clone(),
        });
        if self.failing_phones.contains(&params.phone) {
            anyhow::bail!("number is not on whatsapp");
        }
        Ok(Chat {
            id: format!("chat-{}", params.phone),
            instance_id: params.instance_id,
            phone: params.phone,
            name: params.name,
        })
    }

    async fn send_message(&self, params: SendMessageParams) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(Call::Send {
            instance_id: params.instance_id,
            chat_id: params.chat_id,
            body: params.body,
        });
        Ok(())
    }
}

struct ManualClock {
    now: NaiveDateTime,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    fn at(now: NaiveDateTime) -> Self {
        Self {
            now,
            sleeps: Mutex::new(Vec::new()),
        }
    }

    fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
    }
}

#[derive(Default)]
struct RecordingObserver {
    progress: Mutex<Vec<DispatchProgress>>,
    failures: Mutex<Vec<DispatchFailure>>,
}

impl DispatchObserver for RecordingObserver {
    fn on_progress(&self, progress: &DispatchProgress) {
        self.progress.lock().unwrap().push(progress.clone());
    }

    fn on_error(&self, failure: &DispatchFailure) {
        self.failures.lock().unwrap().push(failure.clone());
    }
}

// 2024-06-05 is a Wednesday.
fn wednesday_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 6, 5)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

fn row(name: &str, phone: &str) -> DispatchRow {
    DispatchRow {
        name: name.to_string(),
        phone: phone.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
    }
}

fn rows(count: usize) -> Vec<DispatchRow> {
    (0..count)
        .map(|i| row(&format!("Lead{i}"), &format!("+55 11 90000-000{i}")))
        .collect()
}

fn instance(broker: Option<&str>, status: InstanceStatus) -> MessagingInstance {
    MessagingInstance {
        id: Uuid::new_v4(),
        name: format!("instance-{}", broker.unwrap_or("shared")),
        broker_id: broker.map(str::to_string),
        status,
        phone: None,
    }
}

fn configuration(brokers: &[&str], strategy: AssignmentStrategy) -> DispatchConfiguration {
    DispatchConfiguration {
        id: Uuid::new_v4(),
        name: "Campanha".to_string(),
        assigned_brokers: brokers.iter().map(|b| b.to_string()).collect(),
        strategy,
        time_windows: None,
        interval_between_messages_ms: 0,
        message_template: "Olá {nome}, recebemos seu contato ({telefone} / {email})".to_string(),
        is_active: true,
        priority: 0,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn orchestrator(backend: Arc<FakeBackend>, clock: Arc<ManualClock>) -> DispatchOrchestrator {
    DispatchOrchestrator::new(backend, clock)
}

fn assert_accounts_for_every_row(result: &DispatchResult, rows: usize) {
    let distributed: usize = result.broker_distribution.values().sum();
    assert_eq!(distributed + result.total_errors, rows);
    assert_eq!(result.total_sent, distributed);
    assert_eq!(
        result.errors.iter().map(|e| e.rows).sum::<usize>(),
        result.total_errors
    );
}

#[tokio::test]
async fn unconfigured_run_sends_everything_through_the_default_bucket() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(None, InstanceStatus::Connected)])
        .with_template("Oi {nome}");

    let result = orchestrator(backend.clone(), clock.clone())
        .run(rows(5), &context)
        .await
        .unwrap();

    assert_eq!(result.total_sent, 5);
    assert_eq!(result.total_errors, 0);
    assert!(result.errors.is_empty());
    assert_eq!(result.broker_distribution.len(), 1);
    assert_eq!(result.broker_distribution[DEFAULT_BUCKET], 5);
    assert_eq!(backend.sends().len(), 5);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn brokers_without_instances_fail_their_whole_bucket() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(Some("A"), InstanceStatus::Disconnected)])
        .with_configuration(configuration(&["A", "B"], AssignmentStrategy::RoundRobin));

    let result = orchestrator(backend.clone(), clock)
        .run(rows(4), &context)
        .await
        .unwrap();

    assert_eq!(result.total_sent, 0);
    assert_eq!(result.total_errors, 4);
    assert_eq!(result.errors.len(), 2);
    assert!(result.errors[0].message.ends_with("broker A"));
    assert!(result.errors[1].message.ends_with("broker B"));
    assert_eq!(result.errors[0].rows, 2);
    assert!(result.broker_distribution.is_empty());
    assert!(backend.calls().is_empty());
    assert_accounts_for_every_row(&result, 4);
}

#[tokio::test]
async fn rows_without_phone_are_skipped_and_reported_by_name() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(None, InstanceStatus::Connected)])
        .with_template("Oi {nome}");
    let input = vec![
        row("Ana", "11 98888-0001"),
        row("Bruno", ""),
        row("Carla", "11 98888-0003"),
    ];

    let result = orchestrator(backend.clone(), clock)
        .run(input, &context)
        .await
        .unwrap();

    assert_eq!(result.total_sent, 2);
    assert_eq!(result.total_errors, 1);
    let failure = &result.errors[0];
    assert!(failure.message.contains("Bruno"));
    assert!(failure.message.contains("bruno@example.com"));
    assert_eq!(failure.phone, None);
    assert_eq!(result.broker_distribution[DEFAULT_BUCKET], 2);
    assert_accounts_for_every_row(&result, 3);
}

#[tokio::test]
async fn zero_interval_never_sleeps() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(Some("A"), InstanceStatus::Connected)])
        .with_configuration(configuration(&["A"], AssignmentStrategy::RoundRobin));

    let result = orchestrator(backend, clock.clone())
        .run(rows(6), &context)
        .await
        .unwrap();

    assert_eq!(result.total_sent, 6);
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn interval_paces_sends_within_each_bucket() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let mut config = configuration(&["A", "B"], AssignmentStrategy::RoundRobin);
    config.interval_between_messages_ms = 2_500;
    let context = DispatchContext::new(vec![
        instance(Some("A"), InstanceStatus::Connected),
        instance(Some("B"), InstanceStatus::Connected),
    ])
    .with_configuration(config);

    orchestrator(backend, clock.clone())
        .run(rows(5), &context)
        .await
        .unwrap();

    // A gets 3 rows and B gets 2; no pause after the last row of a bucket.
    assert_eq!(clock.sleeps(), vec![Duration::from_millis(2_500); 3]);
}

#[tokio::test]
async fn fallback_interval_applies_without_configuration() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(None, InstanceStatus::Connected)])
        .with_template("Oi");

    DispatchOrchestrator::new(backend, clock.clone())
        .with_fallback_interval(Duration::from_millis(300))
        .run(rows(3), &context)
        .await
        .unwrap();

    assert_eq!(clock.sleeps(), vec![Duration::from_millis(300); 2]);
}

#[tokio::test]
async fn run_outside_time_window_fails_before_any_work() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(20, 0)));
    let mut config = configuration(&["A"], AssignmentStrategy::RoundRobin);
    config.time_windows = Some(TimeWindows::from([(
        DayOfWeek::Wednesday,
        TimeWindow {
            start: "09:00".to_string(),
            end: "18:00".to_string(),
            enabled: true,
        },
    )]));
    let context = DispatchContext::new(vec![instance(Some("A"), InstanceStatus::Connected)])
        .with_configuration(config);

    let err = orchestrator(backend.clone(), clock)
        .run(rows(2), &context)
        .await
        .unwrap_err();

    match err {
        DispatchError::OutsideTimeWindow { day, time } => {
            assert_eq!(day, DayOfWeek::Wednesday);
            assert_eq!(time, "20:00");
        }
    }
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn run_inside_time_window_proceeds() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(18, 0)));
    let mut config = configuration(&["A"], AssignmentStrategy::RoundRobin);
    config.time_windows = Some(TimeWindows::from([(
        DayOfWeek::Wednesday,
        TimeWindow {
            start: "09:00".to_string(),
            end: "18:00".to_string(),
            enabled: true,
        },
    )]));
    let context = DispatchContext::new(vec![instance(Some("A"), InstanceStatus::Connected)])
        .with_configuration(config);

    let result = orchestrator(backend, clock)
        .run(rows(2), &context)
        .await
        .unwrap();
    assert_eq!(result.total_sent, 2);
}

#[tokio::test]
async fn existing_chats_are_reused_and_new_ones_created_once() {
    let owned = instance(Some("A"), InstanceStatus::Connected);
    let backend = Arc::new(FakeBackend::default().with_chat(owned.id, "chat-existing", "+55 (11) 98888-0001"));
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![owned.clone()])
        .with_configuration(configuration(&["A"], AssignmentStrategy::RoundRobin));
    let input = vec![
        row("Ana", "5511988880001"),
        row("Bia", "11 97777-0002"),
        row("Bia de novo", "(11) 97777-0002"),
    ];

    orchestrator(backend.clone(), clock)
        .run(input, &context)
        .await
        .unwrap();

    let creates: Vec<_> = backend
        .calls()
        .into_iter()
        .filter(|c| matches!(c, Call::CreateChat { .. }))
        .collect();
    assert_eq!(
        creates,
        vec![Call::CreateChat {
            instance_id: owned.id,
            phone: "11977770002".to_string()
        }]
    );

    let sends = backend.sends();
    assert_eq!(sends[0].1, "chat-existing");
    assert_eq!(sends[1].1, "chat-11977770002");
    assert_eq!(sends[2].1, "chat-11977770002");
    assert_eq!(
        backend
            .calls()
            .iter()
            .filter(|c| matches!(c, Call::LoadChats(_)))
            .count(),
        1
    );
}

#[tokio::test]
async fn template_is_resolved_per_row() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(Some("A"), InstanceStatus::Connected)])
        .with_configuration(configuration(&["A"], AssignmentStrategy::RoundRobin));

    orchestrator(backend.clone(), clock)
        .run(vec![row("Ana", "11 98888-0001")], &context)
        .await
        .unwrap();

    assert_eq!(
        backend.sends()[0].2,
        "Olá Ana, recebemos seu contato (11 98888-0001 / ana@example.com)"
    );
}

#[tokio::test]
async fn send_failures_are_isolated_to_their_row() {
    let backend = Arc::new(FakeBackend::default().failing_phone("5511900000001"));
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(None, InstanceStatus::Connected)])
        .with_template("Oi {nome}");
    let input = vec![
        row("Ana", "55 11 90000-0000"),
        row("Bruno", "55 11 90000-0001"),
        row("Carla", "55 11 90000-0002"),
    ];

    let result = orchestrator(backend, clock).run(input, &context).await.unwrap();

    assert_eq!(result.total_sent, 2);
    assert_eq!(result.total_errors, 1);
    let failure = &result.errors[0];
    assert_eq!(failure.phone.as_deref(), Some("55 11 90000-0001"));
    assert!(failure.message.contains("55 11 90000-0001"));
    assert!(failure.message.contains("not on whatsapp"));
    assert_accounts_for_every_row(&result, 3);
}

#[tokio::test]
async fn chat_loading_failure_fails_only_that_bucket() {
    let a = instance(Some("A"), InstanceStatus::Connected);
    let b = instance(Some("B"), InstanceStatus::Connected);
    let backend = Arc::new(FakeBackend::default().failing_load(a.id));
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![a, b.clone()])
        .with_configuration(configuration(&["A", "B"], AssignmentStrategy::RoundRobin));

    let result = orchestrator(backend.clone(), clock)
        .run(rows(5), &context)
        .await
        .unwrap();

    assert_eq!(result.total_errors, 3);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].broker_id, "A");
    assert_eq!(result.errors[0].rows, 3);
    assert_eq!(result.total_sent, 2);
    assert_eq!(result.broker_distribution.get("A"), None);
    assert_eq!(result.broker_distribution["B"], 2);
    assert!(backend.sends().iter().all(|(instance_id, _, _)| *instance_id == b.id));
    assert_accounts_for_every_row(&result, 5);
}

#[tokio::test]
async fn brokers_fall_back_to_any_connected_instance() {
    let own = instance(Some("A"), InstanceStatus::Connected);
    let shared = instance(Some("C"), InstanceStatus::Connected);
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![
        instance(Some("B"), InstanceStatus::Disconnected),
        shared.clone(),
        own.clone(),
    ])
    .with_configuration(configuration(&["A", "B"], AssignmentStrategy::RoundRobin));

    let result = orchestrator(backend.clone(), clock)
        .run(rows(4), &context)
        .await
        .unwrap();

    assert_eq!(result.total_sent, 4);
    assert_eq!(result.broker_distribution["A"], 2);
    assert_eq!(result.broker_distribution["B"], 2);
    let instances: Vec<Uuid> = backend.sends().into_iter().map(|(id, _, _)| id).collect();
    assert_eq!(instances, vec![own.id, own.id, shared.id, shared.id]);
}

#[tokio::test]
async fn random_strategy_still_accounts_for_every_row() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![
        instance(Some("A"), InstanceStatus::Connected),
        instance(Some("B"), InstanceStatus::Connected),
        instance(Some("C"), InstanceStatus::Connected),
    ])
    .with_configuration(configuration(&["A", "B", "C"], AssignmentStrategy::Random));

    let result = orchestrator(backend.clone(), clock)
        .run(rows(9), &context)
        .await
        .unwrap();

    assert_eq!(result.total_sent, 9);
    assert_eq!(backend.sends().len(), 9);
    assert_accounts_for_every_row(&result, 9);
}

#[tokio::test]
async fn least_busy_distributes_like_round_robin() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![
        instance(Some("A"), InstanceStatus::Connected),
        instance(Some("B"), InstanceStatus::Connected),
    ])
    .with_configuration(configuration(&["A", "B"], AssignmentStrategy::LeastBusy));

    let result = orchestrator(backend, clock)
        .run(rows(5), &context)
        .await
        .unwrap();

    assert_eq!(result.broker_distribution["A"], 3);
    assert_eq!(result.broker_distribution["B"], 2);
}

#[tokio::test]
async fn empty_broker_list_falls_back_to_default_bucket() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(vec![instance(None, InstanceStatus::Connected)])
        .with_configuration(configuration(&[], AssignmentStrategy::RoundRobin));

    let result = orchestrator(backend, clock)
        .run(rows(3), &context)
        .await
        .unwrap();

    assert_eq!(result.broker_distribution[DEFAULT_BUCKET], 3);
}

#[tokio::test]
async fn observer_sees_every_row_and_every_failure() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let observer = RecordingObserver::default();
    let context = DispatchContext::new(vec![instance(Some("A"), InstanceStatus::Connected)])
        .with_configuration(configuration(&["A", "B"], AssignmentStrategy::RoundRobin));
    let mut input = rows(4);
    input[2].phone = "sem telefone".to_string();

    let result = orchestrator(backend, clock)
        .run_observed(input, &context, &observer)
        .await
        .unwrap();

    // B falls back to A's instance, so only the phoneless row fails.
    assert_eq!(result.total_errors, 1);
    let failures = observer.failures.lock().unwrap();
    assert_eq!(failures.len(), 1);
    let progress = observer.progress.lock().unwrap();
    assert_eq!(progress.len(), 4);
    let last = progress.last().unwrap();
    assert_eq!(last.processed, 4);
    assert_eq!(last.total, 4);
    assert_eq!(last.sent, 3);
    assert_eq!(last.errors, 1);
}

#[tokio::test]
async fn empty_input_produces_an_empty_result() {
    let backend = Arc::new(FakeBackend::default());
    let clock = Arc::new(ManualClock::at(wednesday_at(10, 0)));
    let context = DispatchContext::new(Vec::new()).with_template("Oi");

    let result = orchestrator(backend.clone(), clock)
        .run(Vec::new(), &context)
        .await
        .unwrap();

    assert_eq!(result.total_sent, 0);
    assert_eq!(result.total_errors, 0);
    assert!(result.broker_distribution.is_empty());
    assert!(backend.calls().is_empty());
}
