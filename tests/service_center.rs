use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use stationvisor::{
    CenterError, ClientId, Config, ConfigError, Event, EventKind, FixedServiceTime, RuntimeError,
    ServiceCenter, Subscribe, TaskKind,
};

/// Keeps every delivered event in arrival order.
#[derive(Default)]
struct Recorder(Mutex<Vec<Event>>);

#[async_trait]
impl Subscribe for Recorder {
    async fn on_event(&self, ev: &Event) {
        self.0.lock().unwrap().push(ev.clone());
    }

    fn name(&self) -> &'static str {
        "recorder"
    }

    fn queue_capacity(&self) -> usize {
        1 << 16
    }
}

impl Recorder {
    fn events(&self) -> Vec<Event> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, kind: EventKind) -> usize {
        self.0.lock().unwrap().iter().filter(|e| e.kind == kind).count()
    }
}

fn config(capacity: usize) -> Config {
    Config {
        capacity,
        bus_capacity: 1 << 16,
        ..Config::default()
    }
}

fn center(cfg: Config, service_ms: u64, recorder: &Arc<Recorder>) -> ServiceCenter {
    ServiceCenter::builder(cfg)
        .with_subscriber(recorder.clone())
        .with_service_time(FixedServiceTime(Duration::from_millis(service_ms)))
        .with_os_signals(false)
        .build()
        .unwrap()
}

#[tokio::test(start_paused = true)]
async fn closed_run_completes_every_client_within_capacity() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(2), 100, &rec);

    let report = center.run_closed(6).await.unwrap();

    assert_eq!(report.clients.len(), 6);
    assert!(report.all_done());
    for client in &report.clients {
        let kinds: HashSet<TaskKind> = client.history().iter().copied().collect();
        assert_eq!(kinds.len(), TaskKind::COUNT, "{} repeated a task", client.id());
    }
    for st in &report.stations {
        assert!(st.peak <= 2, "{} peaked at {}", st.station, st.peak);
        assert_eq!(st.occupancy, 0);
        assert_eq!(st.admissions, 6);
    }
    assert_eq!(center.stations().total_occupancy(), 0);
    assert_eq!(rec.count(EventKind::ClientFinished), 6);
    assert!(center.progress().snapshot_in_flight().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn no_double_admission_and_one_slot_per_client() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(1), 50, &rec);

    center.run_closed(5).await.unwrap();

    let mut admitted: HashMap<(ClientId, TaskKind), usize> = HashMap::new();
    let mut holding: HashMap<ClientId, TaskKind> = HashMap::new();
    let mut occupancy = [0usize; TaskKind::COUNT];

    for ev in rec.events() {
        let (Some(client), Some(kind)) = (ev.client, ev.task_kind) else {
            continue;
        };
        match ev.kind {
            EventKind::ClientAdmitted => {
                *admitted.entry((client, kind)).or_default() += 1;
                assert!(holding.insert(client, kind).is_none(), "{client} held two slots");
                occupancy[kind.index()] += 1;
                assert!(occupancy[kind.index()] <= 1, "{kind} over capacity");
            }
            EventKind::TaskFinished => {
                assert_eq!(holding.remove(&client), Some(kind));
                occupancy[kind.index()] -= 1;
            }
            _ => {}
        }
    }

    assert_eq!(admitted.len(), 5 * TaskKind::COUNT);
    assert!(admitted.values().all(|n| *n == 1));
    assert!(holding.is_empty());
}

#[tokio::test(start_paused = true)]
async fn contention_is_reported_as_waiting_not_error() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(1), 200, &rec);

    let report = center.run_closed(4).await.unwrap();

    assert!(report.all_done());
    assert!(rec.count(EventKind::ClientWaiting) > 0);
    let waits: Vec<_> = rec
        .events()
        .into_iter()
        .filter(|e| e.kind == EventKind::ClientWaiting)
        .collect();
    assert!(waits.iter().all(|e| e.delay_ms == Some(100)));
}

#[tokio::test(start_paused = true)]
async fn zero_capacity_fails_before_any_client() {
    let err = ServiceCenter::builder(config(0)).build().err();
    assert_eq!(err, Some(ConfigError::ZeroCapacity));
}

#[tokio::test(start_paused = true)]
async fn zero_clients_fails_before_any_client() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(1), 10, &rec);

    let err = center.run_closed(0).await.unwrap_err();

    assert!(matches!(err, CenterError::Config(ConfigError::ZeroClients)));
    assert_eq!(err.as_label(), "config_zero_clients");
    assert_eq!(rec.count(EventKind::ClientArrived), 0);
}

#[tokio::test(start_paused = true)]
async fn zero_interval_fails_before_any_client() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(1), 10, &rec);

    let err = center.run_open(Duration::ZERO).await.unwrap_err();

    assert!(matches!(err, CenterError::Config(ConfigError::ZeroInterval)));
    assert!(rec.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn open_run_generates_until_shutdown() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(1), 50, &rec);

    let (report, ()) = tokio::join!(center.run_open(Duration::from_millis(100)), async {
        tokio::time::sleep(Duration::from_millis(1_050)).await;
        center.shutdown();
    });
    let report = report.unwrap();

    assert_eq!(report.arrived, 11);
    assert!(report.clients.is_empty());
    assert_eq!(rec.count(EventKind::ShutdownRequested), 1);
    assert_eq!(rec.count(EventKind::AllStoppedWithin), 1);
    for st in &report.stations {
        assert!(st.peak <= 1);
    }
    assert_eq!(center.stations().total_occupancy(), 0);
}

#[tokio::test(start_paused = true)]
async fn open_run_leaves_no_tracked_clients() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(2), 10, &rec);

    let (report, ()) = tokio::join!(center.run_open(Duration::from_millis(20)), async {
        tokio::time::sleep(Duration::from_millis(2_005)).await;
        center.shutdown();
    });
    let report = report.unwrap();

    let progress = center.progress();
    assert_eq!(report.arrived, 101);
    assert_eq!(progress.len().await, 0);
    assert_eq!(progress.settled().await as u64, report.arrived);
    assert_eq!(progress.done().await, rec.count(EventKind::ClientFinished));
    assert_eq!(progress.abandoned().await, rec.count(EventKind::ClientAbandoned));
    assert!(progress.done().await >= 90);
}

#[tokio::test(start_paused = true)]
async fn open_run_loses_no_client_under_contention() {
    let rec = Arc::new(Recorder::default());
    let center = ServiceCenter::builder(config(1))
        .with_subscriber(rec.clone())
        .with_service_time(|id: ClientId, kind: TaskKind| {
            let step = (id.get() + kind.index() as u64 * 3) % 4;
            Duration::from_millis(30 + step * 20)
        })
        .with_os_signals(false)
        .build()
        .unwrap();

    let window = Duration::from_millis(6_010);
    let (report, in_flight) = tokio::join!(center.run_open(Duration::from_millis(100)), async {
        tokio::time::sleep(window).await;
        let in_flight = center.progress().snapshot_in_flight().await;
        center.shutdown();
        in_flight
    });
    report.unwrap();

    let events = rec.events();
    let cutoff = events
        .iter()
        .find(|e| e.kind == EventKind::ShutdownRequested)
        .map(|e| e.seq)
        .unwrap();
    let clients_of = |kind: EventKind| -> HashSet<ClientId> {
        events
            .iter()
            .filter(|e| e.kind == kind && e.seq < cutoff)
            .filter_map(|e| e.client)
            .collect()
    };
    let arrived = clients_of(EventKind::ClientArrived);
    let finished = clients_of(EventKind::ClientFinished);

    assert_eq!(arrived.len(), 61);
    for id in &arrived {
        assert!(
            finished.contains(id) || in_flight.contains(id),
            "{id} was neither finished nor in flight"
        );
    }
    // Everything that arrived two seconds before the window has drained.
    for raw in 1..=40 {
        assert!(finished.contains(&ClientId::new(raw)), "client-{raw} did not finish");
    }

    let mut terminal: HashMap<ClientId, usize> = HashMap::new();
    for ev in &events {
        if let (EventKind::ClientFinished | EventKind::ClientAbandoned, Some(id)) =
            (ev.kind, ev.client)
        {
            *terminal.entry(id).or_default() += 1;
        }
    }
    assert_eq!(terminal.len(), 61);
    assert!(terminal.values().all(|n| *n == 1));
}

#[tokio::test(start_paused = true)]
async fn shutdown_during_closed_run_abandons_remaining_clients() {
    let rec = Arc::new(Recorder::default());
    let center = center(config(1), 1_000, &rec);

    let (report, ()) = tokio::join!(center.run_closed(3), async {
        tokio::time::sleep(Duration::from_millis(1_500)).await;
        center.shutdown();
    });
    let report = report.unwrap();

    assert_eq!(report.clients.len(), 3);
    assert!(!report.all_done());
    assert_eq!(rec.count(EventKind::ShutdownRequested), 1);
    assert_eq!(rec.count(EventKind::AllStoppedWithin), 1);
    assert_eq!(rec.count(EventKind::ClientAbandoned), 3);
    assert_eq!(center.stations().total_occupancy(), 0);

    // Tasks served before the shutdown stay recorded.
    let served: usize = report.clients.iter().map(|c| c.history().len()).sum();
    assert!(served >= 3);
}

#[tokio::test(start_paused = true)]
async fn panicking_worker_releases_its_slot() {
    let center = ServiceCenter::builder(config(1))
        .with_service_time(|id: ClientId, _kind: TaskKind| {
            if id == ClientId::new(2) {
                panic!("service time unavailable for {id}");
            }
            Duration::from_millis(10)
        })
        .with_os_signals(false)
        .build()
        .unwrap();

    let err = center.run_closed(3).await.unwrap_err();

    match err {
        CenterError::Runtime(RuntimeError::WorkerPanicked { reason }) => {
            assert!(reason.contains("client-2"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(center.stations().total_occupancy(), 0);
}
