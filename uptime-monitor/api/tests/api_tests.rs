use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use uptime_monitor::controllers::{cors_headers, routes};
use uptime_monitor::{
    AppState, Config, MonitorRegistry, MonitorStatus, ProbeOutcome, Prober, Scheduler, SchedulerTask,
    StatusEngine,
};

/// Prober answering from a per-URL script, defaulting to a 200ms success
#[derive(Default)]
struct ScriptedProber {
    scripts: Mutex<HashMap<String, VecDeque<ProbeOutcome>>>,
}

impl ScriptedProber {
    fn script(self, url: &str, outcomes: Vec<ProbeOutcome>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(url.to_string(), outcomes.into());
        self
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn probe(&self, _name: &str, url: &str) -> ProbeOutcome {
        self.scripts
            .lock()
            .unwrap()
            .get_mut(url)
            .and_then(|queue| queue.pop_front())
            .unwrap_or(ProbeOutcome::success(200))
    }
}

fn setup(prober: ScriptedProber) -> (web::Data<AppState>, SchedulerTask) {
    let config = Config {
        ping_interval: Duration::from_secs(3600),
        ..Default::default()
    };

    let registry = Arc::new(MonitorRegistry::new(config.latency_history_limit));
    let (scheduler, task) = Scheduler::new(
        Arc::clone(&registry),
        Arc::new(prober),
        StatusEngine::new(config.status_policy()),
        config.ping_interval,
    )
    .start();

    let state = web::Data::new(AppState {
        registry,
        scheduler,
        config,
    });

    (state, task)
}

async fn wait_for_pings(state: &web::Data<AppState>, name: &str, pings: u64) {
    for _ in 0..200 {
        if let Some(monitor) = state.registry.get(name).await {
            if monitor.total_pings >= pings {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("monitor {} never reached {} pings", name, pings);
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data($state.clone())
                .wrap(cors_headers())
                .configure(routes),
        )
        .await
    };
}

#[actix_web::test]
async fn test_register_probes_immediately() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/monitor")
        .set_json(json!({"name": "svc1", "url": "https://example.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("svc1"));
    assert!(message.contains("60 minutes"));

    wait_for_pings(&state, "svc1", 1).await;

    let req = test::TestRequest::get().uri("/api/monitors/svc1").to_request();
    let monitor: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(monitor["status"], "OPERATIONAL");
    assert_eq!(monitor["totalPings"], 1);
    assert_eq!(monitor["failedPings"], 0);
    assert_eq!(monitor["uptime"], "100.00");
    assert_eq!(monitor["latencyHistory"], json!([200]));
    assert!(!monitor["lastPing"].is_null());

    task.shutdown().await;
}

#[actix_web::test]
async fn test_slow_response_is_degraded() {
    let prober = ScriptedProber::default()
        .script("https://slow.example.com", vec![ProbeOutcome::success(1500)]);
    let (state, task) = setup(prober);
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/monitor")
        .set_json(json!({"name": "slow", "url": "https://slow.example.com"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

    wait_for_pings(&state, "slow", 1).await;

    let monitor = state.registry.get("slow").await.unwrap();
    assert_eq!(monitor.status, MonitorStatus::Degraded);
    assert_eq!(monitor.latency_history, vec![1500]);

    task.shutdown().await;
}

#[actix_web::test]
async fn test_invalid_url_is_rejected() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/monitor")
        .set_json(json!({"name": "svc1", "url": "ftp://x"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Name and valid URL are required.");

    let req = test::TestRequest::get().uri("/api/monitors").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(list["stats"]["total"], 0);
    assert_eq!(list["monitors"], json!([]));

    task.shutdown().await;
}

#[actix_web::test]
async fn test_missing_fields_are_rejected() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    for body in [json!({"name": "svc1"}), json!({"url": "https://example.com"}), json!({})] {
        let req = test::TestRequest::post()
            .uri("/api/monitor")
            .set_json(body)
            .to_request();
        assert_eq!(
            test::call_service(&app, req).await.status(),
            StatusCode::BAD_REQUEST
        );
    }

    let req = test::TestRequest::post()
        .uri("/api/monitor")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

    assert!(state.registry.is_empty().await);
    task.shutdown().await;
}

#[actix_web::test]
async fn test_duplicate_name_conflicts() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    let register = |url: &str| {
        test::TestRequest::post()
            .uri("/api/monitor")
            .set_json(json!({"name": "svc1", "url": url}))
            .to_request()
    };

    let resp = test::call_service(&app, register("https://example.com")).await;
    assert_eq!(resp.status(), StatusCode::OK);
    wait_for_pings(&state, "svc1", 1).await;

    let resp = test::call_service(&app, register("https://other.example.com")).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Give a stray probe time to land if one had been dispatched
    tokio::time::sleep(Duration::from_millis(50)).await;

    let monitor = state.registry.get("svc1").await.unwrap();
    assert_eq!(monitor.url, "https://example.com");
    assert_eq!(monitor.total_pings, 1);
    assert_eq!(state.registry.len().await, 1);

    task.shutdown().await;
}

#[actix_web::test]
async fn test_list_reports_stats() {
    let prober = ScriptedProber::default().script(
        "https://down.example.com",
        vec![ProbeOutcome::failure(); 3],
    );
    let (state, task) = setup(prober);
    let app = app!(state);

    for (name, url) in [
        ("up", "https://up.example.com"),
        ("down", "https://down.example.com"),
    ] {
        let req = test::TestRequest::post()
            .uri("/api/monitor")
            .set_json(json!({"name": name, "url": url}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        wait_for_pings(&state, name, 1).await;
    }

    // Two more failures push "down" past the retry threshold
    let entry = state.registry.entry("down").await.unwrap();
    assert!(state.scheduler.probe_now(Arc::clone(&entry)));
    wait_for_pings(&state, "down", 2).await;
    assert!(state.scheduler.probe_now(entry));
    wait_for_pings(&state, "down", 3).await;

    let req = test::TestRequest::get().uri("/api/monitors").to_request();
    let list: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        list["stats"],
        json!({"total": 2, "operational": 1, "degraded": 0, "down": 1, "pending": 0})
    );
    assert_eq!(list["monitors"][0]["name"], "up");
    assert_eq!(list["monitors"][1]["name"], "down");
    assert_eq!(list["monitors"][1]["status"], "DOWN");
    assert_eq!(list["monitors"][1]["retryCount"], 3);
    assert_eq!(list["monitors"][1]["failedPings"], 3);
    assert_eq!(list["monitors"][1]["uptime"], "0.00");

    task.shutdown().await;
}

#[actix_web::test]
async fn test_unknown_monitor_is_not_found() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/monitors/nope").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    task.shutdown().await;
}

#[actix_web::test]
async fn test_liveness_and_health() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/").to_request();
    let body = test::call_and_read_body(&app, req).await;
    assert_eq!(body, web::Bytes::from_static(b"Uptime monitor backend is running"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let health: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(health, json!({"status": "OK"}));

    task.shutdown().await;
}

#[actix_web::test]
async fn test_cors_headers_and_preflight() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    let req = test::TestRequest::get().uri("/api/monitors").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/monitor")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(resp.headers().contains_key("access-control-allow-methods"));

    task.shutdown().await;
}

#[actix_web::test]
async fn test_preflight_on_read_routes() {
    let (state, task) = setup(ScriptedProber::default());
    let app = app!(state);

    for uri in ["/api/monitors", "/api/monitors/svc1"] {
        let req = test::TestRequest::default()
            .method(actix_web::http::Method::OPTIONS)
            .uri(uri)
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT, "{}", uri);
        assert_eq!(
            resp.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    // Unknown paths still 404 rather than answering preflight
    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/api/unknown")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    task.shutdown().await;
}
