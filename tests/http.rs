use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

const JAMAAT: &str = "Fajr with Jamaat (+5)";
const ALONE: &str = "Fajr prayed alone (+2)";
const QAZA: &str = "Fajr Qaza (-1)";

#[derive(Debug, Deserialize)]
struct EntryResponse {
    date: String,
    member: String,
    status: String,
    points: i64,
}

#[derive(Debug, Deserialize)]
struct TodayEntry {
    member: String,
    status: Option<String>,
    points: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct TodayResponse {
    date: String,
    entries: Vec<TodayEntry>,
}

#[derive(Debug, Deserialize)]
struct MemberScore {
    member: String,
    points: i64,
}

#[derive(Debug, Deserialize)]
struct ScoresResponse {
    window_days: u32,
    scores: Vec<MemberScore>,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    date: String,
    total: i64,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    series: BTreeMap<String, Vec<SeriesPoint>>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("fajr_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/today")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_fajr_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn reset(client: &Client, base_url: &str, member: &str) {
    let response = client
        .post(format!("{base_url}/api/reset"))
        .json(&serde_json::json!({ "member": member }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn submit(client: &Client, base_url: &str, member: &str, status: &str) -> reqwest::Response {
    client
        .post(format!("{base_url}/api/submit"))
        .json(&serde_json::json!({ "member": member, "status": status }))
        .send()
        .await
        .unwrap()
}

async fn today(client: &Client, base_url: &str) -> TodayResponse {
    client
        .get(format!("{base_url}/api/today"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_submit_records_todays_entry() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    reset(&client, &server.base_url, "MSN").await;
    let response = submit(&client, &server.base_url, "MSN", ALONE).await;
    assert!(response.status().is_success());
    let entry: EntryResponse = response.json().await.unwrap();
    assert_eq!(entry.member, "MSN");
    assert_eq!(entry.status, ALONE);
    assert_eq!(entry.points, 2);

    let today = today(&client, &server.base_url).await;
    assert_eq!(today.date, entry.date);
    let msn = today
        .entries
        .iter()
        .find(|e| e.member == "MSN")
        .expect("MSN card");
    assert_eq!(msn.status.as_deref(), Some(ALONE));
    assert_eq!(msn.points, Some(2));
}

#[tokio::test]
async fn http_second_submission_same_day_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    reset(&client, &server.base_url, "Shaheer").await;
    let first = submit(&client, &server.base_url, "Shaheer", JAMAAT).await;
    assert!(first.status().is_success());

    let second = submit(&client, &server.base_url, "Shaheer", QAZA).await;
    assert_eq!(second.status().as_u16(), 409);

    // The rejected submission must not have replaced the first entry.
    let today = today(&client, &server.base_url).await;
    let shaheer = today
        .entries
        .iter()
        .find(|e| e.member == "Shaheer")
        .unwrap();
    assert_eq!(shaheer.status.as_deref(), Some(JAMAAT));
}

#[tokio::test]
async fn http_reset_clears_and_allows_resubmission() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    reset(&client, &server.base_url, "Ali").await;
    let first = submit(&client, &server.base_url, "Ali", QAZA).await;
    assert!(first.status().is_success());

    reset(&client, &server.base_url, "Ali").await;
    let today_state = today(&client, &server.base_url).await;
    let ali = today_state.entries.iter().find(|e| e.member == "Ali").unwrap();
    assert!(ali.status.is_none());
    assert!(ali.points.is_none());

    let again = submit(&client, &server.base_url, "Ali", JAMAAT).await;
    assert!(again.status().is_success());
    let entry: EntryResponse = again.json().await.unwrap();
    assert_eq!(entry.points, 5);
}

#[tokio::test]
async fn http_unknown_member_and_status_are_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = submit(&client, &server.base_url, "Nobody", JAMAAT).await;
    assert_eq!(response.status().as_u16(), 400);

    reset(&client, &server.base_url, "Ali").await;
    let response = submit(&client, &server.base_url, "Ali", "slept through it").await;
    assert_eq!(response.status().as_u16(), 400);

    let response = client
        .post(format!("{}/api/reset", server.base_url))
        .json(&serde_json::json!({ "member": "Nobody" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn http_scores_and_series_reflect_submissions() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for member in ["Shaheer", "MSN", "Ali"] {
        reset(&client, &server.base_url, member).await;
    }
    assert!(submit(&client, &server.base_url, "Shaheer", JAMAAT)
        .await
        .status()
        .is_success());
    assert!(submit(&client, &server.base_url, "MSN", QAZA)
        .await
        .status()
        .is_success());

    let scores: ScoresResponse = client
        .get(format!("{}/api/scores", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(scores.window_days, 30);
    let by_member: BTreeMap<&str, i64> = scores
        .scores
        .iter()
        .map(|s| (s.member.as_str(), s.points))
        .collect();
    assert_eq!(by_member.get("Shaheer"), Some(&5));
    assert_eq!(by_member.get("MSN"), Some(&-1));
    assert_eq!(by_member.get("Ali"), Some(&0));

    // Only today has entries, so the dense window is 30 zero-filled days
    // ending today and the running total lands on the last point.
    let series: SeriesResponse = client
        .get(format!("{}/api/series", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let today_state = today(&client, &server.base_url).await;
    for member in ["Shaheer", "MSN", "Ali"] {
        let points = series.series.get(member).expect("member series");
        assert_eq!(points.len(), 30);
        assert_eq!(points.last().unwrap().date, today_state.date);
    }
    let last = |member: &str| series.series.get(member).unwrap().last().unwrap().total;
    assert_eq!(last("Shaheer"), 5);
    assert_eq!(last("MSN"), -1);
    assert_eq!(last("Ali"), 0);
}
