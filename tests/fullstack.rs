use serde_json::Value;
use serial_test::serial;
use std::{
    fs,
    path::{Path, PathBuf},
    process::{Child, Command, Stdio},
    thread,
    time::{Duration, Instant},
};

const START_TIMEOUT: Duration = Duration::from_secs(20);
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);
const REALM: &str = "fullstack.realm";

fn choose_port() -> u16 {
    if let Some(p) = std::env::var("TURN_SERVER_TEST_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
    {
        return p;
    }
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|addr| addr.port())
        .expect("pick free port")
}

fn write_fullstack_config(dir: &Path, port: u16) -> PathBuf {
    let config_path = dir.join("config.toml");
    fs::write(
        &config_path,
        format!(
            r#"
name = "turn-server-fullstack-test"
enable = 3
env = "test"

[bind.http]
domain_name = "localhost"
ip = "127.0.0.1"
port = {port}

[bind.ice]
domain_name = "localhost"
ip = "127.0.0.1"
port = 0

[turn]
advertised_ip = "127.0.0.1"
advertised_port = 3478
relay_port_range = "52000-52100"
realm = "{REALM}"

[observability.log]
output = "console"
"#
        ),
    )
    .expect("write config");
    config_path
}

fn spawn_turn_server(config: &Path, log_path: &Path) -> Child {
    let bin = PathBuf::from(env!("CARGO_BIN_EXE_turn-server"));
    let log_file = fs::File::create(log_path).expect("create log file");
    Command::new(bin)
        .arg("--config")
        .arg(config)
        .stdout(Stdio::from(log_file.try_clone().expect("dup log")))
        .stderr(Stdio::from(log_file))
        .spawn()
        .expect("spawn turn-server")
}

async fn wait_for_health(url: &str, child: &mut Child, log_path: &Path) {
    let client = reqwest::Client::new();
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait().unwrap_or(None) {
            let log = fs::read_to_string(log_path).unwrap_or_default();
            panic!("turn-server exited early: status={status:?}\nlogs:\n{log}");
        }

        if let Ok(resp) = client.get(url).send().await
            && resp.status().is_success()
        {
            return;
        }
        if start.elapsed() > START_TIMEOUT {
            let log = fs::read_to_string(log_path).unwrap_or_default();
            panic!("health check not ready at {url}\nlogs:\n{log}");
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
}

/// 发送 SIGINT 并等待退出，返回是否在超时内正常退出
fn graceful_shutdown(mut child: Child) -> bool {
    #[cfg(unix)]
    {
        use nix::sys::signal::{Signal, kill};
        use nix::unistd::Pid;
        let _ = kill(Pid::from_raw(child.id() as i32), Signal::SIGINT);
    }
    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status.success(),
            Ok(None) => {
                if start.elapsed() > SHUTDOWN_TIMEOUT {
                    let _ = child.kill();
                    return false;
                }
                thread::sleep(Duration::from_millis(100));
            }
            Err(_) => return false,
        }
    }
}

#[tokio::test]
#[serial]
async fn end_to_end_session_lifecycle() {
    let tmp = tempfile::tempdir().expect("temp dir");
    let port = choose_port();
    let config_path = write_fullstack_config(tmp.path(), port);
    let log_path = tmp.path().join("turn_server_fullstack.log");
    let mut child = spawn_turn_server(&config_path, &log_path);

    let base = format!("http://127.0.0.1:{port}");
    wait_for_health(&format!("{base}/v1/health"), &mut child, &log_path).await;

    let client = reqwest::Client::new();

    let health: Value = client
        .get(format!("{base}/v1/health"))
        .send()
        .await
        .expect("health")
        .json()
        .await
        .expect("health json");
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["realm"], REALM);
    assert_eq!(health["backend"], "memory");

    let create = |user: &'static str, key: &'static str| {
        let client = client.clone();
        let url = format!("{base}/v1/sessions");
        async move {
            client
                .post(url)
                .json(&serde_json::json!({ "user_id": user, "key": key }))
                .send()
                .await
                .expect("create session")
                .status()
        }
    };

    assert_eq!(create("alice", "pw1").await, reqwest::StatusCode::OK);
    assert_eq!(create("alice", "pw2").await, reqwest::StatusCode::CONFLICT);

    let resp = client
        .delete(format!("{base}/v1/sessions/alice"))
        .send()
        .await
        .expect("delete session");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let stats: Value = client
        .get(format!("{base}/v1/sessions/statistics"))
        .send()
        .await
        .expect("statistics")
        .json()
        .await
        .expect("statistics json");
    assert_eq!(stats["started"], 1);
    assert_eq!(stats["ended"], 1);

    let metrics = client
        .get(format!("{base}/metrics"))
        .send()
        .await
        .expect("metrics")
        .text()
        .await
        .expect("metrics text");
    assert!(
        metrics.contains("turn_server_sessions_created_total"),
        "metrics: {metrics}"
    );
    assert!(metrics.contains("turn_server_service_up"));
    assert!(
        metrics.contains("turn_server_active_sessions 0"),
        "metrics: {metrics}"
    );

    drop(client);
    let exited_cleanly = graceful_shutdown(child);
    if cfg!(unix) {
        let log = fs::read_to_string(&log_path).unwrap_or_default();
        assert!(exited_cleanly, "turn-server did not shut down cleanly\nlogs:\n{log}");
    }
}
