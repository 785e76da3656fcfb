use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

const BASE_CONFIG: &str = r#"
name = "turn-server-cli-test"
enable = 3
env = "{env}"

[bind.http]
domain_name = "localhost"
ip = "{http_ip}"
port = 39999

[bind.ice]
domain_name = "localhost"
ip = "127.0.0.1"
port = 0

[turn]
advertised_ip = "127.0.0.1"
advertised_port = 3478
relay_port_range = "{relay}"
realm = "example"

[services.sessions]
backend = "sharded"

[observability.log]
output = "console"
"#;

fn write_config(dir: &Path, file_name: &str, env: &str, http_ip: &str, relay: &str) -> PathBuf {
    let config_path = dir.join(file_name);
    let content = BASE_CONFIG
        .replace("{env}", env)
        .replace("{http_ip}", http_ip)
        .replace("{relay}", relay);
    fs::write(&config_path, content).expect("write config");
    config_path
}

fn write_valid_config(dir: &Path, file_name: &str) -> PathBuf {
    write_config(dir, file_name, "dev", "127.0.0.1", "49152-65535")
}

/// 生产环境、非回环地址：只有警告
fn write_warning_only_config(dir: &Path, file_name: &str) -> PathBuf {
    write_config(dir, file_name, "prod", "0.0.0.0", "49152-65535")
}

fn write_validation_error_config(dir: &Path, file_name: &str) -> PathBuf {
    write_config(dir, file_name, "dev", "127.0.0.1", "65535-49152")
}

fn run_turn_server(args: &[&str], current_dir: Option<&Path>) -> Output {
    let mut cmd = Command::new(PathBuf::from(env!("CARGO_BIN_EXE_turn-server")));
    cmd.args(args);
    if let Some(dir) = current_dir {
        cmd.current_dir(dir);
    }
    cmd.output().expect("run turn-server command")
}

fn combined_output(output: &Output) -> String {
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn test_command_accepts_explicit_valid_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_valid_config(temp.path(), "valid.toml");
    let output = run_turn_server(&["test", config_path.to_str().expect("utf8 path")], None);

    assert!(
        output.status.success(),
        "command should succeed, output: {}",
        combined_output(&output)
    );
}

#[test]
fn test_command_finds_default_config_in_current_directory() {
    let temp = tempfile::tempdir().expect("temp dir");
    write_valid_config(temp.path(), "config.toml");
    let output = run_turn_server(&["test"], Some(temp.path()));

    assert!(
        output.status.success(),
        "command should succeed, output: {}",
        combined_output(&output)
    );
}

#[test]
fn test_command_fails_for_missing_custom_config_path() {
    let temp = tempfile::tempdir().expect("temp dir");
    let missing_path = temp.path().join("missing.toml");
    let output = run_turn_server(&["test", missing_path.to_str().expect("utf8 path")], None);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(
        stderr.contains("Config file not found"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_command_fails_when_no_default_config_exists() {
    if Path::new("/etc/turn-server/config.toml").exists() {
        return;
    }
    let temp = tempfile::tempdir().expect("temp dir");
    let output = run_turn_server(&["test"], Some(temp.path()));
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(
        stderr.contains("No configuration file found"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_command_fails_for_invalid_config_content() {
    let temp = tempfile::tempdir().expect("temp dir");
    let bad_path = temp.path().join("bad.toml");
    fs::write(&bad_path, "name = \"broken\"\nenable = [\n").expect("write invalid toml");

    let output = run_turn_server(&["test", bad_path.to_str().expect("utf8 path")], None);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(
        stderr.contains("配置文件解析失败"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_command_fails_for_validation_errors() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_validation_error_config(temp.path(), "validation-error.toml");
    let output = run_turn_server(&["test", config_path.to_str().expect("utf8 path")], None);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "command should fail");
    assert!(
        stderr.contains("relay_port_range"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn test_command_succeeds_with_warning_only_config() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_warning_only_config(temp.path(), "warning.toml");
    let output = run_turn_server(&["test", config_path.to_str().expect("utf8 path")], None);
    let all = combined_output(&output);

    assert!(
        output.status.success(),
        "warning-only config should succeed, output: {all}"
    );
    assert!(all.contains("Warning:"), "output: {all}");
}

#[test]
fn run_mode_fails_for_missing_custom_config_flag() {
    let temp = tempfile::tempdir().expect("temp dir");
    let missing_path = temp.path().join("missing-run.toml");
    let output = run_turn_server(
        &["--config", missing_path.to_str().expect("utf8 path")],
        None,
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "run mode should fail");
    assert!(
        stderr.contains("Config file not found"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn run_mode_fails_for_validation_errors() {
    let temp = tempfile::tempdir().expect("temp dir");
    let config_path = write_validation_error_config(temp.path(), "run-validation-error.toml");
    let output = run_turn_server(
        &["--config", config_path.to_str().expect("utf8 path")],
        None,
    );
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "run mode should fail");
    assert!(
        stderr.contains("配置验证失败"),
        "unexpected stderr: {stderr}"
    );
}
