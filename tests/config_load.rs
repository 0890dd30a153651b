//! # Configuration Loading Tests
//!
//! `ClientConfig::load` reads the process environment, so each scenario
//! re-runs this test binary as a child process with a controlled
//! environment and inspects what the child loaded.

#![allow(clippy::unwrap_used)]

use std::io::Write;
use std::process::{Command, Output};
use web3_client::config::{CONFIG_FILE_ENV_VAR, ClientConfig};

const CHILD_ENV_VAR: &str = "WEB3_CLIENT_LOAD_TEST_CHILD";

/// Entry point for the child process; a no-op in the parent run.
#[test]
fn load_in_child() {
    if std::env::var_os(CHILD_ENV_VAR).is_none() {
        return;
    }
    match ClientConfig::load() {
        Ok(config) => {
            println!("rpc_url={}", config.rpc_url);
            println!("timeout_ms={}", config.gas_oracle.timeout_ms);
            println!("oracle_url={}", config.gas_oracle.url);
            println!("log_level={}", config.log.level);
            println!("log_format={:?}", config.log.format);
        }
        Err(e) => println!("error={e}"),
    }
}

fn run_child(vars: &[(&str, &str)]) -> String {
    let mut command = Command::new(std::env::current_exe().unwrap());
    command
        .args(["load_in_child", "--exact", "--nocapture", "--test-threads=1"])
        .env(CHILD_ENV_VAR, "1");
    for (key, _) in std::env::vars() {
        if key.starts_with("WEB3_") && key != CHILD_ENV_VAR {
            command.env_remove(key);
        }
    }
    for (key, value) in vars {
        command.env(key, value);
    }
    let output: Output = command.output().unwrap();
    assert!(output.status.success());
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let stdout = run_child(&[(CONFIG_FILE_ENV_VAR, path.to_str().unwrap())]);

    assert!(stdout.contains("rpc_url=http://localhost:8545\n"));
    assert!(stdout.contains("timeout_ms=5000\n"));
    assert!(stdout.contains("log_level=info\n"));
    assert!(stdout.contains("log_format=Json\n"));
}

#[test]
fn file_named_by_env_var_is_read() {
    let file = config_file(
        r#"
        rpc_url = "https://kovan.example.org"

        [gas_oracle]
        timeout_ms = 750

        [log]
        format = "pretty"
        "#,
    );

    let stdout = run_child(&[(CONFIG_FILE_ENV_VAR, file.path().to_str().unwrap())]);

    assert!(stdout.contains("rpc_url=https://kovan.example.org\n"));
    assert!(stdout.contains("timeout_ms=750\n"));
    assert!(stdout.contains("log_format=Pretty\n"));
    assert!(stdout.contains("log_level=info\n"));
}

#[test]
fn environment_overrides_file_with_nested_keys() {
    let file = config_file(
        r#"
        rpc_url = "https://kovan.example.org"

        [gas_oracle]
        timeout_ms = 750
        "#,
    );

    let stdout = run_child(&[
        (CONFIG_FILE_ENV_VAR, file.path().to_str().unwrap()),
        ("WEB3_GAS_ORACLE__TIMEOUT_MS", "1234"),
        ("WEB3_GAS_ORACLE__URL", "https://oracle.example.org/gas"),
        ("WEB3_LOG__LEVEL", "debug"),
    ]);

    assert!(stdout.contains("rpc_url=https://kovan.example.org\n"));
    assert!(stdout.contains("timeout_ms=1234\n"));
    assert!(stdout.contains("oracle_url=https://oracle.example.org/gas\n"));
    assert!(stdout.contains("log_level=debug\n"));
}

#[test]
fn invalid_environment_value_fails_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let stdout = run_child(&[
        (CONFIG_FILE_ENV_VAR, path.to_str().unwrap()),
        ("WEB3_RPC_URL", "ws://localhost:8546"),
    ]);

    assert!(stdout.contains("error=invalid config value for rpc_url"));
}
