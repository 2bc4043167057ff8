//! Config load validation tests for passport-relay-config.
// crates/passport-relay-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Validate config loading guards (path, size, encoding).
// Purpose: Ensure config input handling is strict and fail-closed.
// =============================================================================

use std::io::Write;
use std::path::Path;

use passport_relay_config::ConfigError;
use passport_relay_config::ExchangeConfig;
use tempfile::NamedTempFile;

type TestResult = Result<(), String>;

fn assert_invalid(result: Result<ExchangeConfig, ConfigError>, needle: &str) -> TestResult {
    match result {
        Err(error) => {
            let message = error.to_string();
            if message.contains(needle) {
                Ok(())
            } else {
                Err(format!("error {message} did not contain {needle}"))
            }
        }
        Ok(_) => Err("expected invalid config load".to_string()),
    }
}

#[test]
fn load_rejects_path_too_long() -> TestResult {
    let long_path = "a".repeat(5_000);
    let path = Path::new(&long_path);
    assert_invalid(ExchangeConfig::load(Some(path)), "config path exceeds max length")?;
    Ok(())
}

#[test]
fn load_rejects_path_component_too_long() -> TestResult {
    let long_component = "a".repeat(300);
    let path = Path::new(&long_component);
    assert_invalid(ExchangeConfig::load(Some(path)), "config path component too long")?;
    Ok(())
}

#[test]
fn load_rejects_oversized_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let payload = vec![b'a'; 1_048_577];
    file.write_all(&payload).map_err(|err| err.to_string())?;
    assert_invalid(ExchangeConfig::load(Some(file.path())), "config file exceeds size limit")?;
    Ok(())
}

#[test]
fn load_rejects_non_utf8_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    file.write_all(&[0xFF, 0xFE, 0xFF]).map_err(|err| err.to_string())?;
    assert_invalid(ExchangeConfig::load(Some(file.path())), "config file must be utf-8")?;
    Ok(())
}

#[test]
fn load_reads_valid_file() -> TestResult {
    let mut file = NamedTempFile::new().map_err(|err| err.to_string())?;
    let body = r#"{
        "pri_stir_shaken_enable": true,
        "pri_stir_shaken_profile_name": "carrier-a",
        "oob_proxy_url": "https://broker.example.com/oob/"
    }"#;
    file.write_all(body.as_bytes()).map_err(|err| err.to_string())?;
    let config = ExchangeConfig::load(Some(file.path())).map_err(|err| err.to_string())?;
    if !config.is_enabled() {
        return Err("expected enabled config".to_string());
    }
    if config.profile_name() != "carrier-a" {
        return Err("unexpected profile name".to_string());
    }
    let url = config.broker_url().ok_or("expected broker url")?;
    if url.as_str().ends_with('/') {
        return Err("trailing slash should be trimmed".to_string());
    }
    Ok(())
}
