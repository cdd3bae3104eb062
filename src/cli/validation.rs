//! Value parsers for CLI arguments that clap cannot check on its own.

use std::fs;
use std::path::PathBuf;

const MAX_ROLLBACK_STEPS: u32 = 100;
const MAX_HOST_LEN: usize = 253;

/// Port number in 1..=65535.
pub fn validate_port(port_str: &str) -> Result<u16, String> {
    let port: u16 = port_str.parse().map_err(|_| {
        format!("Port must be a valid number between 1 and 65535, got: '{port_str}'")
    })?;
    if port == 0 {
        return Err("Port must be between 1 and 65535. Port 0 is not allowed.".to_string());
    }
    Ok(port)
}

pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    readable_file(path_str, "Configuration file")
}

pub fn validate_data_file_path(path_str: &str) -> Result<PathBuf, String> {
    readable_file(path_str, "Seed data file")
}

fn readable_file(path_str: &str, what: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);
    if !path.exists() {
        return Err(format!("{what} does not exist: '{path_str}'"));
    }
    if !path.is_file() {
        return Err(format!("{what} path is not a file: '{path_str}'"));
    }
    fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("Cannot read {} '{}': {}", what.to_lowercase(), path_str, e))
}

pub fn validate_rollback_steps(steps_str: &str) -> Result<u32, String> {
    let steps: u32 = steps_str.parse().map_err(|_| {
        format!("Rollback steps must be a valid positive number, got: '{steps_str}'")
    })?;
    if steps == 0 {
        return Err("Rollback steps must be greater than 0".to_string());
    }
    if steps > MAX_ROLLBACK_STEPS {
        return Err(format!(
            "Rollback steps cannot exceed {MAX_ROLLBACK_STEPS} for safety reasons"
        ));
    }
    Ok(steps)
}

/// Basic host check: non-empty, no spaces, well-formed when it looks like IPv4.
pub fn validate_host_address(host_str: &str) -> Result<String, String> {
    let host = host_str.trim();
    if host.is_empty() {
        return Err("Host address cannot be empty".to_string());
    }
    if host.contains(char::is_whitespace) {
        return Err("Host address cannot contain spaces".to_string());
    }
    if host.len() > MAX_HOST_LEN {
        return Err(format!(
            "Host address is too long (maximum {MAX_HOST_LEN} characters)"
        ));
    }
    if host.chars().all(|c| c.is_ascii_digit() || c == '.') {
        let parts: Vec<&str> = host.split('.').collect();
        if parts.len() != 4 || parts.iter().any(|p| p.parse::<u8>().is_err()) {
            return Err(format!("Invalid IPv4 address format: '{host_str}'"));
        }
    }
    Ok(host.to_string())
}
