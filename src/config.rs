use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Labsight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,labsight=debug".to_string()
}

/// Percentage beyond a reference bound at which a value becomes
/// critical_low / critical_high.
pub const CRITICAL_THRESHOLD_PERCENT: f64 = 20.0;

/// Hard ceiling on one analysis-model call.
pub const MODEL_TIMEOUT_SECS: u64 = 30;

/// Largest accepted upload, in bytes.
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// Get the application data directory
/// ~/Labsight/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Labsight")
}

/// Default database path, overridable via LABSIGHT_DB.
pub fn database_path() -> PathBuf {
    std::env::var("LABSIGHT_DB")
        .map(PathBuf::from)
        .unwrap_or_else(|_| app_data_dir().join("labsight.db"))
}

/// Server bind address, overridable via LABSIGHT_ADDR.
pub fn bind_addr() -> SocketAddr {
    std::env::var("LABSIGHT_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8710)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_data_dir_under_home() {
        let dir = app_data_dir();
        let home = dirs::home_dir().unwrap();
        assert!(dir.starts_with(home));
        assert!(dir.ends_with("Labsight"));
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, "0.3.0");
    }

    #[test]
    fn default_bind_addr_is_loopback() {
        assert!(bind_addr().ip().is_loopback());
    }
}
