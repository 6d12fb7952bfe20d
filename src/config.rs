use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Stipendia";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default bind address for the HTTP API.
pub const DEFAULT_ADDR: &str = "127.0.0.1:8470";

/// Get the application data directory.
/// `~/Stipendia/` unless overridden via `STIPENDIA_DATA_DIR`.
pub fn app_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("STIPENDIA_DATA_DIR") {
        return PathBuf::from(dir);
    }
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Stipendia")
}

/// Path of the SQLite database file.
pub fn database_path() -> PathBuf {
    app_data_dir().join("stipendia.db")
}

/// Address the API server binds to (`STIPENDIA_ADDR` override).
pub fn bind_addr() -> SocketAddr {
    std::env::var("STIPENDIA_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| DEFAULT_ADDR.parse().expect("default addr parses"))
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,stipendia=debug".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_path_under_data_dir() {
        let db = database_path();
        assert!(db.starts_with(app_data_dir()));
        assert!(db.ends_with("stipendia.db"));
    }

    #[test]
    fn default_addr_parses() {
        let addr: SocketAddr = DEFAULT_ADDR.parse().unwrap();
        assert_eq!(addr.port(), 8470);
    }

    #[test]
    fn app_version_matches_cargo() {
        assert_eq!(APP_VERSION, env!("CARGO_PKG_VERSION"));
    }
}
