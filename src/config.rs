//! Command-line and environment configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::router::DEFAULT_MAX_BODY;

/// A tiny file drop service: multipart upload, download by name, liveness ping.
#[derive(Parser, Debug, Clone)]
#[command(name = "depot")]
#[command(version)]
pub struct Config {
    /// Interface to listen on.
    #[arg(long, env = "DEPOT_HOST", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Port to listen on.
    #[arg(short, long, env = "DEPOT_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Directory uploaded files are stored in and served from.
    #[arg(long, env = "DEPOT_STORAGE_DIR", default_value = "files")]
    pub storage_dir: PathBuf,

    /// Largest request body held in memory, in bytes.
    #[arg(long, env = "DEPOT_MAX_BODY_BYTES", default_value_t = DEFAULT_MAX_BODY)]
    pub max_body_bytes: usize,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short, long, env = "DEPOT_VERBOSE")]
    pub verbose: bool,
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Default `RUST_LOG` directive when the variable is unset.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = Config::try_parse_from(["depot"]).unwrap();
        assert_eq!(cfg.socket_addr(), "0.0.0.0:8080".parse().unwrap());
        assert_eq!(cfg.storage_dir, PathBuf::from("files"));
        assert_eq!(cfg.max_body_bytes, 8 * 1024 * 1024);
        assert_eq!(cfg.default_log_filter(), "info");
    }

    #[test]
    fn flags_override_defaults() {
        let cfg = Config::try_parse_from([
            "depot", "--host", "127.0.0.1", "-p", "9000",
            "--storage-dir", "/srv/drop", "--max-body-bytes", "1024", "-v",
        ])
        .unwrap();
        assert_eq!(cfg.socket_addr(), "127.0.0.1:9000".parse().unwrap());
        assert_eq!(cfg.storage_dir, PathBuf::from("/srv/drop"));
        assert_eq!(cfg.max_body_bytes, 1024);
        assert_eq!(cfg.default_log_filter(), "debug");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["depot", "--port", "70000"]).is_err());
    }
}
