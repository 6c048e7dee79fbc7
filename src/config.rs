// src/config.rs

use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    path::PathBuf,
    time::Duration,
};

use dotenvy::dotenv;

pub const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 3000);
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `users.json`, `answers.json` and `results.json`.
    pub data_dir: PathBuf,
    /// Directory holding one `<CODE>.json` package per test.
    pub question_packages_dir: PathBuf,
    /// Static files (question images) served as the router fallback.
    pub static_dir: PathBuf,
    pub bind_addr: SocketAddr,
    pub rust_log: String,
    pub log_dir: PathBuf,
    pub request_timeout: Duration,
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let data_dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let question_packages_dir =
            env::var("QUESTION_PACKAGES_DIR").unwrap_or_else(|_| "question_packages".to_string());

        let static_dir = env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string());

        let bind_addr = env::var("BIND_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_BIND_ADDR);

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let log_dir = env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string());

        let request_timeout_secs = env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string());

        Self {
            data_dir: data_dir.into(),
            question_packages_dir: question_packages_dir.into(),
            static_dir: static_dir.into(),
            bind_addr,
            rust_log,
            log_dir: log_dir.into(),
            request_timeout: Duration::from_secs(request_timeout_secs),
            allowed_origins: split_origins(&allowed_origins),
        }
    }

    /// Configuration rooted at `root`, for tests and embedding.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            data_dir: root.join("data"),
            question_packages_dir: root.join("question_packages"),
            static_dir: root.join("public"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            rust_log: "error".to_string(),
            log_dir: root.join("logs"),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
        }
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
