use crate::auth;
use debileweb_common::errors::*;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8150";
const DEFAULT_POST_BODY_SIZE_LIMIT: usize = 33_554_432;

#[derive(Debug, Clone)]
pub struct Config {
    pub auth_cookie: String,
    pub bind_addr: String,
    pub real_ip_header: Option<String>,
    pub post_body_size_limit: usize,
    /// Root of the farm's per-job output tree (logs, firehose reports).
    pub jobs_path: PathBuf,
}

pub fn load(path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = path {
        let buf = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&buf)?
    } else {
        ConfigFile::default()
    };

    let auth_cookie = auth::setup_auth_cookie().context("Failed to setup auth cookie")?;

    Ok(from_struct(config, auth_cookie))
}

pub fn from_struct(config: ConfigFile, auth_cookie: String) -> Config {
    let bind_addr = if let Ok(addr) = env::var("HTTP_ADDR") {
        addr
    } else if let Some(addr) = config.http.bind_addr {
        addr
    } else {
        DEFAULT_BIND_ADDR.to_string()
    };

    Config {
        auth_cookie,
        bind_addr,
        real_ip_header: config.http.real_ip_header,
        post_body_size_limit: config
            .http
            .post_body_size_limit
            .unwrap_or(DEFAULT_POST_BODY_SIZE_LIMIT),
        jobs_path: config
            .paths
            .jobs_path
            .unwrap_or_else(|| PathBuf::from("./jobs")),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Default, Deserialize)]
pub struct HttpConfig {
    pub bind_addr: Option<String>,
    pub real_ip_header: Option<String>,
    pub post_body_size_limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PathsConfig {
    pub jobs_path: Option<PathBuf>,
}
