use config::{Config, Environment, File};
use serde::{self, Deserialize};
use std::{ops::Deref, sync::Arc, time::Duration};
use sysinfo::System;
use usedmart_error::UMResult;

use crate::constants::{DATA_DIR, ENV_PREFIX};

#[derive(Debug, Clone, Default)]
pub struct Settings(Arc<Inner>);

impl Deref for Settings {
    type Target = Inner;
    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl Settings {
    /// Layer the optional TOML file under `UM_*` environment overrides.
    pub fn new(config_path: String) -> UMResult<Self> {
        let builder = Config::builder()
            .add_source(File::with_name(config_path.as_str()).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("web.cors.whitelist.origins")
                    .with_list_parse_key("web.cors.whitelist.methods")
                    .with_list_parse_key("web.cors.whitelist.headers"),
            );
        let inner: Inner = builder.build()?.try_deserialize()?;
        Ok(Self(Arc::new(inner)))
    }

    pub fn from_inner(inner: Inner) -> Self {
        Self(Arc::new(inner))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Inner {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub web: Web,
    #[serde(default)]
    pub db: Db,
    #[serde(default)]
    pub cache: Cache,
}

#[derive(Debug, Clone, Deserialize)]
pub struct General {
    /// Directory all relative paths (`./data`, `./logs`) resolve from.
    /// The process changes into it at startup.
    #[serde(default = "General::runtime_dir_default")]
    pub runtime_dir: String,
    /// Initial level for both log layers; `trace`, `debug`, `info`, `warn` or `error`.
    #[serde(default = "General::log_level_default")]
    pub log_level: String,
}

impl Default for General {
    fn default() -> Self {
        General {
            runtime_dir: General::runtime_dir_default(),
            log_level: General::log_level_default(),
        }
    }
}

impl General {
    fn runtime_dir_default() -> String {
        ".".into()
    }

    fn log_level_default() -> String {
        "info".into()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Web {
    #[serde(default = "Web::router_prefix_default")]
    pub router_prefix: String,
    #[serde(default = "Web::host_default")]
    pub host: String,
    #[serde(default = "Web::port_default")]
    pub port: u16,
    #[serde(default = "Web::workers_default")]
    pub workers: i32,
    #[serde(default)]
    pub cors: Cors,
    #[serde(default)]
    pub jwt: Jwt,
    #[serde(default)]
    pub visitor_cookie: VisitorCookie,
}

impl Default for Web {
    fn default() -> Self {
        Web {
            router_prefix: Web::router_prefix_default(),
            host: Web::host_default(),
            port: Web::port_default(),
            workers: Web::workers_default(),
            cors: Default::default(),
            jwt: Default::default(),
            visitor_cookie: Default::default(),
        }
    }
}

impl Web {
    fn router_prefix_default() -> String {
        "/api".into()
    }

    fn port_default() -> u16 {
        8080
    }

    fn host_default() -> String {
        "0.0.0.0".into()
    }

    fn workers_default() -> i32 {
        0
    }

    /// `0` means one worker per CPU, a negative `n` means `cpus / |n|`.
    pub fn get_worker_count(&self) -> usize {
        match self.workers {
            0 => System::new_all().cpus().len().max(1),
            n if n > 0 => n as usize,
            n => std::cmp::max(
                1,
                (System::new_all().cpus().len() as i32 / n.abs()) as usize,
            ),
        }
    }
}

#[derive(Default, Debug, Clone, Deserialize)]
pub struct Cors {
    #[serde(default)]
    pub mode: CorsMode,
    #[serde(default)]
    pub whitelist: Whitelist,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorsMode {
    #[default]
    AllowAll,
    Whitelist,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Whitelist {
    #[serde(default = "Whitelist::origins_default")]
    pub origins: Vec<String>,
    #[serde(default = "Whitelist::methods_default")]
    pub methods: Vec<String>,
    #[serde(default = "Whitelist::headers_default")]
    pub headers: Vec<String>,
    #[serde(default = "Whitelist::credentials_default")]
    pub credentials: bool,
}

impl Default for Whitelist {
    fn default() -> Self {
        Whitelist {
            origins: Whitelist::origins_default(),
            methods: Whitelist::methods_default(),
            headers: Whitelist::headers_default(),
            credentials: Whitelist::credentials_default(),
        }
    }
}

impl Whitelist {
    fn origins_default() -> Vec<String> {
        vec!["http://localhost:3000".into()]
    }

    fn methods_default() -> Vec<String> {
        vec!["GET".into(), "POST".into(), "PUT".into(), "DELETE".into()]
    }

    fn headers_default() -> Vec<String> {
        vec![
            "Content-Type".into(),
            "Authorization".into(),
            "X-API-Version".into(),
        ]
    }

    fn credentials_default() -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Jwt {
    #[serde(default = "Jwt::secret_default")]
    pub secret: String,
    /// Token lifetime in seconds.
    #[serde(default = "Jwt::expire_default")]
    pub expire: i64,
    #[serde(default = "Jwt::issuer_default")]
    pub issuer: String,
}

impl Default for Jwt {
    fn default() -> Self {
        Jwt {
            secret: Jwt::secret_default(),
            expire: Jwt::expire_default(),
            issuer: Jwt::issuer_default(),
        }
    }
}

impl Jwt {
    fn secret_default() -> String {
        "usedmart".into()
    }

    fn expire_default() -> i64 {
        86_400
    }

    fn issuer_default() -> String {
        "usedmart".into()
    }
}

/// Cookie identifying a browser for view-count deduplication.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitorCookie {
    #[serde(default = "VisitorCookie::name_default")]
    pub name: String,
    #[serde(default = "VisitorCookie::max_age_days_default")]
    pub max_age_days: i64,
}

impl Default for VisitorCookie {
    fn default() -> Self {
        VisitorCookie {
            name: VisitorCookie::name_default(),
            max_age_days: VisitorCookie::max_age_days_default(),
        }
    }
}

impl VisitorCookie {
    fn name_default() -> String {
        "um_visitor".into()
    }

    fn max_age_days_default() -> i64 {
        365
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Db {
    #[serde(default)]
    pub sqlite: Sqlite,
}

pub trait UMDbConfig: Send + Sync {
    fn db_path(&self) -> String;

    fn to_url(&self) -> String;

    fn db_dir(&self) -> String;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Sqlite {
    /// File name under the data directory, or `:memory:`.
    #[serde(default = "Sqlite::path_default")]
    pub path: String,
    #[serde(default = "Sqlite::timeout_default")]
    pub timeout: u64,
    #[serde(default = "Sqlite::idle_timeout_default")]
    pub idle_timeout: u64,
    #[serde(default = "Sqlite::max_lifetime_default")]
    pub max_lifetime: u64,
    #[serde(default = "Sqlite::max_connections_default")]
    pub max_connections: u32,
    #[serde(default = "Sqlite::auto_create_default")]
    pub auto_create: bool,
}

impl Default for Sqlite {
    fn default() -> Self {
        Sqlite {
            path: Sqlite::path_default(),
            timeout: Sqlite::timeout_default(),
            idle_timeout: Sqlite::idle_timeout_default(),
            max_lifetime: Sqlite::max_lifetime_default(),
            max_connections: Sqlite::max_connections_default(),
            auto_create: Sqlite::auto_create_default(),
        }
    }
}

impl UMDbConfig for Sqlite {
    fn db_path(&self) -> String {
        self.path.clone()
    }

    fn to_url(&self) -> String {
        if self.is_memory() {
            return "sqlite::memory:".into();
        }
        if self.auto_create {
            format!("sqlite:{}/{}?mode=rwc", DATA_DIR, self.path)
        } else {
            format!("sqlite:{}/{}", DATA_DIR, self.path)
        }
    }

    fn db_dir(&self) -> String {
        DATA_DIR.into()
    }
}

impl Sqlite {
    #[inline]
    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }

    fn path_default() -> String {
        "usedmart.db".into()
    }

    fn timeout_default() -> u64 {
        5000
    }

    fn idle_timeout_default() -> u64 {
        5000
    }

    fn max_lifetime_default() -> u64 {
        5000
    }

    fn max_connections_default() -> u32 {
        32
    }

    fn auto_create_default() -> bool {
        true
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Cache {
    #[serde(default)]
    pub r#type: CacheType,
    #[serde(default = "Cache::prefix_default")]
    pub prefix: String,
    #[serde(default = "Cache::delimiter_default")]
    pub delimiter: String,
    /// Seconds a role/permission snapshot stays cached per profile.
    #[serde(default = "Cache::grant_ttl_default")]
    pub grant_ttl: u64,
    /// Seconds a per-browser view marker lives.
    #[serde(default = "Cache::view_marker_ttl_default")]
    pub view_marker_ttl: u64,
    #[serde(default = "Cache::view_marker_capacity_default")]
    pub view_marker_capacity: u64,
}

impl Default for Cache {
    fn default() -> Self {
        Cache {
            r#type: Default::default(),
            prefix: Cache::prefix_default(),
            delimiter: Cache::delimiter_default(),
            grant_ttl: Cache::grant_ttl_default(),
            view_marker_ttl: Cache::view_marker_ttl_default(),
            view_marker_capacity: Cache::view_marker_capacity_default(),
        }
    }
}

impl Cache {
    fn prefix_default() -> String {
        "um".into()
    }

    fn delimiter_default() -> String {
        ":".into()
    }

    fn grant_ttl_default() -> u64 {
        600
    }

    fn view_marker_ttl_default() -> u64 {
        365 * 24 * 3600
    }

    fn view_marker_capacity_default() -> u64 {
        1_000_000
    }

    #[inline]
    pub fn grant_ttl(&self) -> Duration {
        Duration::from_secs(self.grant_ttl)
    }

    #[inline]
    pub fn view_marker_ttl(&self) -> Duration {
        Duration::from_secs(self.view_marker_ttl)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    #[default]
    Moka,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_yields_defaults() {
        let settings = Settings::new("/nonexistent/usedmart.toml".into()).unwrap();
        assert_eq!(settings.web.router_prefix, "/api");
        assert_eq!(settings.web.visitor_cookie.name, "um_visitor");
        assert_eq!(
            settings.db.sqlite.to_url(),
            "sqlite:./data/usedmart.db?mode=rwc"
        );
    }

    #[test]
    fn test_memory_url() {
        let sqlite = Sqlite {
            path: ":memory:".into(),
            ..Default::default()
        };
        assert_eq!(sqlite.to_url(), "sqlite::memory:");
    }

    #[test]
    fn test_negative_workers_divides_cpus() {
        let web = Web {
            workers: -1024,
            ..Default::default()
        };
        assert_eq!(web.get_worker_count(), 1);
    }
}
