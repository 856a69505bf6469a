use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use interfaces_open_notify_iss_now::index::ISS_NOW_URL;
use thiserror::Error;
use utils_trace::TraceFormat;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_DB_STATEMENT_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("LoadDotenv: {source}")]
    LoadDotenv {
        source: dotenvy::Error,
    },

    #[error("MissingVar: {name} is not set")]
    MissingVar {
        name: &'static str,
    },

    #[error("InvalidVar: {name}={value}: {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Everything an invocation needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub database: DatabaseConfig,
    pub upstream: UpstreamConfig,
    pub bind_addr: SocketAddr,
    pub log_format: TraceFormat,
}

#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub url: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub connect_timeout: Duration,
    pub statement_timeout: Duration,
}

#[derive(Clone)]
pub enum DatabaseTarget {
    /// Passed to libpq as given, plus `connect_timeout` when it names none.
    Url(String),
    Params {
        host: String,
        user: String,
        password: String,
        dbname: Option<String>,
        port: Option<u16>,
    },
}

impl TrackerConfig {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        accept_missing_dotenv(dotenvy::dotenv())?;
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let target = match var("DATABASE_URL") {
            Some(url) => DatabaseTarget::Url(url),
            None => DatabaseTarget::Params {
                host: var("PGHOST").ok_or(ConfigError::MissingVar { name: "PGHOST" })?,
                user: var("PGUSER").ok_or(ConfigError::MissingVar { name: "PGUSER" })?,
                password: var("PGPASSWORD").ok_or(ConfigError::MissingVar { name: "PGPASSWORD" })?,
                dbname: var("PGDATABASE"),
                port: parse_opt("PGPORT", var("PGPORT"))?,
            },
        };

        let connect_timeout = Duration::from_secs(
            parse_nonzero("ISS_DB_CONNECT_TIMEOUT_SECS", var("ISS_DB_CONNECT_TIMEOUT_SECS"))?
                .unwrap_or(DEFAULT_DB_CONNECT_TIMEOUT_SECS),
        );

        let statement_timeout = Duration::from_millis(
            parse_nonzero("ISS_DB_STATEMENT_TIMEOUT_MS", var("ISS_DB_STATEMENT_TIMEOUT_MS"))?
                .unwrap_or(DEFAULT_DB_STATEMENT_TIMEOUT_MS),
        );

        let upstream = UpstreamConfig {
            url: var("ISS_NOW_URL").unwrap_or_else(|| ISS_NOW_URL.to_string()),
            timeout: Duration::from_secs(
                parse_nonzero("ISS_HTTP_TIMEOUT_SECS", var("ISS_HTTP_TIMEOUT_SECS"))?
                    .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
            ),
        };

        let bind_addr = match parse_opt::<SocketAddr>("ISS_TRACKER_ADDR", var("ISS_TRACKER_ADDR"))? {
            Some(addr) => addr,
            None => SocketAddr::from(([0, 0, 0, 0], 8000)),
        };

        let log_format = parse_opt::<TraceFormat>("ISS_LOG_FORMAT", var("ISS_LOG_FORMAT"))?.unwrap_or_default();

        Ok(Self {
            database: DatabaseConfig { target, connect_timeout, statement_timeout },
            upstream,
            bind_addr,
            log_format,
        })
    }
}

fn parse_opt<T>(name: &'static str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: fmt::Display,
{
    value
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|err| ConfigError::InvalidVar {
                name,
                value: raw.clone(),
                reason: err.to_string(),
            })
        })
        .transpose()
}

fn accept_missing_dotenv<T>(loaded: Result<T, dotenvy::Error>) -> Result<(), ConfigError> {
    match loaded {
        Ok(_) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(source) => Err(ConfigError::LoadDotenv { source }),
    }
}

// Zero would disable (statement timeout) or break (HTTP timeout) the limit.
fn parse_nonzero(name: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    match parse_opt::<u64>(name, value)? {
        Some(0) => Err(ConfigError::InvalidVar {
            name,
            value: "0".to_string(),
            reason: "must be greater than zero".to_string(),
        }),
        parsed => Ok(parsed),
    }
}

impl DatabaseConfig {
    /// libpq connection string: the URL or keyword/value pairs, always carrying
    /// a `connect_timeout`.
    pub fn connection_string(&self) -> String {
        let timeout_secs = self.connect_timeout.as_secs().max(1);

        match &self.target {
            DatabaseTarget::Url(url) if url.contains("connect_timeout=") => url.clone(),
            DatabaseTarget::Url(url) if url.starts_with("postgres://") || url.starts_with("postgresql://") => {
                let separator = if url.contains('?') { '&' } else { '?' };
                format!("{url}{separator}connect_timeout={timeout_secs}")
            }
            DatabaseTarget::Url(conninfo) => format!("{conninfo} connect_timeout={timeout_secs}"),
            DatabaseTarget::Params { host, user, password, dbname, port } => {
                let mut pairs = vec![
                    format!("host={}", quote_libpq(host)),
                    format!("user={}", quote_libpq(user)),
                    format!("password={}", quote_libpq(password)),
                ];
                if let Some(dbname) = dbname {
                    pairs.push(format!("dbname={}", quote_libpq(dbname)));
                }
                if let Some(port) = port {
                    pairs.push(format!("port={port}"));
                }
                pairs.push(format!("connect_timeout={timeout_secs}"));
                pairs.join(" ")
            }
        }
    }
}

fn quote_libpq(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("target", &self.target)
            .field("connect_timeout", &self.connect_timeout)
            .field("statement_timeout", &self.statement_timeout)
            .finish()
    }
}

impl fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseTarget::Url(_) => f.debug_tuple("Url").field(&"<redacted>").finish(),
            DatabaseTarget::Params { host, user, dbname, port, .. } => f
                .debug_struct("Params")
                .field("host", host)
                .field("user", user)
                .field("password", &"<redacted>")
                .field("dbname", dbname)
                .field("port", port)
                .finish(),
        }
    }
}
