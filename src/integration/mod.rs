use std::env;
use std::str::FromStr;
use std::{fs::File, net::SocketAddr};

use axum::http::HeaderValue;
use dotenv::dotenv;
use log::LevelFilter;
use simplelog::{ColorChoice, CombinedLogger, TermLogger, TerminalMode, WriteLogger};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub mod db;

type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, PartialEq)]
pub enum Env {
    Local,
    Dev,
    Stage,
    Production,
}

impl FromStr for Env {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "local" => Ok(Env::Local),
            "dev" => Ok(Env::Dev),
            "stg" => Ok(Env::Stage),
            "prod" => Ok(Env::Production),
            _ => Err(Error::Config(format!("invalid environment: {s}"))),
        }
    }
}

impl Env {
    pub fn addr(&self) -> SocketAddr {
        match self {
            Env::Local => SocketAddr::from(([127, 0, 0, 1], 8000)),
            Env::Dev | Env::Stage | Env::Production => SocketAddr::from(([0, 0, 0, 0], 8000)),
        }
    }

    /// Local and dev accept any origin. Stage and production only accept the
    /// comma-separated `ALLOW_ORIGIN` list.
    pub fn cors(&self) -> Result<CorsLayer> {
        let origin = match self {
            Env::Local | Env::Dev => AllowOrigin::any(),
            Env::Stage | Env::Production => {
                let raw = env::var("ALLOW_ORIGIN")
                    .map_err(|_| Error::Config("ALLOW_ORIGIN must be set".into()))?;
                AllowOrigin::list(parse_origins(&raw)?)
            }
        };

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any))
    }
}

fn parse_origins(raw: &str) -> Result<Vec<HeaderValue>> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| {
            HeaderValue::from_str(o)
                .map_err(|_| Error::Config(format!("invalid ALLOW_ORIGIN value: {o}")))
        })
        .collect()
}

/// Where groups, memberships and messages live.
#[derive(Clone)]
pub enum Storage {
    Postgres(db::Config),
    Memory,
}

impl Storage {
    pub fn env() -> Result<Self> {
        match env::var("STORAGE").as_deref() {
            Ok("postgres") | Err(env::VarError::NotPresent) => {
                Ok(Self::Postgres(db::Config::env()?))
            }
            Ok("memory") => Ok(Self::Memory),
            Ok(other) => Err(Error::Config(format!("unsupported storage: {other}"))),
            Err(e) => Err(e.clone().into()),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub env: Env,
    pub storage: Storage,
}

impl Config {
    /// Loads `.env`, installs the logger and reads the environment.
    pub fn init() -> Result<Self> {
        dotenv().ok();

        let rust_log = env::var("RUST_LOG").unwrap_or("info".into());
        let level = LevelFilter::from_str(&rust_log).unwrap_or(LevelFilter::Info);
        let log_file = env::var("SERVICE_NAME")
            .map(|pkg| format!("{pkg}.log"))
            .unwrap_or("service.log".into());

        CombinedLogger::init(vec![
            TermLogger::new(
                level,
                simplelog::Config::default(),
                TerminalMode::Mixed,
                ColorChoice::Auto,
            ),
            WriteLogger::new(level, simplelog::Config::default(), File::create(log_file)?),
        ])?;

        let env = env::var("ENV")
            .map(|env| env.parse())
            .unwrap_or(Ok(Env::Local))?;

        Ok(Self {
            env,
            storage: Storage::env()?,
        })
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("failed to run migrations: {0}")]
    Migration(String),

    #[error(transparent)]
    _Env(#[from] env::VarError),
    #[error(transparent)]
    _Io(#[from] std::io::Error),
    #[error(transparent)]
    _Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
}
