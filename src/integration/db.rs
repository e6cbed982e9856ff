use std::env::{self, VarError};
use std::str::FromStr;
use std::time::Duration;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use log::info;

use crate::integration::{self, Result};

pub type Pool = r2d2::Pool<ConnectionManager<PgConnection>>;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

#[derive(Clone)]
pub struct Config {
    host: String,
    port: u16,
    user: String,
    password: String,
    db: String,
    pool_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 5432,
            user: String::from("postgres"),
            password: String::from("postgres"),
            db: String::from("groups"),
            pool_size: 10,
        }
    }
}

impl Config {
    pub fn env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key))
    }

    /// Absent variables take their default, malformed ones are an error.
    fn from_lookup(lookup: impl Fn(&str) -> std::result::Result<String, VarError>) -> Result<Self> {
        let d = Self::default();
        Ok(Self {
            host: var_or(&lookup, "POSTGRES_HOST", d.host)?,
            port: var_or(&lookup, "POSTGRES_PORT", d.port)?,
            user: var_or(&lookup, "POSTGRES_USER", d.user)?,
            password: var_or(&lookup, "POSTGRES_PASSWORD", d.password)?,
            db: var_or(&lookup, "POSTGRES_DB", d.db)?,
            pool_size: var_or(&lookup, "POSTGRES_POOL_SIZE", d.pool_size)?,
        })
    }

    fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.db
        )
    }

    /// Builds the pool and brings the schema up to date.
    pub fn connect(&self) -> Result<Pool> {
        let manager = ConnectionManager::<PgConnection>::new(self.url());
        let pool = r2d2::Pool::builder()
            .max_size(self.pool_size)
            .connection_timeout(Duration::from_secs(5))
            .build(manager)?;

        let mut conn = pool.get()?;
        let conn: &mut PgConnection = &mut conn;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|e| integration::Error::Migration(e.to_string()))?;
        info!(
            "Connected to postgres at {}:{}/{}, {} migration(s) applied",
            self.host,
            self.port,
            self.db,
            applied.len()
        );

        Ok(pool)
    }
}

fn var_or<T: FromStr>(
    lookup: impl Fn(&str) -> std::result::Result<String, VarError>,
    key: &str,
    default: T,
) -> Result<T> {
    match lookup(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| integration::Error::Config(format!("invalid {key}: {raw:?}"))),
        Err(VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
impl Config {
    pub async fn test(
        node: &testcontainers_modules::testcontainers::ContainerAsync<
            testcontainers_modules::postgres::Postgres,
        >,
    ) -> Self {
        Self {
            host: node.get_host().await.unwrap().to_string(),
            port: node.get_host_port_ipv4(5432).await.unwrap(),
            db: String::from("postgres"),
            pool_size: 2,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> std::result::Result<String, VarError> {
        let vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>();
        move |key| vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[test]
    fn should_default_absent_variables() {
        let config = Config::from_lookup(lookup(&[("POSTGRES_HOST", "db"), ("POSTGRES_PORT", "6432")]))
            .unwrap();

        assert_eq!(config.host, "db");
        assert_eq!(config.port, 6432);
        assert_eq!(config.user, "postgres");
        assert_eq!(config.pool_size, 10);
    }

    #[test]
    fn should_reject_malformed_variables() {
        let res = Config::from_lookup(lookup(&[("POSTGRES_PORT", "abc")]));
        assert!(matches!(res, Err(integration::Error::Config(msg)) if msg.contains("POSTGRES_PORT")));

        let res = Config::from_lookup(lookup(&[("POSTGRES_POOL_SIZE", "-1")]));
        assert!(matches!(res, Err(integration::Error::Config(_))));
    }
}
