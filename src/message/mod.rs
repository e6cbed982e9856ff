use std::{fmt::Display, sync::Arc};

use axum::{Router, http::StatusCode, routing::post};
use diesel::{
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    pg::{Pg, PgValue},
    serialize::{self, Output, ToSql},
    sql_types,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use repository::MessageRepository;
use service::MessageService;

use crate::{group, state::AppState};

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn MessageRepository + Send + Sync>;
pub type Service = Arc<dyn MessageService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route(
            "/groups/{id}/messages",
            post(handler::api::create).get(handler::api::find_all),
        )
        .with_state(s)
}

#[derive(
    Clone, Copy, Debug, Deserialize, Serialize, Hash, PartialEq, Eq, PartialOrd, Ord, FromSqlRow,
    AsExpression,
)]
#[serde(transparent)]
#[diesel(sql_type = sql_types::Uuid)]
pub struct Id(Uuid);

impl Id {
    pub fn random() -> Self {
        Self(Uuid::now_v7())
    }
}

impl Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql<sql_types::Uuid, Pg> for Id {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        <Uuid as ToSql<sql_types::Uuid, Pg>>::to_sql(&self.0, out)
    }
}

impl FromSql<sql_types::Uuid, Pg> for Id {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        <Uuid as FromSql<sql_types::Uuid, Pg>>::from_sql(bytes).map(Self)
    }
}

/// Upper bound on the number of messages returned by one listing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limit(usize);

impl Limit {
    pub const DEFAULT: Self = Self(50);
    pub const MAX: Self = Self(200);

    /// Parses a caller-supplied limit: absent means the default, values above
    /// the maximum are clamped, anything that is not a positive integer fails.
    pub fn parse(raw: Option<&str>) -> Result<Self> {
        let Some(raw) = raw else {
            return Ok(Self::DEFAULT);
        };

        match raw.trim().parse::<usize>() {
            Ok(0) | Err(_) => Err(Error::InvalidLimit(raw.to_owned())),
            Ok(n) => Ok(Self(n.min(Self::MAX.0))),
        }
    }

    pub const fn get(&self) -> usize {
        self.0
    }
}

impl Default for Limit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Missing content")]
    EmptyContent,
    #[error("limit must be a positive integer, got {0:?}")]
    InvalidLimit(String),

    #[error(transparent)]
    _Group(#[from] group::Error),
    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
    #[error(transparent)]
    _Diesel(#[from] diesel::result::Error),
}

impl From<&Error> for StatusCode {
    fn from(e: &Error) -> Self {
        match e {
            Error::EmptyContent | Error::InvalidLimit(_) => Self::BAD_REQUEST,
            Error::_Group(e) => e.into(),
            Error::_R2d2(_) | Error::_Diesel(_) => Self::INTERNAL_SERVER_ERROR,
        }
    }
}
