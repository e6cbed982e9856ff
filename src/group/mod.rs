use std::{fmt::Display, sync::Arc};

use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use diesel::{
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    pg::{Pg, PgValue},
    serialize::{self, Output, ToSql},
    sql_types,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use repository::GroupRepository;
use service::GroupService;

use crate::state::AppState;

mod handler;
pub mod model;
pub mod repository;
pub mod service;

type Result<T> = std::result::Result<T, Error>;
pub type Repository = Arc<dyn GroupRepository + Send + Sync>;
pub type Service = Arc<dyn GroupService + Send + Sync>;

pub fn api<S>(s: AppState) -> Router<S> {
    Router::new()
        .route("/groups", post(handler::api::create).get(handler::api::find_all))
        .route("/groups/{id}", get(handler::api::find_one))
        .route("/groups/{id}/join", post(handler::api::join))
        .route("/groups/{id}/leave", post(handler::api::leave))
        .route("/my-groups", get(handler::api::find_joined))
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

    pub const fn get(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for Id {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
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

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("group not found: {0}")]
    NotFound(Id),
    #[error("Missing name")]
    MissingName,
    #[error("name must contain at least one letter or digit")]
    InvalidName,
    #[error("already a member of group {0}")]
    AlreadyMember(Id),
    #[error("not a member of group {0}")]
    NotMember(Id),
    #[error("owner cannot leave group {0}")]
    OwnerCannotLeave(Id),

    #[error(transparent)]
    _R2d2(#[from] r2d2::Error),
    #[error(transparent)]
    _Diesel(#[from] diesel::result::Error),
}

impl From<&Error> for StatusCode {
    fn from(e: &Error) -> Self {
        match e {
            Error::NotFound(_) => Self::NOT_FOUND,
            Error::MissingName
            | Error::InvalidName
            | Error::AlreadyMember(_)
            | Error::OwnerCannotLeave(_) => Self::BAD_REQUEST,
            Error::NotMember(_) => Self::FORBIDDEN,
            Error::_R2d2(_) | Error::_Diesel(_) => Self::INTERNAL_SERVER_ERROR,
        }
    }
}
