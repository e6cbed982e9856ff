//! Caller identity.
//!
//! The identity is asserted by the caller and is never verified here: the
//! service expects to sit behind a component that has already authenticated
//! the request. Resolution order is the `x-user-id` header, then the
//! `user_id` body field, then the `user_id` query parameter.

use std::fmt::Display;

use axum::http::HeaderMap;
use diesel::{
    deserialize::{self, FromSql, FromSqlRow},
    expression::AsExpression,
    pg::{Pg, PgValue},
    serialize::{self, Output, ToSql},
    sql_types::Text,
};
use serde::{Deserialize, Serialize};

pub const HEADER: &str = "x-user-id";

type Result<T> = std::result::Result<T, Error>;

#[derive(
    Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, AsExpression, FromSqlRow,
)]
#[serde(transparent)]
#[diesel(sql_type = Text)]
pub struct UserId(String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl ToSql<Text, Pg> for UserId {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        <str as ToSql<Text, Pg>>::to_sql(self.0.as_str(), out)
    }
}

impl FromSql<Text, Pg> for UserId {
    fn from_sql(bytes: PgValue<'_>) -> deserialize::Result<Self> {
        <String as FromSql<Text, Pg>>::from_sql(bytes).map(Self)
    }
}

/// Places a request can carry an identity in.
#[derive(Default, Debug)]
pub struct Context<'a> {
    header: Option<&'a str>,
    body: Option<&'a str>,
    query: Option<&'a str>,
}

impl<'a> Context<'a> {
    pub fn new(headers: &'a HeaderMap) -> Self {
        Self {
            header: headers.get(HEADER).and_then(|v| v.to_str().ok()),
            ..Default::default()
        }
    }

    pub fn with_body(mut self, user_id: Option<&'a str>) -> Self {
        self.body = user_id;
        self
    }

    pub fn with_query(mut self, user_id: Option<&'a str>) -> Self {
        self.query = user_id;
        self
    }

    /// First non-blank candidate in priority order.
    pub fn resolve(&self) -> Option<UserId> {
        [self.header, self.body, self.query]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|v| !v.is_empty())
            .map(UserId::from)
    }

    pub fn require(&self) -> Result<UserId> {
        self.resolve().ok_or(Error::Missing)
    }
}

/// Optional `user_id` carried in a JSON body or a query string.
#[derive(Deserialize, Default, Debug)]
pub struct Params {
    pub user_id: Option<String>,
}

impl Params {
    /// Bodies are optional where this is used; an empty or non-JSON body
    /// carries no identity.
    pub fn from_body(body: &[u8]) -> Self {
        crate::extract::json(body).unwrap_or_default()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("missing user_id")]
    Missing,
}
