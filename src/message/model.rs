use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::{group, identity::UserId};

use super::Id;

#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::group_messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Message {
    id: Id,
    group_id: group::Id,
    user_id: UserId,
    content: String,
    created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(m: &NewMessage<'_>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: *m.id,
            group_id: *m.group_id,
            user_id: m.user_id.clone(),
            content: m.content.to_owned(),
            created_at,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub const fn group_id(&self) -> &group::Id {
        &self.group_id
    }

    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub const fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::group_messages)]
pub struct NewMessage<'a> {
    id: &'a Id,
    group_id: &'a group::Id,
    user_id: &'a UserId,
    content: &'a str,
}

impl<'a> NewMessage<'a> {
    pub fn new(id: &'a Id, group_id: &'a group::Id, user_id: &'a UserId, content: &'a str) -> Self {
        Self {
            id,
            group_id,
            user_id,
            content,
        }
    }

    pub const fn group_id(&self) -> &group::Id {
        self.group_id
    }
}
