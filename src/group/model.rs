use chrono::{DateTime, Utc};
use diesel::prelude::{Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::identity::UserId;

use super::Id;

#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::groups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Group {
    id: Id,
    name: String,
    slug: String,
    description: Option<String>,
    topic: Option<String>,
    owner_id: UserId,
    created_at: DateTime<Utc>,
}

impl Group {
    pub fn new(g: &NewGroup<'_>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: *g.id,
            name: g.name.to_owned(),
            slug: g.slug.to_owned(),
            description: g.description.map(String::from),
            topic: g.topic.map(String::from),
            owner_id: g.owner_id.clone(),
            created_at,
        }
    }

    pub const fn id(&self) -> &Id {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    pub const fn owner_id(&self) -> &UserId {
        &self.owner_id
    }

    pub const fn created_at(&self) -> &DateTime<Utc> {
        &self.created_at
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = crate::schema::groups)]
pub struct NewGroup<'a> {
    id: &'a Id,
    name: &'a str,
    slug: &'a str,
    description: Option<&'a str>,
    topic: Option<&'a str>,
    owner_id: &'a UserId,
}

impl<'a> NewGroup<'a> {
    pub fn new(
        id: &'a Id,
        name: &'a str,
        slug: &'a str,
        description: Option<&'a str>,
        topic: Option<&'a str>,
        owner_id: &'a UserId,
    ) -> Self {
        Self {
            id,
            name,
            slug,
            description,
            topic,
            owner_id,
        }
    }

    pub const fn id(&self) -> &Id {
        self.id
    }

    pub const fn owner_id(&self) -> &UserId {
        self.owner_id
    }
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = crate::schema::group_members)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Member {
    group_id: Id,
    user_id: UserId,
    joined_at: DateTime<Utc>,
}

impl Member {
    pub fn new(group_id: Id, user_id: UserId, joined_at: DateTime<Utc>) -> Self {
        Self {
            group_id,
            user_id,
            joined_at,
        }
    }

    pub const fn group_id(&self) -> &Id {
        &self.group_id
    }

    pub const fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub const fn joined_at(&self) -> &DateTime<Utc> {
        &self.joined_at
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::group_members)]
pub struct NewMember<'a> {
    group_id: &'a Id,
    user_id: &'a UserId,
}

impl<'a> NewMember<'a> {
    pub fn new(group_id: &'a Id, user_id: &'a UserId) -> Self {
        Self { group_id, user_id }
    }
}

/// A group as seen by one of its members.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct JoinedGroup {
    group_id: Id,
    joined_at: DateTime<Utc>,
    #[serde(flatten)]
    group: Group,
}

impl JoinedGroup {
    pub fn new(group: Group, joined_at: DateTime<Utc>) -> Self {
        Self {
            group_id: *group.id(),
            joined_at,
            group,
        }
    }

    pub const fn group(&self) -> &Group {
        &self.group
    }

    pub const fn joined_at(&self) -> &DateTime<Utc> {
        &self.joined_at
    }
}
