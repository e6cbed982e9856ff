use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{
    Connection, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl,
    SelectableHelper,
    dsl::exists,
    r2d2::ConnectionManager,
    result::{DatabaseErrorKind, Error as DieselError},
};
use tokio::sync::RwLock;

use crate::identity::UserId;
use crate::schema::{group_members, groups};

use super::{
    Id,
    model::{Group, JoinedGroup, Member, NewGroup, NewMember},
};

#[async_trait]
pub trait GroupRepository {
    /// Inserts the group together with its owner's membership.
    async fn create(&self, g: &NewGroup<'_>) -> super::Result<Group>;

    async fn find_all(&self) -> super::Result<Vec<Group>>;

    async fn find_by_id(&self, id: &Id) -> super::Result<Option<Group>>;

    async fn add_member(&self, id: &Id, user_id: &UserId) -> super::Result<Member>;

    async fn remove_member(&self, id: &Id, user_id: &UserId) -> super::Result<bool>;

    async fn find_joined(&self, user_id: &UserId) -> super::Result<Vec<JoinedGroup>>;

    async fn is_member(&self, id: &Id, user_id: &UserId) -> super::Result<bool>;
}

pub struct PgGroupRepository {
    pool: r2d2::Pool<ConnectionManager<PgConnection>>,
}

impl PgGroupRepository {
    pub fn new(pool: r2d2::Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PgGroupRepository {
    async fn create(&self, g: &NewGroup<'_>) -> super::Result<Group> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, super::Error, _>(|conn| {
            let group = diesel::insert_into(groups::table)
                .values(g)
                .returning(Group::as_returning())
                .get_result(conn)?;

            diesel::insert_into(group_members::table)
                .values(NewMember::new(g.id(), g.owner_id()))
                .execute(conn)?;

            Ok(group)
        })
    }

    async fn find_all(&self) -> super::Result<Vec<Group>> {
        let mut conn = self.pool.get()?;

        let groups = groups::table
            .order((groups::created_at.desc(), groups::id.desc()))
            .select(Group::as_select())
            .load(&mut conn)?;

        Ok(groups)
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Option<Group>> {
        let mut conn = self.pool.get()?;

        let group = groups::table
            .filter(groups::id.eq(id))
            .select(Group::as_select())
            .first(&mut conn)
            .optional()?;

        Ok(group)
    }

    async fn add_member(&self, id: &Id, user_id: &UserId) -> super::Result<Member> {
        let mut conn = self.pool.get()?;

        let member = diesel::insert_into(group_members::table)
            .values(NewMember::new(id, user_id))
            .on_conflict_do_nothing()
            .returning(Member::as_returning())
            .get_result(&mut conn)
            .optional()
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    super::Error::NotFound(*id)
                }
                e => super::Error::from(e),
            })?;

        member.ok_or(super::Error::AlreadyMember(*id))
    }

    async fn remove_member(&self, id: &Id, user_id: &UserId) -> super::Result<bool> {
        let mut conn = self.pool.get()?;

        let deleted = diesel::delete(
            group_members::table
                .filter(group_members::group_id.eq(id))
                .filter(group_members::user_id.eq(user_id)),
        )
        .execute(&mut conn)?;

        Ok(deleted > 0)
    }

    async fn find_joined(&self, user_id: &UserId) -> super::Result<Vec<JoinedGroup>> {
        let mut conn = self.pool.get()?;

        let rows = group_members::table
            .inner_join(groups::table)
            .filter(group_members::user_id.eq(user_id))
            .order((group_members::joined_at.desc(), groups::id.desc()))
            .select((Group::as_select(), group_members::joined_at))
            .load::<(Group, DateTime<Utc>)>(&mut conn)?;

        Ok(rows
            .into_iter()
            .map(|(g, joined_at)| JoinedGroup::new(g, joined_at))
            .collect())
    }

    async fn is_member(&self, id: &Id, user_id: &UserId) -> super::Result<bool> {
        let mut conn = self.pool.get()?;

        let found = diesel::select(exists(
            group_members::table
                .filter(group_members::group_id.eq(id))
                .filter(group_members::user_id.eq(user_id)),
        ))
        .get_result::<bool>(&mut conn)?;

        Ok(found)
    }
}

#[derive(Default)]
struct Store {
    groups: HashMap<Id, Group>,
    members: HashMap<(Id, UserId), DateTime<Utc>>,
}

/// Process-local store. A single lock guards groups and memberships so group
/// creation and owner membership land together.
#[derive(Default)]
pub struct InMemoryGroupRepository {
    store: RwLock<Store>,
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn create(&self, g: &NewGroup<'_>) -> super::Result<Group> {
        let mut store = self.store.write().await;

        let now = Utc::now();
        let group = Group::new(g, now);
        store.groups.insert(*group.id(), group.clone());
        store
            .members
            .insert((*group.id(), group.owner_id().clone()), now);

        Ok(group)
    }

    async fn find_all(&self) -> super::Result<Vec<Group>> {
        let store = self.store.read().await;

        let mut groups = store.groups.values().cloned().collect::<Vec<_>>();
        groups.sort_by(|a, b| {
            (b.created_at(), b.id().get()).cmp(&(a.created_at(), a.id().get()))
        });

        Ok(groups)
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Option<Group>> {
        let store = self.store.read().await;
        Ok(store.groups.get(id).cloned())
    }

    async fn add_member(&self, id: &Id, user_id: &UserId) -> super::Result<Member> {
        let mut store = self.store.write().await;

        if !store.groups.contains_key(id) {
            return Err(super::Error::NotFound(*id));
        }

        let key = (*id, user_id.clone());
        if store.members.contains_key(&key) {
            return Err(super::Error::AlreadyMember(*id));
        }

        let joined_at = Utc::now();
        store.members.insert(key, joined_at);

        Ok(Member::new(*id, user_id.clone(), joined_at))
    }

    async fn remove_member(&self, id: &Id, user_id: &UserId) -> super::Result<bool> {
        let mut store = self.store.write().await;
        Ok(store.members.remove(&(*id, user_id.clone())).is_some())
    }

    async fn find_joined(&self, user_id: &UserId) -> super::Result<Vec<JoinedGroup>> {
        let store = self.store.read().await;

        let mut joined = store
            .members
            .iter()
            .filter(|((_, u), _)| u == user_id)
            .filter_map(|((g, _), joined_at)| {
                store
                    .groups
                    .get(g)
                    .map(|group| JoinedGroup::new(group.clone(), *joined_at))
            })
            .collect::<Vec<_>>();
        joined.sort_by(|a, b| {
            (b.joined_at(), b.group().id().get()).cmp(&(a.joined_at(), a.group().id().get()))
        });

        Ok(joined)
    }

    async fn is_member(&self, id: &Id, user_id: &UserId) -> super::Result<bool> {
        let store = self.store.read().await;
        Ok(store.members.contains_key(&(*id, user_id.clone())))
    }
}
