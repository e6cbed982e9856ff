use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl, SelectableHelper,
    r2d2::ConnectionManager,
};
use tokio::sync::RwLock;

use crate::group;
use crate::schema::group_messages;

use super::{
    Limit,
    model::{Message, NewMessage},
};

#[async_trait]
pub trait MessageRepository {
    async fn insert(&self, m: &NewMessage<'_>) -> super::Result<Message>;

    /// The `limit` earliest messages of a group, oldest first.
    async fn find_by_group_id(
        &self,
        group_id: &group::Id,
        limit: Limit,
    ) -> super::Result<Vec<Message>>;
}

pub struct PgMessageRepository {
    pool: r2d2::Pool<ConnectionManager<PgConnection>>,
}

impl PgMessageRepository {
    pub fn new(pool: r2d2::Pool<ConnectionManager<PgConnection>>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    async fn insert(&self, m: &NewMessage<'_>) -> super::Result<Message> {
        let mut conn = self.pool.get()?;

        let msg = diesel::insert_into(group_messages::table)
            .values(m)
            .returning(Message::as_returning())
            .get_result(&mut conn)?;

        Ok(msg)
    }

    async fn find_by_group_id(
        &self,
        group_id: &group::Id,
        limit: Limit,
    ) -> super::Result<Vec<Message>> {
        let mut conn = self.pool.get()?;

        let messages = group_messages::table
            .filter(group_messages::group_id.eq(group_id))
            .order((group_messages::created_at.asc(), group_messages::seq.asc()))
            .limit(limit.get() as i64)
            .select(Message::as_select())
            .load(&mut conn)?;

        Ok(messages)
    }
}

/// Messages are appended under the write lock and never reordered, so the
/// stored order is the listing order.
#[derive(Default)]
pub struct InMemoryMessageRepository {
    store: RwLock<HashMap<group::Id, Vec<Message>>>,
}

impl InMemoryMessageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepository for InMemoryMessageRepository {
    async fn insert(&self, m: &NewMessage<'_>) -> super::Result<Message> {
        let mut store = self.store.write().await;
        let messages = store.entry(*m.group_id()).or_default();

        // created_at never goes backwards within a group, even if the clock does
        let now = Utc::now();
        let created_at = messages
            .last()
            .map_or(now, |last| now.max(*last.created_at()));

        let msg = Message::new(m, created_at);
        messages.push(msg.clone());

        Ok(msg)
    }

    async fn find_by_group_id(
        &self,
        group_id: &group::Id,
        limit: Limit,
    ) -> super::Result<Vec<Message>> {
        let store = self.store.read().await;

        Ok(store
            .get(group_id)
            .map(|messages| messages.iter().take(limit.get()).cloned().collect())
            .unwrap_or_default())
    }
}
