use async_trait::async_trait;
use log::debug;

use crate::{group, identity::UserId};

use super::{
    Id, Limit, Repository,
    model::{Message, NewMessage},
};

#[async_trait]
pub trait MessageService {
    /// Appends a message to a group the author is a member of.
    async fn create(
        &self,
        group_id: &group::Id,
        user_id: &UserId,
        content: &str,
    ) -> super::Result<Message>;

    async fn find_by_group_id(
        &self,
        group_id: &group::Id,
        limit: Limit,
    ) -> super::Result<Vec<Message>>;
}

#[derive(Clone)]
pub struct MessageServiceImpl {
    repo: Repository,
    group_service: group::Service,
}

impl MessageServiceImpl {
    pub fn new(repo: Repository, group_service: group::Service) -> Self {
        Self {
            repo,
            group_service,
        }
    }
}

#[async_trait]
impl MessageService for MessageServiceImpl {
    async fn create(
        &self,
        group_id: &group::Id,
        user_id: &UserId,
        content: &str,
    ) -> super::Result<Message> {
        if content.trim().is_empty() {
            return Err(super::Error::EmptyContent);
        }

        self.group_service.check_member(group_id, user_id).await?;

        let id = Id::random();
        let msg = self
            .repo
            .insert(&NewMessage::new(&id, group_id, user_id, content))
            .await?;

        debug!("{user_id} posted message {id} to group {group_id}");
        Ok(msg)
    }

    async fn find_by_group_id(
        &self,
        group_id: &group::Id,
        limit: Limit,
    ) -> super::Result<Vec<Message>> {
        self.group_service.find_by_id(group_id).await?;
        self.repo.find_by_group_id(group_id, limit).await
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::{
        group::{
            repository::InMemoryGroupRepository,
            service::{GroupService, GroupServiceImpl},
        },
        message::{self, repository::InMemoryMessageRepository},
    };

    use super::*;

    struct Fixture {
        groups: group::Service,
        messages: MessageServiceImpl,
    }

    fn fixture() -> Fixture {
        let groups: group::Service = Arc::new(GroupServiceImpl::new(Arc::new(
            InMemoryGroupRepository::new(),
        )));
        let messages =
            MessageServiceImpl::new(Arc::new(InMemoryMessageRepository::new()), groups.clone());
        Fixture { groups, messages }
    }

    fn contents(messages: Vec<Message>) -> Vec<String> {
        messages.into_iter().map(|m| m.content().to_owned()).collect()
    }

    #[tokio::test]
    async fn should_list_in_posting_order() {
        let f = fixture();
        let jora = UserId::from("jora");
        let g = f.groups.create(&jora, "Chess", None, None).await.unwrap();

        for content in ["m1", "m2", "m3"] {
            f.messages.create(g.id(), &jora, content).await.unwrap();
        }

        let listed = f
            .messages
            .find_by_group_id(g.id(), Limit::DEFAULT)
            .await
            .unwrap();
        assert_eq!(contents(listed), vec!["m1", "m2", "m3"]);
    }

    #[tokio::test]
    async fn should_keep_order_under_concurrent_posts() {
        let f = fixture();
        let jora = UserId::from("jora");
        let g = f.groups.create(&jora, "Chess", None, None).await.unwrap();
        let messages = Arc::new(f.messages);

        let handles = (0..10)
            .map(|i| {
                let messages = messages.clone();
                let jora = jora.clone();
                let id = *g.id();
                tokio::spawn(async move { messages.create(&id, &jora, &format!("m{i}")).await })
            })
            .collect::<Vec<_>>();
        for h in handles {
            h.await.unwrap().unwrap();
        }

        let listed = messages
            .find_by_group_id(g.id(), Limit::DEFAULT)
            .await
            .unwrap();
        assert_eq!(listed.len(), 10);
        assert!(
            listed
                .windows(2)
                .all(|w| w[0].created_at() <= w[1].created_at())
        );
    }

    #[tokio::test]
    async fn should_return_earliest_within_limit() {
        let f = fixture();
        let jora = UserId::from("jora");
        let g = f.groups.create(&jora, "Chess", None, None).await.unwrap();

        for content in ["m1", "m2", "m3", "m4", "m5"] {
            f.messages.create(g.id(), &jora, content).await.unwrap();
        }

        let listed = f
            .messages
            .find_by_group_id(g.id(), Limit::parse(Some("2")).unwrap())
            .await
            .unwrap();
        assert_eq!(contents(listed), vec!["m1", "m2"]);
    }

    #[tokio::test]
    async fn should_reject_empty_content() {
        let f = fixture();
        let jora = UserId::from("jora");
        let g = f.groups.create(&jora, "Chess", None, None).await.unwrap();

        let res = f.messages.create(g.id(), &jora, "  \n ").await;

        assert!(matches!(res, Err(message::Error::EmptyContent)));
    }

    #[tokio::test]
    async fn should_reject_non_members() {
        let f = fixture();
        let jora = UserId::from("jora");
        let g = f.groups.create(&jora, "Chess", None, None).await.unwrap();

        let res = f.messages.create(g.id(), &UserId::from("radu"), "hi").await;

        assert!(matches!(
            res,
            Err(message::Error::_Group(group::Error::NotMember(_)))
        ));
    }

    #[tokio::test]
    async fn should_not_list_missing_group() {
        let f = fixture();

        let res = f
            .messages
            .find_by_group_id(&group::Id::random(), Limit::DEFAULT)
            .await;

        assert!(matches!(
            res,
            Err(message::Error::_Group(group::Error::NotFound(_)))
        ));
    }
}
