use async_trait::async_trait;
use log::{debug, info};

use crate::{identity::UserId, slug};

use super::{
    Id, Repository,
    model::{Group, JoinedGroup, Member, NewGroup},
};

#[async_trait]
pub trait GroupService {
    async fn create(
        &self,
        owner: &UserId,
        name: &str,
        description: Option<&str>,
        topic: Option<&str>,
    ) -> super::Result<Group>;

    async fn find_all(&self) -> super::Result<Vec<Group>>;

    async fn find_by_id(&self, id: &Id) -> super::Result<Group>;

    async fn join(&self, id: &Id, user_id: &UserId) -> super::Result<Member>;

    async fn leave(&self, id: &Id, user_id: &UserId) -> super::Result<()>;

    async fn find_joined(&self, user_id: &UserId) -> super::Result<Vec<JoinedGroup>>;

    async fn check_member(&self, id: &Id, user_id: &UserId) -> super::Result<()>;
}

#[derive(Clone)]
pub struct GroupServiceImpl {
    repo: Repository,
}

impl GroupServiceImpl {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl GroupService for GroupServiceImpl {
    async fn create(
        &self,
        owner: &UserId,
        name: &str,
        description: Option<&str>,
        topic: Option<&str>,
    ) -> super::Result<Group> {
        let name = name.trim();
        if name.is_empty() {
            return Err(super::Error::MissingName);
        }

        let slug = slug::normalize(name);
        if !slug.chars().any(|c| c.is_ascii_alphanumeric()) {
            return Err(super::Error::InvalidName);
        }

        let id = Id::random();
        let group = self
            .repo
            .create(&NewGroup::new(&id, name, &slug, description, topic, owner))
            .await?;

        info!("{owner} created group {id} ({slug})");
        Ok(group)
    }

    async fn find_all(&self) -> super::Result<Vec<Group>> {
        self.repo.find_all().await
    }

    async fn find_by_id(&self, id: &Id) -> super::Result<Group> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(super::Error::NotFound(*id))
    }

    async fn join(&self, id: &Id, user_id: &UserId) -> super::Result<Member> {
        let member = self.repo.add_member(id, user_id).await?;
        debug!("{user_id} joined group {id}");
        Ok(member)
    }

    async fn leave(&self, id: &Id, user_id: &UserId) -> super::Result<()> {
        if let Some(group) = self.repo.find_by_id(id).await? {
            if group.owner_id().eq(user_id) {
                return Err(super::Error::OwnerCannotLeave(*id));
            }
        }

        if self.repo.remove_member(id, user_id).await? {
            debug!("{user_id} left group {id}");
        } else {
            debug!("{user_id} was not a member of group {id}");
        }

        Ok(())
    }

    async fn find_joined(&self, user_id: &UserId) -> super::Result<Vec<JoinedGroup>> {
        self.repo.find_joined(user_id).await
    }

    async fn check_member(&self, id: &Id, user_id: &UserId) -> super::Result<()> {
        self.find_by_id(id).await?;

        if !self.repo.is_member(id, user_id).await? {
            return Err(super::Error::NotMember(*id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::group::{self, repository::InMemoryGroupRepository};

    use super::*;

    fn service() -> GroupServiceImpl {
        GroupServiceImpl::new(Arc::new(InMemoryGroupRepository::new()))
    }

    #[tokio::test]
    async fn should_create_group_with_slug_and_owner() {
        let service = service();
        let jora = UserId::from("jora");

        let group = service
            .create(&jora, "  Sci-Fi!! Fans  ", Some("books"), None)
            .await
            .unwrap();

        assert_eq!(group.name(), "Sci-Fi!! Fans");
        assert_eq!(group.slug(), "sci-fi-fans");
        assert_eq!(group.description(), Some("books"));
        assert_eq!(group.owner_id(), &jora);
        assert!(service.check_member(group.id(), &jora).await.is_ok());
    }

    #[tokio::test]
    async fn should_reject_blank_or_symbol_only_names() {
        let service = service();
        let jora = UserId::from("jora");

        let res = service.create(&jora, "   ", None, None).await;
        assert!(matches!(res, Err(group::Error::MissingName)));

        let res = service.create(&jora, "!!!", None, None).await;
        assert!(matches!(res, Err(group::Error::InvalidName)));
    }

    #[tokio::test]
    async fn should_allow_duplicate_slugs() {
        let service = service();
        let jora = UserId::from("jora");

        let g1 = service.create(&jora, "Book Club", None, None).await.unwrap();
        let g2 = service.create(&jora, "book  club", None, None).await.unwrap();

        assert_eq!(g1.slug(), g2.slug());
        assert_ne!(g1.id(), g2.id());
    }

    #[tokio::test]
    async fn should_list_newest_first() {
        let service = service();
        let jora = UserId::from("jora");

        let g1 = service.create(&jora, "first", None, None).await.unwrap();
        let g2 = service.create(&jora, "second", None, None).await.unwrap();

        let groups = service.find_all().await.unwrap();
        assert_eq!(groups, vec![g2, g1]);
    }

    #[tokio::test]
    async fn should_not_find_missing_group() {
        let res = service().find_by_id(&Id::random()).await;
        assert!(matches!(res, Err(group::Error::NotFound(_))));
    }

    #[tokio::test]
    async fn should_conflict_on_second_join() {
        let service = service();
        let owner = UserId::from("owner");
        let valera = UserId::from("valera");
        let g = service.create(&owner, "Chess", None, None).await.unwrap();

        service.join(g.id(), &valera).await.unwrap();
        let second = service.join(g.id(), &valera).await;

        assert!(matches!(second, Err(group::Error::AlreadyMember(_))));
        let joined = service.find_joined(&valera).await.unwrap();
        assert_eq!(joined.len(), 1);
    }

    #[tokio::test]
    async fn should_leave_without_membership() {
        let service = service();
        let owner = UserId::from("owner");
        let g = service.create(&owner, "Chess", None, None).await.unwrap();

        assert!(service.leave(g.id(), &UserId::from("stranger")).await.is_ok());
        assert!(service.leave(&Id::random(), &UserId::from("stranger")).await.is_ok());
    }

    #[tokio::test]
    async fn should_keep_owner_membership() {
        let service = service();
        let owner = UserId::from("owner");
        let g = service.create(&owner, "Chess", None, None).await.unwrap();

        let res = service.leave(g.id(), &owner).await;

        assert!(matches!(res, Err(group::Error::OwnerCannotLeave(_))));
        assert!(service.check_member(g.id(), &owner).await.is_ok());
    }

    #[tokio::test]
    async fn should_find_exactly_joined_groups() {
        let service = service();
        let owner = UserId::from("owner");
        let igor = UserId::from("igor");
        let a = service.create(&owner, "A", None, None).await.unwrap();
        let b = service.create(&owner, "B", None, None).await.unwrap();
        service.create(&owner, "C", None, None).await.unwrap();

        service.join(a.id(), &igor).await.unwrap();
        service.join(b.id(), &igor).await.unwrap();

        let mut actual = service
            .find_joined(&igor)
            .await
            .unwrap()
            .into_iter()
            .map(|j| j.group().name().to_owned())
            .collect::<Vec<_>>();
        actual.sort();

        assert_eq!(actual, vec!["A", "B"]);
    }

    #[tokio::test]
    async fn should_check_membership() {
        let service = service();
        let owner = UserId::from("owner");
        let g = service.create(&owner, "Chess", None, None).await.unwrap();

        let res = service.check_member(g.id(), &UserId::from("radu")).await;
        assert!(matches!(res, Err(group::Error::NotMember(_))));

        let res = service.check_member(&Id::random(), &owner).await;
        assert!(matches!(res, Err(group::Error::NotFound(_))));
    }
}
