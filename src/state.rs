use std::sync::Arc;

use axum::extract::FromRef;

use crate::group::repository::{InMemoryGroupRepository, PgGroupRepository};
use crate::group::service::GroupServiceImpl;
use crate::integration::Storage;
use crate::message::repository::{InMemoryMessageRepository, PgMessageRepository};
use crate::message::service::MessageServiceImpl;
use crate::{group, message};

#[derive(Clone, FromRef)]
pub struct AppState {
    pub group_service: group::Service,
    pub message_service: message::Service,
}

impl AppState {
    pub fn init(storage: &Storage) -> crate::Result<Self> {
        let (group_repo, message_repo): (group::Repository, message::Repository) = match storage {
            Storage::Postgres(config) => {
                let pool = config.connect()?;
                (
                    Arc::new(PgGroupRepository::new(pool.clone())),
                    Arc::new(PgMessageRepository::new(pool)),
                )
            }
            Storage::Memory => (
                Arc::new(InMemoryGroupRepository::new()),
                Arc::new(InMemoryMessageRepository::new()),
            ),
        };

        Ok(Self::new(group_repo, message_repo))
    }

    pub fn new(group_repo: group::Repository, message_repo: message::Repository) -> Self {
        let group_service: group::Service = Arc::new(GroupServiceImpl::new(group_repo));
        let message_service = Arc::new(MessageServiceImpl::new(
            message_repo,
            group_service.clone(),
        ));

        Self {
            group_service,
            message_service,
        }
    }
}
