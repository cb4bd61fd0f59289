//! Boundary to the identity/permission service that owns users and classes.

use async_trait::async_trait;

use crate::errors::DomainError;
use crate::types::{Class, ClassId, SessionId, User, UserId};

/// Authorization-aware user operations plus the plain lookups the route
/// needs to enrich its responses.
///
/// The `authorize_and_*` methods judge the session and the requester's
/// permissions before touching any data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn authorize_and_create(
        &self,
        session_id: SessionId,
        requester: &str,
        user: &User,
    ) -> Result<(), DomainError>;

    /// Users matching `term`, each with its class resolved.
    async fn authorize_and_search(
        &self,
        session_id: SessionId,
        requester: &str,
        term: &str,
    ) -> Result<Vec<User>, DomainError>;

    /// Returns the stored user after the update, class resolved.
    async fn authorize_and_update(
        &self,
        session_id: SessionId,
        requester: &str,
        user: &User,
    ) -> Result<User, DomainError>;

    async fn authorize_and_delete(
        &self,
        session_id: SessionId,
        requester: &str,
        id: UserId,
    ) -> Result<(), DomainError>;

    async fn find_user_by_id(&self, id: UserId) -> Result<User, DomainError>;

    async fn find_user_id_by_login(&self, login: &str) -> Result<UserId, DomainError>;

    async fn find_class_by_id(&self, id: ClassId) -> Result<Class, DomainError>;
}
