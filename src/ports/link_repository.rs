//! Generated link repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, LinkId};
use crate::domain::reply::GeneratedLinkRecord;

/// Repository port for generated link records.
///
/// Records are immutable: there is no update.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Save a new link record.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, record: &GeneratedLinkRecord) -> Result<(), DomainError>;

    /// Find a link record by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &LinkId) -> Result<Option<GeneratedLinkRecord>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn LinkRepository) {}
    }
}
