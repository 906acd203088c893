use async_trait::async_trait;

use crate::error::LookupError;

/// Checks whether a contact already uses an email address.
///
/// Futures are not `Send`; implementations run on the browser's single thread.
#[async_trait(?Send)]
pub trait ContactEmailLookup {
    async fn email_exists(&self, email: &str) -> Result<bool, LookupError>;
}
