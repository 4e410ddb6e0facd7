//! Music profile provider interface.

use async_trait::async_trait;

use super::{AccessToken, ProfileFetchError, ProfileSummary, TimeRange};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileFetcher: Send + Sync {
    /// Fetch display name, top 10 artists and top 15 tracks over `time_range`.
    async fn fetch(
        &self,
        token: &AccessToken,
        time_range: TimeRange,
    ) -> Result<ProfileSummary, ProfileFetchError>;
}
