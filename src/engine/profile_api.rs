use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{api::ProfileAPI, auth::User, entities::Profile, error::Error};

#[async_trait]
impl ProfileAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn upsert_profile(
        &self,
        user: User,
        display_name: String,
        avatar_url: Option<String>,
    ) -> Result<Profile, Error> {
        let profile = Profile::new(user.id, display_name, avatar_url)?;

        self.retry
            .run(|| self.store.upsert_profile(&profile))
            .await?;

        // display names are baked into cached views
        self.cache.invalidate_all().await;

        Ok(profile)
    }

    #[tracing::instrument(skip(self))]
    async fn find_profile(&self, _user: User, id: Uuid) -> Result<Profile, Error> {
        self.retry
            .run(|| self.store.find_profile(id))
            .await?
            .ok_or_else(Error::not_found_error)
    }
}
