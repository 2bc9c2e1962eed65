use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{api::ListingAPI, auth::User, entities::Listing, error::Error};

#[async_trait]
impl ListingAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn create_listing(
        &self,
        user: User,
        title: String,
        price: f64,
        image_url: Option<String>,
    ) -> Result<Listing, Error> {
        let listing = Listing::new(user.id, title, price, image_url)?;

        self.authenticate(&user).await?;

        self.retry
            .run(|| self.store.insert_listing(&listing))
            .await?;

        Ok(listing)
    }

    #[tracing::instrument(skip(self))]
    async fn find_listing(&self, _user: User, id: Uuid) -> Result<Listing, Error> {
        self.fetch_listing(id).await
    }
}
