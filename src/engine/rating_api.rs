use super::Engine;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    api::RatingAPI,
    auth::User,
    entities::{OfferStatus, Rating},
    error::Error,
};

#[async_trait]
impl RatingAPI for Engine {
    /// Either side of an accepted offer may rate the other, once per listing.
    #[tracing::instrument(skip(self, comment))]
    async fn create_rating(
        &self,
        user: User,
        listing_id: Uuid,
        reviewee_id: Uuid,
        score: u8,
        comment: Option<String>,
    ) -> Result<Rating, Error> {
        let rating = Rating::new(listing_id, user.id, reviewee_id, score, comment)?;

        self.authenticate(&user).await?;

        let listing = self.fetch_listing(listing_id).await?;

        let bidder_id = if user.id == listing.owner_id {
            reviewee_id
        } else if reviewee_id == listing.owner_id {
            user.id
        } else {
            return Err(Error::unauthorized_error());
        };

        let traded = self
            .retry
            .run(|| self.store.offers_made_by(bidder_id))
            .await?
            .iter()
            .any(|offer| offer.listing_id == listing.id && offer.status == OfferStatus::Accepted);

        if !traded {
            return Err(Error::invalid_state_error());
        }

        match self.retry.run(|| self.store.insert_rating(&rating)).await {
            Ok(()) => Ok(rating),
            Err(err) => {
                if err.is_already_rated_error() {
                    tracing::info!(%listing_id, "duplicate rating refused");
                }
                Err(err)
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn list_ratings(&self, _user: User, reviewee_id: Uuid) -> Result<Vec<Rating>, Error> {
        self.retry.run(|| self.store.ratings_for(reviewee_id)).await
    }
}
