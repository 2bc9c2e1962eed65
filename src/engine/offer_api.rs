use super::helpers::Perspective;
use super::Engine;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    api::OfferAPI,
    auth::User,
    cache::ViewKind,
    entities::{
        validate_amount, validate_message, Offer, OfferResponse, OfferStats, OfferView,
    },
    error::Error,
};

#[async_trait]
impl OfferAPI for Engine {
    #[tracing::instrument(skip(self))]
    async fn list_my_offers(&self, user: User) -> Result<Vec<OfferView>, Error> {
        if let Some(views) = self.cache.get(user.id, ViewKind::Made).await {
            return Ok(views);
        }

        let ticket = self.cache.ticket().await;

        let offers: Vec<Offer> = self
            .retry
            .run(|| self.store.offers_made_by(user.id))
            .await?
            .into_iter()
            .filter(Offer::is_visible)
            .collect();

        let views = self.assemble_views(offers, Perspective::Bidder).await?;
        self.cache
            .put(ticket, user.id, ViewKind::Made, views.clone())
            .await;

        Ok(views)
    }

    #[tracing::instrument(skip(self))]
    async fn list_received_offers(&self, user: User) -> Result<Vec<OfferView>, Error> {
        if let Some(views) = self.cache.get(user.id, ViewKind::Received).await {
            return Ok(views);
        }

        let ticket = self.cache.ticket().await;

        let offers: Vec<Offer> = self
            .retry
            .run(|| self.store.offers_received_by(user.id))
            .await?
            .into_iter()
            .filter(Offer::is_visible)
            .collect();

        let views = self.assemble_views(offers, Perspective::Owner).await?;
        self.cache
            .put(ticket, user.id, ViewKind::Received, views.clone())
            .await;

        Ok(views)
    }

    #[tracing::instrument(skip(self))]
    async fn get_offer_stats(&self, user: User) -> Result<OfferStats, Error> {
        let (made, received) = futures::try_join!(
            self.retry.run(|| self.store.offers_made_by(user.id)),
            self.retry.run(|| self.store.offers_received_by(user.id)),
        )?;

        Ok(OfferStats::compute(&made, &received, Utc::now()))
    }

    #[tracing::instrument(skip(self))]
    async fn find_offer(&self, user: User, id: Uuid) -> Result<OfferView, Error> {
        let offer = self.fetch_offer(id).await?;

        match self.authorize(user.clone(), "read", offer.clone()) {
            Ok(()) => {
                let mut views = self.assemble_views(vec![offer], Perspective::Bidder).await?;
                return views.pop().ok_or_else(Error::unexpected_error);
            }
            // not the bidder, maybe the listing owner
            Err(err) if err.is_unauthorized_error() => {}
            Err(err) => return Err(err),
        }

        let listing = self.fetch_listing(offer.listing_id).await?;
        self.authorize(user.clone(), "read_offers", listing)?;

        let mut views = self.assemble_views(vec![offer], Perspective::Owner).await?;
        views.pop().ok_or_else(Error::unexpected_error)
    }

    #[tracing::instrument(skip(self, message))]
    async fn create_offer(
        &self,
        user: User,
        listing_id: Uuid,
        amount: f64,
        message: Option<String>,
        expires_in_24h: bool,
    ) -> Result<Offer, Error> {
        // reject bad input before anything touches the store
        validate_amount(amount)?;
        validate_message(message.as_deref())?;

        self.authenticate(&user).await?;

        let listing = self.fetch_listing(listing_id).await?;
        self.authorize(user.clone(), "make_offer", listing.clone())?;

        let expires_in = expires_in_24h.then(Engine::offer_expiry);
        let offer = Offer::new(listing.id, user.id, amount, message, expires_in);

        self.retry.run(|| self.store.insert_offer(&offer)).await?;
        self.cache.invalidate(&[user.id, listing.owner_id]).await;

        tracing::info!(offer_id = %offer.id, "offer created");

        Ok(offer)
    }

    #[tracing::instrument(skip(self))]
    async fn respond_to_offer(
        &self,
        user: User,
        id: Uuid,
        response: OfferResponse,
    ) -> Result<Offer, Error> {
        if let OfferResponse::Counter { amount, message } = &response {
            validate_amount(*amount)?;
            validate_message(message.as_deref())?;
        }

        self.authenticate(&user).await?;

        let mut offer = self.fetch_offer(id).await?;
        let listing = self.fetch_listing(offer.listing_id).await?;

        self.authorize(user.clone(), "respond_to_offers", listing.clone())?;

        let now = Utc::now();
        let read_status = offer.status;

        // expiry is only observed lazily, persist it before refusing the response
        if offer.expire(now) {
            tracing::info!(offer_id = %offer.id, "offer expired before response");
            self.store_offer_update(&offer, read_status, listing.owner_id)
                .await?;
            return Err(Error::invalid_state_error());
        }

        offer.respond(response, now)?;
        self.store_offer_update(&offer, read_status, listing.owner_id)
            .await?;

        tracing::info!(offer_id = %offer.id, status = offer.status.name(), "offer answered");

        Ok(offer)
    }

    #[tracing::instrument(skip(self))]
    async fn withdraw_offer(&self, user: User, id: Uuid) -> Result<Offer, Error> {
        self.authenticate(&user).await?;

        let mut offer = self.fetch_offer(id).await?;

        self.authorize(user.clone(), "withdraw", offer.clone())?;

        let read_status = offer.status;
        offer.withdraw(Utc::now())?;

        // the owner's received list must drop the offer too, even if the listing is gone
        let owner_id = self
            .retry
            .run(|| self.store.find_listing(offer.listing_id))
            .await?
            .map_or(user.id, |listing| listing.owner_id);

        self.store_offer_update(&offer, read_status, owner_id).await?;

        tracing::info!(offer_id = %offer.id, "offer withdrawn");

        Ok(offer)
    }
}
