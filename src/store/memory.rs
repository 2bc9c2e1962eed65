use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{mock_data, Store};
use crate::entities::{Listing, Offer, OfferStatus, Profile, Rating};
use crate::error::Error;

#[derive(Debug, Default)]
struct State {
    // insertion order, oldest first
    offers: Vec<Offer>,
    listings: HashMap<Uuid, Listing>,
    profiles: HashMap<Uuid, Profile>,
    ratings: Vec<Rating>,
}

/// In-process store used in mock mode and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with a handful of sample users, listings and offers.
    pub fn with_mock_data() -> Self {
        let data = mock_data::generate();

        let state = State {
            offers: data.offers,
            listings: data
                .listings
                .into_iter()
                .map(|listing| (listing.id, listing))
                .collect(),
            profiles: data
                .profiles
                .into_iter()
                .map(|profile| (profile.id, profile))
                .collect(),
            ratings: vec![],
        };

        Self {
            state: RwLock::new(state),
        }
    }
}

// callers walk the list backwards so ties on created_at still come out newest first
fn newest_first(mut offers: Vec<Offer>) -> Vec<Offer> {
    offers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    offers
}

#[async_trait]
impl Store for MemoryStore {
    #[tracing::instrument(skip_all, fields(offer_id = %offer.id))]
    async fn insert_offer(&self, offer: &Offer) -> Result<(), Error> {
        let mut state = self.state.write().await;
        state.offers.push(offer.clone());

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(offer_id = %offer.id))]
    async fn update_offer(&self, offer: &Offer, expected: OfferStatus) -> Result<(), Error> {
        let mut state = self.state.write().await;

        let existing = state
            .offers
            .iter_mut()
            .find(|existing| existing.id == offer.id)
            .ok_or_else(Error::not_found_error)?;

        if existing.status != expected {
            return Err(Error::invalid_state_error());
        }

        *existing = offer.clone();

        Ok(())
    }

    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>, Error> {
        let state = self.state.read().await;

        Ok(state.offers.iter().find(|offer| offer.id == id).cloned())
    }

    async fn offers_made_by(&self, bidder_id: Uuid) -> Result<Vec<Offer>, Error> {
        let state = self.state.read().await;

        let offers = state
            .offers
            .iter()
            .rev()
            .filter(|offer| offer.bidder_id == bidder_id)
            .cloned()
            .collect();

        Ok(newest_first(offers))
    }

    async fn offers_received_by(&self, owner_id: Uuid) -> Result<Vec<Offer>, Error> {
        let state = self.state.read().await;

        let offers = state
            .offers
            .iter()
            .rev()
            .filter(|offer| {
                state
                    .listings
                    .get(&offer.listing_id)
                    .map_or(false, |listing| listing.owner_id == owner_id)
            })
            .cloned()
            .collect();

        Ok(newest_first(offers))
    }

    async fn insert_listing(&self, listing: &Listing) -> Result<(), Error> {
        let mut state = self.state.write().await;
        state.listings.insert(listing.id, listing.clone());

        Ok(())
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, Error> {
        let state = self.state.read().await;

        Ok(state.listings.get(&id).cloned())
    }

    async fn find_listings(&self, ids: Vec<Uuid>) -> Result<Vec<Listing>, Error> {
        let state = self.state.read().await;

        Ok(ids
            .iter()
            .filter_map(|id| state.listings.get(id).cloned())
            .collect())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), Error> {
        let mut state = self.state.write().await;
        state.profiles.insert(profile.id, profile.clone());

        Ok(())
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, Error> {
        let state = self.state.read().await;

        Ok(state.profiles.get(&id).cloned())
    }

    async fn find_profiles(&self, ids: Vec<Uuid>) -> Result<Vec<Profile>, Error> {
        let state = self.state.read().await;

        Ok(ids
            .iter()
            .filter_map(|id| state.profiles.get(id).cloned())
            .collect())
    }

    #[tracing::instrument(skip_all, fields(listing_id = %rating.listing_id))]
    async fn insert_rating(&self, rating: &Rating) -> Result<(), Error> {
        let mut state = self.state.write().await;

        let duplicate = state.ratings.iter().any(|existing| {
            existing.reviewer_id == rating.reviewer_id && existing.listing_id == rating.listing_id
        });

        if duplicate {
            return Err(Error::already_rated_error());
        }

        state.ratings.push(rating.clone());

        Ok(())
    }

    async fn ratings_for(&self, reviewee_id: Uuid) -> Result<Vec<Rating>, Error> {
        let state = self.state.read().await;

        let mut ratings: Vec<Rating> = state
            .ratings
            .iter()
            .filter(|rating| rating.reviewee_id == reviewee_id)
            .cloned()
            .collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(ratings)
    }
}
