use std::collections::{HashMap, HashSet};

use chrono::Utc;
use uuid::Uuid;

use super::Engine;
use crate::{
    auth::User,
    entities::{Listing, Offer, OfferStatus, OfferView, Profile},
    error::Error,
};

/// Which side of the offer the reader is on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Perspective {
    Bidder,
    Owner,
}

fn unique(ids: impl Iterator<Item = Uuid>) -> Vec<Uuid> {
    let mut seen = HashSet::new();
    ids.filter(|id| seen.insert(*id)).collect()
}

impl Engine {
    /// A signed-in user is one with a profile.
    #[tracing::instrument(skip(self))]
    pub(super) async fn authenticate(&self, user: &User) -> Result<Profile, Error> {
        self.retry
            .run(|| self.store.find_profile(user.id))
            .await?
            .ok_or_else(Error::unauthenticated_error)
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn fetch_offer(&self, id: Uuid) -> Result<Offer, Error> {
        self.retry
            .run(|| self.store.find_offer(id))
            .await?
            .ok_or_else(Error::not_found_error)
    }

    #[tracing::instrument(skip(self))]
    pub(super) async fn fetch_listing(&self, id: Uuid) -> Result<Listing, Error> {
        self.retry
            .run(|| self.store.find_listing(id))
            .await?
            .ok_or_else(Error::not_found_error)
    }

    /// Persists a transition made from `expected`. Fails with invalid-state if another
    /// caller changed the offer since it was read.
    pub(super) async fn store_offer_update(
        &self,
        offer: &Offer,
        expected: OfferStatus,
        owner_id: Uuid,
    ) -> Result<(), Error> {
        self.retry
            .run(|| self.store.update_offer(offer, expected))
            .await?;
        self.cache.invalidate(&[offer.bidder_id, owner_id]).await;

        Ok(())
    }

    /// Joins offers with their listings and the profile of the other party.
    pub(super) async fn assemble_views(
        &self,
        offers: Vec<Offer>,
        perspective: Perspective,
    ) -> Result<Vec<OfferView>, Error> {
        let listing_ids = unique(offers.iter().map(|offer| offer.listing_id));
        let listings: HashMap<Uuid, Listing> = self
            .retry
            .run(|| self.store.find_listings(listing_ids.clone()))
            .await?
            .into_iter()
            .map(|listing| (listing.id, listing))
            .collect();

        let counterparty_of = |offer: &Offer| match perspective {
            Perspective::Bidder => listings
                .get(&offer.listing_id)
                .map_or(Uuid::nil(), |listing| listing.owner_id),
            Perspective::Owner => offer.bidder_id,
        };

        let profile_ids = unique(offers.iter().map(counterparty_of));
        let profiles: HashMap<Uuid, Profile> = self
            .retry
            .run(|| self.store.find_profiles(profile_ids.clone()))
            .await?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect();

        let now = Utc::now();

        let views = offers
            .into_iter()
            .map(|offer| {
                let counterparty_id = counterparty_of(&offer);
                let listing = listings.get(&offer.listing_id);

                OfferView::assemble(
                    offer,
                    listing,
                    counterparty_id,
                    profiles.get(&counterparty_id),
                    now,
                )
            })
            .collect();

        Ok(views)
    }
}

#[test]
fn unique_keeps_first_occurrence_order() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    assert_eq!(unique(vec![a, b, a, b, a].into_iter()), vec![a, b]);
}
