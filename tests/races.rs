use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{Barrier, Notify};
use uuid::Uuid;

use takas::api::{ListingAPI, OfferAPI, ProfileAPI};
use takas::auth::User;
use takas::cache::ViewCache;
use takas::engine::Engine;
use takas::entities::{Listing, Offer, OfferResponse, OfferStatus, Profile, Rating};
use takas::error::Error;
use takas::retry::RetryPolicy;
use takas::store::{MemoryStore, Store};

/// Memory store with hooks to hold a call at a chosen point.
#[derive(Default)]
struct SteppedStore {
    inner: MemoryStore,
    // offers_made_by: signal after reading, then wait to be resumed
    hold_made_by: AtomicBool,
    made_by_read: Notify,
    made_by_resume: Notify,
    // find_offer: callers meet here before returning
    find_offer_barrier: Option<Barrier>,
}

#[async_trait]
impl Store for SteppedStore {
    async fn insert_offer(&self, offer: &Offer) -> Result<(), Error> {
        self.inner.insert_offer(offer).await
    }

    async fn update_offer(&self, offer: &Offer, expected: OfferStatus) -> Result<(), Error> {
        self.inner.update_offer(offer, expected).await
    }

    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>, Error> {
        let offer = self.inner.find_offer(id).await?;

        if let Some(barrier) = &self.find_offer_barrier {
            barrier.wait().await;
        }

        Ok(offer)
    }

    async fn offers_made_by(&self, bidder_id: Uuid) -> Result<Vec<Offer>, Error> {
        let offers = self.inner.offers_made_by(bidder_id).await?;

        if self.hold_made_by.swap(false, Ordering::SeqCst) {
            self.made_by_read.notify_one();
            self.made_by_resume.notified().await;
        }

        Ok(offers)
    }

    async fn offers_received_by(&self, owner_id: Uuid) -> Result<Vec<Offer>, Error> {
        self.inner.offers_received_by(owner_id).await
    }

    async fn insert_listing(&self, listing: &Listing) -> Result<(), Error> {
        self.inner.insert_listing(listing).await
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, Error> {
        self.inner.find_listing(id).await
    }

    async fn find_listings(&self, ids: Vec<Uuid>) -> Result<Vec<Listing>, Error> {
        self.inner.find_listings(ids).await
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), Error> {
        self.inner.upsert_profile(profile).await
    }

    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, Error> {
        self.inner.find_profile(id).await
    }

    async fn find_profiles(&self, ids: Vec<Uuid>) -> Result<Vec<Profile>, Error> {
        self.inner.find_profiles(ids).await
    }

    async fn insert_rating(&self, rating: &Rating) -> Result<(), Error> {
        self.inner.insert_rating(rating).await
    }

    async fn ratings_for(&self, reviewee_id: Uuid) -> Result<Vec<Rating>, Error> {
        self.inner.ratings_for(reviewee_id).await
    }
}

async fn seeded(store: Arc<SteppedStore>, cache_ttl: Duration) -> (Arc<Engine>, User, User, Listing) {
    let engine =
        Engine::new(store, RetryPolicy::none(), ViewCache::new(cache_ttl)).unwrap();

    let seller = User::new(Uuid::new_v4());
    let buyer = User::new(Uuid::new_v4());

    engine
        .upsert_profile(seller.clone(), "Ayşe".into(), None)
        .await
        .unwrap();
    engine
        .upsert_profile(buyer.clone(), "Mehmet".into(), None)
        .await
        .unwrap();
    let listing = engine
        .create_listing(seller.clone(), "Bisiklet".into(), 500.0, None)
        .await
        .unwrap();

    (Arc::new(engine), seller, buyer, listing)
}

#[tokio::test]
async fn offer_created_during_a_list_is_not_hidden_by_the_cache() {
    let store = Arc::new(SteppedStore::default());
    let (engine, _seller, buyer, listing) = seeded(store.clone(), Duration::from_secs(60)).await;

    store.hold_made_by.store(true, Ordering::SeqCst);

    let listing_task = {
        let engine = engine.clone();
        let buyer = buyer.clone();
        tokio::spawn(async move { engine.list_my_offers(buyer).await })
    };

    // the list has read the store and is paused before caching its result
    store.made_by_read.notified().await;

    engine
        .create_offer(buyer.clone(), listing.id, 450.0, None, false)
        .await
        .unwrap();

    store.made_by_resume.notify_one();

    let stale = listing_task.await.unwrap().unwrap();
    assert!(stale.is_empty());

    let fresh = engine.list_my_offers(buyer).await.unwrap();
    assert_eq!(fresh.len(), 1);
}

#[tokio::test]
async fn concurrent_answers_have_a_single_winner() {
    let store = Arc::new(SteppedStore {
        find_offer_barrier: Some(Barrier::new(2)),
        ..SteppedStore::default()
    });
    let (engine, seller, buyer, listing) = seeded(store.clone(), Duration::ZERO).await;

    let offer = Offer::new(listing.id, buyer.id, 450.0, None, None);
    store.inner.insert_offer(&offer).await.unwrap();

    // both calls read the offer while it is still pending
    let (accepted, rejected) = tokio::join!(
        engine.respond_to_offer(seller.clone(), offer.id, OfferResponse::Accept),
        engine.respond_to_offer(seller.clone(), offer.id, OfferResponse::Reject),
    );

    let stored = store.inner.find_offer(offer.id).await.unwrap().unwrap();

    match (accepted, rejected) {
        (Ok(winner), Err(err)) | (Err(err), Ok(winner)) => {
            assert!(err.is_invalid_state_error());
            assert_eq!(stored.status, winner.status);
        }
        (accepted, rejected) => panic!(
            "expected exactly one answer to win, got {:?} and {:?}",
            accepted.map(|offer| offer.status),
            rejected.map(|offer| offer.status),
        ),
    }
}
