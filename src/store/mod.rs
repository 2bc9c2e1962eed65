mod memory;
mod mock_data;
mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::entities::{Listing, Offer, OfferStatus, Profile, Rating};
use crate::error::Error;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence seen by the engine. Chosen once at startup: `MemoryStore` in mock mode,
/// `PgStore` against a live database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    async fn insert_offer(&self, offer: &Offer) -> Result<(), Error>;
    /// Replaces the stored offer only while it still has the `expected` status. A lost race
    /// fails with an invalid-state error and leaves the stored offer untouched.
    async fn update_offer(&self, offer: &Offer, expected: OfferStatus) -> Result<(), Error>;
    async fn find_offer(&self, id: Uuid) -> Result<Option<Offer>, Error>;
    /// Offers placed by `bidder_id`, newest first.
    async fn offers_made_by(&self, bidder_id: Uuid) -> Result<Vec<Offer>, Error>;
    /// Offers placed on listings owned by `owner_id`, newest first.
    async fn offers_received_by(&self, owner_id: Uuid) -> Result<Vec<Offer>, Error>;

    async fn insert_listing(&self, listing: &Listing) -> Result<(), Error>;
    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, Error>;
    async fn find_listings(&self, ids: Vec<Uuid>) -> Result<Vec<Listing>, Error>;

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), Error>;
    async fn find_profile(&self, id: Uuid) -> Result<Option<Profile>, Error>;
    async fn find_profiles(&self, ids: Vec<Uuid>) -> Result<Vec<Profile>, Error>;

    /// Fails with an already-rated error when the reviewer rated this listing before.
    async fn insert_rating(&self, rating: &Rating) -> Result<(), Error>;
    async fn ratings_for(&self, reviewee_id: Uuid) -> Result<Vec<Rating>, Error>;
}
