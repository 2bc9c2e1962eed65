use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{Listing, Offer, OfferStatus, Profile};
use crate::rules;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListingSummary {
    pub id: Uuid,
    pub title: String,
    pub image_url: Option<String>,
    pub price: f64,
}

impl ListingSummary {
    /// Offers keep pointing at listings that may since have disappeared.
    fn missing(id: Uuid) -> Self {
        Self {
            id,
            title: String::new(),
            image_url: None,
            price: 0.0,
        }
    }
}

impl From<&Listing> for ListingSummary {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id,
            title: listing.title.clone(),
            image_url: listing.image_url.clone(),
            price: listing.price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl ProfileSummary {
    fn missing(id: Uuid) -> Self {
        Self {
            id,
            display_name: None,
            avatar_url: None,
        }
    }
}

impl From<&Profile> for ProfileSummary {
    fn from(profile: &Profile) -> Self {
        Self {
            id: profile.id,
            display_name: Some(profile.display_name.clone()),
            avatar_url: profile.avatar_url.clone(),
        }
    }
}

/// An offer joined with what a reader needs to display it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OfferView {
    #[serde(flatten)]
    pub offer: Offer,
    pub effective_status: OfferStatus,
    pub listing: ListingSummary,
    pub counterparty: ProfileSummary,
    pub is_expired: bool,
    pub time_left: Option<String>,
    pub price_difference: f64,
    pub price_difference_percentage: Option<i64>,
}

impl OfferView {
    pub fn assemble(
        offer: Offer,
        listing: Option<&Listing>,
        counterparty_id: Uuid,
        counterparty: Option<&Profile>,
        now: DateTime<Utc>,
    ) -> Self {
        let listing = listing
            .map(ListingSummary::from)
            .unwrap_or_else(|| ListingSummary::missing(offer.listing_id));
        let counterparty = counterparty
            .map(ProfileSummary::from)
            .unwrap_or_else(|| ProfileSummary::missing(counterparty_id));

        Self {
            effective_status: offer.effective_status(now),
            is_expired: offer.is_expired(now),
            time_left: rules::time_left(offer.expires_at, now),
            price_difference: rules::price_difference(offer.amount, listing.price),
            price_difference_percentage: rules::price_difference_percentage(
                offer.amount,
                listing.price,
            ),
            offer,
            listing,
            counterparty,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OfferStats {
    pub total_made: usize,
    pub total_received: usize,
    pub pending_made: usize,
    pub pending_received: usize,
    pub accepted_made: usize,
    pub accepted_received: usize,
    pub success_rate: f64,
}

impl OfferStats {
    pub fn compute(made: &[Offer], received: &[Offer], now: DateTime<Utc>) -> Self {
        let count = |offers: &[Offer], status: OfferStatus| {
            offers
                .iter()
                .filter(|offer| offer.is_visible() && offer.effective_status(now) == status)
                .count()
        };
        let visible = |offers: &[Offer]| offers.iter().filter(|offer| offer.is_visible()).count();

        let total_made = visible(made);
        let accepted_made = count(made, OfferStatus::Accepted);

        Self {
            total_made,
            total_received: visible(received),
            pending_made: count(made, OfferStatus::Pending),
            pending_received: count(received, OfferStatus::Pending),
            accepted_made,
            accepted_received: count(received, OfferStatus::Accepted),
            success_rate: rules::success_rate(accepted_made, total_made),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn assemble_derives_price_delta() {
        let owner = Uuid::new_v4();
        let listing = Listing::new(owner, "Bisiklet".into(), 500.0, None).unwrap();
        let offer = Offer::new(listing.id, Uuid::new_v4(), 450.0, None, None);

        let view = OfferView::assemble(offer, Some(&listing), owner, None, Utc::now());

        assert_eq!(view.price_difference, -50.0);
        assert_eq!(view.price_difference_percentage, Some(-10));
        assert_eq!(view.listing.title, "Bisiklet");
        assert_eq!(view.counterparty.id, owner);
        assert_eq!(view.counterparty.display_name, None);
        assert_eq!(view.time_left, None);
    }

    #[test]
    fn missing_listing_yields_placeholder() {
        let offer = Offer::new(Uuid::new_v4(), Uuid::new_v4(), 10.0, None, None);
        let listing_id = offer.listing_id;

        let view = OfferView::assemble(offer, None, Uuid::new_v4(), None, Utc::now());

        assert_eq!(view.listing.id, listing_id);
        assert_eq!(view.price_difference_percentage, None);
    }

    #[test]
    fn stats_use_effective_status() {
        let now = Utc::now();
        let listing_id = Uuid::new_v4();
        let bidder = Uuid::new_v4();

        let mut accepted = Offer::new(listing_id, bidder, 100.0, None, None);
        accepted.accept(now).unwrap();
        let mut withdrawn = Offer::new(listing_id, bidder, 100.0, None, None);
        withdrawn.withdraw(now).unwrap();
        let stale = Offer::new(listing_id, bidder, 100.0, None, Some(Duration::hours(24)));
        let pending = Offer::new(listing_id, bidder, 100.0, None, None);

        let made = vec![accepted, withdrawn, stale, pending];
        let stats = OfferStats::compute(&made, &[], now + Duration::hours(25));

        assert_eq!(stats.total_made, 3);
        assert_eq!(stats.accepted_made, 1);
        assert_eq!(stats.pending_made, 1);
        assert_eq!(stats.total_received, 0);
        assert!((stats.success_rate - 33.33).abs() < 0.01);
    }

    #[test]
    fn stats_without_offers_have_zero_success_rate() {
        let stats = OfferStats::compute(&[], &[], Utc::now());

        assert_eq!(stats, OfferStats::default());
        assert!(!stats.success_rate.is_nan());
    }
}
