mod listing;
mod offer;
mod profile;
mod rating;
mod view;

pub use listing::Listing;
pub use offer::{
    validate_amount, validate_message, Offer, Response as OfferResponse, Status as OfferStatus,
    MAX_MESSAGE_LEN,
};
pub use profile::Profile;
pub use rating::Rating;
pub use view::{ListingSummary, OfferStats, OfferView, ProfileSummary};
