use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

/// A reviewer's score for the other party of a trade. One per reviewer per listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub reviewer_id: Uuid,
    pub reviewee_id: Uuid,
    pub score: u8,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(
        listing_id: Uuid,
        reviewer_id: Uuid,
        reviewee_id: Uuid,
        score: u8,
        comment: Option<String>,
    ) -> Result<Self, Error> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) || reviewer_id == reviewee_id {
            return Err(Error::invalid_input_error());
        }

        Ok(Self {
            id: Uuid::new_v4(),
            listing_id,
            reviewer_id,
            reviewee_id,
            score,
            comment,
            created_at: Utc::now(),
        })
    }
}

#[test]
fn rating_score_bounds_test() {
    let (listing, reviewer, reviewee) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

    assert!(Rating::new(listing, reviewer, reviewee, 0, None).is_err());
    assert!(Rating::new(listing, reviewer, reviewee, 6, None).is_err());
    assert!(Rating::new(listing, reviewer, reviewer, 5, None).is_err());
    assert_eq!(
        Rating::new(listing, reviewer, reviewee, 4, None).unwrap().score,
        4
    );
}
