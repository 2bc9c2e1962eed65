use chrono::{DateTime, Duration, Utc};
use oso::PolarClass;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Error;
use crate::rules;

/// Upper bound on the free-text note attached to an offer or counter-offer.
pub const MAX_MESSAGE_LEN: usize = 500;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: Uuid,
    pub listing_id: Uuid,
    pub bidder_id: Uuid,
    pub amount: f64,
    pub message: Option<String>,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub counter_offer_amount: Option<f64>,
    pub counter_offer_message: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    Accepted,
    Rejected,
    Countered,
    Expired,
    Cancelled,
}

impl Status {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Countered => "countered",
            Self::Expired => "expired",
            Self::Cancelled => "cancelled",
        }
    }
}

/// What a listing owner can do with an offer made on their listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Response {
    Accept,
    Reject,
    Counter {
        amount: f64,
        message: Option<String>,
    },
}

impl Offer {
    pub fn new(
        listing_id: Uuid,
        bidder_id: Uuid,
        amount: f64,
        message: Option<String>,
        expires_in: Option<Duration>,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4(),
            listing_id,
            bidder_id,
            amount,
            message,
            status: Status::Pending,
            created_at: now,
            updated_at: now,
            expires_at: expires_in.map(|duration| now + duration),
            counter_offer_amount: None,
            counter_offer_message: None,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        rules::is_expired(self.expires_at, now)
    }

    /// Status as the caller should see it. A pending offer past its expiry reads as expired
    /// even when nothing has written that back yet.
    pub fn effective_status(&self, now: DateTime<Utc>) -> Status {
        match self.status {
            Status::Pending if self.is_expired(now) => Status::Expired,
            status => status,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.status != Status::Cancelled
    }

    #[tracing::instrument(skip(self), fields(offer_id = %self.id))]
    pub fn respond(&mut self, response: Response, now: DateTime<Utc>) -> Result<(), Error> {
        match response {
            Response::Accept => self.accept(now),
            Response::Reject => self.reject(now),
            Response::Counter { amount, message } => self.counter(amount, message, now),
        }
    }

    pub fn accept(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        self.ensure_respondable(now)?;
        self.transition(Status::Accepted, now);
        Ok(())
    }

    pub fn reject(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        self.ensure_respondable(now)?;
        self.transition(Status::Rejected, now);
        Ok(())
    }

    pub fn counter(
        &mut self,
        amount: f64,
        message: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<(), Error> {
        validate_amount(amount)?;
        validate_message(message.as_deref())?;
        self.ensure_respondable(now)?;

        self.counter_offer_amount = Some(amount);
        self.counter_offer_message = message;
        self.transition(Status::Countered, now);
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(offer_id = %self.id))]
    pub fn withdraw(&mut self, now: DateTime<Utc>) -> Result<(), Error> {
        match self.effective_status(now) {
            Status::Pending | Status::Countered => {
                self.transition(Status::Cancelled, now);
                Ok(())
            }
            _ => Err(Error::invalid_state_error()),
        }
    }

    /// Writes back a lazily observed expiry. Returns whether anything changed.
    pub fn expire(&mut self, now: DateTime<Utc>) -> bool {
        if self.status == Status::Pending && self.is_expired(now) {
            self.transition(Status::Expired, now);
            return true;
        }

        false
    }

    fn ensure_respondable(&self, now: DateTime<Utc>) -> Result<(), Error> {
        match self.effective_status(now) {
            Status::Pending => Ok(()),
            _ => Err(Error::invalid_state_error()),
        }
    }

    fn transition(&mut self, status: Status, now: DateTime<Utc>) {
        tracing::debug!(from = self.status.name(), to = status.name(), "offer transition");
        self.status = status;
        self.updated_at = now;
    }
}

pub fn validate_amount(amount: f64) -> Result<(), Error> {
    if amount.is_finite() && amount > 0.0 {
        return Ok(());
    }

    Err(Error::invalid_input_error())
}

pub fn validate_message(message: Option<&str>) -> Result<(), Error> {
    match message {
        Some(message) if message.chars().count() > MAX_MESSAGE_LEN => {
            Err(Error::invalid_input_error())
        }
        _ => Ok(()),
    }
}

impl PolarClass for Offer {
    fn get_polar_class_builder() -> oso::ClassBuilder<Offer> {
        oso::Class::builder()
            .name("Offer")
            .add_attribute_getter("id", |recv: &Offer| recv.id.to_string())
            .add_attribute_getter("bidder_id", |recv: &Offer| recv.bidder_id.to_string())
            .add_attribute_getter("status", |recv: &Offer| recv.status.name().to_string())
    }

    fn get_polar_class() -> oso::Class {
        let builder = Offer::get_polar_class_builder();
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_offer() -> Offer {
        Offer::new(Uuid::new_v4(), Uuid::new_v4(), 450.0, None, None)
    }

    #[test]
    fn counter_stores_counter_fields() {
        let mut offer = pending_offer();

        offer
            .respond(
                Response::Counter {
                    amount: 480.0,
                    message: Some("480 olursa anlaşırız".into()),
                },
                Utc::now(),
            )
            .unwrap();

        assert_eq!(offer.status, Status::Countered);
        assert_eq!(offer.counter_offer_amount, Some(480.0));
        assert_eq!(
            offer.counter_offer_message.as_deref(),
            Some("480 olursa anlaşırız")
        );
    }

    #[test]
    fn responses_only_apply_to_pending_offers() {
        let mut offer = pending_offer();
        offer.accept(Utc::now()).unwrap();

        assert!(offer.reject(Utc::now()).unwrap_err().is_invalid_state_error());
        assert!(offer
            .counter(400.0, None, Utc::now())
            .unwrap_err()
            .is_invalid_state_error());
        assert_eq!(offer.status, Status::Accepted);
    }

    #[test]
    fn withdraw_is_refused_once_decided() {
        let mut offer = pending_offer();
        offer.reject(Utc::now()).unwrap();

        assert!(offer.withdraw(Utc::now()).unwrap_err().is_invalid_state_error());

        let mut offer = pending_offer();
        offer.counter(500.0, None, Utc::now()).unwrap();
        offer.withdraw(Utc::now()).unwrap();
        assert_eq!(offer.status, Status::Cancelled);
        assert!(!offer.is_visible());
    }

    #[test]
    fn expired_offer_cannot_be_accepted() {
        let mut offer = Offer::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            100.0,
            None,
            Some(Duration::hours(24)),
        );
        let later = offer.created_at + Duration::hours(25);

        assert_eq!(offer.effective_status(later), Status::Expired);
        assert!(offer.accept(later).unwrap_err().is_invalid_state_error());
        assert!(offer.expire(later));
        assert_eq!(offer.status, Status::Expired);
        assert!(!offer.expire(later));
    }

    #[test]
    fn counter_amount_must_be_positive() {
        let mut offer = pending_offer();

        assert!(offer
            .counter(0.0, None, Utc::now())
            .unwrap_err()
            .is_invalid_input_error());
        assert!(offer
            .counter(f64::NAN, None, Utc::now())
            .unwrap_err()
            .is_invalid_input_error());
        assert_eq!(offer.status, Status::Pending);
    }

    #[test]
    fn message_length_is_bounded() {
        let long = "a".repeat(MAX_MESSAGE_LEN + 1);
        assert!(validate_message(Some(&long)).is_err());
        assert!(validate_message(Some(&"ş".repeat(MAX_MESSAGE_LEN))).is_ok());
        assert!(validate_message(None).is_ok());
    }
}
