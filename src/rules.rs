//! Derived, display-facing values computed from stored offer fields.
//!
//! Everything here is pure; callers pass `now` so that results are reproducible.

use chrono::{DateTime, Utc};

pub const EXPIRED_LABEL: &str = "Süresi doldu";

/// Human readable remaining time until `expires_at`, in Turkish.
pub fn time_left(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<String> {
    let expires_at = expires_at?;

    if now > expires_at {
        return Some(EXPIRED_LABEL.into());
    }

    let remaining = expires_at - now;

    let label = if remaining.num_days() > 0 {
        format!("{} gün kaldı", remaining.num_days())
    } else if remaining.num_hours() > 0 {
        format!("{} saat kaldı", remaining.num_hours())
    } else {
        format!("{} dakika kaldı", remaining.num_minutes())
    };

    Some(label)
}

pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expires_at {
        Some(expires_at) => now > expires_at,
        None => false,
    }
}

pub fn price_difference(amount: f64, listing_price: f64) -> f64 {
    amount - listing_price
}

/// Percentage of `listing_price` the offer is above (or below) it, with halves rounded up
/// (-2.5 becomes -2) the way the listing pages display it.
/// `None` for a zero-priced listing, where there is no meaningful ratio.
pub fn price_difference_percentage(amount: f64, listing_price: f64) -> Option<i64> {
    if listing_price == 0.0 {
        return None;
    }

    let percentage = price_difference(amount, listing_price) * 100.0 / listing_price;

    Some((percentage + 0.5).floor() as i64)
}

pub fn success_rate(accepted: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }

    accepted as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn expiry_compares_against_now() {
        let now = Utc::now();

        assert!(is_expired(Some(now - Duration::seconds(1)), now));
        assert!(is_expired(Some(now - Duration::days(30)), now));
        assert!(!is_expired(Some(now + Duration::seconds(1)), now));
        assert!(!is_expired(Some(now), now));
        assert!(!is_expired(None, now));
    }

    #[test]
    fn time_left_picks_largest_unit() {
        let now = Utc::now();

        assert_eq!(
            time_left(Some(now + Duration::days(2) + Duration::hours(3)), now).as_deref(),
            Some("2 gün kaldı")
        );
        assert_eq!(
            time_left(Some(now + Duration::hours(23) + Duration::minutes(59)), now).as_deref(),
            Some("23 saat kaldı")
        );
        assert_eq!(
            time_left(Some(now + Duration::minutes(42)), now).as_deref(),
            Some("42 dakika kaldı")
        );
        assert_eq!(
            time_left(Some(now - Duration::minutes(1)), now).as_deref(),
            Some(EXPIRED_LABEL)
        );
        assert_eq!(time_left(None, now), None);
    }

    #[test]
    fn price_difference_below_listing() {
        assert_eq!(price_difference(450.0, 500.0), -50.0);
        assert_eq!(price_difference_percentage(450.0, 500.0), Some(-10));
    }

    #[test]
    fn price_difference_percentage_rounds() {
        assert_eq!(price_difference_percentage(1000.0, 300.0), Some(233));
        assert_eq!(price_difference_percentage(200.0, 300.0), Some(-33));
        assert_eq!(price_difference_percentage(300.0, 300.0), Some(0));
    }

    #[test]
    fn price_difference_percentage_rounds_halves_up() {
        assert_eq!(price_difference_percentage(195.0, 200.0), Some(-2));
        assert_eq!(price_difference_percentage(205.0, 200.0), Some(3));
    }

    #[test]
    fn zero_priced_listing_has_no_percentage() {
        assert_eq!(price_difference(25.0, 0.0), 25.0);
        assert_eq!(price_difference_percentage(25.0, 0.0), None);
    }

    #[test]
    fn success_rate_guards_zero_total() {
        assert_eq!(success_rate(0, 0), 0.0);
        assert_eq!(success_rate(1, 4), 25.0);
        assert_eq!(success_rate(3, 3), 100.0);
    }
}
