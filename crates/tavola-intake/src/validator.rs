// SPDX-FileCopyrightText: 2026 Tavola Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slot validation for incoming dining requests.
//!
//! Validation is fail-fast: slots are checked in a fixed order and the first
//! violation wins, so the dialog layer can re-prompt for exactly one slot.

use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Weekday};
use regex::Regex;
use thiserror::Error;

use tavola_core::{Cuisine, FulfillmentRequest, RequestId, ServiceArea, UserKey};

static ADDRESS_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Pragmatic shape check, not RFC 5322.
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
});

/// Raw, untrusted slot values as collected by the dialog layer.
#[derive(Debug, Clone, Default)]
pub struct RawSlots {
    pub location: String,
    pub cuisine: String,
    pub party_size: String,
    pub dining_date: String,
    pub dining_time: String,
    pub contact_address: String,
}

/// A single-slot validation failure.
///
/// Each variant maps to the slot that must be re-collected; use
/// [`ValidationError::violated_slot`] to drive the re-prompt.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error(
        "no suggestions for {value:?}; supported areas are Manhattan, Brooklyn, Queens, Bronx, \
         Staten Island, Jersey City, Hoboken, and Long Island City"
    )]
    InvalidLocation { value: String },

    #[error(
        "no suggestions for {value:?} cuisine; try Japanese, Italian, Chinese, Mexican, Indian, \
         Thai, Korean, French, Mediterranean, American, Vietnamese, or Spanish"
    )]
    InvalidCuisine { value: String },

    #[error("party size must be a number between 1 and 20, got {value:?}")]
    OutOfRangePartySize { value: String },

    #[error("dining date {value:?} is unrecognized or not in the future")]
    PastDate { value: String },

    #[error("dining time {value:?} is unrecognized")]
    InvalidTime { value: String },

    #[error("contact address {value:?} is not a valid email address")]
    InvalidAddress { value: String },
}

impl ValidationError {
    /// The slot the dialog layer should re-prompt for.
    pub fn violated_slot(&self) -> &'static str {
        match self {
            ValidationError::InvalidLocation { .. } => "location",
            ValidationError::InvalidCuisine { .. } => "cuisine",
            ValidationError::OutOfRangePartySize { .. } => "party_size",
            ValidationError::PastDate { .. } => "dining_date",
            ValidationError::InvalidTime { .. } => "dining_time",
            ValidationError::InvalidAddress { .. } => "contact_address",
        }
    }
}

/// Validate raw slots into an immutable [`FulfillmentRequest`].
///
/// `now` supplies both the current instant and the service time zone;
/// relative dates ("today", "tomorrow", weekday names) resolve against it.
/// The resolved dining instant must be strictly in the future.
pub fn validate(
    slots: &RawSlots,
    user_key: &UserKey,
    now: DateTime<FixedOffset>,
) -> Result<FulfillmentRequest, ValidationError> {
    let area = ServiceArea::from_str(slots.location.trim()).map_err(|_| {
        ValidationError::InvalidLocation {
            value: slots.location.clone(),
        }
    })?;

    let cuisine = Cuisine::from_str(slots.cuisine.trim()).map_err(|_| {
        ValidationError::InvalidCuisine {
            value: slots.cuisine.clone(),
        }
    })?;

    let party_size: u8 = slots
        .party_size
        .trim()
        .parse()
        .ok()
        .filter(|n| (1..=20).contains(n))
        .ok_or_else(|| ValidationError::OutOfRangePartySize {
            value: slots.party_size.clone(),
        })?;

    let date = resolve_date(&slots.dining_date, now.date_naive()).ok_or_else(|| {
        ValidationError::PastDate {
            value: slots.dining_date.clone(),
        }
    })?;

    let time = resolve_time(&slots.dining_time).ok_or_else(|| ValidationError::InvalidTime {
        value: slots.dining_time.clone(),
    })?;

    let dining_at = date
        .and_time(time)
        .and_local_timezone(*now.offset())
        .single()
        .ok_or_else(|| ValidationError::InvalidTime {
            value: slots.dining_time.clone(),
        })?;
    if dining_at <= now {
        return Err(ValidationError::PastDate {
            value: slots.dining_date.clone(),
        });
    }

    let contact_address = slots.contact_address.trim();
    if !ADDRESS_RE.is_match(contact_address) {
        return Err(ValidationError::InvalidAddress {
            value: slots.contact_address.clone(),
        });
    }

    Ok(FulfillmentRequest {
        request_id: RequestId::generate(),
        user_key: user_key.clone(),
        area,
        cuisine,
        party_size,
        dining_at,
        contact_address: contact_address.to_string(),
    })
}

/// Resolve a date slot against today's date in the service zone.
///
/// Accepts `today`, `tomorrow`, weekday names (next occurrence, today
/// included), and ISO `YYYY-MM-DD`.
fn resolve_date(value: &str, today: NaiveDate) -> Option<NaiveDate> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "today" | "tonight" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        _ => {}
    }
    if let Ok(weekday) = Weekday::from_str(&value) {
        let ahead =
            (weekday.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7;
        return Some(today + Duration::days(i64::from(ahead)));
    }
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").ok()
}

/// Resolve a time slot.
///
/// Accepts 24-hour `HH:MM`, `H[:MM] am|pm`, and the word `tonight` (19:00).
fn resolve_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim().to_ascii_lowercase();
    if value == "tonight" {
        return NaiveTime::from_hms_opt(19, 0, 0);
    }
    // chrono cannot parse an hour without minutes, so expand "7 pm" and
    // "7pm" to "7:00 pm" first.
    let normalized = match value.strip_suffix("am").or_else(|| value.strip_suffix("pm")) {
        Some(head) if !head.contains(':') => {
            format!("{}:00 {}", head.trim(), &value[value.len() - 2..])
        }
        _ => value.clone(),
    };
    for format in ["%H:%M", "%I:%M %p", "%I:%M%p"] {
        if let Ok(time) = NaiveTime::parse_from_str(&normalized, format) {
            return Some(time);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> FixedOffset {
        FixedOffset::west_opt(5 * 3600).unwrap()
    }

    fn wednesday_noon() -> DateTime<FixedOffset> {
        // 2026-09-02 is a Wednesday.
        "2026-09-02T12:00:00-05:00".parse().unwrap()
    }

    fn valid_slots() -> RawSlots {
        RawSlots {
            location: "Manhattan".to_string(),
            cuisine: "Japanese".to_string(),
            party_size: "4".to_string(),
            dining_date: "tomorrow".to_string(),
            dining_time: "7:30 pm".to_string(),
            contact_address: "diner@example.com".to_string(),
        }
    }

    #[test]
    fn valid_slots_produce_request_with_fresh_id() {
        let key = UserKey::derive("session-1");
        let first = validate(&valid_slots(), &key, wednesday_noon()).unwrap();
        let second = validate(&valid_slots(), &key, wednesday_noon()).unwrap();

        assert_ne!(first.request_id, second.request_id);
        assert_eq!(first.area, ServiceArea::Manhattan);
        assert_eq!(first.cuisine, Cuisine::Japanese);
        assert_eq!(first.party_size, 4);
        assert_eq!(first.dining_at.to_rfc3339(), "2026-09-03T19:30:00-05:00");
        assert_eq!(first.contact_address, "diner@example.com");
    }

    #[test]
    fn location_is_case_insensitive_and_multiword() {
        let key = UserKey::derive("s");
        let mut slots = valid_slots();
        slots.location = "staten island".to_string();
        let request = validate(&slots, &key, wednesday_noon()).unwrap();
        assert_eq!(request.area, ServiceArea::StatenIsland);
    }

    #[test]
    fn unknown_location_names_the_slot() {
        let mut slots = valid_slots();
        slots.location = "Boston".to_string();
        let err = validate(&slots, &UserKey::derive("s"), wednesday_noon()).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidLocation { .. }));
        assert_eq!(err.violated_slot(), "location");
    }

    #[test]
    fn unknown_cuisine_names_the_slot() {
        let mut slots = valid_slots();
        slots.cuisine = "Martian".to_string();
        let err = validate(&slots, &UserKey::derive("s"), wednesday_noon()).unwrap_err();
        assert_eq!(err.violated_slot(), "cuisine");
    }

    #[test]
    fn party_size_bounds_are_exclusive_of_zero_and_twentyone() {
        for bad in ["0", "21", "-3", "four"] {
            let mut slots = valid_slots();
            slots.party_size = bad.to_string();
            let err = validate(&slots, &UserKey::derive("s"), wednesday_noon()).unwrap_err();
            assert!(
                matches!(err, ValidationError::OutOfRangePartySize { .. }),
                "{bad} should be rejected"
            );
        }
        for good in ["1", "20"] {
            let mut slots = valid_slots();
            slots.party_size = good.to_string();
            assert!(validate(&slots, &UserKey::derive("s"), wednesday_noon()).is_ok());
        }
    }

    #[test]
    fn past_instant_is_rejected_even_for_today() {
        let mut slots = valid_slots();
        slots.dining_date = "today".to_string();
        slots.dining_time = "11:00".to_string();
        let err = validate(&slots, &UserKey::derive("s"), wednesday_noon()).unwrap_err();
        assert!(matches!(err, ValidationError::PastDate { .. }));
        assert_eq!(err.violated_slot(), "dining_date");
    }

    #[test]
    fn weekday_resolves_to_next_occurrence() {
        // From Wednesday, "friday" is two days out.
        assert_eq!(
            resolve_date("friday", wednesday_noon().date_naive()),
            Some(NaiveDate::from_ymd_opt(2026, 9, 4).unwrap())
        );
        // The same weekday resolves to today, not next week.
        assert_eq!(
            resolve_date("wednesday", wednesday_noon().date_naive()),
            Some(NaiveDate::from_ymd_opt(2026, 9, 2).unwrap())
        );
    }

    #[test]
    fn iso_dates_parse() {
        assert_eq!(
            resolve_date("2026-12-25", wednesday_noon().date_naive()),
            Some(NaiveDate::from_ymd_opt(2026, 12, 25).unwrap())
        );
        assert_eq!(resolve_date("someday", wednesday_noon().date_naive()), None);
    }

    #[test]
    fn time_formats() {
        assert_eq!(resolve_time("19:30"), NaiveTime::from_hms_opt(19, 30, 0));
        assert_eq!(resolve_time("7:30 pm"), NaiveTime::from_hms_opt(19, 30, 0));
        assert_eq!(resolve_time("7 pm"), NaiveTime::from_hms_opt(19, 0, 0));
        assert_eq!(resolve_time("7pm"), NaiveTime::from_hms_opt(19, 0, 0));
        assert_eq!(resolve_time("9 am"), NaiveTime::from_hms_opt(9, 0, 0));
        assert_eq!(resolve_time("12 pm"), NaiveTime::from_hms_opt(12, 0, 0));
        assert_eq!(resolve_time("tonight"), NaiveTime::from_hms_opt(19, 0, 0));
        assert_eq!(resolve_time("half past"), None);
        assert_eq!(resolve_time("spam"), None);
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for bad in ["not-an-email", "a@b", "a b@c.com", ""] {
            let mut slots = valid_slots();
            slots.contact_address = bad.to_string();
            let err = validate(&slots, &UserKey::derive("s"), wednesday_noon()).unwrap_err();
            assert_eq!(err.violated_slot(), "contact_address", "{bad}");
        }
    }

    #[test]
    fn zone_offset_is_reflected_in_dining_at() {
        let key = UserKey::derive("s");
        let now = wednesday_noon().with_timezone(&zone());
        let request = validate(&valid_slots(), &key, now).unwrap();
        assert_eq!(request.dining_at.offset(), &zone());
    }
}
