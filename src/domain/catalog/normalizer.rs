//! Offer Normalizer - turns an offer's raw events into valid weekly time slots.
//!
//! This is the single point where upstream data quality is enforced. Events
//! that cannot be resolved are dropped silently; downstream components may
//! assume every `TimeSlot` is valid.

use serde::{Deserialize, Serialize};

use super::offer::{CourseOffer, OfferEvent};
use crate::domain::foundation::Weekday;

/// A valid weekly interval `[start_hour, end_hour)` on one weekday.
///
/// Invariant: `end_hour > start_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub weekday: Weekday,
    pub start_hour: i32,
    pub end_hour: i32,
}

impl TimeSlot {
    /// Length of the slot in hours. Always positive.
    pub fn duration_hours(&self) -> i32 {
        self.end_hour - self.start_hour
    }

    /// Resolves one event, or `None` when it is malformed.
    pub fn from_event(event: &OfferEvent) -> Option<Self> {
        let weekday = Weekday::from_index(event.weekday?).ok()?;
        let start_hour = event.start_hour?;
        let end_hour = event.end_hour?;
        if end_hour <= start_hour {
            return None;
        }
        Some(Self {
            weekday,
            start_hour,
            end_hour,
        })
    }
}

/// Normalizes an offer into its valid time slots, in event order.
///
/// Never fails: a missing offer or one without usable events yields no slots.
pub fn normalize(offer: Option<&CourseOffer>) -> Vec<TimeSlot> {
    let Some(offer) = offer else {
        return Vec::new();
    };
    offer
        .events
        .iter()
        .filter_map(|event| {
            let slot = TimeSlot::from_event(event);
            if slot.is_none() {
                tracing::trace!(section = %offer.section, ?event, "Dropped malformed offer event");
            }
            slot
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer_with(events: Vec<OfferEvent>) -> CourseOffer {
        events
            .into_iter()
            .fold(CourseOffer::new("A"), |offer, event| offer.with_event(event))
    }

    #[test]
    fn normalize_none_is_empty() {
        assert!(normalize(None).is_empty());
    }

    #[test]
    fn normalize_offer_without_events_is_empty() {
        assert!(normalize(Some(&CourseOffer::new("A"))).is_empty());
    }

    #[test]
    fn normalize_keeps_valid_events_in_order() {
        let offer = offer_with(vec![OfferEvent::new(0, 8, 10), OfferEvent::new(3, 14, 16)]);
        let slots = normalize(Some(&offer));
        assert_eq!(
            slots,
            vec![
                TimeSlot { weekday: Weekday::Monday, start_hour: 8, end_hour: 10 },
                TimeSlot { weekday: Weekday::Thursday, start_hour: 14, end_hour: 16 },
            ]
        );
    }

    #[test]
    fn normalize_keeps_weekend_slots() {
        let offer = offer_with(vec![OfferEvent::new(5, 9, 12)]);
        let slots = normalize(Some(&offer));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].weekday, Weekday::Saturday);
    }

    #[test]
    fn normalize_drops_out_of_range_weekdays() {
        let offer = offer_with(vec![
            OfferEvent::new(7, 8, 10),
            OfferEvent::new(-1, 8, 10),
            OfferEvent::new(1, 8, 10),
        ]);
        let slots = normalize(Some(&offer));
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].weekday, Weekday::Tuesday);
    }

    #[test]
    fn normalize_drops_unresolved_hours() {
        let offer = offer_with(vec![
            OfferEvent { start_hour: None, ..OfferEvent::new(0, 8, 10) },
            OfferEvent { end_hour: None, ..OfferEvent::new(0, 8, 10) },
            OfferEvent { weekday: None, ..OfferEvent::new(0, 8, 10) },
        ]);
        assert!(normalize(Some(&offer)).is_empty());
    }

    #[test]
    fn normalize_drops_empty_and_inverted_intervals() {
        let offer = offer_with(vec![OfferEvent::new(0, 10, 10), OfferEvent::new(0, 12, 8)]);
        assert!(normalize(Some(&offer)).is_empty());
    }

    #[test]
    fn slot_duration_is_end_minus_start() {
        let slot = TimeSlot::from_event(&OfferEvent::new(2, 19, 23)).unwrap();
        assert_eq!(slot.duration_hours(), 4);
    }
}
