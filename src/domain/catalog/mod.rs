//! Catalog module - Curriculum courses, their offers, and offer normalization.
//!
//! # Components
//!
//! - `offer` - Strict `CourseOffer`/`OfferEvent` shapes with total JSON parsing
//! - `curriculum` - `CurriculumCourse` and curriculum array parsing
//! - `normalizer` - Offer Normalizer producing valid `TimeSlot`s

mod curriculum;
pub(crate) mod fields;
mod normalizer;
mod offer;

pub use curriculum::{parse_curriculum, CurriculumCourse};
pub use normalizer::{normalize, TimeSlot};
pub use offer::{CourseOffer, OfferEvent};
