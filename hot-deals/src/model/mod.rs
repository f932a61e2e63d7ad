//! Typed hot-deal entities and their lenient construction from JSON.
//!
//! - [`DealPackage`] - a [`Deal`] with its meal plans, special offers and wedding packages
//! - [`OpenEnum`] - vocabulary values that survive unknown input
//! - [`Mode`] - strict construction for edits, lenient for model output
//! - [`rules`] - consistency checks reported as warnings

mod deal;
mod hotel;
mod items;
mod package;
pub(crate) mod reader;
pub mod rules;
mod vocab;

pub use deal::{Deal, DealInclusion, DEFAULT_MINIMUM_NIGHTS};
pub use hotel::Hotel;
pub use items::{MealPlan, SpecialOffer, WeddingPackage, DEFAULT_MIN_GUESTS};
pub(crate) use package::Item;
pub use package::{DealPackage, ItemList};
pub use reader::Mode;
pub use rules::RuleViolation;
pub use vocab::{DealKind, DealType, InclusionCategory, InclusionKind, OpenEnum, Vocabulary};
