//! Priced add-ons attached to a deal package.

use chrono::NaiveDate;
use serde::Serialize;

use super::reader::{BuildContext, Fields};
use crate::error::FieldError;

/// Guests a wedding package requires when the contract does not say.
pub const DEFAULT_MIN_GUESTS: u32 = 2;

/// Board basis offered with a deal, e.g. half board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealPlan {
    /// Plan name; required.
    pub name: String,
    /// Supplement per adult.
    pub adult_price: Option<f64>,
    /// Supplement per child.
    pub child_price: Option<f64>,
    /// Infants eat free (default `false`).
    pub infant_free: bool,
    /// Details.
    pub description: Option<String>,
}

impl MealPlan {
    pub(crate) fn from_fields(fields: &Fields<'_>, ctx: &mut BuildContext) -> Result<Self, FieldError> {
        Ok(Self {
            name: fields.required_str("name")?,
            adult_price: fields.opt_number(ctx, "adult_price", 0.0..)?,
            child_price: fields.opt_number(ctx, "child_price", 0.0..)?,
            infant_free: fields.flag_or(ctx, "infant_free", false)?,
            description: fields.opt_str(ctx, "description")?,
        })
    }
}

/// A contract promotion such as "stay 7, pay 5".
///
/// `combined_with` holds indices into the owning package's `special_offers`.
/// It never owns the offers it names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecialOffer {
    /// Contract code, e.g. `EB10`.
    pub code: Option<String>,
    /// Display title.
    pub title: Option<String>,
    /// Details.
    pub description: Option<String>,
    /// Nights needed to qualify (default 1).
    pub min_nights: u32,
    /// Nights given free (default 0).
    pub max_free_nights: u32,
    /// First day the offer applies.
    pub valid_from: Option<NaiveDate>,
    /// Last day the offer applies.
    pub valid_until: Option<NaiveDate>,
    /// Sibling offers this one stacks with.
    pub combined_with: Vec<usize>,
}

impl SpecialOffer {
    /// Builds the offer itself. `combined_with` is resolved later by the
    /// package, once every sibling offer exists.
    pub(crate) fn from_fields(fields: &Fields<'_>, ctx: &mut BuildContext) -> Result<Self, FieldError> {
        Ok(Self {
            code: fields.opt_str(ctx, "code")?,
            title: fields.opt_str(ctx, "title")?,
            description: fields.opt_str(ctx, "description")?,
            min_nights: fields.count_or(ctx, "min_nights", 1, 1)?,
            max_free_nights: fields.count_or(ctx, "max_free_nights", 0, 0)?,
            valid_from: fields.opt_date(ctx, "valid_from")?,
            valid_until: fields.opt_date(ctx, "valid_until")?,
            combined_with: Vec::new(),
        })
    }

    /// Short name for display: the title, else the code.
    #[must_use]
    pub fn label(&self) -> &str {
        self.title
            .as_deref()
            .or(self.code.as_deref())
            .unwrap_or("Untitled offer")
    }

    /// Whether `key` names this offer by code or title.
    pub(crate) fn is_named(&self, key: &str) -> bool {
        self.code.as_deref() == Some(key) || self.title.as_deref() == Some(key)
    }
}

/// A wedding or event package sold through the deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeddingPackage {
    /// Package name; required.
    pub name: String,
    /// Price before extras.
    pub base_price: Option<f64>,
    /// Spelling follows the contract export schema.
    pub comissionable: bool,
    /// Smallest party (default 2).
    pub min_guests: u32,
    /// Details.
    pub description: Option<String>,
    /// Contract code.
    pub code: Option<String>,
}

impl WeddingPackage {
    pub(crate) fn from_fields(fields: &Fields<'_>, ctx: &mut BuildContext) -> Result<Self, FieldError> {
        Ok(Self {
            name: fields.required_str("name")?,
            base_price: fields.opt_number(ctx, "base_price", 0.0..)?,
            comissionable: fields.flag_or(ctx, "comissionable", false)?,
            min_guests: fields.count_or(ctx, "min_guests", DEFAULT_MIN_GUESTS, DEFAULT_MIN_GUESTS)?,
            description: fields.opt_str(ctx, "description")?,
            code: fields.opt_str(ctx, "code")?,
        })
    }
}
