use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use super::hotel::Hotel;
use super::reader::{BuildContext, Fields, Mode};
use super::vocab::{DealType, InclusionCategory};
use crate::error::FieldError;

/// Nights a deal requires when the contract does not say.
pub const DEFAULT_MINIMUM_NIGHTS: u32 = 1;

/// A marketable hot deal for one hotel.
///
/// Field order matches the export schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    /// Deal name; required.
    pub name: String,
    /// Marketing category, e.g. `limited_time`.
    pub deal_type: Option<DealType>,
    /// The hotel the deal is sold for; required.
    pub hotel: Hotel,
    /// Long-form description.
    pub description: Option<String>,
    /// Short catchy title.
    pub marketing_headline: Option<String>,
    /// Line under the headline.
    pub marketing_subtitle: Option<String>,
    /// Call to book now.
    pub urgency_message: Option<String>,
    /// Price before the discount.
    pub original_display_price: Option<f64>,
    /// Price after the discount.
    pub discounted_display_price: Option<f64>,
    /// Discount in percent; negative when the price went up.
    pub savings_percentage: Option<f64>,
    /// First day the deal can be sold.
    pub valid_from: Option<NaiveDate>,
    /// Last day the deal can be sold.
    pub valid_until: Option<NaiveDate>,
    /// Last day to book.
    pub booking_deadline: Option<NaiveDate>,
    /// Shortest stay.
    pub minimum_nights: u32,
    /// Longest stay, if capped.
    pub maximum_nights: Option<u32>,
    /// Earliest check-in.
    pub travel_dates_from: Option<NaiveDate>,
    /// Latest check-out.
    pub travel_dates_until: Option<NaiveDate>,
    /// Perks bundled into the deal.
    pub deal_inclusions: Vec<DealInclusion>,
}

impl Deal {
    pub(crate) fn from_fields(fields: &Fields<'_>, ctx: &mut BuildContext) -> Result<Self, FieldError> {
        let name = fields.required_str("name")?;
        let hotel = Hotel::from_fields(&fields.required_object("hotel")?, ctx)?;

        let deal_inclusions = fields
            .items(ctx, "deal_inclusions", DealInclusion::from_fields)?
            .into_iter()
            .map(|(_, inclusion)| inclusion)
            .collect();

        Ok(Self {
            name,
            deal_type: fields.opt_str(ctx, "deal_type")?.map(|raw| DealType::parse(&raw)),
            hotel,
            description: fields.opt_str(ctx, "description")?,
            marketing_headline: fields.opt_str(ctx, "marketing_headline")?,
            marketing_subtitle: fields.opt_str(ctx, "marketing_subtitle")?,
            urgency_message: fields.opt_str(ctx, "urgency_message")?,
            original_display_price: fields.opt_number(ctx, "original_display_price", 0.0..)?,
            discounted_display_price: fields.opt_number(ctx, "discounted_display_price", 0.0..)?,
            savings_percentage: fields.opt_number(ctx, "savings_percentage", ..)?,
            valid_from: fields.opt_date(ctx, "valid_from")?,
            valid_until: fields.opt_date(ctx, "valid_until")?,
            booking_deadline: fields.opt_date(ctx, "booking_deadline")?,
            minimum_nights: fields.count_or(ctx, "minimum_nights", DEFAULT_MINIMUM_NIGHTS, 0)?,
            maximum_nights: fields.opt_count(ctx, "maximum_nights", 0)?,
            travel_dates_from: fields.opt_date(ctx, "travel_dates_from")?,
            travel_dates_until: fields.opt_date(ctx, "travel_dates_until")?,
            deal_inclusions,
        })
    }
}

/// A perk bundled into a deal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealInclusion {
    /// Short name of the perk; required.
    pub title: String,
    /// Details.
    pub description: Option<String>,
    /// Kind of perk, e.g. `meal`.
    pub category: Option<InclusionCategory>,
}

impl DealInclusion {
    /// Builds an inclusion from a JSON object, failing on any field problem.
    pub fn from_json(value: &Value) -> Result<Self, FieldError> {
        let mut ctx = BuildContext::new(Mode::Strict);
        Self::from_fields(&Fields::of(value, "")?, &mut ctx)
    }

    pub(crate) fn from_fields(fields: &Fields<'_>, ctx: &mut BuildContext) -> Result<Self, FieldError> {
        Ok(Self {
            title: fields.required_str("title")?,
            description: fields.opt_str(ctx, "description")?,
            category: fields
                .opt_str(ctx, "category")?
                .map(|raw| InclusionCategory::parse(&raw)),
        })
    }
}
