use serde::Serialize;
use serde_json::Value;

use super::reader::{BuildContext, Fields, Mode};
use crate::error::FieldError;

/// The property a deal is sold for.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hotel {
    /// Hotel name; required.
    pub name: String,
    /// Postal address.
    pub address: Option<String>,
    /// Star rating, 0 to 5.
    pub rating: Option<f64>,
    /// Headline nightly price.
    pub price: Option<f64>,
    /// Image URL or placeholder.
    pub image: Option<String>,
    /// Booking or official website.
    pub url: Option<String>,
    /// Marketing description.
    pub description: Option<String>,
}

impl Hotel {
    /// Builds a hotel from a JSON object, failing on any field problem.
    pub fn from_json(value: &Value) -> Result<Self, FieldError> {
        let mut ctx = BuildContext::new(Mode::Strict);
        Self::from_fields(&Fields::of(value, "")?, &mut ctx)
    }

    pub(crate) fn from_fields(fields: &Fields<'_>, ctx: &mut BuildContext) -> Result<Self, FieldError> {
        Ok(Self {
            name: fields.required_str("name")?,
            address: fields.opt_str(ctx, "address")?,
            rating: fields.opt_number(ctx, "rating", 0.0..=5.0)?,
            price: fields.opt_number(ctx, "price", 0.0..)?,
            image: fields.opt_str(ctx, "image")?,
            url: fields.opt_str(ctx, "url")?,
            description: fields.opt_str(ctx, "description")?,
        })
    }
}
