//! An editable view of extracted deal packages and their JSON export.
//!
//! Every mutation is validated in strict mode before it touches the stored
//! collection, so a rejected edit leaves the projection exactly as it was.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::FieldError;
use crate::model::reader::{indexed, kind};
use crate::model::{rules, DealPackage, ItemList};
use crate::normalizer::{DealWarning, NormalizedResult};

/// File name offered for the exported collection.
pub const EXPORT_FILE_NAME: &str = "hot_deals.json";

/// MIME type of the exported collection.
pub const EXPORT_MIME_TYPE: &str = "application/json";

#[derive(Serialize)]
struct Export<'a> {
    hot_deals: &'a [DealPackage],
}

/// Owns the deal packages of one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditableProjection {
    packages: Vec<DealPackage>,
}

impl From<NormalizedResult> for EditableProjection {
    /// Takes the packages; normalization warnings stay with the caller.
    fn from(result: NormalizedResult) -> Self {
        Self::new(result.packages)
    }
}

impl EditableProjection {
    /// Wraps an existing collection.
    #[must_use]
    pub const fn new(packages: Vec<DealPackage>) -> Self {
        Self { packages }
    }

    /// Current state, in order.
    #[must_use]
    pub fn get_deal_packages(&self) -> &[DealPackage] {
        &self.packages
    }

    /// Number of deals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether there are no deals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Sets one field of one deal.
    ///
    /// `path` is dot-separated with numeric segments indexing lists, e.g.
    /// `name`, `hotel.rating`, `meal_plans.0.adult_price` or
    /// `special_offers.1.combined_with`.
    ///
    /// # Errors
    ///
    /// Returns a `FieldError` for an unknown deal, field or list index, or
    /// when the edited deal fails strict validation. The projection is
    /// unchanged on error.
    ///
    /// # Examples
    ///
    /// ```
    /// use hot_deals::projection::EditableProjection;
    /// use hot_deals::model::DealPackage;
    /// use serde_json::json;
    ///
    /// let package = DealPackage::from_json(&json!({"name": "A", "hotel": {"name": "H"}})).unwrap();
    /// let mut projection = EditableProjection::new(vec![package]);
    ///
    /// projection.update_field(0, "hotel.rating", json!(4.5)).unwrap();
    /// assert!(projection.update_field(0, "hotel.rating", json!("five")).is_err());
    /// assert_eq!(projection.get_deal_packages()[0].deal.hotel.rating, Some(4.5));
    /// ```
    pub fn update_field(&mut self, deal_index: usize, path: &str, value: Value) -> Result<(), FieldError> {
        let current = self.package(deal_index)?;
        let mut draft = to_value(current)?;
        let slot = locate(&mut draft, path)?;
        *slot = value;

        let edited = DealPackage::from_json(&draft)?;
        debug!(deal = deal_index, path, "updated field");
        self.packages[deal_index] = edited;
        Ok(())
    }

    /// Appends a deal built strictly from `value`, returning its index.
    ///
    /// # Errors
    ///
    /// Returns the first field problem in `value`.
    pub fn add_deal(&mut self, value: &Value) -> Result<usize, FieldError> {
        let package = DealPackage::from_json(value)?;
        self.packages.push(package);
        Ok(self.packages.len() - 1)
    }

    /// Removes and returns the deal at `deal_index`.
    ///
    /// # Errors
    ///
    /// Returns a `FieldError::Validation` if there is no such deal.
    pub fn remove_deal(&mut self, deal_index: usize) -> Result<DealPackage, FieldError> {
        self.package(deal_index)?;
        Ok(self.packages.remove(deal_index))
    }

    /// Appends an item to one of a deal's lists, returning the item's index.
    ///
    /// A new special offer may name existing siblings in `combined_with` by
    /// index, code or title.
    ///
    /// # Errors
    ///
    /// Returns a `FieldError` for an unknown deal or an invalid item.
    pub fn add_item(&mut self, deal_index: usize, list: ItemList, value: &Value) -> Result<usize, FieldError> {
        let item = self.package(deal_index)?.build_item(list, value)?;
        let package = &mut self.packages[deal_index];
        package.push_item(item);
        Ok(package.item_count(list) - 1)
    }

    /// Removes an item from one of a deal's lists.
    ///
    /// # Errors
    ///
    /// Returns a `FieldError::Validation` for an unknown deal or item.
    pub fn remove_item(&mut self, deal_index: usize, list: ItemList, item_index: usize) -> Result<(), FieldError> {
        self.package(deal_index)?;
        if self.packages[deal_index].remove_item(list, item_index) {
            Ok(())
        } else {
            Err(FieldError::validation(
                indexed(list.key(), item_index),
                "no item at this index",
            ))
        }
    }

    /// Consistency warnings for the current state.
    #[must_use]
    pub fn warnings(&self) -> Vec<DealWarning> {
        self.packages
            .iter()
            .enumerate()
            .flat_map(|(index, package)| {
                rules::check(package)
                    .into_iter()
                    .map(move |violation| DealWarning::rule(index, package, violation))
            })
            .collect()
    }

    /// The collection as `{"hot_deals": [...]}`, pretty-printed with two-space indents.
    ///
    /// # Errors
    ///
    /// Returns a serialization error, which only non-finite numbers can cause.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Export {
            hot_deals: &self.packages,
        })
    }

    fn package(&self, deal_index: usize) -> Result<&DealPackage, FieldError> {
        self.packages
            .get(deal_index)
            .ok_or_else(|| FieldError::validation(indexed("hot_deals", deal_index), "no deal at this index"))
    }
}

fn to_value(package: &DealPackage) -> Result<Value, FieldError> {
    serde_json::to_value(package).map_err(|e| FieldError::validation("", e.to_string()))
}

/// Walks a dotted path through an exported deal, returning the addressed slot.
///
/// Only fields the export already contains can be addressed.
fn locate<'a>(root: &'a mut Value, path: &str) -> Result<&'a mut Value, FieldError> {
    if path.is_empty() {
        return Err(FieldError::validation(path, "empty field path"));
    }

    let mut current = root;
    let mut walked = String::new();
    for segment in path.split('.') {
        if !walked.is_empty() {
            walked.push('.');
        }
        walked.push_str(segment);

        current = match current {
            Value::Object(map) => map
                .get_mut(segment)
                .ok_or_else(|| FieldError::validation(walked.as_str(), "unknown field"))?,
            Value::Array(items) => {
                let len = items.len();
                let index: usize = segment.parse().map_err(|_| {
                    FieldError::validation(walked.as_str(), format!("expected a list index, got {segment:?}"))
                })?;
                items.get_mut(index).ok_or_else(|| {
                    FieldError::validation(walked.as_str(), format!("index out of range (list has {len} items)"))
                })?
            }
            other => {
                return Err(FieldError::validation(
                    walked.as_str(),
                    format!("cannot descend into {}", kind(other)),
                ))
            }
        };
    }
    Ok(current)
}
