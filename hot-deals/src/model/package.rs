use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::deal::{Deal, DealInclusion};
use super::items::{MealPlan, SpecialOffer, WeddingPackage};
use super::reader::{indexed, kind, BuildContext, Fields, Mode};
use crate::error::FieldError;

/// The nested lists of a deal package, addressed by their export key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemList {
    /// `deal_inclusions`
    DealInclusions,
    /// `meal_plans`
    MealPlans,
    /// `special_offers`
    SpecialOffers,
    /// `wedding_packages`
    WeddingPackages,
}

impl ItemList {
    /// Every list, in export order.
    pub const ALL: [Self; 4] = [
        Self::DealInclusions,
        Self::MealPlans,
        Self::SpecialOffers,
        Self::WeddingPackages,
    ];

    /// The export key of this list.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::DealInclusions => "deal_inclusions",
            Self::MealPlans => "meal_plans",
            Self::SpecialOffers => "special_offers",
            Self::WeddingPackages => "wedding_packages",
        }
    }

    /// Looks a list up by its export key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|list| list.key() == key)
    }
}

impl fmt::Display for ItemList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One deal with its meal plans, special offers and wedding packages.
///
/// This is the unit of editing and export. It serializes flat: the deal's
/// fields first, then the three lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DealPackage {
    /// The deal itself, serialized inline.
    #[serde(flatten)]
    pub deal: Deal,
    /// Board options with per-person prices.
    pub meal_plans: Vec<MealPlan>,
    /// Promotions that apply on top of the deal.
    pub special_offers: Vec<SpecialOffer>,
    /// Wedding add-ons.
    pub wedding_packages: Vec<WeddingPackage>,
}

impl DealPackage {
    /// Builds a package from one exported deal object, failing on any field problem.
    ///
    /// # Examples
    ///
    /// ```
    /// use hot_deals::model::DealPackage;
    /// use serde_json::json;
    ///
    /// let package = DealPackage::from_json(&json!({
    ///     "name": "Island Escape",
    ///     "hotel": {"name": "Coral Bay Resort"}
    /// }))
    /// .unwrap();
    /// assert_eq!(package.deal.minimum_nights, 1);
    /// ```
    pub fn from_json(value: &Value) -> Result<Self, FieldError> {
        Self::parse(value, Mode::Strict).map(|(package, _)| package)
    }

    /// Builds a package in the given mode, returning it with the field
    /// problems that lenient mode downgraded.
    ///
    /// Missing required fields (`name`, `hotel`, `hotel.name`) fail in
    /// either mode.
    pub fn parse(value: &Value, mode: Mode) -> Result<(Self, Vec<FieldError>), FieldError> {
        let mut ctx = BuildContext::new(mode);
        let package = Self::build(value, &mut ctx)?;
        Ok((package, ctx.take_downgraded()))
    }

    pub(crate) fn build(value: &Value, ctx: &mut BuildContext) -> Result<Self, FieldError> {
        let fields = Fields::of(value, "")?;
        let deal = Deal::from_fields(&fields, ctx)?;

        let meal_plans = fields
            .items(ctx, "meal_plans", MealPlan::from_fields)?
            .into_iter()
            .map(|(_, plan)| plan)
            .collect();
        let offers = fields.items(ctx, "special_offers", SpecialOffer::from_fields)?;
        let raw_offers = fields
            .get("special_offers")
            .and_then(Value::as_array)
            .map_or(&[][..], Vec::as_slice);
        let special_offers = resolve_combinations(offers, raw_offers, ctx)?;
        let wedding_packages = fields
            .items(ctx, "wedding_packages", WeddingPackage::from_fields)?
            .into_iter()
            .map(|(_, wedding)| wedding)
            .collect();

        Ok(Self {
            deal,
            meal_plans,
            special_offers,
            wedding_packages,
        })
    }

    /// Builds a single list item, failing on any field problem.
    pub(crate) fn build_item(&self, list: ItemList, value: &Value) -> Result<Item, FieldError> {
        let mut ctx = BuildContext::new(Mode::Strict);
        let index = self.item_count(list);
        let path = indexed(list.key(), index);
        let fields = Fields::of(value, &path)?;
        Ok(match list {
            ItemList::DealInclusions => Item::Inclusion(DealInclusion::from_fields(&fields, &mut ctx)?),
            ItemList::MealPlans => Item::MealPlan(MealPlan::from_fields(&fields, &mut ctx)?),
            ItemList::SpecialOffers => {
                let offer = SpecialOffer::from_fields(&fields, &mut ctx)?;
                let mut siblings: Vec<(usize, SpecialOffer)> =
                    self.special_offers.iter().cloned().enumerate().collect();
                siblings.push((index, offer));
                let mut raw: Vec<Value> = vec![Value::Null; index];
                raw.push(value.clone());
                let mut resolved = resolve_combinations(siblings, &raw, &mut ctx)?;
                match resolved.pop() {
                    Some(offer) => Item::SpecialOffer(offer),
                    None => return Err(FieldError::validation(path, "offer could not be built")),
                }
            }
            ItemList::WeddingPackages => Item::Wedding(WeddingPackage::from_fields(&fields, &mut ctx)?),
        })
    }

    /// Appends an item built by [`Self::build_item`].
    pub(crate) fn push_item(&mut self, item: Item) {
        match item {
            Item::Inclusion(inclusion) => self.deal.deal_inclusions.push(inclusion),
            Item::MealPlan(plan) => self.meal_plans.push(plan),
            Item::SpecialOffer(offer) => self.special_offers.push(offer),
            Item::Wedding(wedding) => self.wedding_packages.push(wedding),
        }
    }

    /// Number of items in `list`.
    #[must_use]
    pub fn item_count(&self, list: ItemList) -> usize {
        match list {
            ItemList::DealInclusions => self.deal.deal_inclusions.len(),
            ItemList::MealPlans => self.meal_plans.len(),
            ItemList::SpecialOffers => self.special_offers.len(),
            ItemList::WeddingPackages => self.wedding_packages.len(),
        }
    }

    /// Removes the item at `index`, returning `false` if there is none.
    ///
    /// Removing a special offer rewrites the `combined_with` indices of the
    /// remaining offers so they keep naming the same siblings.
    pub(crate) fn remove_item(&mut self, list: ItemList, index: usize) -> bool {
        if index >= self.item_count(list) {
            return false;
        }
        match list {
            ItemList::DealInclusions => {
                self.deal.deal_inclusions.remove(index);
            }
            ItemList::MealPlans => {
                self.meal_plans.remove(index);
            }
            ItemList::WeddingPackages => {
                self.wedding_packages.remove(index);
            }
            ItemList::SpecialOffers => {
                self.special_offers.remove(index);
                for offer in &mut self.special_offers {
                    offer.combined_with.retain(|&other| other != index);
                    for other in &mut offer.combined_with {
                        if *other > index {
                            *other -= 1;
                        }
                    }
                }
            }
        }
        true
    }

    /// The sibling offers that the offer at `index` can be combined with.
    pub fn combined_offers(&self, index: usize) -> impl Iterator<Item = &SpecialOffer> + '_ {
        self.special_offers
            .get(index)
            .into_iter()
            .flat_map(move |offer| {
                offer
                    .combined_with
                    .iter()
                    .filter_map(move |&other| self.special_offers.get(other))
            })
    }

    /// `"<deal name> - <item name>"`, or `None` if there is no such item.
    #[must_use]
    pub fn item_label(&self, list: ItemList, index: usize) -> Option<String> {
        let item = match list {
            ItemList::DealInclusions => self.deal.deal_inclusions.get(index).map(|i| i.title.as_str()),
            ItemList::MealPlans => self.meal_plans.get(index).map(|p| p.name.as_str()),
            ItemList::SpecialOffers => self.special_offers.get(index).map(SpecialOffer::label),
            ItemList::WeddingPackages => self.wedding_packages.get(index).map(|w| w.name.as_str()),
        }?;
        Some(format!("{} - {item}", self.deal.name))
    }
}

impl fmt::Display for DealPackage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hot Deal Package: {}", self.deal.name)
    }
}

/// A single element of one of the package lists.
#[derive(Debug, Clone)]
pub(crate) enum Item {
    Inclusion(DealInclusion),
    MealPlan(MealPlan),
    SpecialOffer(SpecialOffer),
    Wedding(WeddingPackage),
}

/// Turns each offer's raw `combined_with` entries into sibling indices.
///
/// `offers` pairs each surviving offer with its index in `raw`. Entries are
/// input indices or the code/title of a sibling. Self-references and entries
/// naming no surviving sibling are field problems.
fn resolve_combinations(
    offers: Vec<(usize, SpecialOffer)>,
    raw: &[Value],
    ctx: &mut BuildContext,
) -> Result<Vec<SpecialOffer>, FieldError> {
    let surviving = |input: usize| offers.iter().position(|(i, _)| *i == input);
    let mut links = Vec::with_capacity(offers.len());

    for (position, (input_index, _)) in offers.iter().enumerate() {
        let path = format!("special_offers[{input_index}].combined_with");
        let entries = match raw.get(*input_index).and_then(|offer| offer.get("combined_with")) {
            None | Some(Value::Null) => &[][..],
            Some(Value::Array(entries)) => entries.as_slice(),
            Some(other) => {
                let reason = format!("expected a list, got {}", kind(other));
                ctx.soften(FieldError::validation(&path, reason), ())?;
                &[][..]
            }
        };

        let mut resolved: Vec<usize> = Vec::new();
        for (n, entry) in entries.iter().enumerate() {
            let target = match entry {
                Value::Number(_) => entry
                    .as_u64()
                    .and_then(|i| usize::try_from(i).ok())
                    .and_then(surviving),
                Value::String(key) => offers.iter().position(|(_, offer)| offer.is_named(key)),
                _ => None,
            };
            match target {
                Some(sibling) if sibling != position => {
                    if !resolved.contains(&sibling) {
                        resolved.push(sibling);
                    }
                }
                _ => {
                    let reason = format!("{entry} does not name another special offer");
                    ctx.soften(FieldError::validation(indexed(&path, n), reason), ())?;
                }
            }
        }
        links.push(resolved);
    }

    Ok(offers
        .into_iter()
        .zip(links)
        .map(|((_, mut offer), combined_with)| {
            offer.combined_with = combined_with;
            offer
        })
        .collect())
}
