//! Closed vocabularies that tolerate values outside the vocabulary.

use std::fmt;

use serde::{Serialize, Serializer};

/// A fixed set of named values.
pub trait Vocabulary: Copy + Eq + 'static {
    /// Every member of the vocabulary.
    const ALL: &'static [Self];

    /// The canonical wire name of this member.
    fn as_str(self) -> &'static str;
}

/// A vocabulary value, or the original string when it matched nothing.
///
/// Model output is probabilistic, so an unrecognised value is kept verbatim
/// rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenEnum<T: Vocabulary> {
    /// A recognised member.
    Known(T),
    /// An unrecognised value, preserved as given.
    Unknown(String),
}

impl<T: Vocabulary> OpenEnum<T> {
    /// Classifies `raw`, matching case-insensitively with `-` and spaces read as `_`.
    ///
    /// Only unrecognised values keep their original spelling. A recognised one
    /// is normalized, so `"Seasonal Special"` is written back as
    /// `seasonal_special`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hot_deals::model::{DealKind, DealType};
    ///
    /// let parsed = DealType::parse("Seasonal Special");
    /// assert_eq!(parsed.known(), Some(DealKind::SeasonalSpecial));
    /// assert_eq!(parsed.as_str(), "seasonal_special");
    /// ```
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let key: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();
        T::ALL
            .iter()
            .find(|member| member.as_str() == key)
            .map_or_else(|| Self::Unknown(raw.to_string()), |member| Self::Known(*member))
    }

    /// The wire form: the canonical name, or the preserved original.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(member) => member.as_str(),
            Self::Unknown(raw) => raw,
        }
    }

    /// Returns the known member, if any.
    #[must_use]
    pub const fn known(&self) -> Option<T> {
        match self {
            Self::Known(member) => Some(*member),
            Self::Unknown(_) => None,
        }
    }
}

impl<T: Vocabulary> From<T> for OpenEnum<T> {
    fn from(member: T) -> Self {
        Self::Known(member)
    }
}

impl<T: Vocabulary> fmt::Display for OpenEnum<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<T: Vocabulary> Serialize for OpenEnum<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Marketing category of a hot deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DealKind {
    /// `limited_time`
    LimitedTime,
    /// `price_drop`
    PriceDrop,
    /// `popular_choice`
    PopularChoice,
    /// `exclusive_access`
    ExclusiveAccess,
    /// `best_value`
    BestValue,
    /// `trending`
    Trending,
    /// `seasonal_special`
    SeasonalSpecial,
    /// `weekend_escape`
    WeekendEscape,
    /// `extended_stay`
    ExtendedStay,
    /// `flight_package`
    FlightPackage,
    /// `wedding`
    Wedding,
}

impl Vocabulary for DealKind {
    const ALL: &'static [Self] = &[
        Self::LimitedTime,
        Self::PriceDrop,
        Self::PopularChoice,
        Self::ExclusiveAccess,
        Self::BestValue,
        Self::Trending,
        Self::SeasonalSpecial,
        Self::WeekendEscape,
        Self::ExtendedStay,
        Self::FlightPackage,
        Self::Wedding,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::LimitedTime => "limited_time",
            Self::PriceDrop => "price_drop",
            Self::PopularChoice => "popular_choice",
            Self::ExclusiveAccess => "exclusive_access",
            Self::BestValue => "best_value",
            Self::Trending => "trending",
            Self::SeasonalSpecial => "seasonal_special",
            Self::WeekendEscape => "weekend_escape",
            Self::ExtendedStay => "extended_stay",
            Self::FlightPackage => "flight_package",
            Self::Wedding => "wedding",
        }
    }
}

/// What kind of perk a deal inclusion is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InclusionKind {
    /// `bonus`
    Bonus,
    /// `meal`
    Meal,
    /// `activity`
    Activity,
    /// `loyalty`
    Loyalty,
    /// `honeymoon`
    Honeymoon,
}

impl Vocabulary for InclusionKind {
    const ALL: &'static [Self] = &[
        Self::Bonus,
        Self::Meal,
        Self::Activity,
        Self::Loyalty,
        Self::Honeymoon,
    ];

    fn as_str(self) -> &'static str {
        match self {
            Self::Bonus => "bonus",
            Self::Meal => "meal",
            Self::Activity => "activity",
            Self::Loyalty => "loyalty",
            Self::Honeymoon => "honeymoon",
        }
    }
}

/// Deal type as found in model output.
pub type DealType = OpenEnum<DealKind>;

/// Inclusion category as found in model output.
pub type InclusionCategory = OpenEnum<InclusionKind>;
