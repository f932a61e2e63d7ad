//! Turns raw model text into deal packages.
//!
//! Parsing is two-step: the slice between the first `{` and the last `}` is
//! tried first, then the whole text. The slice is naive (no brace
//! balancing), so prose after the payload that contains a `}` makes the first
//! step fail and the whole-text fallback decide.

use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{FieldError, NormalizationError};
use crate::model::{rules, DealPackage, Mode, RuleViolation};

/// Key of the deal list in both the model payload and the export.
pub const HOT_DEALS_KEY: &str = "hot_deals";

/// Something worth showing the user about one deal, or about the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DealWarning {
    /// Position of the deal in the model payload, if the warning concerns one.
    pub deal_index: Option<usize>,
    /// The deal's name, when one could be read.
    pub deal_name: Option<String>,
    /// What went wrong.
    pub issue: Issue,
}

/// The kinds of problems a warning reports.
#[derive(Debug, Clone, PartialEq)]
pub enum Issue {
    /// The deal could not be built and was left out.
    Rejected(FieldError),
    /// A field or list item was unusable and fell back to its default.
    Field(FieldError),
    /// A consistency rule is broken.
    Rule(RuleViolation),
    /// The payload's overall shape was unexpected.
    Payload(String),
}

impl DealWarning {
    pub(crate) fn rule(deal_index: usize, package: &DealPackage, violation: RuleViolation) -> Self {
        Self {
            deal_index: Some(deal_index),
            deal_name: Some(package.deal.name.clone()),
            issue: Issue::Rule(violation),
        }
    }

    fn payload(reason: impl Into<String>) -> Self {
        Self {
            deal_index: None,
            deal_name: None,
            issue: Issue::Payload(reason.into()),
        }
    }
}

impl fmt::Display for DealWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.deal_index, &self.deal_name) {
            (Some(index), Some(name)) => write!(f, "deal {} ({name}): ", index + 1)?,
            (Some(index), None) => write!(f, "deal {}: ", index + 1)?,
            (None, _) => {}
        }
        match &self.issue {
            Issue::Rejected(err) => write!(f, "skipped, {err}"),
            Issue::Field(err) => write!(f, "ignored {err}"),
            Issue::Rule(violation) => write!(f, "{violation}"),
            Issue::Payload(reason) => f.write_str(reason),
        }
    }
}

/// Packages that survived normalization, plus everything that did not.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedResult {
    /// Deal packages in payload order.
    pub packages: Vec<DealPackage>,
    /// Per-deal and payload-level warnings.
    pub warnings: Vec<DealWarning>,
}

/// The substring from the first `{` to the last `}`, inclusive.
///
/// Returns `None` when either brace is missing or the last `}` comes before
/// the first `{`. Braces are not balanced.
///
/// # Examples
///
/// ```
/// use hot_deals::normalizer::json_candidate;
///
/// assert_eq!(json_candidate("Result: {\"a\": 1}. Done"), Some("{\"a\": 1}"));
/// assert_eq!(json_candidate("no payload"), None);
/// ```
#[must_use]
pub fn json_candidate(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    text.get(start..=end)
}

/// Parses the model response as JSON using the two-step strategy.
///
/// When both steps fail, the error carries the raw text verbatim and the
/// candidate's parse error if a candidate existed, else the whole-text error.
pub fn parse_response(text: &str) -> Result<Value, NormalizationError> {
    let candidate_error = match json_candidate(text) {
        Some(candidate) => match serde_json::from_str::<Value>(candidate) {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!("brace-delimited candidate did not parse: {e}");
                Some(e.to_string())
            }
        },
        None => None,
    };

    match serde_json::from_str::<Value>(text) {
        Ok(value) => Ok(value),
        Err(e) => Err(NormalizationError {
            raw_text: text.to_string(),
            message: candidate_error.unwrap_or_else(|| e.to_string()),
        }),
    }
}

/// Parses and normalizes a raw model response.
///
/// # Examples
///
/// ```
/// use hot_deals::normalizer::normalize;
///
/// let text = r#"Here you go: {"hot_deals": [{"name": "Spring Fling", "hotel": {"name": "Palm Cove"}}]}"#;
/// let result = normalize(text).unwrap();
/// assert_eq!(result.packages.len(), 1);
/// assert_eq!(result.packages[0].deal.minimum_nights, 1);
/// ```
pub fn normalize(text: &str) -> Result<NormalizedResult, NormalizationError> {
    let value = parse_response(text)?;
    Ok(normalize_value(&value))
}

/// Builds deal packages from an already parsed payload. Never fails.
#[must_use]
pub fn normalize_value(value: &Value) -> NormalizedResult {
    let mut result = NormalizedResult::default();

    let Some(root) = value.as_object() else {
        result.warnings.push(DealWarning::payload(format!(
            "expected a JSON object at the top level, got {}",
            crate::model::reader::kind(value)
        )));
        return result;
    };

    let deals: &[Value] = match root.get(HOT_DEALS_KEY) {
        None | Some(Value::Null) => &[],
        Some(Value::Array(deals)) => deals,
        Some(single @ Value::Object(_)) => std::slice::from_ref(single),
        Some(other) => {
            result.warnings.push(DealWarning::payload(format!(
                "`{HOT_DEALS_KEY}` should be a list, got {}",
                crate::model::reader::kind(other)
            )));
            &[]
        }
    };

    for (index, raw) in deals.iter().enumerate() {
        let deal_name = raw.get("name").and_then(Value::as_str).map(str::to_string);
        match DealPackage::parse(raw, Mode::Lenient) {
            Ok((package, downgraded)) => {
                result.warnings.extend(downgraded.into_iter().map(|err| DealWarning {
                    deal_index: Some(index),
                    deal_name: deal_name.clone(),
                    issue: Issue::Field(err),
                }));
                result.warnings.extend(
                    rules::check(&package)
                        .into_iter()
                        .map(|violation| DealWarning::rule(index, &package, violation)),
                );
                result.packages.push(package);
            }
            Err(err) => {
                warn!(deal = index + 1, "skipping deal: {err}");
                result.warnings.push(DealWarning {
                    deal_index: Some(index),
                    deal_name,
                    issue: Issue::Rejected(err),
                });
            }
        }
    }

    info!(
        deals = result.packages.len(),
        warnings = result.warnings.len(),
        "normalized model response"
    );
    result
}
