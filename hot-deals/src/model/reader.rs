//! Field-by-field reading of loosely typed JSON objects.
//!
//! Model output rarely matches a schema exactly, so entities are not built with
//! `serde::Deserialize`. Instead each constructor pulls its fields through a
//! [`Fields`] view, which knows the path of every field and, in
//! [`Mode::Lenient`], downgrades problems with optional fields to recorded
//! issues instead of failing the whole entity.

use std::ops::{Bound, RangeBounds};

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::FieldError;

/// How strictly entities are constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Any field problem fails construction. Used for user edits.
    Strict,
    /// Problems with optional fields fall back to defaults and are recorded.
    /// Used when normalizing model output.
    Lenient,
}

/// Construction state shared by every entity built from one JSON document.
#[derive(Debug)]
pub(crate) struct BuildContext {
    mode: Mode,
    downgraded: Vec<FieldError>,
}

impl BuildContext {
    /// Creates a context for the given mode.
    #[must_use]
    pub(crate) const fn new(mode: Mode) -> Self {
        Self {
            mode,
            downgraded: Vec::new(),
        }
    }

    /// Takes the field problems recorded so far.
    pub(crate) fn take_downgraded(&mut self) -> Vec<FieldError> {
        std::mem::take(&mut self.downgraded)
    }

    /// In strict mode returns `err`; in lenient mode records it and yields `fallback`.
    pub(crate) fn soften<T>(&mut self, err: FieldError, fallback: T) -> Result<T, FieldError> {
        match self.mode {
            Mode::Strict => Err(err),
            Mode::Lenient => {
                tracing::debug!(path = err.path(), "downgrading field error: {err}");
                self.downgraded.push(err);
                Ok(fallback)
            }
        }
    }

    const fn lenient(&self) -> bool {
        matches!(self.mode, Mode::Lenient)
    }
}

/// Joins a parent path and a child key.
pub(crate) fn join(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Path of the `index`th element of the list at `path`.
pub(crate) fn indexed(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Read-only view over one JSON object, aware of its own path.
#[derive(Debug, Clone)]
pub(crate) struct Fields<'a> {
    map: &'a Map<String, Value>,
    prefix: String,
}

impl<'a> Fields<'a> {
    /// Wraps `value`, which must be a JSON object.
    pub(crate) fn of(value: &'a Value, path: &str) -> Result<Self, FieldError> {
        value.as_object().map_or_else(
            || {
                Err(FieldError::validation(
                    display_path(path),
                    format!("expected an object, got {}", kind(value)),
                ))
            },
            |map| {
                Ok(Self {
                    map,
                    prefix: path.to_string(),
                })
            },
        )
    }

    pub(crate) fn path(&self, key: &str) -> String {
        join(&self.prefix, key)
    }

    /// Returns the value at `key`, treating JSON `null` as absent.
    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// A string that must be present and non-blank.
    pub(crate) fn required_str(&self, key: &str) -> Result<String, FieldError> {
        match self.get(key) {
            None => Err(FieldError::validation(self.path(key), "is required")),
            Some(Value::String(s)) if s.trim().is_empty() => {
                Err(FieldError::validation(self.path(key), "must not be empty"))
            }
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Err(FieldError::validation(
                self.path(key),
                format!("expected a string, got {}", kind(other)),
            )),
        }
    }

    /// A nested object that must be present.
    pub(crate) fn required_object(&self, key: &str) -> Result<Self, FieldError> {
        let path = self.path(key);
        match self.get(key) {
            None => Err(FieldError::validation(path, "is required")),
            Some(value) => Self::of(value, &path),
        }
    }

    pub(crate) fn opt_str(
        &self,
        ctx: &mut BuildContext,
        key: &str,
    ) -> Result<Option<String>, FieldError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) if ctx.lenient() => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) if ctx.lenient() => Ok(Some(b.to_string())),
            Some(other) => ctx.soften(
                FieldError::validation(
                    self.path(key),
                    format!("expected a string, got {}", kind(other)),
                ),
                None,
            ),
        }
    }

    /// An optional number that must lie within `bounds`.
    pub(crate) fn opt_number(
        &self,
        ctx: &mut BuildContext,
        key: &str,
        bounds: impl RangeBounds<f64>,
    ) -> Result<Option<f64>, FieldError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let number = match number_of(raw, ctx.lenient()) {
            Ok(n) => n,
            Err(reason) => {
                return ctx.soften(FieldError::validation(self.path(key), reason), None);
            }
        };
        if !bounds.contains(&number) {
            return ctx.soften(
                FieldError::Range {
                    path: self.path(key),
                    value: number,
                    expected: describe(&bounds),
                },
                None,
            );
        }
        Ok(Some(number))
    }

    /// An optional whole-number count, at least `min`.
    pub(crate) fn opt_count(
        &self,
        ctx: &mut BuildContext,
        key: &str,
        min: u32,
    ) -> Result<Option<u32>, FieldError> {
        let Some(raw) = self.get(key) else {
            return Ok(None);
        };
        let number = match number_of(raw, ctx.lenient()) {
            Ok(n) => n,
            Err(reason) => {
                return ctx.soften(FieldError::validation(self.path(key), reason), None);
            }
        };
        if number.fract() != 0.0 {
            return ctx.soften(
                FieldError::validation(self.path(key), format!("expected a whole number, got {number}")),
                None,
            );
        }
        if number < f64::from(min) || number > f64::from(u32::MAX) {
            return ctx.soften(
                FieldError::Range {
                    path: self.path(key),
                    value: number,
                    expected: format!(">= {min}"),
                },
                None,
            );
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let count = number as u32;
        Ok(Some(count))
    }

    /// A count that falls back to `default` when absent or (leniently) invalid.
    pub(crate) fn count_or(
        &self,
        ctx: &mut BuildContext,
        key: &str,
        default: u32,
        min: u32,
    ) -> Result<u32, FieldError> {
        Ok(self.opt_count(ctx, key, min)?.unwrap_or(default))
    }

    pub(crate) fn flag_or(
        &self,
        ctx: &mut BuildContext,
        key: &str,
        default: bool,
    ) -> Result<bool, FieldError> {
        match self.get(key) {
            None => Ok(default),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::String(s)) if ctx.lenient() && s.eq_ignore_ascii_case("true") => Ok(true),
            Some(Value::String(s)) if ctx.lenient() && s.eq_ignore_ascii_case("false") => Ok(false),
            Some(other) => ctx.soften(
                FieldError::validation(
                    self.path(key),
                    format!("expected a boolean, got {}", kind(other)),
                ),
                default,
            ),
        }
    }

    /// An optional `YYYY-MM-DD` date. Blank strings count as absent.
    pub(crate) fn opt_date(
        &self,
        ctx: &mut BuildContext,
        key: &str,
    ) -> Result<Option<NaiveDate>, FieldError> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => match parse_iso_date(s.trim()) {
                Some(date) => Ok(Some(date)),
                None => ctx.soften(
                    FieldError::DateFormat {
                        path: self.path(key),
                        value: s.clone(),
                    },
                    None,
                ),
            },
            Some(other) => ctx.soften(
                FieldError::DateFormat {
                    path: self.path(key),
                    value: other.to_string(),
                },
                None,
            ),
        }
    }

    /// The elements of an optional list. A non-list is a field problem.
    pub(crate) fn list(&self, ctx: &mut BuildContext, key: &str) -> Result<&'a [Value], FieldError> {
        let empty: &'a [Value] = &[];
        match self.get(key) {
            None => Ok(empty),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => ctx.soften(
                FieldError::validation(
                    self.path(key),
                    format!("expected a list, got {}", kind(other)),
                ),
                empty,
            ),
        }
    }

    /// Builds every element of the list at `key`, keeping input indices.
    ///
    /// In lenient mode an element that fails is dropped and recorded; the
    /// remaining elements survive.
    pub(crate) fn items<T>(
        &self,
        ctx: &mut BuildContext,
        key: &str,
        build: impl Fn(&Self, &mut BuildContext) -> Result<T, FieldError>,
    ) -> Result<Vec<(usize, T)>, FieldError> {
        let path = self.path(key);
        let mut built = Vec::new();
        for (index, item) in self.list(ctx, key)?.iter().enumerate() {
            let result =
                Self::of(item, &indexed(&path, index)).and_then(|fields| build(&fields, ctx));
            match result {
                Ok(value) => built.push((index, value)),
                Err(err) => ctx.soften(err, ())?,
            }
        }
        Ok(built)
    }
}

fn number_of(value: &Value, lenient: bool) -> Result<f64, String> {
    match value {
        Value::Number(n) => n
            .as_f64()
            .ok_or_else(|| format!("{n} is not representable as a number")),
        Value::String(s) if lenient => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| format!("expected a number, got {s:?}")),
        other => Err(format!("expected a number, got {}", kind(other))),
    }
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "<root>"
    } else {
        path
    }
}

/// Parses exactly `YYYY-MM-DD`, zero-padded.
fn parse_iso_date(s: &str) -> Option<NaiveDate> {
    let shaped = s.len() == 10
        && s.bytes().enumerate().all(|(i, c)| match i {
            4 | 7 => c == b'-',
            _ => c.is_ascii_digit(),
        });
    if !shaped {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

fn describe(bounds: &impl RangeBounds<f64>) -> String {
    match (bounds.start_bound(), bounds.end_bound()) {
        (Bound::Included(min), Bound::Unbounded) => format!(">= {min}"),
        (Bound::Included(min), Bound::Included(max)) => format!("{min}..={max}"),
        (Bound::Unbounded, Bound::Included(max)) => format!("<= {max}"),
        _ => "a number in range".to_string(),
    }
}

/// Short name of a JSON value's type, for messages.
pub(crate) const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_required_str_reports_path() {
        let value = json!({"hotel": {"address": "1 Beach Rd"}});
        let root = Fields::of(&value, "").unwrap();
        let hotel = root.required_object("hotel").unwrap();
        let err = hotel.required_str("name").unwrap_err();
        assert_eq!(err.path(), "hotel.name");
        assert!(matches!(err, FieldError::Validation { .. }));
    }

    #[test]
    fn test_null_counts_as_absent() {
        let value = json!({"price": null, "name": null});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        assert_eq!(fields.opt_number(&mut ctx, "price", 0.0..).unwrap(), None);
        assert!(fields.required_str("name").is_err());
    }

    #[test]
    fn test_negative_price_is_range_error() {
        let value = json!({"price": -10});
        let fields = Fields::of(&value, "deal").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        let err = fields.opt_number(&mut ctx, "price", 0.0..).unwrap_err();
        assert!(matches!(err, FieldError::Range { ref path, .. } if path == "deal.price"));
    }

    #[test]
    fn test_lenient_downgrades_and_records() {
        let value = json!({"valid_from": "next tuesday", "nights": 2.5, "price": "120.50"});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Lenient);

        assert_eq!(fields.opt_date(&mut ctx, "valid_from").unwrap(), None);
        assert_eq!(fields.count_or(&mut ctx, "nights", 1, 1).unwrap(), 1);
        assert_eq!(
            fields.opt_number(&mut ctx, "price", 0.0..).unwrap(),
            Some(120.5)
        );

        let issues = ctx.take_downgraded();
        assert_eq!(issues.len(), 2);
        assert!(matches!(issues[0], FieldError::DateFormat { .. }));
        assert!(matches!(issues[1], FieldError::Validation { .. }));
    }

    #[test]
    fn test_strict_rejects_numeric_strings() {
        let value = json!({"rating": "five"});
        let fields = Fields::of(&value, "hotel").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        let err = fields.opt_number(&mut ctx, "rating", 0.0..=5.0).unwrap_err();
        assert_eq!(err.path(), "hotel.rating");
        assert!(matches!(err, FieldError::Validation { .. }));
    }

    #[test]
    fn test_whole_float_is_accepted_as_count() {
        let value = json!({"min_guests": 4.0});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        assert_eq!(fields.count_or(&mut ctx, "min_guests", 2, 2).unwrap(), 4);
    }

    #[test]
    fn test_blank_date_is_absent() {
        let value = json!({"valid_until": ""});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        assert_eq!(fields.opt_date(&mut ctx, "valid_until").unwrap(), None);
    }

    #[test]
    fn test_unbounded_number_keeps_negatives() {
        let value = json!({"savings_percentage": -20});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        assert_eq!(
            fields.opt_number(&mut ctx, "savings_percentage", ..).unwrap(),
            Some(-20.0)
        );
    }

    #[test]
    fn test_zero_count_is_allowed_negative_is_not() {
        let value = json!({"maximum_nights": 0, "min_nights": -1});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        assert_eq!(fields.opt_count(&mut ctx, "maximum_nights", 0).unwrap(), Some(0));
        let err = fields.opt_count(&mut ctx, "min_nights", 0).unwrap_err();
        assert!(matches!(err, FieldError::Range { ref expected, .. } if expected == ">= 0"));
    }

    #[test]
    fn test_unpadded_date_is_rejected() {
        let value = json!({"valid_from": "2025-1-5", "valid_until": "2025-01-05"});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        let err = fields.opt_date(&mut ctx, "valid_from").unwrap_err();
        assert!(matches!(err, FieldError::DateFormat { ref value, .. } if value == "2025-1-5"));
        assert_eq!(
            fields.opt_date(&mut ctx, "valid_until").unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 5)
        );
    }

    #[test]
    fn test_impossible_date_is_rejected() {
        let value = json!({"valid_from": "2025-02-30"});
        let fields = Fields::of(&value, "").unwrap();
        let mut ctx = BuildContext::new(Mode::Strict);
        assert!(fields.opt_date(&mut ctx, "valid_from").is_err());
    }
}
