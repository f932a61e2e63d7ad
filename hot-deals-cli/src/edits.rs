//! `--set DEAL.PATH=VALUE` edits applied before export.

use std::str::FromStr;

use hot_deals::projection::EditableProjection;
use serde_json::Value;

use crate::errors::CliError;

/// One field edit, e.g. `0.hotel.rating=4.5`.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEdit {
    /// Index of the deal in the export.
    pub deal_index: usize,
    /// Dotted field path inside the deal.
    pub path: String,
    /// New value. Text that is not JSON is taken as a string.
    pub value: Value,
}

impl FromStr for FieldEdit {
    type Err = CliError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let syntax = || CliError::EditSyntax(raw.to_string());
        let (target, value) = raw.split_once('=').ok_or_else(syntax)?;
        let (deal, path) = target.trim().split_once('.').ok_or_else(syntax)?;
        let deal_index = deal.parse().map_err(|_| syntax())?;
        if path.is_empty() {
            return Err(syntax());
        }

        let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        Ok(Self {
            deal_index,
            path: path.to_string(),
            value,
        })
    }
}

/// Applies edits in order, stopping at the first rejected one.
///
/// # Errors
///
/// Returns the `FieldError` of the first rejected edit; earlier edits stay applied.
pub fn apply(projection: &mut EditableProjection, edits: &[FieldEdit]) -> Result<(), CliError> {
    for edit in edits {
        projection.update_field(edit.deal_index, &edit.path, edit.value.clone())?;
        tracing::info!(deal = edit.deal_index, path = %edit.path, "applied edit");
    }
    Ok(())
}
