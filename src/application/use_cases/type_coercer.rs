// ============================================================
// TYPE COERCER
// ============================================================
// Best-effort conversion of raw CSV strings to column types

use std::cell::Cell;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::warn;

use crate::domain::csv::{Coerced, CoercionWarning, ColumnType, FieldValue};

/// Input format of DATE columns
pub const SOURCE_DATE_FORMAT: &str = "%m/%d/%y";

/// Converts raw strings to typed values without ever failing.
///
/// A value that does not parse is returned as the original string and a
/// warning is logged; one bad cell never aborts a file.
#[derive(Debug, Default)]
pub struct TypeCoercer {
    fallbacks: Cell<u64>,
}

impl TypeCoercer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert one raw value
    pub fn coerce(&self, raw: &str, target: ColumnType) -> Coerced {
        match target {
            ColumnType::String => Coerced::ok(FieldValue::String(raw.to_string())),
            ColumnType::Integer => match raw.trim().parse::<i64>() {
                Ok(v) => Coerced::ok(FieldValue::Integer(v)),
                Err(_) => Coerced::fallback(raw, value_warning(raw, target)),
            },
            // NaN and infinities have no JSON number form
            ColumnType::Double => match raw.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Coerced::ok(FieldValue::Double(v)),
                _ => Coerced::fallback(raw, value_warning(raw, target)),
            },
            ColumnType::Date => match NaiveDate::parse_from_str(raw, SOURCE_DATE_FORMAT) {
                Ok(date) => Coerced::ok(FieldValue::Date(date)),
                Err(_) => Coerced::fallback(
                    raw,
                    CoercionWarning::UnrecognizedDateFormat {
                        value: raw.to_string(),
                    },
                ),
            },
            ColumnType::DateTime => match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Coerced::ok(FieldValue::DateTime(dt.with_timezone(&Utc))),
                Err(_) => Coerced::fallback(raw, value_warning(raw, target)),
            },
        }
    }

    /// Convert a value for `column`, logging any fallback
    pub fn apply(&self, column: &str, raw: &str, target: ColumnType) -> FieldValue {
        let coerced = self.coerce(raw, target);
        if let Some(warning) = &coerced.warning {
            self.fallbacks.set(self.fallbacks.get() + 1);
            warn!(column = %column, "{}", warning);
        }
        coerced.value
    }

    /// Number of values kept as raw strings so far
    pub fn fallback_count(&self) -> u64 {
        self.fallbacks.get()
    }
}

fn value_warning(raw: &str, target: ColumnType) -> CoercionWarning {
    CoercionWarning::ValueCoercion {
        value: raw.to_string(),
        target,
    }
}
