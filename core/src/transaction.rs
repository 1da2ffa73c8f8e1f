//! Transaction records as read from the store.
//!
//! The store is dynamically typed, so `amount` and `suspicious_score` are
//! carried as raw [`FieldValue`]s. Consumers pick a coercion policy:
//!   - [`TransactionRecord::amount_or_zero`] / [`TransactionRecord::score_or_zero`]
//!     are lenient (missing or unparseable → 0.0). The report generator uses these.
//!   - [`TransactionRecord::amount_strict`] / [`TransactionRecord::score_strict`]
//!     fail on missing or non-numeric values. The timeline projector uses these.

use crate::{
    error::{MonitorError, MonitorResult},
    types::{AccountId, TransactionId},
};
use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};

/// A raw numeric column value, exactly as the store handed it back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    /// Parse to f64 the way a float conversion of the stored value would.
    /// Text is trimmed before parsing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Real(f) => Some(*f),
            Self::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    fn raw(&self) -> String {
        match self {
            Self::Integer(i) => i.to_string(),
            Self::Real(f) => f.to_string(),
            Self::Text(s) => s.clone(),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        Self::Real(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl FromSql for FieldValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Integer(i) => Ok(Self::Integer(i)),
            ValueRef::Real(f) => Ok(Self::Real(f)),
            ValueRef::Text(t) | ValueRef::Blob(t) => {
                Ok(Self::Text(String::from_utf8_lossy(t).into_owned()))
            }
            ValueRef::Null => Err(rusqlite::types::FromSqlError::InvalidType),
        }
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            Self::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            Self::Text(s) => ToSqlOutput::Owned(Value::Text(s.clone())),
        })
    }
}

/// One row of the `transactions` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub transaction_id: Option<TransactionId>,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub from_account: Option<AccountId>,
    #[serde(default)]
    pub to_account: Option<AccountId>,
    #[serde(default)]
    pub amount: Option<FieldValue>,
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub suspicious_score: Option<FieldValue>,
    #[serde(default)]
    pub pattern_type: Option<String>,
    #[serde(default)]
    pub scenario: Option<String>,
}

impl TransactionRecord {
    /// Identifier used in evidence samples: `transaction_id`, falling back to `id`.
    pub fn evidence_id(&self) -> String {
        self.transaction_id
            .clone()
            .or_else(|| self.id.clone())
            .unwrap_or_default()
    }

    pub fn amount_or_zero(&self) -> f64 {
        lenient(&self.amount)
    }

    pub fn score_or_zero(&self) -> f64 {
        lenient(&self.suspicious_score)
    }

    pub fn amount_strict(&self) -> MonitorResult<f64> {
        strict(&self.amount, self, "amount")
    }

    pub fn score_strict(&self) -> MonitorResult<f64> {
        strict(&self.suspicious_score, self, "suspicious_score")
    }
}

fn lenient(value: &Option<FieldValue>) -> f64 {
    value.as_ref().and_then(FieldValue::as_f64).unwrap_or(0.0)
}

fn strict(
    value: &Option<FieldValue>,
    record: &TransactionRecord,
    field: &'static str,
) -> MonitorResult<f64> {
    let transaction_id = record.evidence_id();
    let value = value
        .as_ref()
        .ok_or_else(|| MonitorError::MissingNumeric {
            transaction_id: transaction_id.clone(),
            field,
        })?;
    value.as_f64().ok_or_else(|| MonitorError::InvalidNumeric {
        transaction_id,
        field,
        value: value.raw(),
    })
}
