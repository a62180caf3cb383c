use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    error::ApiError,
    reporting::{Billable, Searchable},
};

/// Lifecycle state of a payment. Stored as its capitalised name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    #[serde(alias = "completed")]
    Completed,
    #[serde(alias = "pending")]
    Pending,
    #[serde(alias = "failed")]
    Failed,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "Completed",
            Self::Pending => "Pending",
            Self::Failed => "Failed",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(Self::Completed),
            "pending" => Ok(Self::Pending),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown payment status '{}'", other)),
        }
    }
}

/// Payment row as read from the database, joined with the payer's account.
#[derive(Debug, Clone, FromRow)]
pub struct PaymentRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub status: String,
    pub created_at: OffsetDateTime,
    pub user_email: Option<String>,
    pub user_display_name: Option<String>,
}

/// A validated payment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub status: PaymentStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub user_email: Option<String>,
    pub user_display_name: Option<String>,
}

impl TryFrom<PaymentRow> for PaymentRecord {
    type Error = ApiError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<PaymentStatus>()
            .map_err(|reason| ApiError::InvalidRecord { id: row.id, reason })?;
        if row.amount < Decimal::ZERO {
            return Err(ApiError::InvalidRecord {
                id: row.id,
                reason: format!("negative amount {}", row.amount),
            });
        }
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            amount: row.amount,
            currency: row.currency,
            payment_method: row.payment_method,
            status,
            created_at: row.created_at,
            user_email: row.user_email,
            user_display_name: row.user_display_name,
        })
    }
}

impl PaymentRecord {
    /// Validates a batch of rows, failing on the first bad one.
    pub fn from_rows(rows: Vec<PaymentRow>) -> Result<Vec<Self>, ApiError> {
        rows.into_iter().map(PaymentRecord::try_from).collect()
    }
}

impl Billable for PaymentRecord {
    fn amount(&self) -> Decimal {
        self.amount
    }
    fn booked_at(&self) -> OffsetDateTime {
        self.created_at
    }
}

impl Searchable for PaymentRecord {
    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            self.user_email.as_deref(),
            Some(self.payment_method.as_str()),
            Some(self.currency.as_str()),
        ]
    }

    fn status(&self) -> Option<&str> {
        Some(self.status.as_str())
    }
}

/// Fields written on create and update.
#[derive(Debug, Clone)]
pub struct PaymentDraft {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: String,
    pub payment_method: String,
    pub status: PaymentStatus,
}
