use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::repo_types::{PaymentDraft, PaymentRecord, PaymentStatus};
use crate::{
    error::{ApiError, ApiResult},
    reporting::{display, StatusFilter},
};

pub const DEFAULT_CURRENCY: &str = "USD";
pub const DEFAULT_METHOD: &str = "Credit Card";

/// Exclusive upper bound of the `NUMERIC(12, 2)` amount column.
fn amount_ceiling() -> Decimal {
    Decimal::new(10_000_000_000, 0)
}

#[derive(Debug, Default, Deserialize)]
pub struct PaymentListQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub status: StatusFilter,
}

/// Body for both create and update.
#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub user_id: Uuid,
    pub amount: Decimal,
    pub currency: Option<String>,
    pub payment_method: Option<String>,
    pub status: Option<PaymentStatus>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl PaymentRequest {
    pub fn into_draft(self) -> ApiResult<PaymentDraft> {
        if self.amount < Decimal::ZERO {
            return Err(ApiError::bad_request("Amount must not be negative"));
        }
        if self.amount.normalize().scale() > 2 {
            return Err(ApiError::bad_request("Amount must have at most 2 decimal places"));
        }
        if self.amount >= amount_ceiling() {
            return Err(ApiError::bad_request("Amount is too large"));
        }
        let currency = non_blank(self.currency.as_deref())
            .unwrap_or(DEFAULT_CURRENCY)
            .to_uppercase();
        let payment_method = non_blank(self.payment_method.as_deref())
            .unwrap_or(DEFAULT_METHOD)
            .to_string();
        Ok(PaymentDraft {
            user_id: self.user_id,
            amount: self.amount,
            currency,
            payment_method,
            status: self.status.unwrap_or(PaymentStatus::Completed),
        })
    }
}

/// A payment plus the strings the tables render.
#[derive(Debug, Serialize)]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: PaymentRecord,
    pub amount_display: String,
    pub status_color: &'static str,
    pub user_label: String,
}

impl From<PaymentRecord> for PaymentView {
    fn from(payment: PaymentRecord) -> Self {
        let amount_display = display::format_amount(&payment.currency, payment.amount);
        let status_color = display::status_color(payment.status.as_str());
        let user_label = display::user_label(
            payment.user_display_name.as_deref(),
            payment.user_email.as_deref(),
        );
        Self {
            payment,
            amount_display,
            status_color,
            user_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn request(json: &str) -> PaymentRequest {
        serde_json::from_str(json).expect("valid payment json")
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let user_id = Uuid::new_v4();
        let draft = request(&format!(r#"{{"user_id":"{}","amount":12.5}}"#, user_id))
            .into_draft()
            .unwrap();
        assert_eq!(draft.user_id, user_id);
        assert_eq!(draft.amount, Decimal::new(125, 1));
        assert_eq!(draft.currency, "USD");
        assert_eq!(draft.payment_method, "Credit Card");
        assert_eq!(draft.status, PaymentStatus::Completed);
    }

    #[test]
    fn explicit_fields_are_kept() {
        let draft = request(&format!(
            r#"{{"user_id":"{}","amount":"3.00","currency":"eur","payment_method":"PayPal","status":"Pending"}}"#,
            Uuid::new_v4()
        ))
        .into_draft()
        .unwrap();
        assert_eq!(draft.currency, "EUR");
        assert_eq!(draft.payment_method, "PayPal");
        assert_eq!(draft.status, PaymentStatus::Pending);
    }

    #[test]
    fn negative_amount_is_a_bad_request() {
        let err = request(&format!(r#"{{"user_id":"{}","amount":-1}}"#, Uuid::new_v4()))
            .into_draft()
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn sub_cent_amount_is_a_bad_request() {
        let err = request(&format!(r#"{{"user_id":"{}","amount":"12.345"}}"#, Uuid::new_v4()))
            .into_draft()
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("decimal places"));
    }

    #[test]
    fn trailing_zeros_do_not_count_as_precision() {
        let draft = request(&format!(r#"{{"user_id":"{}","amount":"12.5000"}}"#, Uuid::new_v4()))
            .into_draft()
            .unwrap();
        assert_eq!(draft.amount, Decimal::new(125, 1));
    }

    #[test]
    fn amount_beyond_column_range_is_a_bad_request() {
        let err = request(&format!(r#"{{"user_id":"{}","amount":"100000000000"}}"#, Uuid::new_v4()))
            .into_draft()
            .unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);

        let ok = request(&format!(r#"{{"user_id":"{}","amount":"9999999999.99"}}"#, Uuid::new_v4()))
            .into_draft();
        assert!(ok.is_ok());
    }

    #[test]
    fn list_query_parses_status() {
        let q: PaymentListQuery = serde_json::from_str(r#"{"status":"all"}"#).unwrap();
        assert_eq!(q.status, StatusFilter::All);
        assert_eq!(q.q, "");
        let q: PaymentListQuery = serde_json::from_str(r#"{"q":"visa","status":"Failed"}"#).unwrap();
        assert_eq!(q.status, StatusFilter::Only("failed".into()));
    }

    #[test]
    fn view_carries_display_strings() {
        let view = PaymentView::from(PaymentRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount: Decimal::from(100),
            currency: "USD".into(),
            payment_method: "Credit Card".into(),
            status: PaymentStatus::Failed,
            created_at: datetime!(2024-03-15 0:00 UTC),
            user_email: Some("a@x.com".into()),
            user_display_name: Some("Ann".into()),
        });
        assert_eq!(view.amount_display, "USD 100.00");
        assert_eq!(view.status_color, "bg-red-500");
        assert_eq!(view.user_label, "Ann (a@x.com)");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["status"], "Failed");
        assert_eq!(json["user_email"], "a@x.com");
    }
}
