use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    error::{ApiError, ApiResult},
    reporting::{display, revenue, MonthlyBucket},
};

pub const RECENT_DEFAULT: i64 = 5;
pub const RECENT_MAX: i64 = 50;

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub user_count: i64,
    pub total_revenue: Decimal,
    pub total_revenue_display: String,
    pub active_subscriptions: i64,
    pub pending_payments: i64,
}

impl MetricsResponse {
    pub fn new(
        user_count: i64,
        total_revenue: Decimal,
        active_subscriptions: i64,
        pending_payments: i64,
    ) -> Self {
        Self {
            user_count,
            total_revenue_display: format!("${}", display::format_money(total_revenue)),
            total_revenue,
            active_subscriptions,
            pending_payments,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RevenueQuery {
    pub year: Option<i32>,
}

impl RevenueQuery {
    /// The requested year, or `current` when none was given.
    pub fn year_or(&self, current: i32) -> ApiResult<i32> {
        let year = self.year.unwrap_or(current);
        if !(1..=9999).contains(&year) {
            return Err(ApiError::bad_request("Year must be between 1 and 9999"));
        }
        Ok(year)
    }
}

#[derive(Debug, Serialize)]
pub struct RevenueResponse {
    pub year: i32,
    pub months: [MonthlyBucket; 12],
    pub total: Decimal,
}

impl RevenueResponse {
    pub fn new(year: i32, months: [MonthlyBucket; 12]) -> Self {
        let total = revenue::total(&months);
        Self { year, months, total }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

impl RecentQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(RECENT_DEFAULT).clamp(1, RECENT_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::revenue::MONTH_LABELS;

    #[test]
    fn revenue_year_defaults_and_is_bounded() {
        assert_eq!(RevenueQuery::default().year_or(2025).unwrap(), 2025);
        assert_eq!(RevenueQuery { year: Some(2023) }.year_or(2025).unwrap(), 2023);
        assert!(RevenueQuery { year: Some(0) }.year_or(2025).is_err());
        assert!(RevenueQuery { year: Some(12_000) }.year_or(2025).is_err());
    }

    #[test]
    fn recent_limit_is_clamped() {
        assert_eq!(RecentQuery::default().limit(), 5);
        assert_eq!(RecentQuery { limit: Some(0) }.limit(), 1);
        assert_eq!(RecentQuery { limit: Some(500) }.limit(), 50);
        assert_eq!(RecentQuery { limit: Some(12) }.limit(), 12);
    }

    #[test]
    fn metrics_format_revenue() {
        let m = MetricsResponse::new(3, Decimal::new(123456, 2), 1, 2);
        assert_eq!(m.total_revenue_display, "$1234.56");
    }

    #[test]
    fn revenue_response_totals_buckets() {
        let months = MONTH_LABELS.map(|month| MonthlyBucket {
            month,
            total: Decimal::ONE,
        });
        let res = RevenueResponse::new(2024, months);
        assert_eq!(res.total, Decimal::from(12));
        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(json["months"].as_array().unwrap().len(), 12);
        assert_eq!(json["months"][0]["month"], "Jan");
    }
}
