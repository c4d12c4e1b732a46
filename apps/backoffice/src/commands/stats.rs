//! # Statistics Commands
//!
//! Read-only figures for the dashboard. Every call computes from the live
//! store; nothing is cached.

use chrono::NaiveDate;
use tracing::debug;

use verdant_core::stats::{self, Dashboard, MonthlySummary, TopProduct};

use crate::error::ApiError;
use crate::state::StoreState;

/// Number of best sellers returned when the caller gives no limit.
pub const DEFAULT_TOP_PRODUCTS: usize = 5;

/// Current vs previous calendar month. `today` defaults to the store clock.
pub async fn dashboard(store: &StoreState, today: Option<NaiveDate>) -> Result<Dashboard, ApiError> {
    let dashboard = store.with_store(|s| {
        let today = today.unwrap_or_else(|| s.now().date_naive());
        stats::dashboard(s, today)
    });
    debug!(
        year = dashboard.current_month.year,
        month = dashboard.current_month.month,
        revenue = dashboard.revenue.current,
        "dashboard"
    );
    Ok(dashboard)
}

pub async fn monthly_summary(
    store: &StoreState,
    year: i32,
    month: u32,
) -> Result<MonthlySummary, ApiError> {
    if !(1..=12).contains(&month) {
        return Err(ApiError::validation(format!(
            "month must be between 1 and 12, got {}",
            month
        )));
    }
    debug!(year, month, "monthly_summary");
    Ok(store.with_store(|s| stats::monthly_summary(s, year, month)))
}

pub async fn top_products(
    store: &StoreState,
    limit: Option<usize>,
) -> Result<Vec<TopProduct>, ApiError> {
    let limit = limit.unwrap_or(DEFAULT_TOP_PRODUCTS);
    debug!(limit, "top_products");
    Ok(store.with_store(|s| stats::top_products(s, limit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{expense, sale};
    use crate::test_support::test_app;
    use verdant_core::{
        ExpenseCategory, NewExpense, NewSale, PaymentMethod, SaleItemInput, SaleStatus,
    };

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn sale_on(date: NaiveDate, product_id: &str, unit_price_cents: i64) -> NewSale {
        NewSale {
            date,
            customer_id: None,
            payment_method: PaymentMethod::Card,
            status: SaleStatus::Completed,
            items: vec![SaleItemInput::new(product_id, 1, unit_price_cents)],
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_dashboard_compares_with_previous_month() {
        let (app, _) = test_app().await;
        sale::checkout(&app.store, &app.config, sale_on(date(3, 10), "p1", 10_000), None)
            .await
            .unwrap();
        sale::checkout(&app.store, &app.config, sale_on(date(4, 1), "p1", 15_000), None)
            .await
            .unwrap();
        expense::record_expense(
            &app.store,
            NewExpense {
                date: date(4, 1),
                category: ExpenseCategory::Rent,
                description: "April rent".into(),
                amount_cents: 5_000,
            },
        )
        .await
        .unwrap();

        let dashboard = dashboard(&app.store, None).await.unwrap();

        assert_eq!(dashboard.current_month.month, 4);
        assert_eq!(dashboard.revenue.current, 15_000);
        assert_eq!(dashboard.revenue.previous, 10_000);
        assert_eq!(dashboard.revenue.percent_change, 50.0);
        assert_eq!(dashboard.current_month.expenses_cents, 5_000);
        // Unknown products carry no cost, so gross profit equals revenue.
        assert_eq!(dashboard.current_month.net_profit_cents, 10_000);
    }

    #[tokio::test]
    async fn test_top_products_default_limit() {
        let (app, _) = test_app().await;
        for i in 0..7 {
            sale::checkout(
                &app.store,
                &app.config,
                sale_on(date(4, 1), &format!("p{i}"), 1_000 + i * 100),
                None,
            )
            .await
            .unwrap();
        }

        let top = top_products(&app.store, None).await.unwrap();

        assert_eq!(top.len(), DEFAULT_TOP_PRODUCTS);
        assert_eq!(top[0].product_id, "p6");
    }

    #[tokio::test]
    async fn test_monthly_summary_rejects_bad_month() {
        let (app, _) = test_app().await;

        assert!(monthly_summary(&app.store, 2026, 13).await.is_err());
        assert_eq!(
            monthly_summary(&app.store, 2026, 4).await.unwrap().transactions,
            0
        );
    }
}
