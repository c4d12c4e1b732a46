//! # Register Commands
//!
//! ## Register Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  open_register($500.00)                                                 │
//! │       │   RegisterAlreadyOpen if a session is open                      │
//! │       ▼                                                                 │
//! │  ┌──────────┐  checkout … checkout      register_status → live expected │
//! │  │   Open   │ ─────────────────────────────────────────────────────►    │
//! │  └──────────┘                                                           │
//! │       │  close_register(counted)                                        │
//! │       ▼                                                                 │
//! │  ┌──────────┐  expected = float + cash sales in [opened_at, now]        │
//! │  │  Closed  │  variance = counted − expected (frozen)                   │
//! │  └──────────┘                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use verdant_core::{CashRegisterSession, CoreError, Money, Operator, SessionSummary};

use super::resolve_operator;
use crate::config::AppConfig;
use crate::error::ApiError;
use crate::state::StoreState;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct RegisterStatusResponse {
    pub is_open: bool,
    /// The open session.
    pub session: Option<CashRegisterSession>,
    /// What the drawer should hold right now.
    pub live_expected_cents: Option<i64>,
    pub last_closed: Option<CashRegisterSession>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CloseRegisterResponse {
    pub session: CashRegisterSession,
    pub summary: SessionSummary,
}

pub async fn open_register(
    store: &StoreState,
    config: &AppConfig,
    opening_float_cents: i64,
    operator: Option<Operator>,
) -> Result<CashRegisterSession, ApiError> {
    let operator = resolve_operator(operator, config);
    debug!(float = opening_float_cents, operator = %operator.id, "open_register");
    Ok(store.with_store_mut(|s| {
        s.open_register(Money::from_cents(opening_float_cents), &operator)
    })?)
}

/// Closes the open session against the counted drawer amount.
pub async fn close_register(
    store: &StoreState,
    closing_count_cents: i64,
    notes: Option<String>,
) -> Result<CloseRegisterResponse, ApiError> {
    debug!(count = closing_count_cents, "close_register");
    let response = store.with_store_mut(|s| -> Result<CloseRegisterResponse, CoreError> {
        let session = s.close_register(Money::from_cents(closing_count_cents), notes)?;
        let summary = s.session_summary(&session.id)?;
        Ok(CloseRegisterResponse { session, summary })
    })?;
    Ok(response)
}

pub async fn register_status(store: &StoreState) -> Result<RegisterStatusResponse, ApiError> {
    let status = store.with_store(|s| RegisterStatusResponse {
        is_open: s.active_session().is_some(),
        session: s.active_session().cloned(),
        live_expected_cents: s.live_expected().map(|m| m.cents()),
        last_closed: s.register_history().first().map(|session| (*session).clone()),
    });
    debug!(is_open = status.is_open, "register_status");
    Ok(status)
}

/// Summary of `session_id`, or of the open session, or of the most recently
/// closed one.
pub async fn session_summary(
    store: &StoreState,
    session_id: Option<String>,
) -> Result<SessionSummary, ApiError> {
    debug!(session_id = ?session_id, "session_summary");
    let summary = store.with_store(|s| {
        let id = match session_id {
            Some(id) => id,
            None => s
                .active_session()
                .or_else(|| s.register_history().first().copied())
                .map(|session| session.id.clone())
                .ok_or(CoreError::NoOpenRegister)?,
        };
        s.session_summary(&id)
    })?;
    Ok(summary)
}

/// Closed sessions, most recently closed first.
pub async fn register_history(
    store: &StoreState,
    limit: Option<usize>,
) -> Result<Vec<CashRegisterSession>, ApiError> {
    let sessions: Vec<CashRegisterSession> = store.with_store(|s| {
        s.register_history()
            .into_iter()
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect()
    });
    debug!(count = sessions.len(), "register_history");
    Ok(sessions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::sale;
    use crate::error::ErrorCode;
    use crate::test_support::test_app;
    use chrono::{Duration, NaiveDate};
    use verdant_core::{NewSale, PaymentMethod, RegisterStatus, SaleItemInput, SaleStatus};

    fn sale_input(payment_method: PaymentMethod, unit_price_cents: i64) -> NewSale {
        NewSale {
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            customer_id: None,
            payment_method,
            status: SaleStatus::Completed,
            items: vec![SaleItemInput::new("p-any", 1, unit_price_cents)],
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_open_twice_is_rejected() {
        let (app, _) = test_app().await;
        open_register(&app.store, &app.config, 50_000, None).await.unwrap();

        let err = open_register(&app.store, &app.config, 10_000, None)
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::RegisterState);
    }

    #[tokio::test]
    async fn test_close_without_open_is_rejected() {
        let (app, _) = test_app().await;

        let err = close_register(&app.store, 0, None).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::RegisterState);
    }

    #[tokio::test]
    async fn test_full_shift_reconciles() {
        let (app, clock) = test_app().await;
        open_register(&app.store, &app.config, 50_000, None).await.unwrap();

        clock.advance(Duration::hours(1));
        sale::checkout(&app.store, &app.config, sale_input(PaymentMethod::Cash, 4_500), None)
            .await
            .unwrap();
        clock.advance(Duration::hours(1));
        sale::checkout(&app.store, &app.config, sale_input(PaymentMethod::Card, 3_000), None)
            .await
            .unwrap();

        let status = register_status(&app.store).await.unwrap();
        assert!(status.is_open);
        assert_eq!(status.live_expected_cents, Some(54_500));

        clock.advance(Duration::hours(1));
        let closed = close_register(&app.store, 54_000, Some("short a fiver".into()))
            .await
            .unwrap();

        assert_eq!(closed.session.status, RegisterStatus::Closed);
        assert_eq!(closed.session.expected_cents, Some(54_500));
        assert_eq!(closed.session.variance_cents, Some(-500));
        assert_eq!(closed.summary.cash_cents, 4_500);
        assert_eq!(closed.summary.card_cents, 3_000);
        assert_eq!(closed.summary.transaction_count, 2);

        let summary = session_summary(&app.store, None).await.unwrap();
        assert_eq!(summary.session_id, closed.session.id);

        app.store.flush().await;
        let stored = app
            .db
            .inner()
            .register_sessions()
            .get(&closed.session.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.variance_cents, Some(-500));
    }

    #[tokio::test]
    async fn test_history_is_newest_first_and_limited() {
        let (app, clock) = test_app().await;
        for float in [10_000, 20_000, 30_000] {
            open_register(&app.store, &app.config, float, None).await.unwrap();
            clock.advance(Duration::hours(1));
            close_register(&app.store, float, None).await.unwrap();
            clock.advance(Duration::hours(1));
        }

        let history = register_history(&app.store, Some(2)).await.unwrap();

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].opening_float_cents, 30_000);
        assert_eq!(history[1].opening_float_cents, 20_000);
    }

    #[tokio::test]
    async fn test_summary_without_any_session() {
        let (app, _) = test_app().await;

        let err = session_summary(&app.store, None).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::RegisterState);

        let err = session_summary(&app.store, Some("ghost".into())).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
