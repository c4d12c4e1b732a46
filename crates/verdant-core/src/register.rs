//! # Cash Register Manager
//!
//! Open/close lifecycle of the physical cash drawer and its reconciliation
//! against the sales ledger.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  open_register(float, operator)   ┌──────────┐          │
//! │   │  CLOSED  │ ─────────────────────────────────►│   OPEN   │          │
//! │   │ (initial)│ ◄─────────────────────────────────│ (one at  │          │
//! │   └──────────┘  close_register(count, notes)     │  a time) │          │
//! │        ▲                                          └──────────┘          │
//! │        │  closed sessions are immutable history                        │
//! │                                                                         │
//! │   open while OPEN    ──► RegisterAlreadyOpen                            │
//! │   close while CLOSED ──► NoOpenRegister                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reconciliation
//! ```text
//! window   = [opened_at, closed_at or now]      (inclusive)
//! expected = opening_float + Σ completed CASH sales with timestamp in window
//! variance = declared count - expected          (+ surplus, - shortfall)
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::store::{new_id, Collection, Store};
use crate::types::{CashRegisterSession, Operator, PaymentMethod, RegisterStatus, Sale};
use crate::validation::validate_non_negative_cents;

/// Per-method takings of one register session.
///
/// Balance-paid sales move no money through the drawer or a terminal and
/// are left out of every figure here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSummary {
    pub session_id: String,
    pub status: RegisterStatus,
    #[ts(as = "String")]
    pub window_start: DateTime<Utc>,
    #[ts(as = "String")]
    pub window_end: DateTime<Utc>,
    pub opening_float_cents: i64,
    pub cash_cents: i64,
    pub card_cents: i64,
    pub transfer_cents: i64,
    /// cash + card + transfer.
    pub total_cents: i64,
    pub transaction_count: u32,
    /// opening float + cash.
    pub expected_cents: i64,
}

impl SessionSummary {
    pub fn expected(&self) -> Money {
        Money::from_cents(self.expected_cents)
    }

    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

impl Store {
    // =========================================================================
    // Queries
    // =========================================================================

    /// The open session, if any. There is never more than one.
    pub fn active_session(&self) -> Option<&CashRegisterSession> {
        self.sessions.iter().find(|s| s.is_open())
    }

    pub fn session(&self, id: &str) -> Option<&CashRegisterSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Closed sessions, most recently closed first.
    pub fn register_history(&self) -> Vec<&CashRegisterSession> {
        let mut closed: Vec<&CashRegisterSession> =
            self.sessions.iter().filter(|s| !s.is_open()).collect();
        closed.sort_by(|a, b| b.closed_at.cmp(&a.closed_at));
        closed
    }

    /// Expected drawer amount for the open session right now.
    pub fn live_expected(&self) -> Option<Money> {
        let session = self.active_session()?;
        let cash = self.cash_in_window(session.opened_at, self.now());
        Some(session.opening_float() + cash)
    }

    /// Reconciliation figures for a session, open or closed.
    pub fn session_summary(&self, session_id: &str) -> CoreResult<SessionSummary> {
        let session = self
            .session(session_id)
            .ok_or_else(|| CoreError::SessionNotFound(session_id.to_string()))?;

        let window_start = session.opened_at;
        let window_end = session.closed_at.unwrap_or_else(|| self.now());

        let mut summary = SessionSummary {
            session_id: session.id.clone(),
            status: session.status,
            window_start,
            window_end,
            opening_float_cents: session.opening_float_cents,
            cash_cents: 0,
            card_cents: 0,
            transfer_cents: 0,
            total_cents: 0,
            transaction_count: 0,
            expected_cents: 0,
        };

        for sale in self.sales_in_window(window_start, window_end) {
            match sale.payment_method {
                PaymentMethod::Cash => summary.cash_cents += sale.total_cents,
                PaymentMethod::Card => summary.card_cents += sale.total_cents,
                PaymentMethod::Transfer => summary.transfer_cents += sale.total_cents,
                PaymentMethod::Balance => continue,
            }
            summary.total_cents += sale.total_cents;
            summary.transaction_count += 1;
        }
        summary.expected_cents = summary.opening_float_cents + summary.cash_cents;

        debug!(
            session_id = %summary.session_id,
            transactions = summary.transaction_count,
            expected = %summary.expected(),
            "Session summary computed"
        );

        Ok(summary)
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Opens a new register session.
    pub fn open_register(
        &mut self,
        opening_float: Money,
        operator: &Operator,
    ) -> CoreResult<CashRegisterSession> {
        validate_non_negative_cents("opening float", opening_float.cents())?;

        if let Some(open) = self.active_session() {
            return Err(CoreError::RegisterAlreadyOpen {
                session_id: open.id.clone(),
            });
        }

        let session = CashRegisterSession {
            id: new_id(),
            opening_float_cents: opening_float.cents(),
            opened_at: self.now(),
            operator: operator.clone(),
            status: RegisterStatus::Open,
            closing_float_cents: None,
            expected_cents: None,
            variance_cents: None,
            notes: None,
            closed_at: None,
        };

        info!(
            session_id = %session.id,
            float = %opening_float,
            operator = %operator.name,
            "Register opened"
        );

        self.sessions.push(session.clone());
        self.mark(Collection::RegisterSessions);
        Ok(session)
    }

    /// Closes the open session with the operator's declared drawer count.
    pub fn close_register(
        &mut self,
        closing_count: Money,
        notes: Option<String>,
    ) -> CoreResult<CashRegisterSession> {
        validate_non_negative_cents("closing count", closing_count.cents())?;

        let now = self.now();
        let index = self
            .sessions
            .iter()
            .position(|s| s.is_open())
            .ok_or(CoreError::NoOpenRegister)?;

        let opened_at = self.sessions[index].opened_at;
        let expected = self.sessions[index].opening_float() + self.cash_in_window(opened_at, now);
        let variance = closing_count - expected;
        let notes = notes.filter(|n| !n.trim().is_empty());

        let session = &mut self.sessions[index];
        session.status = RegisterStatus::Closed;
        session.closing_float_cents = Some(closing_count.cents());
        session.expected_cents = Some(expected.cents());
        session.variance_cents = Some(variance.cents());
        session.notes = notes;
        session.closed_at = Some(now);
        let closed = session.clone();

        info!(
            session_id = %closed.id,
            expected = %expected,
            declared = %closing_count,
            variance = %variance,
            "Register closed"
        );

        self.mark(Collection::RegisterSessions);
        Ok(closed)
    }

    // =========================================================================
    // Windowing
    // =========================================================================

    fn sales_in_window(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Iterator<Item = &Sale> + '_ {
        self.sales.iter().filter(move |sale| {
            let at = sale.timestamp();
            sale.is_completed() && at >= start && at <= end
        })
    }

    fn cash_in_window(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Money {
        self.sales_in_window(start, end)
            .filter(|sale| sale.payment_method == PaymentMethod::Cash)
            .map(|sale| sale.total())
            .sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::test_store;
    use crate::types::{NewSale, SaleItemInput, SaleStatus};
    use chrono::{Duration, NaiveDate, TimeZone};

    fn operator() -> Operator {
        Operator::new("op-1", "Sam")
    }

    fn sale(method: PaymentMethod, cents: i64, status: SaleStatus) -> NewSale {
        NewSale {
            date: NaiveDate::from_ymd_opt(2026, 4, 2).unwrap(),
            customer_id: None,
            payment_method: method,
            status,
            items: vec![SaleItemInput::new("p1", 1, cents)],
            notes: None,
        }
    }

    #[test]
    fn test_reconciliation_scenario_shortfall() {
        // Clock starts at 08:00.
        let (mut store, clock) = test_store();
        let session = store
            .open_register(Money::from_dollars(500), &operator())
            .unwrap();

        clock.advance(Duration::hours(1));
        store
            .record_sale(sale(PaymentMethod::Cash, 4500, SaleStatus::Completed), &operator())
            .unwrap();
        clock.advance(Duration::hours(3));
        store
            .record_sale(sale(PaymentMethod::Card, 7000, SaleStatus::Completed), &operator())
            .unwrap();
        clock.advance(Duration::hours(4));
        store
            .record_sale(sale(PaymentMethod::Cash, 3000, SaleStatus::Completed), &operator())
            .unwrap();

        assert_eq!(store.live_expected(), Some(Money::from_dollars(575)));

        clock.set(Utc.with_ymd_and_hms(2026, 4, 2, 20, 0, 0).unwrap());
        let closed = store
            .close_register(Money::from_dollars(570), Some("Short one fiver".to_string()))
            .unwrap();

        assert_eq!(closed.expected_cents, Some(57_500));
        assert_eq!(closed.variance(), Some(Money::from_cents(-500)));
        assert_eq!(closed.status, RegisterStatus::Closed);

        let summary = store.session_summary(&session.id).unwrap();
        assert_eq!(summary.cash_cents, 7_500);
        assert_eq!(summary.card_cents, 7_000);
        assert_eq!(summary.transfer_cents, 0);
        assert_eq!(summary.total(), Money::from_dollars(145));
        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.expected(), Money::from_dollars(575));
    }

    #[test]
    fn test_sale_dated_on_a_local_day_behind_utc_stays_in_window() {
        // Evening in UTC-5 is already the next day in UTC.
        let (mut store, clock) = test_store();
        clock.set(Utc.with_ymd_and_hms(2026, 4, 3, 0, 30, 0).unwrap());
        let session = store
            .open_register(Money::from_dollars(500), &operator())
            .unwrap();

        clock.advance(Duration::minutes(30));
        let local_day = sale(PaymentMethod::Cash, 4500, SaleStatus::Completed);
        assert_eq!(local_day.date, NaiveDate::from_ymd_opt(2026, 4, 2).unwrap());
        let recorded = store.record_sale(local_day, &operator()).unwrap();
        assert!(recorded.timestamp() >= session.opened_at);

        clock.advance(Duration::minutes(30));
        let closed = store
            .close_register(Money::from_dollars(545), None)
            .unwrap();

        assert_eq!(closed.expected_cents, Some(54_500));
        assert_eq!(closed.variance_cents, Some(0));
        assert_eq!(store.session_summary(&session.id).unwrap().cash_cents, 4500);
    }

    #[test]
    fn test_variance_sign() {
        for (declared, expected_variance) in [(575, 0), (580, 500), (560, -1500)] {
            let (mut store, clock) = test_store();
            store
                .open_register(Money::from_dollars(500), &operator())
                .unwrap();
            clock.advance(Duration::minutes(30));
            store
                .record_sale(sale(PaymentMethod::Cash, 7500, SaleStatus::Completed), &operator())
                .unwrap();
            clock.advance(Duration::minutes(30));

            let closed = store
                .close_register(Money::from_dollars(declared), None)
                .unwrap();
            assert_eq!(closed.variance_cents, Some(expected_variance));
        }
    }

    #[test]
    fn test_only_one_open_session() {
        let (mut store, _clock) = test_store();

        assert!(matches!(
            store.close_register(Money::zero(), None),
            Err(CoreError::NoOpenRegister)
        ));

        let first = store
            .open_register(Money::from_dollars(100), &operator())
            .unwrap();
        let err = store
            .open_register(Money::from_dollars(100), &operator())
            .unwrap_err();
        assert!(matches!(
            err,
            CoreError::RegisterAlreadyOpen { ref session_id } if *session_id == first.id
        ));

        store.close_register(Money::from_dollars(100), None).unwrap();
        assert!(store.active_session().is_none());
        assert!(matches!(
            store.close_register(Money::zero(), None),
            Err(CoreError::NoOpenRegister)
        ));
    }

    #[test]
    fn test_window_excludes_outside_and_non_completed_sales() {
        let (mut store, clock) = test_store();

        // Before the session opens.
        store
            .record_sale(sale(PaymentMethod::Cash, 1000, SaleStatus::Completed), &operator())
            .unwrap();
        clock.advance(Duration::minutes(5));
        let session = store
            .open_register(Money::from_dollars(50), &operator())
            .unwrap();
        clock.advance(Duration::minutes(5));
        store
            .record_sale(sale(PaymentMethod::Cash, 2000, SaleStatus::Pending), &operator())
            .unwrap();
        store
            .record_sale(sale(PaymentMethod::Cash, 3000, SaleStatus::Cancelled), &operator())
            .unwrap();
        store
            .record_sale(sale(PaymentMethod::Balance, 4000, SaleStatus::Completed), &operator())
            .unwrap();
        store
            .record_sale(sale(PaymentMethod::Transfer, 900, SaleStatus::Completed), &operator())
            .unwrap();
        clock.advance(Duration::minutes(5));
        store.close_register(Money::from_dollars(50), None).unwrap();
        clock.advance(Duration::minutes(5));

        // After the session closed.
        store
            .record_sale(sale(PaymentMethod::Cash, 5000, SaleStatus::Completed), &operator())
            .unwrap();

        let summary = store.session_summary(&session.id).unwrap();
        assert_eq!(summary.cash_cents, 0);
        assert_eq!(summary.transfer_cents, 900);
        assert_eq!(summary.transaction_count, 1);
        assert_eq!(store.session(&session.id).unwrap().variance_cents, Some(0));
    }

    #[test]
    fn test_closed_session_is_frozen() {
        let (mut store, clock) = test_store();
        let session = store
            .open_register(Money::from_dollars(200), &operator())
            .unwrap();
        clock.advance(Duration::hours(1));
        let closed = store.close_register(Money::from_dollars(200), None).unwrap();

        store
            .open_register(Money::from_dollars(300), &operator())
            .unwrap();
        clock.advance(Duration::hours(1));
        store
            .record_sale(sale(PaymentMethod::Cash, 1000, SaleStatus::Completed), &operator())
            .unwrap();

        assert_eq!(store.session(&session.id), Some(&closed));
        assert_eq!(store.register_history().len(), 1);
        assert_eq!(store.live_expected(), Some(Money::from_dollars(310)));
    }

    #[test]
    fn test_history_is_newest_first() {
        let (mut store, clock) = test_store();
        for float in [100, 200] {
            store
                .open_register(Money::from_dollars(float), &operator())
                .unwrap();
            clock.advance(Duration::hours(1));
            store.close_register(Money::from_dollars(float), None).unwrap();
            clock.advance(Duration::hours(1));
        }

        let history = store.register_history();
        assert_eq!(history[0].opening_float_cents, 20_000);
        assert_eq!(history[1].opening_float_cents, 10_000);
    }

    #[test]
    fn test_negative_amounts_are_rejected() {
        let (mut store, _clock) = test_store();

        assert!(store
            .open_register(Money::from_cents(-1), &operator())
            .is_err());
        assert!(store.active_session().is_none());

        store.open_register(Money::zero(), &operator()).unwrap();
        assert!(store.close_register(Money::from_cents(-1), None).is_err());
        assert!(store.active_session().is_some());
    }

    #[test]
    fn test_summary_of_unknown_session() {
        let (store, _clock) = test_store();
        assert!(matches!(
            store.session_summary("nope"),
            Err(CoreError::SessionNotFound(_))
        ));
    }
}
