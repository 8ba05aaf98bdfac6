//! A mutexed (epsilon, delta) budget ledger.

use std::sync::Mutex;

use private_count_core::{DpError, Result};

/// Relative slack when comparing a request against the remaining budget,
/// absorbing float round-off from repeated debits.
const BUDGET_TOLERANCE: f64 = 1e-9;

/// Thread-safe privacy-budget ledger for one aggregation concern.
///
/// `consume` debits atomically: either the full requested slice is granted
/// or the ledger is left untouched. Safe to share between concurrent
/// aggregations.
#[derive(Debug)]
pub struct BudgetAccountant {
    ledger: Mutex<Ledger>,
}

#[derive(Clone, Copy, Debug)]
struct Ledger {
    remaining_epsilon: f64,
    remaining_delta: f64,
}

impl BudgetAccountant {
    /// Create a ledger holding the given total budget.
    pub fn new(epsilon: f64, delta: f64) -> Result<Self> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(DpError::invalid(format!(
                "budget epsilon must be finite and non-negative, got {epsilon}"
            )));
        }
        if !delta.is_finite() || delta < 0.0 || delta >= 1.0 {
            return Err(DpError::invalid(format!(
                "budget delta must be in [0, 1), got {delta}"
            )));
        }
        Ok(Self {
            ledger: Mutex::new(Ledger {
                remaining_epsilon: epsilon,
                remaining_delta: delta,
            }),
        })
    }

    /// Debit a budget slice and return what was granted.
    ///
    /// A request of `(0, 0)` consumes everything remaining. Any other
    /// request is granted exactly or refused whole; refusal leaves the
    /// ledger unchanged.
    pub fn consume(&self, epsilon: f64, delta: f64) -> Result<(f64, f64)> {
        if !epsilon.is_finite() || epsilon < 0.0 {
            return Err(DpError::invalid(format!(
                "requested epsilon must be finite and non-negative, got {epsilon}"
            )));
        }
        if !delta.is_finite() || delta < 0.0 || delta >= 1.0 {
            return Err(DpError::invalid(format!(
                "requested delta must be in [0, 1), got {delta}"
            )));
        }

        let mut ledger = self.lock();

        if epsilon == 0.0 && delta == 0.0 {
            let granted = (ledger.remaining_epsilon, ledger.remaining_delta);
            if granted.0 == 0.0 && granted.1 == 0.0 {
                return Err(DpError::InsufficientBudget {
                    requested_epsilon: epsilon,
                    requested_delta: delta,
                    remaining_epsilon: 0.0,
                    remaining_delta: 0.0,
                });
            }
            ledger.remaining_epsilon = 0.0;
            ledger.remaining_delta = 0.0;
            return Ok(granted);
        }

        if exceeds(epsilon, ledger.remaining_epsilon) || exceeds(delta, ledger.remaining_delta) {
            return Err(DpError::InsufficientBudget {
                requested_epsilon: epsilon,
                requested_delta: delta,
                remaining_epsilon: ledger.remaining_epsilon,
                remaining_delta: ledger.remaining_delta,
            });
        }

        ledger.remaining_epsilon = (ledger.remaining_epsilon - epsilon).max(0.0);
        ledger.remaining_delta = (ledger.remaining_delta - delta).max(0.0);
        Ok((epsilon, delta))
    }

    /// The budget still available, as `(epsilon, delta)`.
    pub fn remaining(&self) -> (f64, f64) {
        let ledger = self.lock();
        (ledger.remaining_epsilon, ledger.remaining_delta)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Ledger> {
        match self.ledger.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

fn exceeds(requested: f64, remaining: f64) -> bool {
    requested > remaining && requested - remaining > BUDGET_TOLERANCE * requested.max(remaining)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn grants_within_budget() {
        let acc = BudgetAccountant::new(1.0, 1e-5).expect("valid");
        assert_eq!(acc.consume(0.4, 0.0).expect("granted"), (0.4, 0.0));
        let (eps, delta) = acc.remaining();
        assert!((eps - 0.6).abs() < 1e-12);
        assert!((delta - 1e-5).abs() < 1e-20);
    }

    #[test]
    fn zero_request_takes_everything_remaining() {
        let acc = BudgetAccountant::new(2.0, 1e-6).expect("valid");
        assert_eq!(acc.consume(0.0, 0.0).expect("granted"), (2.0, 1e-6));
        assert_eq!(acc.remaining(), (0.0, 0.0));
        assert!(acc.consume(0.0, 0.0).is_err());
    }

    #[test]
    fn refusal_is_atomic() {
        let acc = BudgetAccountant::new(1.0, 0.0).expect("valid");
        // Delta is exhausted even though epsilon is available; nothing may
        // be debited.
        let err = acc.consume(0.5, 1e-5).expect_err("over budget");
        assert!(matches!(err, DpError::InsufficientBudget { .. }));
        assert_eq!(acc.remaining(), (1.0, 0.0));
    }

    #[test]
    fn repeated_slices_tolerate_round_off() {
        let acc = BudgetAccountant::new(1.0, 0.0).expect("valid");
        for _ in 0..10 {
            acc.consume(0.1, 0.0).expect("tenth of the budget");
        }
        assert!(acc.consume(0.1, 0.0).is_err());
    }

    #[test]
    fn rejects_invalid_requests() {
        let acc = BudgetAccountant::new(1.0, 1e-5).expect("valid");
        assert!(acc.consume(f64::NAN, 0.0).is_err());
        assert!(acc.consume(-0.1, 0.0).is_err());
        assert!(acc.consume(0.1, 1.0).is_err());
        assert_eq!(acc.remaining(), (1.0, 1e-5));
    }

    #[test]
    fn concurrent_consumers_never_overdraw() {
        let acc = Arc::new(BudgetAccountant::new(1.0, 0.0).expect("valid"));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let acc = Arc::clone(&acc);
            handles.push(std::thread::spawn(move || {
                let mut granted = 0u32;
                for _ in 0..4 {
                    if acc.consume(0.05, 0.0).is_ok() {
                        granted += 1;
                    }
                }
                granted
            }));
        }
        let total: u32 = handles.into_iter().map(|h| h.join().expect("join")).sum();
        // 1.0 / 0.05 = 20 grants available across all threads.
        assert_eq!(total, 20);
        let (eps, _) = acc.remaining();
        assert!(eps < 1e-9);
    }
}
