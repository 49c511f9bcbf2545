/*!
   Utilities for retrying test operations.
*/

use core::time::Duration;
use std::thread::sleep;
use std::time::Instant;
use tracing::{debug, trace};

use crate::error::Error;

/**
   Number of balance polls after submitting a transfer, and the delay
   between them. One minute is enough for the relayer to pick up the
   packet on the devnet; a slower relay points at a relayer problem
   rather than at latency.
*/
pub const WAIT_BALANCE_ATTEMPTS: u16 = 20;

pub const WAIT_BALANCE_INTERVAL: Duration = Duration::from_secs(3);

/**
   How many times to poll and how long to wait in between.

   The optional `deadline` lets an outer test timeout cut the polling
   short: no attempt is started after it has passed, and sleeps are
   clamped to it.
*/
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub attempts: u16,
    pub interval: Duration,
    pub deadline: Option<Instant>,
}

impl RetryPolicy {
    pub fn new(attempts: u16, interval: Duration) -> Self {
        Self {
            attempts,
            interval,
            deadline: None,
        }
    }

    pub fn with_deadline(self, deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
            ..self
        }
    }

    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    fn expired(&self) -> bool {
        self.deadline
            .map_or(false, |deadline| Instant::now() >= deadline)
    }

    fn pause(&self) {
        let wait = match self.deadline {
            Some(deadline) => self
                .interval
                .min(deadline.saturating_duration_since(Instant::now())),
            None => self.interval,
        };

        sleep(wait);
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(WAIT_BALANCE_ATTEMPTS, WAIT_BALANCE_INTERVAL)
    }
}

/**
   Poll `query_balance` until it reports strictly more than `baseline`,
   returning the new balance.

   A failing query aborts the wait immediately, since it indicates a
   broken endpoint rather than a slow relay. If the attempts run out, or
   the policy deadline passes, the returned
   [`BalanceTimeout`](crate::error::ErrorDetail::BalanceTimeout) error
   carries the last balance observed.
*/
pub fn wait_for_balance_increase(
    address: &str,
    denom: &str,
    baseline: u128,
    policy: RetryPolicy,
    query_balance: impl Fn() -> Result<u128, Error>,
) -> Result<u128, Error> {
    let mut last_observed = baseline;

    for attempt in 1..=policy.attempts {
        if policy.expired() {
            debug!(
                "deadline passed before attempt {} while waiting for balance of {}",
                attempt, address
            );
            break;
        }

        let current = query_balance()?;
        last_observed = current;

        if current > baseline {
            return Ok(current);
        }

        trace!(
            "balance of {} for {} still {} after attempt {}/{}",
            address,
            denom,
            current,
            attempt,
            policy.attempts
        );

        if attempt < policy.attempts {
            policy.pause();
        }
    }

    Err(Error::balance_timeout(
        address.to_string(),
        denom.to_string(),
        policy.attempts,
        last_observed,
    ))
}
