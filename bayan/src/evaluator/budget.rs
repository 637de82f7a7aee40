//! Resource budget for a running query
//!
//! A budget is shared by a query and every nested search it starts for
//! negation and aggregation, so the limits apply to the whole proof. On WASM,
//! time checks are a no-op since std::time::Instant is not available there.

use crate::{BayanError, ResourceLimits};
use std::cell::Cell;
use std::rc::Rc;

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Elapsed time is only sampled every this many inferences
const TIME_CHECK_INTERVAL: u64 = 256;

#[derive(Debug, Clone)]
pub struct InferenceBudget {
    inferences: Rc<Cell<u64>>,
    max_inferences: Option<u64>,
    max_list_length: usize,
    max_query_time_ms: Option<u64>,
    #[cfg(not(target_arch = "wasm32"))]
    start_time: Instant,
}

impl InferenceBudget {
    pub fn new(limits: &ResourceLimits) -> Self {
        Self {
            inferences: Rc::new(Cell::new(0)),
            max_inferences: limits.max_inferences,
            max_list_length: limits.max_list_length,
            max_query_time_ms: limits.max_query_time_ms,
            #[cfg(not(target_arch = "wasm32"))]
            start_time: Instant::now(),
        }
    }

    /// Number of resolution steps taken so far
    pub fn inferences(&self) -> u64 {
        self.inferences.get()
    }

    /// Account for one resolution step
    pub fn step(&self) -> Result<(), BayanError> {
        let count = self.inferences.get() + 1;
        self.inferences.set(count);

        if let Some(max) = self.max_inferences {
            if count > max {
                return Err(BayanError::ResourceLimitExceeded {
                    limit_name: "max_inferences".to_string(),
                    limit_value: max.to_string(),
                    actual_value: count.to_string(),
                    suggestion: "The query may not terminate. Add a base case or a cut, or raise the inference limit.".to_string(),
                });
            }
        }

        if count % TIME_CHECK_INTERVAL == 0 {
            self.check_timeout()?;
        }
        Ok(())
    }

    /// Refuse to build a list longer than the configured maximum
    ///
    /// Checked before the list is allocated, so a huge requested length fails
    /// the query instead of exhausting memory.
    pub fn check_list_length(&self, length: usize) -> Result<(), BayanError> {
        if length > self.max_list_length {
            return Err(BayanError::ResourceLimitExceeded {
                limit_name: "max_list_length".to_string(),
                limit_value: self.max_list_length.to_string(),
                actual_value: length.to_string(),
                suggestion: "Build shorter lists, or raise the list length limit.".to_string(),
            });
        }
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn check_timeout(&self) -> Result<(), BayanError> {
        let Some(max_ms) = self.max_query_time_ms else {
            return Ok(());
        };
        let elapsed_ms = self.start_time.elapsed().as_millis() as u64;
        if elapsed_ms > max_ms {
            return Err(BayanError::ResourceLimitExceeded {
                limit_name: "max_query_time_ms".to_string(),
                limit_value: max_ms.to_string(),
                actual_value: elapsed_ms.to_string(),
                suggestion: format!(
                    "Query ran for {}ms, exceeding the limit of {}ms. Narrow the query or increase the timeout.",
                    elapsed_ms, max_ms
                ),
            });
        }
        Ok(())
    }

    #[cfg(target_arch = "wasm32")]
    fn check_timeout(&self) -> Result<(), BayanError> {
        Ok(())
    }
}
