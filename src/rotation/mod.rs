//! Discovery feed selection.
//!
//! One rotation run:
//!
//! 1. **Eligibility** - drop records included less than
//!    `min_days_between_includes` days ago ([`eligibility`]).
//! 2. **Scoring** - `quality_weight * quality/10 + randomness_weight * U(0,1)`.
//! 3. **Ranking** - highest score first, pool order on ties.
//! 4. **Truncation** - keep at most `num_discovery_feeds`.
//!
//! Selection has no side effects; the caller stamps the picked records via
//! [`Pool::stamp`](crate::pool::Pool::stamp) using the same `now`.

pub mod eligibility;
mod select;

pub use eligibility::{days_until_eligible, is_eligible};
pub use select::{Pick, Selection, select};
