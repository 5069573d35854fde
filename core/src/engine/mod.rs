//! Pure pacing math. Nothing here holds state or reads the clock: the same
//! goal, store and viewed month always produce the same numbers.

pub mod pacing;
pub mod progress;
pub mod working_days;

pub use pacing::{compute_targets, Targets};
pub use progress::sum_in_range;
pub use working_days::{count_in_month, count_in_range};
