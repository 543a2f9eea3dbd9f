//! Core value types
//!
//! Immutable values with validation logic - no I/O and no logging.
//! Everything here is `Send + Sync` and safe to share without locks.

mod currency;
mod money;
mod registry;
pub mod result;
pub mod time;
mod timezone;

pub use currency::{Currency, MAX_DECIMAL_PLACES};
pub use money::Money;
pub use registry::{CurrencyRegistry, CurrencyRegistryBuilder};
pub use time::{Layout, Time, MAX_EPOCH, MIN_EPOCH};
pub use timezone::Timezone;
