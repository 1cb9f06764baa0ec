pub mod error;
pub mod money;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use error::CoreError;
pub use money::{MoneyValue, Quotation};
pub use structs::{CouponEvent, Instrument, PriceQuote};
