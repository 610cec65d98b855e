//! Themis Core Domain
//!
//! Pure domain types for the Themis transaction cost analysis system.
//! This crate contains no async, no I/O, and is 100% unit testable.

pub mod entities;
pub mod instruments;
pub mod values;

// Re-export commonly used types at crate root
pub use entities::{ExternalRefs, Fill, LiquidityRole, OrderContext, QwapRef, Side};
pub use instruments::{ContractKey, OptionRight, SecurityType};
pub use values::{Price, Quantity, Symbol, Timestamp, Vol};
