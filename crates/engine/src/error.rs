//! TCA engine errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// An order with no qualifying fills has no arrival/side/multiplier
    /// context to compute against.
    #[error("order has no qualifying fills")]
    NoFills,

    /// Consolidation was asked to combine an empty set of legs.
    #[error("no legs to consolidate")]
    NoLegs,
}

pub type Result<T> = std::result::Result<T, Error>;
