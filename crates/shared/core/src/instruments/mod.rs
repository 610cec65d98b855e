mod contract;
mod security;

pub use contract::{ContractKey, OptionRight};
pub use security::SecurityType;
