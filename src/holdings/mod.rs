//! Holding requests and holdings import

mod data;
pub mod loader;

pub use data::HoldingRequest;
pub use loader::{load_holdings, load_holdings_from_reader, LoadedHoldings, RejectedRow};
