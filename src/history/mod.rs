//! Price histories, lookback windows and history sources

mod data;
mod source;
pub mod loader;

pub use data::{PriceHistory, PricePoint, SecurityAge, WindowSpec, DAYS_PER_YEAR};
pub use source::{HistorySource, InMemoryHistorySource};
pub use loader::{load_history, load_history_from_reader, CsvHistorySource};
