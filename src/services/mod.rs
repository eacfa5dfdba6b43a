pub mod audit;
pub mod backtest;
pub mod scoregrid;

pub use audit::*;
pub use backtest::*;
pub use scoregrid::*;
