// Library root for the command-line driver: sport selection, the roster
// pass over a league snapshot, and the printed report.

pub mod pass;
pub mod report;
pub mod sports;

pub use pass::{load_league, run_pass, AppError, TradeRequest};
pub use report::PassReport;
