// Library root: the sport-independent valuation and roster-construction
// engine. Sport crates supply a `SportProfile`; everything else lives here.

pub mod config;
pub mod depth;
pub mod error;
pub mod league;
pub mod ovr;
pub mod roster;
pub mod sport;
pub mod store;
pub mod valuation;

pub use error::EngineError;
