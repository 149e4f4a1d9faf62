// Valuation engine: normalization, assets, session cache, pick estimation,
// value-change evaluation.

pub mod asset;
pub mod cache;
pub mod picks;
pub mod trade;
pub mod zscore;

pub use asset::{Asset, AssetKind};
pub use cache::{CacheSnapshot, PickValueCurve, ValuationCache};
pub use trade::{TradeProposal, Valuator};
