// Engine-level error taxonomy.

use thiserror::Error;

use crate::league::{Dpid, Pid, Tid};
use crate::store::StoreError;

/// Failures that abort a single engine call.
///
/// Missing references are never mapped to a zero value: an AI decision built
/// on a silently dropped asset would be wrong in a way nobody notices.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("unknown team id {0}")]
    UnknownTeam(Tid),

    #[error("no player with pid {0}")]
    MissingPlayer(Pid),

    #[error("no draft pick with dpid {0}")]
    MissingDraftPick(Dpid),

    #[error(transparent)]
    Store(#[from] StoreError),
}
