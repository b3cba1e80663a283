use super::direction::Direction;
use super::world::FRAME_LEN;

/// immutable capture of the world state.
///
/// the wire serialization is authoritative for everything the server
/// reports; the four projected ghost headings are the only client-side
/// fields it cannot carry, so they ride alongside. restoring a snapshot
/// re-establishes the world exactly, bypassing (and not clearing) the
/// planner's lock.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub bytes: [u8; FRAME_LEN],
    pub plans: [Direction; 4],
}
