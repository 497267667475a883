/// Cell identity on the board, 0-based.
pub type CellId = u8;

/// Count type used for board sizes.
pub type CellCount = u8;

/// Milliseconds on the session timeline.
///
/// The core never reads a wall clock; hosts feed timestamps in whatever
/// monotonic millisecond scale they like, as long as it never goes backwards.
pub type Millis = u64;

/// Player-facing hole number for a cell (holes are numbered from 1).
pub const fn display_index(cell: CellId) -> u8 {
    cell + 1
}
