//! Game-wide constants.

/// Number of cards in a completed selection. The claim protocol and the
/// classic rules both assume exactly three.
pub const SELECTION_SIZE: usize = 3;

/// Default number of board slots (the classic 3x4 grid).
pub const DEFAULT_BOARD_CAPACITY: usize = 12;

/// Default deck size (4 features with 3 options each).
pub const DEFAULT_DECK_SIZE: usize = 81;

/// Default countdown until a full reshuffle, in milliseconds.
pub const DEFAULT_COUNTDOWN_MS: u64 = 60_000;

/// Default threshold under which the countdown display is flagged as a
/// warning and the dealer ticks faster, in milliseconds.
pub const DEFAULT_COUNTDOWN_WARNING_MS: u64 = 5_000;

/// Default freeze after an accepted claim, in milliseconds.
pub const DEFAULT_SUCCESS_FREEZE_MS: u64 = 1_000;

/// Default freeze after a rejected claim, in milliseconds.
pub const DEFAULT_PENALTY_FREEZE_MS: u64 = 3_000;
