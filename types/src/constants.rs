/// Balance a new session starts with.
pub const STARTING_BALANCE: f64 = 1_000.0;

/// Bet amount a new session starts with.
pub const DEFAULT_WAGER: f64 = 10.0;

/// Peg rows on a default board.
pub const DEFAULT_ROWS: u8 = 10;

/// Smallest supported number of peg rows.
pub const MIN_ROWS: u8 = 1;

/// Largest supported number of peg rows.
pub const MAX_ROWS: u8 = 20;

/// Delay between automatic rounds in milliseconds.
pub const AUTO_PLAY_DELAY_MS: u64 = 500;

/// Decimal places synthesized multipliers are rounded to.
pub const SYNTHESIZED_DECIMALS: i32 = 1;
