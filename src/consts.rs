/// Number of tracked city stats (food, shield, trade, gold, luxury, science).
pub const NUM_STATS: usize = 6;

/// Stats that are a plain per-tile sum (food, shield, trade).
pub const NUM_PRIMARY_STATS: usize = 3;

/// Specialist roles (entertainer, taxman, scientist).
pub const NUM_SPECIALISTS: usize = 3;

/// Upper bound on work tiles per city. Worked tiles are tracked in a u64 mask.
pub const MAX_WORK_TILES: usize = 64;

/// Largest city population accepted.
pub const MAX_CITY_SIZE: u32 = 255;

/// Largest absolute food, shield or trade a single tile (or the centre) may
/// yield. Keeps combination sums and secondary table sizes bounded.
pub const MAX_TILE_OUTPUT: i32 = 1000;

/// Default per-worker-count slot budget of the combination cache.
pub const DEFAULT_COMBINATION_CAPACITY: usize = 1024;

/// Smallest city allowed to employ taxmen and scientists.
pub const DEFAULT_SPECIALIST_MIN_SIZE: u32 = 5;

/// Version byte written at the head of a persisted parameter record.
pub const PARAMETER_FORMAT_VERSION: u8 = 2;

/// Exact length of a persisted parameter record:
/// version + 6 * (minimum, factor) + happy factor + mode + require-happy.
pub const PARAMETER_RECORD_SIZE: usize = 1 + NUM_STATS * 4 + 2 + 1 + 1;

/// Upper bound on the rows a secondary table is pre-sized with. Larger keys
/// grow the table when first recorded.
pub const SECONDARY_INITIAL_ROWS: usize = 256;

/// Per-specialist output assumed when pre-sizing the luxury dimension of the
/// secondary cache. Only affects initial allocation; the tables grow on demand.
pub const ESTIMATED_SPECIALIST_OUTPUT: i32 = 3;
