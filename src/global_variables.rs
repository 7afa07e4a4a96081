// Network file format
pub const LINE_INFO_SEPARATOR: char = ':';
pub const LINE_LIST_SEPARATOR: char = ',';
pub const COMMENT: char = ';';

// Speed sign reduction applied by Intersection::reduce_incoming_speed_signs
pub const SPEED_REDUCTION_AMOUNT: i32 = 10;
pub const SPEED_REDUCTION_CUTOFF: i32 = 50;

// Simulation driver defaults
pub const DEFAULT_TICKS: u64 = 60;
pub const DEFAULT_TICK_MS: u64 = 1000;
