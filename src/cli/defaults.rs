pub const MIN_MAPQ: u32 = 30;
pub const MAX_MISMATCHES: u32 = 3;
pub const MAX_GAP: u32 = 0;

/// Max distance between left and right TE anchor clusters for them to be joined into one event
pub const TE_MATCH_DISTANCE: u64 = 1000;

pub const MIN_TE_EVENT_READS: usize = 1;
