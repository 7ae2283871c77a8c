/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 100;

// =============================================================================
// ITEM VALIDATION BOUNDS
// =============================================================================

pub const ITEM_NAME_MIN_LEN: usize = 3;
pub const ITEM_NAME_MAX_LEN: usize = 100;

pub const ITEM_DESCRIPTION_MIN_LEN: usize = 10;
pub const ITEM_DESCRIPTION_MAX_LEN: usize = 500;

pub const ITEM_LOCATION_MIN_LEN: usize = 3;
pub const ITEM_LOCATION_MAX_LEN: usize = 100;

/// Maximum accepted item photo size (5 MiB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

// =============================================================================
// CLAIM VALIDATION BOUNDS
// =============================================================================

/// Minimum trimmed length of a claim message. One constant for every entry
/// point; the message must carry enough substance to adjudicate ownership.
pub const CLAIM_MESSAGE_MIN_LEN: usize = 20;

pub const CLAIM_MESSAGE_MAX_LEN: usize = 1000;
