//! Exit code constants for the agentdocs CLI.
//!
//! - 0: Success
//! - 1: User error (bad args, invalid config)
//! - 2: Input error (bad glob, no matches, malformed frontmatter)
//! - 3: Render failure (template syntax, unresolved include/reference)
//! - 4: Formatting failure (agent rejected the item set)
//! - 5: Write failure
//! - 6: At least one task in the run failed

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments or invalid configuration.
pub const USER_ERROR: i32 = 1;

/// Input resolution or parse failure.
pub const INPUT_FAILURE: i32 = 2;

/// Template rendering failure.
pub const RENDER_FAILURE: i32 = 3;

/// An agent formatter rejected its items.
pub const FORMATTING_FAILURE: i32 = 4;

/// Filesystem write failure.
pub const WRITE_FAILURE: i32 = 5;

/// One or more tasks failed; each failure has already been reported.
pub const TASK_FAILURE: i32 = 6;
