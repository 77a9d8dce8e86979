use std::sync::atomic::{AtomicU64, Ordering};

use crate::util::time;

// Single static counter shared by all elements. The timestamp alone is not
// enough: two adds within the same millisecond must still get distinct ids.
static NEXT_SUFFIX: AtomicU64 = AtomicU64::new(1);

/// Generate a fresh element id. Ids are string-typed so template layouts can
/// address the built-in elements by name ("t1", "p1", "p2"); generated ids
/// are derived from the wall clock and never reused.
pub fn generate_id() -> String {
    let suffix = NEXT_SUFFIX.fetch_add(1, Ordering::SeqCst);
    format!("{}-{}", time::timestamp_millis(), suffix)
}
