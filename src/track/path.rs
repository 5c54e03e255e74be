//! Dotted path formatting.
//!
//! ```text
//! ""        + key "server" -> "server"
//! "server"  + key "port"   -> "server.port"
//! "users"   + index 0      -> "users[0]"
//! ""        + index 2      -> "[2]"
//! ```

use std::fmt::Write;

/// Path of a mapping entry below `parent`.
pub fn child_key(parent: &str, key: &str) -> String {
    if parent.is_empty() {
        key.to_string()
    } else {
        format!("{parent}.{key}")
    }
}

/// Path of a sequence element below `parent`.
pub fn child_index(parent: &str, index: usize) -> String {
    let mut path = String::with_capacity(parent.len() + 4);
    path.push_str(parent);
    // Writing into a String cannot fail
    let _ = write!(path, "[{index}]");
    path
}

// ============================================================================
// tests
// ============================================================================
