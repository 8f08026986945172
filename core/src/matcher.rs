//! Block-list matching.
//!
//! Decides whether a live process name counts as "blocked". Pure functions,
//! no process-table access; the killer feeds it names and exe stems.

/// Check whether `candidate` matches the block list.
///
/// The candidate is lowercased and trimmed first. It matches when it equals a
/// block-list entry exactly, or when any `-`-separated token of it equals an
/// entry. The token rule is what lets an entry `signal` catch a process named
/// `signal-desktop`. Any hit short-circuits; there is no precedence among
/// entries.
///
/// Block-list entries are assumed already normalized (lowercase, trimmed) by
/// the store.
pub fn is_blocked(candidate: &str, block_list: &[String]) -> bool {
    let candidate = candidate.trim().to_lowercase();
    if candidate.is_empty() {
        return false;
    }
    if block_list.iter().any(|entry| *entry == candidate) {
        return true;
    }
    candidate
        .split('-')
        .any(|token| block_list.iter().any(|entry| entry == token))
}
