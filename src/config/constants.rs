//! Compile-time configuration constants for the update agent.
//!
//! Debug builds point at a local fixture server so the pipeline can be
//! exercised without touching production; release builds use the hosted
//! feed.

/// Feed endpoint configuration
pub mod endpoints {

    /// Release feed document enumerating all published builds
    #[cfg(debug_assertions)]
    pub const FEED: &str = "http://localhost:3000/releases/feed.json";

    #[cfg(not(debug_assertions))]
    pub const FEED: &str = "https://updates.updraft.dev/feed.json";
}

/// Category whose releases belong to the early-access channel. Matching
/// is case-insensitive.
pub const EARLY_ACCESS_CATEGORY: &str = "EarlyAccess";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_endpoint_is_a_url() {
        assert!(
            endpoints::FEED.starts_with("http://") || endpoints::FEED.starts_with("https://")
        );
    }

    #[test]
    fn test_early_access_category_is_set() {
        assert!(!EARLY_ACCESS_CATEGORY.is_empty());
    }
}
