use crate::feed::collection::ReleaseCollection;
use crate::feed::release::{Release, Version};

/// Projection of a release collection through the current version and the
/// early-access opt-in.
///
/// `history` is ordered descending by version (feed order breaks ties).
/// With early access disabled it contains every stable release plus any
/// early-access release the user would pass through on the way to the
/// newest stable one, and the early-access build they are currently
/// running, if any. `newest` is the highest installable release strictly
/// above the current version within the enabled channels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseView {
    history: Vec<Release>,
    newest: Option<Release>,
}

impl ReleaseView {
    pub fn project(
        collection: &ReleaseCollection,
        current: &Version,
        early_access: bool,
    ) -> Self {
        let newest_stable = collection
            .iter()
            .filter(|release| !release.early_access())
            .map(Release::version)
            .max();

        let mut history: Vec<Release> = collection
            .iter()
            .filter(|release| {
                if early_access || !release.early_access() {
                    return true;
                }
                let version = release.version();
                version == *current
                    || (version > *current
                        && newest_stable.map_or(false, |stable| version <= stable))
            })
            .cloned()
            .collect();
        // Stable sort: equal versions keep their feed order.
        history.sort_by(|a, b| b.version().cmp(&a.version()));

        let mut newest: Option<Release> = None;
        for release in collection.iter() {
            if !early_access && release.early_access() {
                continue;
            }
            if !release.is_new(current) {
                continue;
            }
            // Strict comparison keeps the earliest feed entry on a tie.
            if newest
                .as_ref()
                .map_or(true, |best| release.version() > best.version())
            {
                newest = Some(release.clone());
            }
        }

        ReleaseView { history, newest }
    }

    pub fn history(&self) -> &[Release] {
        &self.history
    }

    pub fn newest(&self) -> Option<&Release> {
        self.newest.as_ref()
    }
}
