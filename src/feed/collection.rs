use crate::error::{Result, UpdateError};
use crate::feed::decoder::FeedDocument;
use crate::feed::release::Release;

/// Flattened, channel-tagged sequence of releases from a feed document.
///
/// Order inside a category is preserved; no global sort happens here.
/// The view layer orders its projection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseCollection {
    releases: Vec<Release>,
}

impl ReleaseCollection {
    /// Flatten the document's categories. A category whose name matches
    /// `early_access_category` (case-insensitive) contributes early-access
    /// releases; all others contribute stable ones. Categories with a null
    /// release list are skipped.
    pub fn from_document(document: &FeedDocument, early_access_category: &str) -> Result<Self> {
        let mut releases = Vec::new();
        for category in &document.categories {
            let early_access = category.name.eq_ignore_ascii_case(early_access_category);
            let Some(raw_releases) = &category.releases else {
                continue;
            };
            for raw in raw_releases {
                releases.push(Release::from_feed(raw, early_access).map_err(UpdateError::malformed)?);
            }
        }
        Ok(ReleaseCollection { releases })
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Release> {
        self.releases.iter()
    }
}
