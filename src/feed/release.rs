use crate::feed::decoder::FeedRelease;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Four-component version in `major.minor.build[.revision]` form.
///
/// Missing components compare as zero, so `1.5` equals `1.5.0.0`. The
/// ordering is total and derives lexicographically from the components.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub build: u64,
    pub revision: u64,
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("invalid version string: {0:?}")]
pub struct VersionParseError(String);

impl Version {
    pub const fn new(major: u64, minor: u64, build: u64, revision: u64) -> Self {
        Version {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().trim_start_matches('v');
        if raw.is_empty() {
            return Err(VersionParseError(s.to_string()));
        }

        let mut components = [0u64; 4];
        let mut count = 0;
        for piece in raw.split('.') {
            if count == components.len() {
                return Err(VersionParseError(s.to_string()));
            }
            components[count] = piece
                .parse()
                .map_err(|_| VersionParseError(s.to_string()))?;
            count += 1;
        }

        Ok(Version::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<Version> for String {
    fn from(version: Version) -> String {
        version.to_string()
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.revision == 0 {
            write!(f, "{}.{}.{}", self.major, self.minor, self.build)
        } else {
            write!(
                f,
                "{}.{}.{}.{}",
                self.major, self.minor, self.build, self.revision
            )
        }
    }
}

/// A SHA-512 digest as 128 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sha512Checksum(String);

impl Sha512Checksum {
    /// Parse a digest, tolerating surrounding whitespace and uppercase hex.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() != 128 || !trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        Some(Sha512Checksum(trimmed.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha512Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Installer artifact reference carried by a release.
///
/// Fields stay as raw feed strings; [`FileDescriptor::checksum`] parses on
/// demand so an unusable descriptor marks the release non-installable
/// instead of failing the whole feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    #[serde(rename = "Url", default)]
    pub url: String,
    #[serde(rename = "Sha512CheckSum", default)]
    pub sha512: String,
}

impl FileDescriptor {
    pub fn checksum(&self) -> Option<Sha512Checksum> {
        Sha512Checksum::parse(&self.sha512)
    }

    pub fn is_complete(&self) -> bool {
        !self.url.is_empty() && self.checksum().is_some()
    }
}

/// One publishable build from the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Release {
    version: Version,
    change_log: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<FileDescriptor>,
    #[serde(skip)]
    early_access: bool,
}

impl Release {
    pub fn new(
        version: Version,
        change_log: Vec<String>,
        file: Option<FileDescriptor>,
        early_access: bool,
    ) -> Self {
        Release {
            version,
            change_log: change_log
                .into_iter()
                .filter(|line| !line.trim().is_empty())
                .collect(),
            file,
            early_access,
        }
    }

    /// Build the model from its wire form, tagging the channel.
    pub fn from_feed(raw: &FeedRelease, early_access: bool) -> Result<Self, VersionParseError> {
        Ok(Release::new(
            raw.version.parse()?,
            raw.change_log.clone(),
            raw.file.clone(),
            early_access,
        ))
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn change_log(&self) -> &[String] {
        &self.change_log
    }

    pub fn file(&self) -> Option<&FileDescriptor> {
        self.file.as_ref()
    }

    pub fn early_access(&self) -> bool {
        self.early_access
    }

    /// Whether this release carries everything needed to install it.
    pub fn is_installable(&self) -> bool {
        self.file.as_ref().is_some_and(FileDescriptor::is_complete)
    }

    /// Whether this release is an installable upgrade over `current`.
    pub fn is_new(&self, current: &Version) -> bool {
        self.version > *current && self.is_installable()
    }
}
