pub mod collection;
pub mod decoder;
pub mod release;
pub mod view;


pub use collection::ReleaseCollection;
pub use decoder::FeedDocument;
pub use release::{FileDescriptor, Release, Sha512Checksum, Version};
pub use view::ReleaseView;
