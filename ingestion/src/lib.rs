pub mod builder;
pub mod chunker;
pub mod document;
pub mod matcher;

pub use builder::{BuildError, BuilderConfig, CooccurrenceBuilder};
pub use document::{load_documents, ScrapedDocument};
pub use matcher::EntityMatcher;
