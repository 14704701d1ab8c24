//! Content module - projects, updates and their front-matter

mod error;
pub mod frontmatter;
pub mod loader;
mod record;

pub use error::ContentError;
pub use loader::ContentRepository;
pub use record::{
    ContentKind, Extra, Project, ProjectWithContent, Record, Update, UpdateWithContent, WithContent,
};
