//! Content module - loads posts, assigns identifiers and aggregates tags

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod resolver;
mod site;
pub mod tags;

pub use frontmatter::{FrontMatter, TagEntry};
pub use markdown::MarkdownRenderer;
pub use post::{Post, PostKey, RawPost, Tag, TagKey};
pub use site::Site;
