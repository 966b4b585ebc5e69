//! The note store: Markdown files with YAML front matter under a vault root.

mod document;
mod frontmatter;
mod store;

pub use document::{DocumentKind, TrackedMetadata, DASHBOARD_TAG, MANAGED_TAG, REPOSITORY_TAG};
pub use frontmatter::{
    generate_frontmatter, parse_frontmatter, parse_frontmatter_raw, set_frontmatter_field,
    split_frontmatter, FrontmatterError,
};
pub use store::{Vault, VaultError};
