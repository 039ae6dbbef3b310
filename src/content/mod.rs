//! Content module - post models, route enumeration and loading

pub mod loader;
pub mod paths;
mod post;

pub use loader::ContentLoader;
pub use paths::{enumerate_paths, PostRoutes, StaticPaths};
pub use post::{BlogPost, PageContext, PageProps, PostCollection, PostSummary, RawPost, Tag};
