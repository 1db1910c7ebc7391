//! SeaORM entities for the blog tables.

pub mod blog_category;
pub mod blog_post;
pub mod blog_tag;
pub mod post_category;
pub mod post_tag;
