//! Site-wide files derived from the registered page set.

pub mod sitemap;

pub use sitemap::build_sitemap;
