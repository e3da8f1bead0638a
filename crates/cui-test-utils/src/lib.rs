pub mod sandbox;
pub mod snapdir;

pub use insta::assert_snapshot;
