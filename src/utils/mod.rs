//! Small shared helpers.

pub mod encoding;
pub mod tokens;

pub use encoding::read_source_file;
pub use tokens::estimate_tokens;
