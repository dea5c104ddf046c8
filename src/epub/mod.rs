//! Reading produced EPUB packages back.

mod reader;

pub use reader::{PackageInfo, read_package, read_package_from_reader};
