//! Foundation types for identifier resolution.
//!
//! - [`NameKey`] - Parsed package/leaf views of an identifier
//! - [`AcceptedExtensions`] - Ordered extension list used when probing files
//!
//! This module has NO dependencies on other classmap modules.

mod extensions;
mod name_key;

pub use extensions::AcceptedExtensions;
pub use name_key::{DEFAULT_DELIMITER, NameKey};
