//! Path model.
//!
//! - [`CiString`] / [`PathToken`] - one case-insensitive segment
//! - [`FsPath`] - immutable segment sequence with absolute/relative flag

mod token;
mod value;

pub use token::{CiString, PathToken};
pub use value::{FsPath, SEPARATOR};
