//! Shared criterion normalizers, the identifier overflow guard and range resolution
//!
//! These are the building blocks every search domain composes its fragments from.

pub mod guard;
pub mod normalizers;
pub mod range;

pub use guard::*;
pub use normalizers::*;
pub use range::*;
