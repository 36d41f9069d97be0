//! The standard placement rules.

mod boundary;
pub use boundary::*;

mod collision;
pub use collision::*;

mod roads;
pub use roads::*;

mod spacing;
pub use spacing::*;
