pub mod align;
pub mod decorate;
pub mod matrix;
pub mod tree;

pub use align::align_all;
pub use decorate::decorate_all;
pub use matrix::matrix_all;
pub use tree::build_all;
