pub mod transform;

pub use transform::{invert, normal_matrix, perspective_projection, transpose};
