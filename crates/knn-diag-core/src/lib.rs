pub mod matrix;
pub mod dtype;
pub mod error;

pub use matrix::Matrix;
pub use dtype::Numeric;
pub use error::{KnnError, KnnResult};
