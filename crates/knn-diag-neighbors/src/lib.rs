pub mod distance;
pub mod knn;

pub use distance::euclidean_distance;
pub use knn::*;
