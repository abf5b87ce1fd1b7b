use std::fmt;

/// Element types that can take part in distance and scaling arithmetic.
///
/// Loaded matrices hold `i64`, standardized ones hold `f64`; both widen to
/// `f64` for computation.
pub trait Numeric: Copy + PartialOrd + fmt::Debug + Send + Sync + 'static {
    fn to_f64(self) -> f64;
}

impl Numeric for i64 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

impl Numeric for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}
