//! Float ordering and the tolerance used for coincidence tests.

/// The default absolute tolerance for deciding that two x-coordinates or two
/// slopes are the same.
///
/// This is not scaled by the magnitude of the input: inputs with very large
/// coordinates effectively get exact comparisons.
pub const DEFAULT_EPSILON: f64 = 2.2204460492503131e-16;

/// Are `a` and `b` within `eps` of one another?
#[inline]
pub(crate) fn nearly_eq(a: f64, b: f64, eps: f64) -> bool {
    (a - b).abs() <= eps
}

/// A wrapper for `f64` that implements `Ord`.
///
/// Comparing a NaN panics. Inputs are checked for NaN before anything gets
/// sorted, so this never happens in practice.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl CheapOrderedFloat {
    /// Unwraps the float.
    #[inline(always)]
    pub fn into_inner(self) -> f64 {
        self.0
    }
}

impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.0.partial_cmp(&other.0) {
            Some(ord) => ord,
            None => panic!("NaN in comparison: {} vs {}", self.0, other.0),
        }
    }
}

impl From<f64> for CheapOrderedFloat {
    #[inline(always)]
    fn from(value: f64) -> Self {
        CheapOrderedFloat(value)
    }
}
