//! # Keys
//! Every record in the sketch store is addressed by a key assigned by the store on append.
//! Keys increase monotonically with arrival, which is the only ordering the rest of the crate relies upon.
//!
//! Keys are opaque strings. They compare by length first, then lexicographically - this orders
//! fixed-width keys (push-style ids, zero padded counters) and plain decimal counters alike.

use std::sync::Arc;

#[derive(Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SketchKey(Arc<str>);

impl SketchKey {
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self(key.into())
    }
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl From<&str> for SketchKey {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for SketchKey {
    fn from(value: String) -> Self {
        Self(value.into())
    }
}
impl Ord for SketchKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}
impl PartialOrd for SketchKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl std::fmt::Display for SketchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sketch#{}", self.0)
    }
}
impl std::fmt::Debug for SketchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        <SketchKey as std::fmt::Display>::fmt(self, f)
    }
}

#[cfg(test)]
mod test {
    use super::SketchKey;
    #[test]
    fn counters_order_numerically() {
        let keys: Vec<SketchKey> = ["9", "10", "100", "11"].into_iter().map(Into::into).collect();
        let mut sorted = keys.clone();
        sorted.sort();
        let sorted: Vec<&str> = sorted.iter().map(SketchKey::as_str).collect();
        assert_eq!(sorted, ["9", "10", "11", "100"]);
    }
    #[test]
    fn fixed_width_orders_lexicographically() {
        let a = SketchKey::new("-NxA0000000000000001");
        let b = SketchKey::new("-NxA0000000000000002");
        let c = SketchKey::new("-NxB0000000000000000");
        assert!(a < b && b < c);
        assert_eq!(a, a.clone());
    }
}
