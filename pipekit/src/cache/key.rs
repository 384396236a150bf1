//! Cache keys.

use sha2::{Digest, Sha256};
use std::fmt;

/// Identifies a built pipeline: namespace plus ordered step names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    namespace: String,
    steps: Box<[String]>,
}

impl CacheKey {
    /// Creates a new cache key.
    #[must_use]
    pub fn new(namespace: impl Into<String>, steps: &[String]) -> Self {
        Self {
            namespace: namespace.into(),
            steps: steps.into(),
        }
    }

    /// Returns the namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the ordered step names.
    #[must_use]
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// Returns a short, stable digest of the key for log fields.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.namespace.as_bytes());
        for step in self.steps.iter() {
            // Unit separator keeps ["ab"] and ["a", "b"] apart.
            hasher.update([0x1f_u8]);
            hasher.update(step.as_bytes());
        }
        let digest = hasher.finalize();
        hex::encode(&digest[..8])
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[{}]", self.namespace, self.steps.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_order_matters() {
        let a = CacheKey::new("demo", &steps(&["strip", "upper"]));
        let b = CacheKey::new("demo", &steps(&["upper", "strip"]));
        assert_ne!(a, b);
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_namespace_matters() {
        let a = CacheKey::new("demo", &steps(&["strip"]));
        let b = CacheKey::new("other", &steps(&["strip"]));
        assert_ne!(a, b);
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = CacheKey::new("demo", &steps(&["strip", "upper"]));
        let b = CacheKey::new("demo", &steps(&["strip", "upper"]));
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
        assert_eq!(a.fingerprint().len(), 16);
    }

    #[test]
    fn test_fingerprint_separates_steps() {
        let a = CacheKey::new("demo", &steps(&["ab"]));
        let b = CacheKey::new("demo", &steps(&["a", "b"]));
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_display() {
        let key = CacheKey::new("demo", &steps(&["strip", "upper"]));
        assert_eq!(key.to_string(), "demo:[strip, upper]");
    }
}
