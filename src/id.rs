//! Opaque molecule/environment identifier generation.
//!
//! Kept behind a trait so tests can inject deterministic ids without
//! threading a seeded generator through every constructor.

use uuid::Uuid;

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
pub mod test_support {
    use super::IdGenerator;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic, monotonically increasing id generator for tests.
    #[derive(Debug, Default)]
    pub struct SequentialGenerator {
        next: AtomicU64,
    }

    impl IdGenerator for SequentialGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("test-id-{n}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uuid_generator_produces_unique_non_empty_ids() {
        let gen = UuidGenerator;
        let a = gen.next_id();
        let b = gen.next_id();
        assert!(!a.is_empty());
        assert_ne!(a, b);
    }
}
