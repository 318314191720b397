//! Identifier synthesis for applied resources.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{SecondsFormat, Utc};

use crate::config::IdStrategy;

/// Generates resource identifiers that are unique within the process.
///
/// Every identifier carries a sequence number drawn from an atomic counter,
/// so two applies never receive the same value even when the clock does not
/// advance between them.
#[derive(Debug, Default)]
pub struct IdGenerator {
    strategy: IdStrategy,
    sequence: AtomicU64,
}

impl IdGenerator {
    /// Create a generator using the given strategy.
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            sequence: AtomicU64::new(0),
        }
    }

    /// Produce the next identifier.
    pub fn next_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        match self.strategy {
            IdStrategy::Timestamp => format!(
                "{}-{}",
                Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true),
                seq
            ),
            IdStrategy::Sequential => format!("simple-{}", seq),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_sequential_ids() {
        let ids = IdGenerator::new(IdStrategy::Sequential);
        assert_eq!(ids.next_id(), "simple-1");
        assert_eq!(ids.next_id(), "simple-2");
    }

    #[test]
    fn test_timestamp_ids_parse() {
        let ids = IdGenerator::new(IdStrategy::Timestamp);
        let id = ids.next_id();
        let (timestamp, seq) = id.rsplit_once('-').unwrap();
        assert_eq!(seq, "1");
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let ids = Arc::new(IdGenerator::new(IdStrategy::Timestamp));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let ids = Arc::clone(&ids);
                std::thread::spawn(move || (0..250).map(|_| ids.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate identifier");
            }
        }
        assert_eq!(seen.len(), 2000);
    }
}
