use std::sync::Arc;

use chrono::{DateTime, Utc};
use rocket::tokio::sync::RwLock;

use crate::clock::Clock;

use super::{Registry, Result};

/// A [`Registry`] that can be shared between concurrent request handlers,
/// together with the clock its time-gated operations are judged against.
///
/// Writers hold an exclusive lock for the whole of one operation; readers
/// share the lock, so they only ever see the state between two operations.
pub struct SharedRegistry {
    registry: RwLock<Registry>,
    clock: Arc<dyn Clock>,
}

impl SharedRegistry {
    /// Create an empty registry that tells the time using `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
            clock,
        }
    }

    /// The current time according to our clock.
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Run a query against a consistent view of the registry.
    pub async fn read<T, F>(&self, query: F) -> Result<T>
    where
        F: FnOnce(&Registry) -> Result<T>,
    {
        let registry = self.registry.read().await;
        query(&registry)
    }

    /// Run a mutation with exclusive access to the registry.
    /// The clock is read once, after the lock is taken, and passed in.
    pub async fn write<T, F>(&self, mutation: F) -> Result<T>
    where
        F: FnOnce(&mut Registry, DateTime<Utc>) -> Result<T>,
    {
        let mut registry = self.registry.write().await;
        let now = self.clock.now();
        let result = mutation(&mut registry, now);
        if let Err(ref e) = result {
            debug!("Rejected registry update: {e}");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use rocket::tokio;

    use super::*;
    use crate::clock::ManualClock;
    use crate::model::common::voter::VoterAddress;
    use crate::model::registry::RegistryError;

    #[rocket::async_test]
    async fn write_sees_the_injected_clock() {
        let clock = ManualClock::starting_now();
        let shared = SharedRegistry::new(Arc::new(clock.clone()));

        let id = shared
            .write(|r, now| r.create_election("Board".to_string(), 60, now))
            .await
            .unwrap();
        let result = shared.write(|r, now| r.end_election(id, now)).await;
        assert_eq!(result, Err(RegistryError::TooEarly(id)));

        clock.advance(60);
        shared.write(|r, now| r.end_election(id, now)).await.unwrap();
        let active = shared
            .read(|r| Ok(r.election(id)?.is_active()))
            .await
            .unwrap();
        assert!(!active);
    }

    #[rocket::async_test]
    async fn concurrent_votes_are_all_counted() {
        let shared = Arc::new(SharedRegistry::new(Arc::new(ManualClock::starting_now())));
        shared
            .write(|r, now| r.create_election("Board".to_string(), 60, now))
            .await
            .unwrap();
        shared
            .write(|r, _| r.add_candidate(1, "Alice".to_string()))
            .await
            .unwrap();

        let handles: Vec<_> = (0..50)
            .map(|i| {
                let shared = shared.clone();
                tokio::spawn(async move {
                    let voter: VoterAddress = format!("voter-{}", i % 25).parse().unwrap();
                    shared.write(|r, _| r.vote(1, 1, &voter)).await
                })
            })
            .collect();
        let mut accepted = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                accepted += 1;
            }
        }

        // 25 distinct voters, each trying twice.
        assert_eq!(accepted, 25);
        let count = shared
            .read(|r| Ok(r.candidate(1, 1)?.vote_count))
            .await
            .unwrap();
        assert_eq!(count, 25);
    }
}
