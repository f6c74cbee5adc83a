//! Per-user write locks
//!
//! Every character mutation is a load-modify-store cycle. Holding the user's
//! lock for the whole cycle keeps two requests for the same user from
//! overwriting each other inside this process; the repository revision check
//! covers writers in other processes.
//!
//! Entries live only while someone holds or waits on them, so ids taken from
//! request paths cannot grow the registry.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

type Registry = Arc<Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>>;

/// Registry of async mutexes keyed by user id
#[derive(Default)]
pub struct UserLocks {
    locks: Registry,
}

/// Exclusive access to one user's record, released on drop
pub struct UserLockGuard {
    user_id: String,
    registry: Registry,
    guard: Option<OwnedMutexGuard<()>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `user_id`'s record
    pub async fn acquire(&self, user_id: &str) -> UserLockGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            locks
                .entry(user_id.to_string())
                .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
                .clone()
        };

        UserLockGuard {
            user_id: user_id.to_string(),
            registry: self.locks.clone(),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of users with a held or awaited lock
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(|poisoned| poisoned.into_inner()).len()
    }
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        // Release first so the registry holds the only handle when idle
        self.guard.take();

        let mut locks = self.registry.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        // Waiters clone the handle under this same map lock
        if locks
            .get(&self.user_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let locks = Arc::new(UserLocks::new());
        let guard = locks.acquire("u1").await;

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire("u1").await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_different_users_do_not_block() {
        let locks = UserLocks::new();
        let _a = locks.acquire("a").await;
        let _b = locks.acquire("b").await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_released_locks_leave_no_entries() {
        let locks = UserLocks::new();
        for i in 0..10_000 {
            let _guard = locks.acquire(&format!("ghost-{i}")).await;
        }
        assert_eq!(locks.len(), 0);
    }

    #[tokio::test]
    async fn test_entry_survives_while_a_waiter_is_queued() {
        let locks = Arc::new(UserLocks::new());
        let first = locks.acquire("u1").await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _g = locks.acquire("u1").await;
                locks.len()
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(first);
        assert_eq!(waiter.await.unwrap(), 1);
        assert_eq!(locks.len(), 0);
    }
}
