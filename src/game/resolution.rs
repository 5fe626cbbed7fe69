//! Single-assignment cell holding a game's outcome
//!
//! Both racing activities resolve through this cell. The first resolution
//! wins; every later attempt is ignored. Setting the result also flips a
//! watch channel so the other activity can stop waiting.

use crate::game::types::GameResult;
use tokio::sync::{watch, Mutex, MutexGuard};

pub struct ResolutionCell {
    slot: Mutex<Option<GameResult>>,
    resolved_tx: watch::Sender<bool>,
}

impl ResolutionCell {
    pub fn new() -> Self {
        let (resolved_tx, _) = watch::channel(false);
        Self {
            slot: Mutex::new(None),
            resolved_tx,
        }
    }

    /// Set the result unless one is already set. Returns true if this call won.
    pub async fn try_resolve(&self, result: GameResult) -> bool {
        match self.lock_unresolved().await {
            Some(guard) => {
                guard.resolve(result);
                true
            }
            None => false,
        }
    }

    /// Lock the cell if it is still unresolved.
    ///
    /// While the guard is held no other activity can resolve, so side effects
    /// performed under it can never land after the game has ended.
    pub async fn lock_unresolved(&self) -> Option<ResolutionGuard<'_>> {
        let slot = self.slot.lock().await;
        if slot.is_some() {
            return None;
        }

        Some(ResolutionGuard {
            slot,
            resolved_tx: &self.resolved_tx,
        })
    }

    pub fn is_resolved(&self) -> bool {
        *self.resolved_tx.borrow()
    }

    /// Receiver that flips to `true` once the game is resolved
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.resolved_tx.subscribe()
    }

    /// Wait until some activity resolves the game
    pub async fn resolved(&self) {
        let mut rx = self.subscribe();
        // The sender lives as long as `self`, so this only returns on resolution
        let _ = rx.wait_for(|resolved| *resolved).await;
    }

    pub async fn result(&self) -> Option<GameResult> {
        self.slot.lock().await.clone()
    }
}

impl Default for ResolutionCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Exclusive access to an unresolved cell
pub struct ResolutionGuard<'a> {
    slot: MutexGuard<'a, Option<GameResult>>,
    resolved_tx: &'a watch::Sender<bool>,
}

impl ResolutionGuard<'_> {
    pub fn resolve(mut self, result: GameResult) {
        *self.slot = Some(result);
        self.resolved_tx.send_replace(true);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::types::User;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn winner(id: u64) -> GameResult {
        GameResult::Winner {
            user: User::new(id, format!("player-{}", id)),
        }
    }

    #[tokio::test]
    async fn test_first_resolution_wins() {
        let cell = ResolutionCell::new();

        assert!(!cell.is_resolved());
        assert!(cell.try_resolve(GameResult::TimedOut).await);
        assert!(!cell.try_resolve(winner(1)).await);
        assert!(cell.is_resolved());
        assert_eq!(cell.result().await, Some(GameResult::TimedOut));
    }

    #[tokio::test]
    async fn test_guard_blocks_until_released() {
        let cell = ResolutionCell::new();

        let guard = cell.lock_unresolved().await.unwrap();
        guard.resolve(GameResult::RevealCapReached);

        assert!(cell.lock_unresolved().await.is_none());
        assert!(!cell.try_resolve(winner(2)).await);
        assert_eq!(cell.result().await, Some(GameResult::RevealCapReached));
    }

    #[tokio::test]
    async fn test_dropped_guard_leaves_cell_open() {
        let cell = ResolutionCell::new();

        drop(cell.lock_unresolved().await);
        assert!(!cell.is_resolved());
        assert!(cell.try_resolve(winner(3)).await);
    }

    #[tokio::test]
    async fn test_resolved_wakes_waiters() {
        let cell = Arc::new(ResolutionCell::new());
        let waiter = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.resolved().await })
        };

        tokio::task::yield_now().await;
        assert!(cell.try_resolve(GameResult::TimedOut).await);
        waiter.await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resolution_single_winner() {
        for round in 0..50 {
            let cell = Arc::new(ResolutionCell::new());
            let wins = Arc::new(AtomicUsize::new(0));
            let mut handles = Vec::new();

            for contender in 0..8u64 {
                let cell = cell.clone();
                let wins = wins.clone();
                handles.push(tokio::spawn(async move {
                    let result = match (contender + round) % 3 {
                        0 => GameResult::RevealCapReached,
                        1 => GameResult::TimedOut,
                        _ => winner(contender),
                    };
                    if cell.try_resolve(result).await {
                        wins.fetch_add(1, Ordering::SeqCst);
                    }
                }));
            }

            for handle in handles {
                handle.await.unwrap();
            }

            assert_eq!(wins.load(Ordering::SeqCst), 1);
            assert!(cell.result().await.is_some());
        }
    }
}
