use std::{collections::HashMap, future::Future};
use tokio::task::JoinHandle;

/// Background tasks keyed by the panel they feed.
///
/// Starting a task under a key aborts the one already running there. Request
/// ids only ever grow, so a result can be checked against the latest id of its
/// key with [`TaskManager::is_current`].
#[derive(Default)]
pub struct TaskManager {
    tasks: HashMap<String, JoinHandle<()>>,
    latest: HashMap<String, u64>,
    next_id: u64,
}

impl TaskManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, key: &str, task: JoinHandle<()>) {
        if let Some(handle) = self.tasks.insert(key.to_string(), task) {
            handle.abort();
        }
    }

    /// Spawns the future built from a fresh request id and returns that id.
    pub fn spawn_request<F, Fut>(&mut self, key: &str, make: F) -> u64
    where
        F: FnOnce(u64) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.next_id += 1;
        let id = self.next_id;
        self.latest.insert(key.to_string(), id);
        self.spawn(key, tokio::spawn(make(id)));
        id
    }

    pub fn is_current(&self, key: &str, id: u64) -> bool {
        self.latest.get(key) == Some(&id)
    }

    pub fn abort(&mut self, key: &str) {
        self.latest.remove(key);
        if let Some(handle) = self.tasks.remove(key) {
            handle.abort();
        }
    }

    pub fn abort_all(&mut self) {
        for handle in self.tasks.values() {
            handle.abort();
        }
        self.tasks.clear();
        self.latest.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::events::keys;
    use std::time::Duration;

    #[tokio::test]
    async fn newer_request_supersedes_older() {
        let mut tasks = TaskManager::new();
        let (tx, rx) = flume::unbounded();

        let slow_tx = tx.clone();
        let first = tasks.spawn_request("search", move |id| async move {
            tokio::time::sleep(Duration::from_secs(5)).await;
            let _ = slow_tx.send(id);
        });
        let second = tasks.spawn_request("search", move |id| async move {
            let _ = tx.send(id);
        });

        assert!(second > first);
        assert!(!tasks.is_current("search", first));
        assert!(tasks.is_current("search", second));

        let got = rx.recv_async().await.unwrap();
        assert_eq!(got, second);
        // the first task was aborted, so nothing else arrives
        let rest = tokio::time::timeout(Duration::from_millis(200), rx.recv_async()).await;
        assert!(!matches!(rest, Ok(Ok(_))));
    }

    #[tokio::test]
    async fn keys_are_independent() {
        let mut tasks = TaskManager::new();
        let a = tasks.spawn_request("charts", |_| async {});
        let b = tasks.spawn_request("lyrics", |_| async {});
        assert!(tasks.is_current("charts", a));
        assert!(tasks.is_current("lyrics", b));
        assert!(!tasks.is_current("charts", b));

        tasks.abort("charts");
        assert!(!tasks.is_current("charts", a));
        assert!(tasks.is_current("lyrics", b));
    }

    #[tokio::test]
    async fn refetching_favorites_leaves_a_pending_toggle_running() {
        let mut tasks = TaskManager::new();
        let (tx, rx) = flume::unbounded();

        let toggle = tasks.spawn_request(keys::FAVORITE_TOGGLE, move |id| async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(id);
        });
        let refetch = tasks.spawn_request(keys::FAVORITES, |_| async {});

        assert!(tasks.is_current(keys::FAVORITE_TOGGLE, toggle));
        assert!(tasks.is_current(keys::FAVORITES, refetch));
        let got = tokio::time::timeout(Duration::from_secs(2), rx.recv_async()).await;
        assert!(matches!(got, Ok(Ok(id)) if id == toggle));
    }
}
