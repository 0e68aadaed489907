// [apps/orchestrator/src/state/idempotency.rs]
/*!
 * APARATO: CACHE DE IDEMPOTENCIA
 * RESPONSABILIDAD: Recordar, por una ventana corta, la respuesta
 * emitida para una clave de idempotencia ya vista — para que un
 * reintento de red del cliente sobre `POST /api/blocks` o
 * `POST /api/strategy/seed` no dispare una segunda admision
 * (SPEC_FULL.md §4.4, §9). El reloj es inyectable para que las pruebas
 * puedan avanzar el tiempo sin `tokio::time::pause`.
 */

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

struct Entry {
    expires_at: DateTime<Utc>,
    response: Value,
}

pub struct IdempotencyCache {
    ttl: Duration,
    clock: Box<dyn Clock>,
    entries: Mutex<HashMap<String, Entry>>,
}

impl IdempotencyCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Devuelve la respuesta recordada para `key`, si aun no expiro.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut entries = self.entries.lock().await;
        let now = self.clock.now();
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.response.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub async fn put(&self, key: String, response: Value) {
        let mut entries = self.entries.lock().await;
        let expires_at = self.clock.now() + self.ttl;
        entries.insert(key, Entry { expires_at, response });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[tokio::test]
    async fn remembered_response_expires_after_ttl() {
        let seconds = std::sync::Arc::new(AtomicI64::new(0));
        let clock = ArcFakeClock { seconds: seconds.clone() };
        let cache = IdempotencyCache::with_clock(Duration::seconds(60), Box::new(clock));

        cache.put("abc".to_string(), serde_json::json!({"ok": true})).await;
        assert!(cache.get("abc").await.is_some());

        seconds.store(61, Ordering::SeqCst);
        assert!(cache.get("abc").await.is_none());
    }

    struct ArcFakeClock {
        seconds: std::sync::Arc<AtomicI64>,
    }

    impl Clock for ArcFakeClock {
        fn now(&self) -> DateTime<Utc> {
            DateTime::from_timestamp(self.seconds.load(Ordering::SeqCst), 0).unwrap()
        }
    }

    #[tokio::test]
    async fn unknown_key_returns_none() {
        let cache = IdempotencyCache::new(Duration::seconds(60));
        assert!(cache.get("never-seen").await.is_none());
    }
}
