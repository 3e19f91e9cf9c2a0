use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use shared::domain::{SessionId, TrackedMarker};

/// Markers currently reported by the tracking transport, keyed by session id.
///
/// Written from the tracking delivery thread; other threads only ask whether a
/// session is present. Never consulted while a navigation transition is decided.
#[derive(Debug, Default)]
pub struct ObjectRegistry {
    markers: Mutex<HashMap<SessionId, TrackedMarker>>,
}

impl ObjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_or_replace(&self, session_id: SessionId, marker: TrackedMarker) {
        self.lock().insert(session_id, marker);
    }

    /// Updates the angle of a tracked marker. Returns `false` if the session is unknown.
    pub fn update_angle(&self, session_id: SessionId, angle: f64) -> bool {
        match self.lock().get_mut(&session_id) {
            Some(marker) => {
                marker.angle = angle;
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, session_id: SessionId) {
        self.lock().remove(&session_id);
    }

    pub fn contains(&self, session_id: SessionId) -> bool {
        self.lock().contains_key(&session_id)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SessionId, TrackedMarker>> {
        // Every mutation is a single map call, so a poisoned map is still consistent.
        self.markers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use shared::domain::SymbolId;

    use super::*;

    fn marker(id: i64, angle: f64) -> TrackedMarker {
        TrackedMarker {
            session_id: SessionId(id),
            symbol_id: SymbolId(1),
            angle,
        }
    }

    #[test]
    fn add_update_remove_lifecycle() {
        let registry = ObjectRegistry::new();
        registry.add_or_replace(SessionId(4), marker(4, 0.0));
        assert!(registry.contains(SessionId(4)));
        assert!(registry.update_angle(SessionId(4), 1.5));
        registry.remove(SessionId(4));
        assert!(!registry.contains(SessionId(4)));
        assert!(registry.is_empty());
    }

    #[test]
    fn removing_absent_session_is_noop() {
        let registry = ObjectRegistry::new();
        registry.add_or_replace(SessionId(1), marker(1, 0.0));
        registry.remove(SessionId(99));
        assert_eq!(registry.len(), 1);
        assert!(!registry.update_angle(SessionId(99), 0.3));
    }

    #[test]
    fn concurrent_writers_do_not_lose_entries() {
        let registry = Arc::new(ObjectRegistry::new());
        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    for n in 0..100 {
                        let id = worker * 100 + n;
                        registry.add_or_replace(SessionId(id), marker(id, 0.0));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("writer");
        }
        assert_eq!(registry.len(), 400);
    }
}
