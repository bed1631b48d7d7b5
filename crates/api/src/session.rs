//! In-memory per-user sessions and debounced write-back.
//!
//! Each authenticated user gets one [`Session`] holding their entire
//! schedule state ([`TemplateManager`]) behind a `tokio::sync::Mutex`.
//! Handlers mutate synchronously under the lock and respond from memory;
//! persistence happens in the background. Every mutation restarts a
//! quiescence timer (`save_debounce_ms`, default 500 ms) and only the most
//! recent pending save actually writes: an older timer that wakes up and
//! finds its sequence number stale simply drops out.
//!
//! A save that fails with [`GatewayError::Unavailable`] is logged and the
//! in-memory state stays authoritative; the next mutation schedules a fresh
//! attempt. [`GatewayError::Unauthorized`] evicts the session so the next
//! request forces a re-login.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use rota_core::document::{GatewayError, PersistenceGateway, ScheduleDocument};
use rota_core::template::TemplateManager;
use rota_core::types::DbId;

/// One user's live schedule state plus its persistence gateway.
pub struct Session {
    user_id: DbId,
    gateway: Arc<dyn PersistenceGateway>,
    manager: Mutex<TemplateManager>,
    /// Monotonic counter; each scheduled save captures the value at
    /// schedule time and aborts if a newer save has been scheduled since.
    save_seq: AtomicU64,
}

impl Session {
    fn new(user_id: DbId, gateway: Arc<dyn PersistenceGateway>, manager: TemplateManager) -> Self {
        Self {
            user_id,
            gateway,
            manager: Mutex::new(manager),
            save_seq: AtomicU64::new(0),
        }
    }

    pub fn user_id(&self) -> DbId {
        self.user_id
    }

    /// Lock the schedule state for reading or mutation.
    pub async fn manager(&self) -> MutexGuard<'_, TemplateManager> {
        self.manager.lock().await
    }

    /// Snapshot the current state as a persistable document.
    async fn snapshot(&self) -> ScheduleDocument {
        let manager = self.manager.lock().await;
        ScheduleDocument::from_manager(&manager)
    }
}

/// The map of live sessions, shared via `AppState`.
pub struct SessionManager {
    sessions: Mutex<HashMap<DbId, Arc<Session>>>,
    debounce: Duration,
}

impl SessionManager {
    pub fn new(debounce_ms: u64) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            debounce: Duration::from_millis(debounce_ms),
        }
    }

    /// Fetch the user's session, loading their document on first access.
    ///
    /// A stored document seeds the manager; a user who has never saved
    /// starts from defaults. `Unavailable` on load also falls back to
    /// defaults -- the store may be briefly unreachable and an empty week
    /// beats a hard failure. Only `Unauthorized` propagates.
    pub async fn get_or_load(
        &self,
        user_id: DbId,
        gateway: Arc<dyn PersistenceGateway>,
    ) -> Result<Arc<Session>, GatewayError> {
        {
            let sessions = self.sessions.lock().await;
            if let Some(session) = sessions.get(&user_id) {
                return Ok(Arc::clone(session));
            }
        }

        let manager = match gateway.load().await {
            Ok(Some(document)) => document.into_manager(),
            Ok(None) => TemplateManager::default(),
            Err(GatewayError::Unauthorized) => return Err(GatewayError::Unauthorized),
            Err(GatewayError::Unavailable(msg)) => {
                tracing::warn!(user_id, error = %msg, "Document load failed, starting empty");
                TemplateManager::default()
            }
        };

        let session = Arc::new(Session::new(user_id, gateway, manager));

        let mut sessions = self.sessions.lock().await;
        // A concurrent request may have loaded the same user meanwhile;
        // keep the first one so both callers share state.
        let session = sessions
            .entry(user_id)
            .or_insert_with(|| Arc::clone(&session));
        Ok(Arc::clone(session))
    }

    /// Restart the session's quiescence timer. Called after every mutation.
    pub fn schedule_save(self: &Arc<Self>, session: &Arc<Session>) {
        let seq = session.save_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let manager = Arc::clone(self);
        let session = Arc::clone(session);
        let debounce = self.debounce;

        tokio::spawn(async move {
            tokio::time::sleep(debounce).await;

            // A newer mutation has rescheduled; let its timer do the write.
            if session.save_seq.load(Ordering::SeqCst) != seq {
                return;
            }

            let document = session.snapshot().await;
            match session.gateway.save(&document).await {
                Ok(()) => {
                    tracing::debug!(user_id = session.user_id, "Debounced save completed");
                }
                Err(GatewayError::Unauthorized) => {
                    tracing::warn!(
                        user_id = session.user_id,
                        "Save rejected as unauthorized, evicting session"
                    );
                    manager.evict(session.user_id).await;
                }
                Err(GatewayError::Unavailable(msg)) => {
                    tracing::warn!(
                        user_id = session.user_id,
                        error = %msg,
                        "Debounced save failed, keeping local state"
                    );
                }
            }
        });
    }

    /// Drop a session without saving. Its next request reloads from the store.
    pub async fn evict(&self, user_id: DbId) {
        self.sessions.lock().await.remove(&user_id);
    }

    /// Save immediately and drop the session. Used at logout so pending
    /// edits are not lost to an unexpired debounce timer.
    pub async fn flush(&self, user_id: DbId) {
        let session = self.sessions.lock().await.remove(&user_id);
        let Some(session) = session else { return };

        // Invalidate any pending debounced save; this write supersedes it.
        session.save_seq.fetch_add(1, Ordering::SeqCst);

        let document = session.snapshot().await;
        if let Err(err) = session.gateway.save(&document).await {
            tracing::warn!(user_id, error = %err, "Flush-on-logout save failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;

    /// Gateway double that records every saved document.
    struct RecordingGateway {
        stored: Mutex<Option<ScheduleDocument>>,
        saves: Mutex<Vec<ScheduleDocument>>,
        reject_saves: bool,
    }

    impl RecordingGateway {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                stored: Mutex::new(None),
                saves: Mutex::new(Vec::new()),
                reject_saves: false,
            })
        }

        fn rejecting() -> Arc<Self> {
            Arc::new(Self {
                stored: Mutex::new(None),
                saves: Mutex::new(Vec::new()),
                reject_saves: true,
            })
        }

        async fn save_count(&self) -> usize {
            self.saves.lock().await.len()
        }
    }

    #[async_trait]
    impl PersistenceGateway for RecordingGateway {
        async fn load(&self) -> Result<Option<ScheduleDocument>, GatewayError> {
            Ok(self.stored.lock().await.clone())
        }

        async fn save(&self, document: &ScheduleDocument) -> Result<(), GatewayError> {
            if self.reject_saves {
                return Err(GatewayError::Unauthorized);
            }
            self.saves.lock().await.push(document.clone());
            *self.stored.lock().await = Some(document.clone());
            Ok(())
        }
    }

    async fn add_staff(session: &Arc<Session>, name: &str) {
        let mut manager = session.manager().await;
        manager.working_mut().add_staff_member(name, "Staff", "").unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_mutations_coalesces_into_one_save() {
        let gateway = RecordingGateway::new();
        let sessions = Arc::new(SessionManager::new(500));
        let session = sessions.get_or_load(1, gateway.clone()).await.unwrap();

        for name in ["Alice", "Bob", "Carol"] {
            add_staff(&session, name).await;
            sessions.schedule_save(&session);
            // Mutations land inside the quiescence window.
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(600)).await;

        assert_eq!(gateway.save_count().await, 1, "stale timers must not write");
        let saved = gateway.saves.lock().await[0].clone();
        assert_eq!(saved.staff.len(), 3, "the save must capture the final state");
    }

    #[tokio::test(start_paused = true)]
    async fn separated_mutations_each_save() {
        let gateway = RecordingGateway::new();
        let sessions = Arc::new(SessionManager::new(500));
        let session = sessions.get_or_load(1, gateway.clone()).await.unwrap();

        add_staff(&session, "Alice").await;
        sessions.schedule_save(&session);
        tokio::time::sleep(Duration::from_millis(700)).await;

        add_staff(&session, "Bob").await;
        sessions.schedule_save(&session);
        tokio::time::sleep(Duration::from_millis(700)).await;

        assert_eq!(gateway.save_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn no_save_before_quiescence_elapses() {
        let gateway = RecordingGateway::new();
        let sessions = Arc::new(SessionManager::new(500));
        let session = sessions.get_or_load(1, gateway.clone()).await.unwrap();

        add_staff(&session, "Alice").await;
        sessions.schedule_save(&session);
        tokio::time::sleep(Duration::from_millis(400)).await;

        assert_eq!(gateway.save_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn unauthorized_save_evicts_the_session() {
        let gateway = RecordingGateway::rejecting();
        let sessions = Arc::new(SessionManager::new(500));
        let session = sessions.get_or_load(1, gateway.clone()).await.unwrap();

        add_staff(&session, "Alice").await;
        sessions.schedule_save(&session);
        tokio::time::sleep(Duration::from_millis(600)).await;

        // Evicted: the next lookup builds a fresh session.
        let reloaded = sessions.get_or_load(1, gateway.clone()).await.unwrap();
        assert!(
            !Arc::ptr_eq(&session, &reloaded),
            "session must be replaced after an unauthorized save"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn flush_saves_immediately_and_cancels_pending_timer() {
        let gateway = RecordingGateway::new();
        let sessions = Arc::new(SessionManager::new(500));
        let session = sessions.get_or_load(1, gateway.clone()).await.unwrap();

        add_staff(&session, "Alice").await;
        sessions.schedule_save(&session);
        sessions.flush(1).await;

        assert_eq!(gateway.save_count().await, 1);

        // The superseded timer must not fire a second save.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(gateway.save_count().await, 1);
    }

    #[tokio::test]
    async fn session_loads_stored_document_once() {
        let gateway = RecordingGateway::new();
        {
            let mut document = ScheduleDocument::default();
            document.staff.push(rota_core::schedule::StaffMember {
                name: "Alice".into(),
                role: "Lead".into(),
                notes: String::new(),
            });
            *gateway.stored.lock().await = Some(document);
        }

        let sessions = Arc::new(SessionManager::new(500));
        let session = sessions.get_or_load(7, gateway.clone()).await.unwrap();
        assert_eq!(session.manager().await.working().staff.len(), 1);

        // Second lookup reuses the live session rather than reloading.
        let again = sessions.get_or_load(7, gateway.clone()).await.unwrap();
        assert!(Arc::ptr_eq(&session, &again));
    }
}
