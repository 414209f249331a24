use std::sync::Arc;

use practice_core::model::{AttemptRecord, SkillId, UserId};
use storage::repository::{AttemptLog, SessionRegistry, Storage};
use tracing::info;

use super::dispatch::Dispatcher;
use super::link::SessionLink;

/// Translates controller events into session and attempt calls.
#[derive(Clone)]
pub struct AttemptRecorder {
    sessions: Arc<dyn SessionRegistry>,
    attempts: Arc<dyn AttemptLog>,
}

impl AttemptRecorder {
    #[must_use]
    pub fn new(storage: &Storage) -> Self {
        Self {
            sessions: Arc::clone(&storage.sessions),
            attempts: Arc::clone(&storage.attempts),
        }
    }

    /// Ask the backend for a session and return a link that resolves once it
    /// answers.
    pub fn open_session(
        &self,
        dispatcher: &mut Dispatcher,
        user_id: UserId,
        skill_id: SkillId,
    ) -> SessionLink {
        let (resolver, link) = SessionLink::pending();
        let sessions = Arc::clone(&self.sessions);
        dispatcher.dispatch("create_session", async move {
            match sessions.create_session(user_id, skill_id).await {
                Ok(id) => {
                    info!(session_id = %id, %user_id, %skill_id, "backend session opened");
                    resolver.link(id);
                    Ok(())
                }
                Err(err) => {
                    resolver.fail();
                    Err(err)
                }
            }
        });
        link
    }

    /// Deliver one attempt in the background.
    ///
    /// The delivery waits for the session link; if the session never opened
    /// the attempt is still sent, without a session id.
    pub fn persist(&self, dispatcher: &mut Dispatcher, link: &SessionLink, record: AttemptRecord) {
        let attempts = Arc::clone(&self.attempts);
        let link = link.clone();
        dispatcher.dispatch("record_attempt", async move {
            let session_id = link.resolve().await;
            attempts.record_attempt(session_id, &record).await
        });
    }
}
