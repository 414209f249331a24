use practice_core::model::SkillId;
use practice_core::{Clock, Skill};
use storage::repository::{ReportRow, Storage, StorageError};
use storage::sqlite::SqliteRepository;
use tracing::info;

use crate::config::{BackendChoice, Identity, PracticeConfig};
use crate::error::PracticeServicesError;
use crate::persistence::HttpBackend;
use crate::sessions::SessionController;

/// Assembles storage for the configured backend and hands out controllers.
#[derive(Clone)]
pub struct PracticeServices {
    storage: Storage,
    local_log: Option<SqliteRepository>,
    config: PracticeConfig,
    identity: Identity,
    clock: Clock,
}

impl PracticeServices {
    /// Connect to the backend chosen by `config`.
    ///
    /// # Errors
    ///
    /// Returns `PracticeServicesError` if the local database cannot be opened
    /// or migrated.
    pub async fn connect(
        config: PracticeConfig,
        identity: Identity,
        clock: Clock,
    ) -> Result<Self, PracticeServicesError> {
        let (storage, local_log) = match config.backend() {
            BackendChoice::Http { base_url, token } => {
                info!(
                    base_url = %base_url,
                    authenticated = token.is_some(),
                    "using remote practice service"
                );
                (Storage::from_backend(HttpBackend::new(base_url, token)), None)
            }
            BackendChoice::Sqlite { database_url } => {
                info!(database_url = %database_url, "using local practice log");
                let repo = SqliteRepository::connect(&database_url).await?;
                repo.migrate().await?;
                (Storage::from_backend(repo.clone()), Some(repo))
            }
            BackendChoice::InMemory => {
                info!("no backend configured; results are kept in memory");
                (Storage::in_memory(), None)
            }
        };

        Ok(Self {
            storage,
            local_log,
            config,
            identity,
            clock,
        })
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// A fresh controller for `skill` with the configured length, seed,
    /// learner and clock applied.
    #[must_use]
    pub fn controller(&self, skill: &'static Skill) -> SessionController {
        let mut controller = SessionController::new(skill, &self.storage)
            .with_clock(self.clock)
            .with_user(self.identity.user_id());
        if let Some(count) = self.config.question_count {
            controller = controller.with_question_count(count);
        }
        if let Some(seed) = self.config.seed {
            controller = controller.with_seed(seed);
        }
        controller
    }

    /// Latest reports for `skill` from the local log, newest first. Empty
    /// unless a local database is in use.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the local log cannot be read.
    pub async fn recent_reports(
        &self,
        skill_id: SkillId,
        limit: u32,
    ) -> Result<Vec<ReportRow>, StorageError> {
        match &self.local_log {
            Some(repo) => repo.recent_reports(skill_id, limit).await,
            None => Ok(Vec::new()),
        }
    }
}
