use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::assessment::AssessmentKind;
use crate::models::caller::CallerContext;
use crate::services::wizard_service::WizardController;
use crate::utils::time::Clock;

#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
    pub max_questions: usize,
    pub idle_ttl: Duration,
    pub max_per_owner: usize,
}

impl SessionLimits {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_questions: config.max_questions_per_draft,
            idle_ttl: Duration::minutes(config.wizard_idle_minutes.max(1)),
            max_per_owner: config.max_open_wizards_per_user.max(1),
        }
    }
}

struct WizardSession {
    owner: String,
    wizard: WizardController,
    last_used: DateTime<Utc>,
}

/// Open wizards keyed by session id. A session belongs to the caller who
/// opened it and disappears when discarded or once it sits idle past
/// `idle_ttl`.
#[derive(Clone)]
pub struct WizardSessionService {
    sessions: Arc<Mutex<HashMap<Uuid, WizardSession>>>,
    limits: SessionLimits,
    clock: Arc<dyn Clock>,
}

impl WizardSessionService {
    pub fn new(limits: SessionLimits, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            limits,
            clock,
        }
    }

    pub fn open<T>(
        &self,
        caller: &CallerContext,
        kind: AssessmentKind,
        view: impl FnOnce(Uuid, &WizardController) -> T,
    ) -> Result<T> {
        caller.ensure_can_author()?;
        let mut sessions = self.lock()?;
        let owned = sessions
            .values()
            .filter(|s| s.owner == caller.user_id)
            .count();
        if owned >= self.limits.max_per_owner {
            tracing::warn!(user = %caller.user_id, owned, "Open wizard limit reached");
            return Err(Error::BadRequest(format!(
                "At most {} wizards may be open at once; finish or discard one first",
                self.limits.max_per_owner
            )));
        }

        let wizard = WizardController::new(kind, caller.publishing_capability(), self.limits.max_questions);
        let id = Uuid::new_v4();
        let out = view(id, &wizard);
        sessions.insert(
            id,
            WizardSession {
                owner: caller.user_id.clone(),
                wizard,
                last_used: self.clock.now(),
            },
        );
        tracing::info!(session_id = %id, user = %caller.user_id, kind = ?kind, "Wizard opened");
        Ok(out)
    }

    /// Runs `f` against the caller's wizard while holding the session lock.
    pub fn with_wizard<T>(
        &self,
        caller: &CallerContext,
        id: Uuid,
        f: impl FnOnce(&mut WizardController) -> Result<T>,
    ) -> Result<T> {
        let mut sessions = self.lock()?;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.owner == caller.user_id)
            .ok_or_else(|| not_found(id))?;
        session.last_used = self.clock.now();
        f(&mut session.wizard)
    }

    pub fn discard(&self, caller: &CallerContext, id: Uuid) -> Result<()> {
        let mut sessions = self.lock()?;
        match sessions.get(&id) {
            Some(s) if s.owner == caller.user_id => {
                sessions.remove(&id);
                tracing::info!(session_id = %id, "Wizard abandoned");
                Ok(())
            }
            _ => Err(not_found(id)),
        }
    }

    pub fn open_count(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    /// Locks the store and drops every session idle for `idle_ttl` or longer.
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, WizardSession>>> {
        let mut sessions = self
            .sessions
            .lock()
            .map_err(|_| Error::Internal("Wizard session lock poisoned".to_string()))?;
        let now = self.clock.now();
        let before = sessions.len();
        sessions.retain(|_, s| now - s.last_used < self.limits.idle_ttl);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "Expired idle wizards");
        }
        Ok(sessions)
    }
}

fn not_found(id: Uuid) -> Error {
    Error::NotFound(format!("Wizard session {} not found", id))
}
