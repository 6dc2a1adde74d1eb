//! Admin session gate.
//!
//! The session cookie only carries an opaque session id. Whether that id is
//! authenticated is decided here, from a map owned by [`AdminGate`] and shared
//! through `web::Data`.

use std::collections::HashMap;
use std::sync::RwLock;

use actix_session::Session;
use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::{DateTime, Duration, Utc};
use futures_util::future::LocalBoxFuture;

use crate::constants::{ADMIN_GRANT_TTL_HOURS, SESSION_ID_KEY};
use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Anonymous,
    Authenticated,
}

#[derive(Debug, Clone, Copy)]
struct Grant {
    since: DateTime<Utc>,
}

/// Grants older than `ttl` count as anonymous and are pruned on the next login,
/// so sessions abandoned without a logout do not accumulate.
pub struct AdminGate {
    password: String,
    ttl: Duration,
    grants: RwLock<HashMap<String, Grant>>,
}

impl AdminGate {
    pub fn new(password: impl Into<String>) -> Self {
        Self::with_ttl(password, Duration::hours(ADMIN_GRANT_TTL_HOURS))
    }

    pub fn with_ttl(password: impl Into<String>, ttl: Duration) -> Self {
        Self {
            password: password.into(),
            ttl,
            grants: RwLock::new(HashMap::new()),
        }
    }

    fn is_live(&self, grant: &Grant, now: DateTime<Utc>) -> bool {
        now - grant.since < self.ttl
    }

    pub fn state(&self, session_id: &str) -> GateState {
        let now = Utc::now();
        let authenticated = self
            .grants
            .read()
            .map(|grants| {
                grants
                    .get(session_id)
                    .map(|grant| self.is_live(grant, now))
                    .unwrap_or(false)
            })
            .unwrap_or(false);
        if authenticated {
            GateState::Authenticated
        } else {
            GateState::Anonymous
        }
    }

    /// `anonymous -> authenticated` when the password matches.
    pub fn authenticate(&self, session_id: &str, password: &str) -> Result<GateState> {
        if !constant_time_eq(password.as_bytes(), self.password.as_bytes()) {
            log::warn!("## Rejected admin login");
            return Ok(self.state(session_id));
        }
        let now = Utc::now();
        let grant = Grant { since: now };
        let mut grants = self
            .grants
            .write()
            .map_err(|_| AppError::internal("admin gate lock poisoned"))?;
        let before = grants.len();
        grants.retain(|_, g| self.is_live(g, now));
        if grants.len() < before {
            log::debug!("## Pruned {} expired admin grants", before - grants.len());
        }
        grants.insert(session_id.to_string(), grant);
        log::info!("## Admin session opened at {}", grant.since);
        Ok(GateState::Authenticated)
    }

    /// `authenticated -> anonymous`.
    pub fn revoke(&self, session_id: &str) -> Result<()> {
        let removed = self
            .grants
            .write()
            .map_err(|_| AppError::internal("admin gate lock poisoned"))?
            .remove(session_id);
        if let Some(grant) = removed {
            log::info!("## Admin session opened at {} closed", grant.since);
        }
        Ok(())
    }

    #[cfg(test)]
    fn grant_count(&self) -> usize {
        self.grants.read().map(|g| g.len()).unwrap_or(0)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Request-side view of the gate: the client's session plus the shared gate.
pub struct AdminSession {
    session: Session,
    gate: web::Data<AdminGate>,
}

impl AdminSession {
    fn session_id(&self) -> Result<Option<String>> {
        self.session
            .get::<String>(SESSION_ID_KEY)
            .map_err(|e| AppError::internal(format!("failed to read session: {}", e)))
    }

    pub fn is_admin(&self) -> Result<bool> {
        Ok(self
            .session_id()?
            .map(|sid| self.gate.state(&sid) == GateState::Authenticated)
            .unwrap_or(false))
    }

    /// Fails with `Forbidden` unless the session is authenticated.
    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin()? {
            Ok(())
        } else {
            Err(AppError::forbidden())
        }
    }

    /// Checks the password; on success the client gets a fresh session id.
    pub fn login(&self, password: &str) -> Result<bool> {
        let sid = uuid::Uuid::new_v4().to_string();
        if self.gate.authenticate(&sid, password)? != GateState::Authenticated {
            return Ok(false);
        }
        if let Some(previous) = self.session_id()? {
            self.gate.revoke(&previous)?;
        }
        self.session.renew();
        self.session
            .insert(SESSION_ID_KEY, sid)
            .map_err(|e| AppError::internal(format!("failed to persist session: {}", e)))?;
        Ok(true)
    }

    pub fn logout(&self) -> Result<()> {
        if let Some(sid) = self.session_id()? {
            self.gate.revoke(&sid)?;
        }
        self.session.purge();
        Ok(())
    }
}

impl FromRequest for AdminSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let gate = req.app_data::<web::Data<AdminGate>>().cloned();
        let fut = Session::from_request(req, payload);
        Box::pin(async move {
            let gate = gate.ok_or_else(|| {
                actix_web::error::ErrorInternalServerError("admin gate is not configured")
            })?;
            let session = fut.await?;
            Ok(AdminSession { session, gate })
        })
    }
}
