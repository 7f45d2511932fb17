//! Sign-in, registration, profile edits and sign-out.
//!
//! These flows are the only code that writes to the [`SessionStore`]. The
//! store is touched only after the backend confirmed the change, so a failed
//! request leaves the current session exactly as it was.

use crate::api::{
    ApiClient, CandidateProfile, CandidateRegistration, ClientError, Credentials,
    InterviewerRegistration, ProfileUpdate,
};
use crate::guard::Route;
use crate::session::{Session, SessionStore};

#[derive(Debug, Clone)]
pub struct Auth {
    api: ApiClient,
    store: SessionStore,
}

impl Auth {
    pub fn new(api: ApiClient, store: SessionStore) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Log in and persist the session. Returns the landing page for the role.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Route, ClientError> {
        let credentials = Credentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let session = self.api.login(&credentials).await?;
        let landing = Route::dashboard_for(session.role);
        self.store.set_session(session)?;
        Ok(landing)
    }

    /// Create a candidate account. The new user still has to sign in.
    pub async fn register_candidate(
        &self,
        form: CandidateRegistration,
    ) -> Result<Session, ClientError> {
        let account = self.api.register_candidate(form).await?;
        tracing::info!(email = %account.email, "Registered candidate");
        Ok(account)
    }

    /// Create an interviewer account. The new user still has to sign in.
    pub async fn register_interviewer(
        &self,
        form: &InterviewerRegistration,
    ) -> Result<Session, ClientError> {
        let account = self.api.register_interviewer(form).await?;
        tracing::info!(email = %account.email, "Registered interviewer");
        Ok(account)
    }

    /// Save the signed-in candidate's profile and pick up a changed name
    pub async fn update_profile(
        &self,
        update: ProfileUpdate,
    ) -> Result<CandidateProfile, ClientError> {
        let session = self.store.get_session().ok_or(ClientError::NotSignedIn)?;
        let profile = self
            .api
            .update_candidate_profile(&session.email, update)
            .await?;

        if profile.name != session.name {
            self.store.update_display_name(&profile.name)?;
        }
        Ok(profile)
    }

    pub fn sign_out(&self) -> Result<(), ClientError> {
        self.store.clear_session()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{Role, SessionEvent};
    use std::time::Duration;

    fn unreachable_api() -> ApiClient {
        ApiClient::new("http://127.0.0.1:9", Duration::from_millis(200)).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_credentials_leave_session_unchanged() {
        let store = SessionStore::in_memory();
        let existing = Session::new("Cal", "cal@x.io", Role::Candidate);
        store.set_session(existing.clone()).unwrap();
        let mut events = store.subscribe();

        let auth = Auth::new(unreachable_api(), store.clone());
        let err = auth.sign_in("nope", "").await.unwrap_err();

        assert!(err.is_validation());
        assert_eq!(store.get_session(), Some(existing));
        assert!(events.try_next().is_none());
    }

    #[tokio::test]
    async fn test_update_profile_requires_session() {
        let auth = Auth::new(unreachable_api(), SessionStore::in_memory());
        let err = auth
            .update_profile(ProfileUpdate {
                name: "New".into(),
                skills: "Rust".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::NotSignedIn));
    }

    #[test]
    fn test_sign_out_publishes() {
        let store = SessionStore::in_memory();
        store
            .set_session(Session::new("Ivy", "ivy@corp.io", Role::Interviewer))
            .unwrap();
        let mut events = store.subscribe();

        let auth = Auth::new(unreachable_api(), store.clone());
        auth.sign_out().unwrap();

        assert!(store.get_session().is_none());
        assert_eq!(events.try_next(), Some(SessionEvent::SignedOut));
    }
}
