//! Role-based route protection.
//!
//! [`guard`] is the pure decision. [`GuardedView`] binds it to a
//! [`SessionStore`] so a mounted view re-decides whenever the identity
//! changes, including sign-outs triggered from some other view.

pub mod nav;

pub use nav::{NavBar, NavLink, NavTarget};

use crate::session::{Role, Session, SessionStore, SessionSubscription};

/// Client-side pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    Register,
    Feedback,
    Admin,
    Applications,
    Interview,
    CandidateDashboard,
    BrowseJobs,
    PostJobs,
    FilterCandidates,
    ConductInterview,
}

impl Route {
    pub const ALL: [Route; 11] = [
        Route::Landing,
        Route::Register,
        Route::Feedback,
        Route::Admin,
        Route::Applications,
        Route::Interview,
        Route::CandidateDashboard,
        Route::BrowseJobs,
        Route::PostJobs,
        Route::FilterCandidates,
        Route::ConductInterview,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/",
            Route::Register => "/register",
            Route::Feedback => "/feedback",
            Route::Admin => "/admin",
            Route::Applications => "/applications",
            Route::Interview => "/interview",
            Route::CandidateDashboard => "/candidate-dashboard",
            Route::BrowseJobs => "/browse-jobs",
            Route::PostJobs => "/jobspost",
            Route::FilterCandidates => "/filter",
            Route::ConductInterview => "/conduct-interview",
        }
    }

    /// Role needed to open this page, `None` for public pages
    pub fn required_role(&self) -> Option<Role> {
        match self {
            Route::CandidateDashboard | Route::BrowseJobs => Some(Role::Candidate),
            Route::PostJobs | Route::FilterCandidates | Route::ConductInterview => {
                Some(Role::Interviewer)
            }
            _ => None,
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };
        Route::ALL.into_iter().find(|r| r.path() == normalized)
    }

    /// Landing page for a signed-in role
    pub fn dashboard_for(role: Role) -> Route {
        match role {
            Role::Candidate => Route::CandidateDashboard,
            Role::Interviewer => Route::PostJobs,
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Outcome of guarding a protected page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// Not signed in; carries the role whose login/registration flow to preselect
    RedirectToLogin(Role),
    /// Signed in with another role; carries the user's own role
    RedirectToOwnDashboard(Role),
}

/// Where a redirect lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Redirect {
    pub route: Route,
    pub preselect_role: Option<Role>,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn redirect(&self) -> Option<Redirect> {
        match *self {
            Decision::Allow => None,
            Decision::RedirectToLogin(role) => Some(Redirect {
                route: Route::Register,
                preselect_role: Some(role),
            }),
            Decision::RedirectToOwnDashboard(role) => Some(Redirect {
                route: Route::dashboard_for(role),
                preselect_role: None,
            }),
        }
    }
}

pub fn guard(required_role: Role, session: Option<&Session>) -> Decision {
    match session {
        None => Decision::RedirectToLogin(required_role),
        Some(s) if s.role != required_role => Decision::RedirectToOwnDashboard(s.role),
        Some(_) => Decision::Allow,
    }
}

/// Guard any route; public routes are always allowed
pub fn resolve(route: Route, session: Option<&Session>) -> Decision {
    match route.required_role() {
        Some(role) => guard(role, session),
        None => Decision::Allow,
    }
}

/// A mounted protected view
#[derive(Debug)]
pub struct GuardedView {
    required_role: Role,
    store: SessionStore,
    subscription: SessionSubscription,
    last: Decision,
}

impl GuardedView {
    /// Mount a view; the first decision is taken against the current session
    pub fn mount(required_role: Role, store: &SessionStore) -> Self {
        let subscription = store.subscribe();
        let last = guard(required_role, store.get_session().as_ref());
        tracing::debug!(required = %required_role, decision = ?last, "Mounted guarded view");
        Self {
            required_role,
            store: store.clone(),
            subscription,
            last,
        }
    }

    pub fn for_route(route: Route, store: &SessionStore) -> Option<Self> {
        route.required_role().map(|role| Self::mount(role, store))
    }

    pub fn required_role(&self) -> Role {
        self.required_role
    }

    /// Decision as of the last mount or sync
    pub fn decision(&self) -> Decision {
        self.last
    }

    /// Apply pending session events. Returns the new decision if it changed.
    pub fn sync(&mut self) -> Option<Decision> {
        self.subscription.drain_latest()?;
        self.sync_after_event()
    }

    /// Wait until the decision differs from the current one
    pub async fn next_change(&mut self) -> Option<Decision> {
        loop {
            self.subscription.changed().await?;
            if let Some(decision) = self.sync_after_event() {
                return Some(decision);
            }
        }
    }

    fn sync_after_event(&mut self) -> Option<Decision> {
        let next = guard(self.required_role, self.store.get_session().as_ref());
        if next == self.last {
            return None;
        }
        tracing::debug!(required = %self.required_role, from = ?self.last, to = ?next, "Guard decision changed");
        self.last = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session::new("Sam", "sam@example.com", role)
    }

    #[test]
    fn test_guard_without_session_redirects_to_login() {
        for role in [Role::Candidate, Role::Interviewer] {
            assert_eq!(guard(role, None), Decision::RedirectToLogin(role));
        }
    }

    #[test]
    fn test_guard_matching_role_allows() {
        for role in [Role::Candidate, Role::Interviewer] {
            assert_eq!(guard(role, Some(&session(role))), Decision::Allow);
        }
    }

    #[test]
    fn test_guard_other_role_redirects_to_own_dashboard() {
        let decision = guard(Role::Interviewer, Some(&session(Role::Candidate)));
        assert_eq!(decision, Decision::RedirectToOwnDashboard(Role::Candidate));
        assert_eq!(decision.redirect().unwrap().route, Route::CandidateDashboard);

        let decision = guard(Role::Candidate, Some(&session(Role::Interviewer)));
        assert_eq!(decision, Decision::RedirectToOwnDashboard(Role::Interviewer));
        assert_eq!(decision.redirect().unwrap().route, Route::PostJobs);
    }

    #[test]
    fn test_login_redirect_preselects_role() {
        let redirect = Decision::RedirectToLogin(Role::Interviewer).redirect().unwrap();
        assert_eq!(redirect.route, Route::Register);
        assert_eq!(redirect.preselect_role, Some(Role::Interviewer));
        assert!(Decision::Allow.redirect().is_none());
    }

    #[test]
    fn test_route_table() {
        assert_eq!(Route::from_path("/browse-jobs"), Some(Route::BrowseJobs));
        assert_eq!(Route::from_path("/jobspost/"), Some(Route::PostJobs));
        assert_eq!(Route::from_path(""), Some(Route::Landing));
        assert_eq!(Route::from_path("/nope"), None);

        assert_eq!(Route::FilterCandidates.required_role(), Some(Role::Interviewer));
        assert_eq!(Route::Applications.required_role(), None);
        assert_eq!(resolve(Route::Feedback, None), Decision::Allow);
        assert_eq!(
            resolve(Route::BrowseJobs, None),
            Decision::RedirectToLogin(Role::Candidate)
        );
    }

    #[test]
    fn test_sign_out_reaches_mounted_view() {
        let store = SessionStore::in_memory();
        store.set_session(session(Role::Candidate)).unwrap();

        let mut view = GuardedView::mount(Role::Candidate, &store);
        assert!(view.decision().is_allowed());
        assert_eq!(view.sync(), None);

        store.clear_session().unwrap();
        assert_eq!(view.sync(), Some(Decision::RedirectToLogin(Role::Candidate)));
        assert_eq!(view.sync(), None);
    }

    #[test]
    fn test_view_mounted_after_sign_out_redirects_immediately() {
        let store = SessionStore::in_memory();
        store.set_session(session(Role::Interviewer)).unwrap();
        store.clear_session().unwrap();

        let view = GuardedView::for_route(Route::PostJobs, &store).unwrap();
        assert_eq!(view.decision(), Decision::RedirectToLogin(Role::Interviewer));
        assert!(GuardedView::for_route(Route::Landing, &store).is_none());
    }

    #[test]
    fn test_profile_edit_does_not_change_decision() {
        let store = SessionStore::in_memory();
        store.set_session(session(Role::Candidate)).unwrap();
        let mut view = GuardedView::mount(Role::Candidate, &store);

        store.update_display_name("Samantha").unwrap();
        assert_eq!(view.sync(), None);
        assert!(view.decision().is_allowed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_change_follows_each_session_change() {
        let store = SessionStore::in_memory();
        let mut view = GuardedView::mount(Role::Interviewer, &store);
        assert_eq!(view.decision(), Decision::RedirectToLogin(Role::Interviewer));

        store.set_session(session(Role::Candidate)).unwrap();
        assert_eq!(
            view.next_change().await,
            Some(Decision::RedirectToOwnDashboard(Role::Candidate))
        );

        store.set_session(session(Role::Interviewer)).unwrap();
        assert_eq!(view.next_change().await, Some(Decision::Allow));

        // a rename publishes an event but leaves the decision alone
        let writer = store.clone();
        tokio::spawn(async move {
            writer.update_display_name("Samantha").unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            writer.clear_session().unwrap();
        });
        assert_eq!(
            view.next_change().await,
            Some(Decision::RedirectToLogin(Role::Interviewer))
        );
    }
}
