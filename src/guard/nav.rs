//! Navigation bar model: which links a visitor sees for the current identity.

use super::Route;
use crate::session::{Role, Session, SessionStore, SessionSubscription};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    Route(Route),
    /// Role entry point shown to anonymous visitors; opens that role's login
    Login(Role),
    SignOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    pub label: String,
    pub target: NavTarget,
}

impl NavLink {
    fn route(label: &str, route: Route) -> Self {
        Self {
            label: label.to_string(),
            target: NavTarget::Route(route),
        }
    }
}

#[derive(Debug)]
pub struct NavBar {
    session: Option<Session>,
    subscription: SessionSubscription,
}

impl NavBar {
    pub fn mount(store: &SessionStore) -> Self {
        Self {
            subscription: store.subscribe(),
            session: store.get_session(),
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Apply the newest pending session event. Returns true if anything arrived.
    pub fn sync(&mut self) -> bool {
        match self.subscription.drain_latest() {
            Some(event) => {
                self.session = event.session().cloned();
                true
            }
            None => false,
        }
    }

    /// Name (or email) shown next to the sign-out action
    pub fn user_label(&self) -> Option<&str> {
        self.session.as_ref().map(Session::display_label)
    }

    pub fn links(&self) -> Vec<NavLink> {
        let mut links = vec![NavLink::route("Admin Panel", Route::Admin)];

        match self.session.as_ref().map(|s| s.role) {
            None => {
                links.push(NavLink::route("Registration", Route::Register));
                links.push(NavLink {
                    label: "Candidates".to_string(),
                    target: NavTarget::Login(Role::Candidate),
                });
                links.push(NavLink {
                    label: "Interviewers".to_string(),
                    target: NavTarget::Login(Role::Interviewer),
                });
            }
            Some(Role::Candidate) => {
                links.push(NavLink::route("Candidate Dashboard", Route::CandidateDashboard));
                links.push(NavLink::route("Browse Jobs", Route::BrowseJobs));
            }
            Some(Role::Interviewer) => {
                links.push(NavLink::route("Filter Candidates", Route::FilterCandidates));
                links.push(NavLink::route("Conduct Interview", Route::ConductInterview));
                links.push(NavLink::route("Post Jobs", Route::PostJobs));
            }
        }

        links.push(NavLink::route("Feedback", Route::Feedback));

        if self.session.is_some() {
            links.push(NavLink {
                label: "Sign Out".to_string(),
                target: NavTarget::SignOut,
            });
        }

        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::GuardedView;

    fn labels(nav: &NavBar) -> Vec<String> {
        nav.links().into_iter().map(|l| l.label).collect()
    }

    #[test]
    fn test_anonymous_links() {
        let store = SessionStore::in_memory();
        let nav = NavBar::mount(&store);

        assert_eq!(
            labels(&nav),
            ["Admin Panel", "Registration", "Candidates", "Interviewers", "Feedback"]
        );
        assert!(nav.user_label().is_none());
        assert!(nav
            .links()
            .iter()
            .any(|l| l.target == NavTarget::Login(Role::Interviewer)));
    }

    #[test]
    fn test_role_links() {
        let store = SessionStore::in_memory();
        store
            .set_session(Session::new("Ivy", "ivy@corp.io", Role::Interviewer))
            .unwrap();
        let nav = NavBar::mount(&store);

        assert_eq!(
            labels(&nav),
            [
                "Admin Panel",
                "Filter Candidates",
                "Conduct Interview",
                "Post Jobs",
                "Feedback",
                "Sign Out"
            ]
        );
        assert_eq!(nav.user_label(), Some("Ivy"));
    }

    #[test]
    fn test_sign_out_elsewhere_updates_nav_and_views() {
        let store = SessionStore::in_memory();
        store
            .set_session(Session::new("Cal", "cal@x.io", Role::Candidate))
            .unwrap();

        let mut nav = NavBar::mount(&store);
        let mut dashboard = GuardedView::mount(Role::Candidate, &store);
        let mut browse = GuardedView::mount(Role::Candidate, &store);
        assert!(labels(&nav).contains(&"Browse Jobs".to_string()));

        store.clear_session().unwrap();

        assert!(nav.sync());
        assert!(nav.session().is_none());
        assert!(labels(&nav).contains(&"Registration".to_string()));
        assert!(dashboard.sync().is_some());
        assert!(browse.sync().is_some());
        assert!(!dashboard.decision().is_allowed());
        assert!(!browse.decision().is_allowed());
    }

    #[test]
    fn test_sync_without_events_is_noop() {
        let store = SessionStore::in_memory();
        let mut nav = NavBar::mount(&store);
        assert!(!nav.sync());
    }
}
