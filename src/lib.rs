//! SwiftHire client core.
//!
//! - [`session`]: who is signed in, persisted and broadcast to every view
//! - [`guard`]: role-protected pages and the navigation bar
//! - [`interview`]: interview lifecycle evaluation and the live countdown
//! - [`matching`]: skill-profile and free-text candidate filtering
//! - [`api`]: typed REST client for the recruiting backend
//! - [`auth`]: the flows that change the session

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod guard;
pub mod interview;
pub mod matching;
pub mod scope;
pub mod session;

pub use api::{ApiClient, ClientError};
pub use auth::Auth;
pub use config::Config;
pub use guard::{guard, Decision, GuardedView, Route};
pub use interview::{evaluate, Application, Evaluation, LifecycleState};
pub use matching::{matches, CandidateFilter, Profile};
pub use scope::ViewScope;
pub use session::{Role, Session, SessionEvent, SessionStore};
