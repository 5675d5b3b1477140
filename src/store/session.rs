use tracing::{debug, info};
use uuid::Uuid;

use super::{AppStore, Selection, Session};
use crate::credentials::{self, AdminCredentials};
use crate::model::{User, UserId};
use crate::seed::DEMO_USER_ID;

/// Reserved account id of the system administrator.
pub const ADMIN_USER_ID: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminLogin {
    /// Setup has not happened yet and the sentinel pair was given. The session
    /// is not authenticated; the caller continues with the one-time setup.
    SetupRequired,
    Authenticated,
    Rejected,
}

impl AdminLogin {
    pub fn is_success(self) -> bool {
        self != AdminLogin::Rejected
    }
}

impl AppStore {
    /// Signs in an existing account. Unknown ids return `false` and change
    /// nothing; the caller should offer sign-up instead.
    pub fn authenticate(&mut self, user_id: impl Into<UserId>) -> bool {
        let user_id = user_id.into();
        let known = user_id == ADMIN_USER_ID || self.users.iter().any(|user| user.id == user_id);
        if !known {
            debug!(%user_id, "authentication rejected: unknown account");
            return false;
        }

        info!(%user_id, "signed in");
        self.session.is_authenticated = true;
        self.session.current_user_id = Some(user_id);
        self.session.is_system_admin = false;
        self.session.is_demo_mode = false;
        self.session.demo_session_id = None;
        self.resolve_current_profile();
        true
    }

    pub fn demo_authenticate(&mut self) {
        let session_id = format!("demo-{}", Uuid::now_v7().simple());
        info!(%session_id, "demo session started");
        self.session.is_authenticated = true;
        self.session.current_user_id = Some(DEMO_USER_ID.into());
        self.session.is_system_admin = false;
        self.session.is_demo_mode = true;
        self.session.demo_session_id = Some(session_id);
        self.resolve_current_profile();
    }

    /// Creates an account and signs it in. Returns `None` for a blank email
    /// or name, or an email that is already registered.
    pub fn register_user(&mut self, email: &str, default_name: &str) -> Option<UserId> {
        let email = email.trim();
        let default_name = default_name.trim();
        if email.is_empty() || default_name.is_empty() {
            return None;
        }
        if self.users.iter().any(|user| user.email.eq_ignore_ascii_case(email)) {
            debug!(email, "sign-up rejected: email already registered");
            return None;
        }

        let user = User {
            id: UserId::generate(),
            email: email.to_owned(),
            default_name: default_name.to_owned(),
            default_avatar_url: None,
            created_at: time::OffsetDateTime::now_utc(),
        };
        let user_id = user.id.clone();
        self.users.push(user);
        self.authenticate(user_id.clone());
        Some(user_id)
    }

    pub fn admin_authenticate(&mut self, email: &str, password: &str) -> AdminLogin {
        let Some(credentials) = &self.admin_credentials else {
            return if credentials::is_setup_sentinel(email, password) {
                info!("admin setup unlocked");
                AdminLogin::SetupRequired
            } else {
                AdminLogin::Rejected
            };
        };

        if !credentials.verify(email, password) {
            debug!("admin authentication rejected");
            return AdminLogin::Rejected;
        }

        info!("system admin signed in");
        self.session.is_authenticated = true;
        self.session.current_user_id = Some(ADMIN_USER_ID.into());
        self.session.is_system_admin = true;
        self.session.is_demo_mode = false;
        self.session.demo_session_id = None;
        self.resolve_current_profile();
        AdminLogin::Authenticated
    }

    /// One-time transition that records the admin account and signs it in.
    /// Once it has succeeded the sentinel credentials stop working for good
    /// and further calls return `false`.
    pub fn complete_admin_setup(&mut self, email: &str, password: &str) -> bool {
        if self.admin_credentials.is_some() {
            debug!("admin setup already completed");
            return false;
        }

        info!(email, "admin setup completed");
        self.admin_credentials = Some(AdminCredentials::new(email, password));
        self.session.is_authenticated = true;
        self.session.current_user_id = Some(ADMIN_USER_ID.into());
        self.session.is_system_admin = true;
        self.session.is_demo_mode = false;
        self.session.demo_session_id = None;
        self.resolve_current_profile();
        true
    }

    /// Clears authentication, modes and selections. Entities are untouched.
    pub fn logout(&mut self) {
        if let Some(user_id) = &self.session.current_user_id {
            info!(%user_id, "signed out");
        }
        self.session = Session::default();
        self.selection = Selection::default();
    }

    pub fn enter_observer_mode(&mut self) {
        self.session.is_observer_mode = true;
    }

    pub fn exit_observer_mode(&mut self) {
        self.session.is_observer_mode = false;
    }
}
