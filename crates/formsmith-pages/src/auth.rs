//! Login, registration and logout.

use formsmith_core::auth::{Credentials, Registration};
use formsmith_core::{FormsService, Session};
use validator::Validate;

use crate::{Route, TRACING_TARGET_AUTH};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email.";
pub const REGISTERED_MESSAGE: &str = "Registration successful!";
pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

/// A message shown above a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub text: &'static str,
    pub is_success: bool,
}

impl Notice {
    pub const fn success(text: &'static str) -> Self {
        Self {
            text,
            is_success: true,
        }
    }

    pub const fn error(text: &'static str) -> Self {
        Self {
            text,
            is_success: false,
        }
    }
}

/// Login form.
#[derive(Debug, Clone)]
pub struct LoginPage {
    session: Session,
    notice: Option<Notice>,
}

impl LoginPage {
    /// Creates a login page that stores tokens in `session`.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            notice: None,
        }
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Logs in and stores the returned token.
    ///
    /// Navigates to the dashboard when a token comes back. A response
    /// without a token changes nothing.
    pub async fn submit(&mut self, service: &FormsService, credentials: &Credentials) -> Option<Route> {
        let response = match service.login(credentials).await {
            Ok(response) => response,
            Err(error) => {
                tracing::error!(target: TRACING_TARGET_AUTH, error = %error, "Login error");
                self.notice = Some(Notice::error(LOGIN_FAILED_MESSAGE));
                return None;
            }
        };

        let token = response.token?;
        if let Err(error) = self.session.set(token) {
            tracing::error!(
                target: TRACING_TARGET_AUTH,
                error = %error,
                "Failed to store session token"
            );
            self.notice = Some(Notice::error(LOGIN_FAILED_MESSAGE));
            return None;
        }

        tracing::info!(target: TRACING_TARGET_AUTH, "Logged in");
        Some(Route::Dashboard)
    }
}

/// Registration form.
#[derive(Debug, Clone, Default)]
pub struct RegisterPage {
    pub name: String,
    pub email: String,
    pub password: String,
    notice: Option<Notice>,
}

impl RegisterPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notice(&self) -> Option<Notice> {
        self.notice
    }

    /// Registers the account described by the form.
    ///
    /// The email is checked before any request. On success the form is
    /// cleared and the page navigates to the login page.
    pub async fn submit(&mut self, service: &FormsService) -> Option<Route> {
        let registration = Registration::new(&self.name, &self.email, &self.password);

        if registration.validate().is_err() {
            self.notice = Some(Notice::error(INVALID_EMAIL_MESSAGE));
            return None;
        }

        match service.register(&registration).await {
            Ok(()) => {
                tracing::info!(target: TRACING_TARGET_AUTH, "Registered new account");
                self.name.clear();
                self.email.clear();
                self.password.clear();
                self.notice = Some(Notice::success(REGISTERED_MESSAGE));
                Some(Route::Login)
            }
            Err(error) => {
                tracing::error!(target: TRACING_TARGET_AUTH, error = %error, "Registration error");
                self.notice = Some(Notice::error(REGISTRATION_FAILED_MESSAGE));
                None
            }
        }
    }
}

/// Forgets the session token and returns to the login page.
pub fn logout(session: &Session) -> Route {
    if let Err(error) = session.clear() {
        tracing::warn!(
            target: TRACING_TARGET_AUTH,
            error = %error,
            "Failed to remove stored session"
        );
    }

    tracing::info!(target: TRACING_TARGET_AUTH, "Logged out");
    Route::Login
}

#[cfg(test)]
mod tests {
    use formsmith_test::{MockFormsProvider, Operation};

    use super::*;

    fn backend() -> (MockFormsProvider, Session) {
        let session = Session::in_memory();
        let mock = MockFormsProvider::new(session.clone()).with_user("Ann", "ann@example.com", "pw");
        (mock, session)
    }

    #[tokio::test]
    async fn test_login_stores_token() {
        let (mock, session) = backend();
        let mut page = LoginPage::new(session.clone());

        let route = page
            .submit(&mock.into_service(), &Credentials::new("ann@example.com", "pw"))
            .await;

        assert_eq!(route, Some(Route::Dashboard));
        assert!(session.is_authenticated());
        assert_eq!(page.notice(), None);
    }

    #[tokio::test]
    async fn test_login_failure_sets_message() {
        let (mock, session) = backend();
        let mut page = LoginPage::new(session.clone());

        let route = page
            .submit(&mock.into_service(), &Credentials::new("ann@example.com", "wrong"))
            .await;

        assert!(route.is_none());
        assert!(!session.is_authenticated());
        assert_eq!(page.notice(), Some(Notice::error(LOGIN_FAILED_MESSAGE)));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email_locally() {
        let (mock, _) = backend();
        let mut page = RegisterPage::new();
        page.name = "Bob".into();
        page.email = "bob.example.com".into();
        page.password = "secret".into();

        assert!(page.submit(&mock.clone().into_service()).await.is_none());
        assert_eq!(page.notice(), Some(Notice::error(INVALID_EMAIL_MESSAGE)));
        assert!(mock.calls_for(Operation::Register).is_empty());
        assert_eq!(page.email, "bob.example.com");
    }

    #[tokio::test]
    async fn test_register_success_clears_form() {
        let (mock, _) = backend();
        let mut page = RegisterPage::new();
        page.name = "Bob".into();
        page.email = "bob@example.com".into();
        page.password = "secret".into();

        let route = page.submit(&mock.clone().into_service()).await;
        assert_eq!(route, Some(Route::Login));
        assert_eq!(page.notice(), Some(Notice::success(REGISTERED_MESSAGE)));
        assert!(page.name.is_empty() && page.email.is_empty() && page.password.is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_fails() {
        let (mock, _) = backend();
        let mut page = RegisterPage::new();
        page.name = "Ann".into();
        page.email = "ann@example.com".into();
        page.password = "pw".into();

        assert!(page.submit(&mock.into_service()).await.is_none());
        assert_eq!(page.notice(), Some(Notice::error(REGISTRATION_FAILED_MESSAGE)));
        assert_eq!(page.email, "ann@example.com");
    }

    #[tokio::test]
    async fn test_logout_drops_authorization() {
        let (mock, session) = backend();
        let service = mock.clone().into_service();
        LoginPage::new(session.clone())
            .submit(&service, &Credentials::new("ann@example.com", "pw"))
            .await;

        service.my_templates().await.unwrap();
        assert_eq!(logout(&session), Route::Login);
        assert!(service.my_templates().await.is_err());

        let calls = mock.calls_for(Operation::MyTemplates);
        assert!(calls[0].authorized);
        assert!(!calls[1].authorized);
    }
}
