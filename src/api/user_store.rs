use serde_json::json;
use thiserror::Error;

use crate::api::http::{ApiResponse, HttpClient};
use crate::store::user::{User, UserSlot};

const LOGIN_PATH: &str = "/api/user/login";
const REGISTER_PATH: &str = "/api/user/register";

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    #[error("email is required")]
    EmptyEmail,

    #[error("email address is malformed")]
    InvalidEmail,

    #[error("password is required")]
    EmptyPassword,

    #[error("invite code is required")]
    EmptyInviteCode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
    InviteCode,
}

/// Per-field problems found before any request is made.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors(pub Vec<(Field, ValidationError)>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<ValidationError> {
        self.0.iter().find(|(f, _)| *f == field).map(|(_, e)| *e)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum AuthOutcome {
    SignedIn(User),
    Invalid(FieldErrors),
    Rejected(Option<String>),
}

pub fn validate_email(email: &str) -> Option<ValidationError> {
    let email = email.trim();
    if email.is_empty() {
        return Some(ValidationError::EmptyEmail);
    }
    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if well_formed {
        None
    } else {
        Some(ValidationError::InvalidEmail)
    }
}

pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::default();
    if let Some(e) = validate_email(email) {
        errors.0.push((Field::Email, e));
    }
    if password.is_empty() {
        errors.0.push((Field::Password, ValidationError::EmptyPassword));
    }
    errors
}

pub fn validate_registration(email: &str, password: &str, invite_code: &str) -> FieldErrors {
    let mut errors = validate_login(email, password);
    if invite_code.trim().is_empty() {
        errors
            .0
            .push((Field::InviteCode, ValidationError::EmptyInviteCode));
    }
    errors
}

/// Signed-in user state. The user returned by the server is persisted locally
/// and its token attached to every later request.
pub struct UserStore {
    client: HttpClient,
    slot: UserSlot,
    user: Option<User>,
}

impl UserStore {
    pub fn new(client: HttpClient, slot: UserSlot) -> Self {
        let user = slot.load();
        if let Some(ref u) = user {
            client.set_token(Some(u.token.clone()).filter(|t| !t.is_empty()));
        }
        Self { client, slot, user }
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn login(&mut self, email: &str, password: &str) -> AuthOutcome {
        let errors = validate_login(email, password);
        if !errors.is_empty() {
            return AuthOutcome::Invalid(errors);
        }
        let response = self.client.post(
            LOGIN_PATH,
            &json!({ "email": email.trim(), "password": password }),
        );
        self.accept(response)
    }

    pub fn register(&mut self, email: &str, password: &str, invite_code: &str) -> AuthOutcome {
        let errors = validate_registration(email, password, invite_code);
        if !errors.is_empty() {
            return AuthOutcome::Invalid(errors);
        }
        let response = self.client.post(
            REGISTER_PATH,
            &json!({
                "email": email.trim(),
                "password": password,
                "inviteCode": invite_code.trim(),
            }),
        );
        self.accept(response)
    }

    pub fn logout(&mut self) {
        self.user = None;
        self.client.set_token(None);
        if let Err(e) = self.slot.clear() {
            log::error!("failed to clear saved user: {e}");
        }
    }

    fn accept(&mut self, response: ApiResponse) -> AuthOutcome {
        if !response.is_success() {
            let message = response.error.clone().or_else(|| {
                response
                    .extra
                    .get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            });
            return AuthOutcome::Rejected(message);
        }
        let Some(user) = response.data_as::<User>() else {
            return AuthOutcome::Rejected(Some("missing user in response".to_string()));
        };
        if let Err(e) = self.slot.save(&user) {
            log::error!("failed to persist user: {e}");
        }
        self.client
            .set_token(Some(user.token.clone()).filter(|t| !t.is_empty()));
        self.user = Some(user.clone());
        AuthOutcome::SignedIn(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::testing::MockTransport;
    use crate::store::local::LocalStorage;
    use tempfile::TempDir;

    fn make_store(mock: &std::sync::Arc<MockTransport>) -> (TempDir, UserStore) {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, UserStore::new(mock.client(), UserSlot::new(storage)))
    }

    #[test]
    fn email_validation() {
        assert_eq!(validate_email(""), Some(ValidationError::EmptyEmail));
        assert_eq!(validate_email("  "), Some(ValidationError::EmptyEmail));
        assert_eq!(validate_email("no-at.com"), Some(ValidationError::InvalidEmail));
        assert_eq!(validate_email("@x.com"), Some(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b"), Some(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b@c.com"), Some(ValidationError::InvalidEmail));
        assert_eq!(validate_email("a b@c.com"), Some(ValidationError::InvalidEmail));
        assert_eq!(validate_email("learner@example.com"), None);
    }

    #[test]
    fn empty_invite_code_blocks_request() {
        let mock = MockTransport::new();
        let (_dir, mut store) = make_store(&mock);
        let outcome = store.register("learner@example.com", "secret", " ");
        match outcome {
            AuthOutcome::Invalid(errors) => {
                assert_eq!(
                    errors.get(Field::InviteCode),
                    Some(ValidationError::EmptyInviteCode)
                );
                assert!(errors.get(Field::Email).is_none());
            }
            other => panic!("expected validation failure, got {other:?}"),
        }
        assert_eq!(mock.calls_to(REGISTER_PATH), 0);
    }

    #[test]
    fn login_persists_user_and_sets_token() {
        let mock = MockTransport::new();
        mock.respond(
            LOGIN_PATH,
            json!({"code": 200, "data": {"id": 1, "email": "learner@example.com", "token": "tk"}}),
        );
        let (dir, mut store) = make_store(&mock);
        let outcome = store.login("learner@example.com", "secret");
        assert!(matches!(outcome, AuthOutcome::SignedIn(ref u) if u.id == 1));
        assert_eq!(store.current().map(|u| u.email.as_str()), Some("learner@example.com"));

        // a fresh store picks the saved user back up
        let storage = LocalStorage::with_base_dir(dir.path().to_path_buf()).unwrap();
        let other = MockTransport::new();
        let reloaded = UserStore::new(other.client(), UserSlot::new(storage));
        assert_eq!(reloaded.current().map(|u| u.id), Some(1));

        store.logout();
        assert!(store.current().is_none());
    }

    #[test]
    fn rejected_login_surfaces_message() {
        let mock = MockTransport::new();
        mock.respond(LOGIN_PATH, json!({"code": 401, "message": "bad password"}));
        let (_dir, mut store) = make_store(&mock);
        assert_eq!(
            store.login("learner@example.com", "wrong"),
            AuthOutcome::Rejected(Some("bad password".to_string()))
        );
        assert!(store.current().is_none());
    }

    #[test]
    fn register_sends_invite_code() {
        let mock = MockTransport::new();
        mock.respond(
            REGISTER_PATH,
            json!({"code": 200, "data": {"id": 5, "email": "new@example.com"}}),
        );
        let (_dir, mut store) = make_store(&mock);
        assert!(matches!(
            store.register("new@example.com", "pw", "INVITE42"),
            AuthOutcome::SignedIn(_)
        ));
        assert_eq!(mock.last_body(REGISTER_PATH).unwrap()["inviteCode"], "INVITE42");
    }
}
