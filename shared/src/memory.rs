//! In-memory user directory.
//!
//! Backs the route when no external identity service is wired in:
//! local runs of the lambda and the integration tests. Everything lives
//! behind one `RwLock` and is lost when the process exits.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::directory::UserDirectory;
use crate::errors::DomainError;
use crate::types::{Class, ClassId, SessionId, User, UserId};

pub const PERMISSION_CREATE: u64 = 1 << 0;
pub const PERMISSION_SEARCH: u64 = 1 << 1;
pub const PERMISSION_UPDATE: u64 = 1 << 2;
pub const PERMISSION_DELETE: u64 = 1 << 3;

#[derive(Debug, Clone, Deserialize)]
pub struct Session {
    pub id: SessionId,
    pub login: String,
}

/// Initial contents, usually read from a JSON file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DirectorySeed {
    pub classes: Vec<Class>,
    pub users: Vec<User>,
    pub sessions: Vec<Session>,
}

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("could not read seed file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse seed file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("seeded user id {0} leaves no room for new users")]
    IdSpaceExhausted(UserId),
}

impl DirectorySeed {
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let raw = std::fs::read(path)?;
        Ok(serde_json::from_slice(&raw)?)
    }
}

#[derive(Default)]
struct State {
    users: HashMap<UserId, User>,
    classes: HashMap<ClassId, Class>,
    sessions: HashMap<SessionId, String>,
    next_id: UserId,
}

pub struct MemoryDirectory {
    state: RwLock<State>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                next_id: 1,
                ..State::default()
            }),
        }
    }

    pub fn from_seed(seed: DirectorySeed) -> Result<Self, SeedError> {
        let mut state = State::default();
        for class in seed.classes {
            state.classes.insert(class.id, class);
        }
        for mut user in seed.users {
            // only the id of a seeded class reference is kept
            user.class = Class::with_id(user.class.id);
            state.users.insert(user.id, user);
        }
        for session in seed.sessions {
            state.sessions.insert(session.id, session.login);
        }
        let highest = state.users.keys().copied().max().unwrap_or(0);
        state.next_id = highest
            .checked_add(1)
            .ok_or(SeedError::IdSpaceExhausted(highest))?;
        Ok(Self {
            state: RwLock::new(state),
        })
    }
}

impl Default for MemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl State {
    fn authorize(
        &self,
        session_id: SessionId,
        requester: &str,
        required: u64,
    ) -> Result<(), DomainError> {
        match self.sessions.get(&session_id) {
            Some(login) if login == requester => {}
            _ => return Err(DomainError::InvalidSession),
        }
        let granted = self
            .users
            .values()
            .find(|u| u.login == requester && u.active)
            .map(|u| u.permission)
            .ok_or(DomainError::InvalidSession)?;
        if granted & required != required {
            return Err(DomainError::Forbidden);
        }
        Ok(())
    }

    fn validate(&self, user: &User) -> Result<(), DomainError> {
        if !is_valid_email(&user.email) {
            return Err(DomainError::InvalidEmail);
        }
        if !user.cpf.is_empty() && !is_valid_cpf(&user.cpf) {
            return Err(DomainError::InvalidCpf);
        }
        if !user.phone.is_empty() && !is_valid_phone(&user.phone) {
            return Err(DomainError::InvalidPhone);
        }
        if !user.birth_date.is_empty()
            && NaiveDate::parse_from_str(&user.birth_date, "%Y-%m-%d").is_err()
        {
            return Err(DomainError::InvalidBirthDate);
        }
        if user.class.id != 0 && !self.classes.contains_key(&user.class.id) {
            return Err(DomainError::InvalidClass);
        }

        for other in self.users.values().filter(|other| other.id != user.id) {
            if other.login == user.login {
                return Err(DomainError::DuplicateLogin);
            }
            if !user.cpf.is_empty() && other.cpf == user.cpf {
                return Err(DomainError::DuplicateCpf);
            }
            if other.email == user.email {
                return Err(DomainError::DuplicateEmail);
            }
        }
        Ok(())
    }

    fn resolved(&self, user: &User) -> User {
        let mut user = user.clone();
        user.class = self
            .classes
            .get(&user.class.id)
            .cloned()
            .unwrap_or_default();
        user
    }
}

#[async_trait]
impl UserDirectory for MemoryDirectory {
    async fn authorize_and_create(
        &self,
        session_id: SessionId,
        requester: &str,
        user: &User,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.authorize(session_id, requester, PERMISSION_CREATE)?;

        let mut user = User {
            id: 0,
            active: true,
            class: Class::with_id(user.class.id),
            ..user.clone()
        };
        state.validate(&user)?;

        user.id = state.next_id;
        state.next_id = state
            .next_id
            .checked_add(1)
            .ok_or_else(|| DomainError::Unmapped("user id space exhausted".to_string()))?;
        tracing::info!("Created user {} with id {}", user.login, user.id);
        state.users.insert(user.id, user);
        Ok(())
    }

    async fn authorize_and_search(
        &self,
        session_id: SessionId,
        requester: &str,
        term: &str,
    ) -> Result<Vec<User>, DomainError> {
        let state = self.state.read().await;
        state.authorize(session_id, requester, PERMISSION_SEARCH)?;

        let term = term.to_lowercase();
        let mut found: Vec<User> = state
            .users
            .values()
            .filter(|u| {
                term.is_empty()
                    || [&u.login, &u.name, &u.email, &u.cpf]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&term))
            })
            .map(|u| state.resolved(u))
            .collect();
        found.sort_by_key(|u| u.id);
        Ok(found)
    }

    async fn authorize_and_update(
        &self,
        session_id: SessionId,
        requester: &str,
        user: &User,
    ) -> Result<User, DomainError> {
        let mut state = self.state.write().await;
        state.authorize(session_id, requester, PERMISSION_UPDATE)?;

        if !state.users.contains_key(&user.id) {
            return Err(DomainError::UserNotFound);
        }
        let user = User {
            class: Class::with_id(user.class.id),
            ..user.clone()
        };
        state.validate(&user)?;

        let updated = state.resolved(&user);
        state.users.insert(user.id, user);
        Ok(updated)
    }

    async fn authorize_and_delete(
        &self,
        session_id: SessionId,
        requester: &str,
        id: UserId,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        state.authorize(session_id, requester, PERMISSION_DELETE)?;

        // soft delete: the record stays readable, only deactivated
        let user = state.users.get_mut(&id).ok_or(DomainError::UserNotFound)?;
        user.active = false;
        Ok(())
    }

    async fn find_user_by_id(&self, id: UserId) -> Result<User, DomainError> {
        let state = self.state.read().await;
        state
            .users
            .get(&id)
            .map(|u| state.resolved(u))
            .ok_or(DomainError::UserNotFound)
    }

    async fn find_user_id_by_login(&self, login: &str) -> Result<UserId, DomainError> {
        let state = self.state.read().await;
        state
            .users
            .values()
            .find(|u| u.login == login)
            .map(|u| u.id)
            .ok_or(DomainError::UserNotFound)
    }

    async fn find_class_by_id(&self, id: ClassId) -> Result<Class, DomainError> {
        let state = self.state.read().await;
        state
            .classes
            .get(&id)
            .cloned()
            .ok_or(DomainError::InvalidClass)
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty())
        && !email.chars().any(char::is_whitespace)
}

/// Brazilian number with area code, 10 or 11 digits. A leading `+` must be
/// followed by the country code 55, which is not counted.
fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim_start();
    let (international, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };
    let mut digits = String::new();
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            '(' | ')' | '-' | ' ' => {}
            _ => return false,
        }
    }
    let national = if international {
        match digits.strip_prefix("55") {
            Some(national) => national,
            None => return false,
        }
    } else {
        digits.as_str()
    };
    (10..=11).contains(&national.len())
}

/// Brazilian CPF: 11 digits, punctuation allowed, two check digits.
fn is_valid_cpf(cpf: &str) -> bool {
    let mut digits = Vec::with_capacity(11);
    for c in cpf.chars() {
        match c.to_digit(10) {
            Some(d) => digits.push(d),
            None if c == '.' || c == '-' => {}
            None => return false,
        }
    }
    if digits.len() != 11 || digits.iter().all(|d| *d == digits[0]) {
        return false;
    }

    let check = |len: usize| {
        let sum: u32 = digits[..len]
            .iter()
            .zip((2..=len as u32 + 1).rev())
            .map(|(d, weight)| d * weight)
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            rest => rest,
        }
    };
    check(9) == digits[9] && check(10) == digits[10]
}
