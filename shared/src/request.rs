use lambda_http::http::Method;
use serde::{Deserialize, Deserializer};

use crate::errors::RequestError;
use crate::types::{Class, ClassId, SessionId, User, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Create,
    Search,
    Update,
    Delete,
}

impl Verb {
    pub fn from_method(method: &Method) -> Option<Self> {
        match method {
            &Method::POST => Some(Verb::Create),
            &Method::GET => Some(Verb::Search),
            &Method::PUT => Some(Verb::Update),
            &Method::DELETE => Some(Verb::Delete),
            _ => None,
        }
    }
}

/// Verbs with field preconditions of their own; search has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    Create,
    Update,
    Delete,
}

/// Flat body shared by every verb. Absent or `null` fields decode to their
/// zero value, and keys are also accepted with a lowercase first letter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserRequestBody {
    #[serde(rename = "IdDaSessao", alias = "idDaSessao", deserialize_with = "null_as_default")]
    pub session_id: SessionId,
    #[serde(
        rename = "LoginDoUsuarioRequerente",
        alias = "loginDoUsuarioRequerente",
        deserialize_with = "null_as_default"
    )]
    pub requester_login: String,
    #[serde(rename = "Id", alias = "id", deserialize_with = "null_as_default")]
    pub id: UserId,
    #[serde(rename = "Login", alias = "login", deserialize_with = "null_as_default")]
    pub login: String,
    #[serde(rename = "Cpf", alias = "cpf", deserialize_with = "null_as_default")]
    pub cpf: String,
    #[serde(rename = "Senha", alias = "senha", deserialize_with = "null_as_default")]
    pub password: String,
    #[serde(rename = "Nome", alias = "nome", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "Email", alias = "email", deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(rename = "Telefone", alias = "telefone", deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(
        rename = "DataDeNascimento",
        alias = "dataDeNascimento",
        deserialize_with = "null_as_default"
    )]
    pub birth_date: String,
    #[serde(
        rename = "PermissoesDoUsuario",
        alias = "permissoesDoUsuario",
        deserialize_with = "null_as_default"
    )]
    pub permission: u64,
    #[serde(rename = "Ativo", alias = "ativo", deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(rename = "Turma", alias = "turma", deserialize_with = "null_as_default")]
    pub class_id: ClassId,
    #[serde(rename = "TextoDeBusca", alias = "textoDeBusca", deserialize_with = "null_as_default")]
    pub search_term: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Who is asking. Session validity is judged by the directory, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requester {
    pub session_id: SessionId,
    pub login: String,
}

/// One variant per verb, holding only the fields that verb reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserOperation {
    Create(User),
    Search { term: String },
    Update(User),
    Delete { id: UserId },
}

/// Parse the raw body and shape it into the operation the verb asks for.
pub fn decode(verb: Verb, body: &[u8]) -> Result<(Requester, UserOperation), RequestError> {
    let body: UserRequestBody = serde_json::from_slice(body)
        .map_err(|e| RequestError::MalformedBody(e.to_string()))?;

    if body.requester_login.is_empty() {
        return Err(RequestError::MissingRequesterIdentity);
    }

    let requester = Requester {
        session_id: body.session_id,
        login: body.requester_login.clone(),
    };
    let operation = body.into_operation(verb)?;
    Ok((requester, operation))
}

impl UserRequestBody {
    fn into_operation(self, verb: Verb) -> Result<UserOperation, RequestError> {
        match verb {
            Verb::Create => {
                if self.login.is_empty()
                    || self.name.is_empty()
                    || self.email.is_empty()
                    || self.password.is_empty()
                {
                    return Err(RequestError::MissingRequiredField(Precondition::Create));
                }
                Ok(UserOperation::Create(User {
                    id: 0,
                    login: self.login,
                    cpf: self.cpf,
                    password: self.password,
                    name: self.name,
                    email: self.email,
                    phone: self.phone,
                    birth_date: self.birth_date,
                    permission: self.permission,
                    active: false,
                    class: Class::with_id(self.class_id),
                }))
            }
            Verb::Search => Ok(UserOperation::Search {
                term: self.search_term,
            }),
            Verb::Update => {
                if self.login.is_empty()
                    || self.name.is_empty()
                    || self.email.is_empty()
                    || self.id == 0
                {
                    return Err(RequestError::MissingRequiredField(Precondition::Update));
                }
                Ok(UserOperation::Update(User {
                    id: self.id,
                    login: self.login,
                    cpf: self.cpf,
                    password: self.password,
                    name: self.name,
                    email: self.email,
                    phone: self.phone,
                    birth_date: self.birth_date,
                    permission: self.permission,
                    active: self.active,
                    class: Class::with_id(self.class_id),
                }))
            }
            Verb::Delete => {
                if self.id == 0 {
                    return Err(RequestError::MissingRequiredField(Precondition::Delete));
                }
                Ok(UserOperation::Delete { id: self.id })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn body(value: serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn methods_map_to_verbs() {
        assert_eq!(Verb::from_method(&Method::POST), Some(Verb::Create));
        assert_eq!(Verb::from_method(&Method::GET), Some(Verb::Search));
        assert_eq!(Verb::from_method(&Method::PUT), Some(Verb::Update));
        assert_eq!(Verb::from_method(&Method::DELETE), Some(Verb::Delete));
        assert_eq!(Verb::from_method(&Method::PATCH), None);
    }

    #[test]
    fn garbage_is_malformed() {
        let err = decode(Verb::Search, b"{not json").unwrap_err();
        assert!(matches!(err, RequestError::MalformedBody(_)));

        let err = decode(Verb::Search, b"").unwrap_err();
        assert!(matches!(err, RequestError::MalformedBody(_)));
    }

    #[test]
    fn session_id_must_be_numeric() {
        let raw = body(json!({"IdDaSessao": "abc", "LoginDoUsuarioRequerente": "admin"}));
        let err = decode(Verb::Search, &raw).unwrap_err();
        assert!(matches!(err, RequestError::MalformedBody(_)));
    }

    #[test]
    fn empty_requester_login_is_rejected_for_every_verb() {
        let raw = body(json!({
            "IdDaSessao": 7,
            "Id": 3,
            "Login": "ana",
            "Nome": "Ana Silva",
            "Email": "ana@x.com",
            "Senha": "secret"
        }));
        for verb in [Verb::Create, Verb::Search, Verb::Update, Verb::Delete] {
            assert_eq!(
                decode(verb, &raw).unwrap_err(),
                RequestError::MissingRequesterIdentity
            );
        }
    }

    #[test]
    fn create_copies_fields_and_class_reference() {
        let raw = body(json!({
            "IdDaSessao": 7,
            "LoginDoUsuarioRequerente": "admin",
            "Id": 99,
            "Login": "ana",
            "Nome": "Ana Silva",
            "Email": "ana@x.com",
            "Senha": "secret",
            "Telefone": "(11) 98765-4321",
            "PermissoesDoUsuario": 3,
            "Ativo": true,
            "Turma": 4,
            "TextoDeBusca": "ignored"
        }));
        let (requester, operation) = decode(Verb::Create, &raw).unwrap();
        assert_eq!(requester.session_id, 7);
        assert_eq!(requester.login, "admin");

        let UserOperation::Create(user) = operation else {
            panic!("expected a create operation");
        };
        assert_eq!(user.id, 0);
        assert!(!user.active);
        assert_eq!(user.login, "ana");
        assert_eq!(user.phone, "(11) 98765-4321");
        assert_eq!(user.permission, 3);
        assert_eq!(user.class, Class::with_id(4));
    }

    #[test]
    fn create_requires_email() {
        let raw = body(json!({
            "LoginDoUsuarioRequerente": "admin",
            "Login": "ana",
            "Nome": "Ana Silva",
            "Senha": "secret"
        }));
        assert_eq!(
            decode(Verb::Create, &raw).unwrap_err(),
            RequestError::MissingRequiredField(Precondition::Create)
        );
    }

    #[test]
    fn update_requires_a_target_id() {
        let raw = body(json!({
            "LoginDoUsuarioRequerente": "admin",
            "Login": "ana",
            "Nome": "Ana Silva",
            "Email": "ana@x.com"
        }));
        assert_eq!(
            decode(Verb::Update, &raw).unwrap_err(),
            RequestError::MissingRequiredField(Precondition::Update)
        );
    }

    #[test]
    fn update_keeps_id_and_active_flag() {
        let raw = body(json!({
            "LoginDoUsuarioRequerente": "admin",
            "Id": 12,
            "Login": "ana",
            "Nome": "Ana Silva",
            "Email": "ana@x.com",
            "Ativo": true
        }));
        let (_, operation) = decode(Verb::Update, &raw).unwrap();
        let UserOperation::Update(user) = operation else {
            panic!("expected an update operation");
        };
        assert_eq!(user.id, 12);
        assert!(user.active);
        assert!(user.password.is_empty());
    }

    #[test]
    fn delete_needs_only_the_id() {
        let raw = body(json!({"LoginDoUsuarioRequerente": "admin", "Id": 5}));
        let (_, operation) = decode(Verb::Delete, &raw).unwrap();
        assert_eq!(operation, UserOperation::Delete { id: 5 });

        let raw = body(json!({"LoginDoUsuarioRequerente": "admin"}));
        assert_eq!(
            decode(Verb::Delete, &raw).unwrap_err(),
            RequestError::MissingRequiredField(Precondition::Delete)
        );
    }

    #[test]
    fn search_carries_only_the_term() {
        let raw = body(json!({
            "LoginDoUsuarioRequerente": "admin",
            "Login": "ana",
            "TextoDeBusca": "silva"
        }));
        let (_, operation) = decode(Verb::Search, &raw).unwrap();
        assert_eq!(
            operation,
            UserOperation::Search {
                term: "silva".to_string()
            }
        );
    }

    #[test]
    fn null_fields_decode_to_zero_values() {
        let raw = body(json!({
            "IdDaSessao": 7,
            "LoginDoUsuarioRequerente": "admin",
            "Id": null,
            "Login": "ana",
            "Nome": "Ana Silva",
            "Email": "ana@x.com",
            "Senha": "secret",
            "Cpf": null,
            "Telefone": null,
            "PermissoesDoUsuario": null,
            "Ativo": null,
            "Turma": null
        }));
        let (_, operation) = decode(Verb::Create, &raw).unwrap();
        let UserOperation::Create(user) = operation else {
            panic!("expected a create operation");
        };
        assert!(user.cpf.is_empty());
        assert!(user.phone.is_empty());
        assert_eq!(user.permission, 0);
        assert_eq!(user.class, Class::default());
    }

    #[test]
    fn null_required_field_still_counts_as_missing() {
        let raw = body(json!({
            "LoginDoUsuarioRequerente": "admin",
            "Login": "ana",
            "Nome": "Ana Silva",
            "Email": null,
            "Senha": "secret"
        }));
        assert_eq!(
            decode(Verb::Create, &raw).unwrap_err(),
            RequestError::MissingRequiredField(Precondition::Create)
        );

        let raw = body(json!({"IdDaSessao": null, "LoginDoUsuarioRequerente": null}));
        assert_eq!(
            decode(Verb::Search, &raw).unwrap_err(),
            RequestError::MissingRequesterIdentity
        );
    }

    #[test]
    fn lowercase_initial_keys_are_accepted() {
        let raw = body(json!({
            "idDaSessao": 42,
            "loginDoUsuarioRequerente": "admin",
            "textoDeBusca": "silva"
        }));
        let (requester, operation) = decode(Verb::Search, &raw).unwrap();
        assert_eq!(requester.session_id, 42);
        assert_eq!(requester.login, "admin");
        assert_eq!(
            operation,
            UserOperation::Search {
                term: "silva".to_string()
            }
        );
    }
}
