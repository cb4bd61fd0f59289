use lambda_http::http::StatusCode;
use thiserror::Error;

use crate::request::Precondition;

pub const MALFORMED_REQUEST: &str = "A requisição para a rota de usuario foi mal feita";
pub const SEARCH_FAILURE: &str =
    "Houve um erro interno enquanto se fazia a busca! Provavelmente é um bug na api!";
pub const UNMAPPED_FAILURE: &str = "Erro interno não mapeado no serviço de usuários";

/// Reasons the user directory refuses or fails an operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("login already taken")]
    DuplicateLogin,
    #[error("cpf already registered")]
    DuplicateCpf,
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid email")]
    InvalidEmail,
    #[error("unknown failure in the user service")]
    UnknownServiceFailure,
    #[error("invalid phone")]
    InvalidPhone,
    #[error("requester lacks permission")]
    Forbidden,
    #[error("invalid session")]
    InvalidSession,
    #[error("invalid cpf")]
    InvalidCpf,
    #[error("invalid birth date")]
    InvalidBirthDate,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid class")]
    InvalidClass,
    #[error("search failed")]
    SearchFailure,
    #[error("unmapped failure: {0}")]
    Unmapped(String),
}

impl DomainError {
    /// HTTP status and the fixed message shown to the caller.
    pub fn http_outcome(&self) -> (StatusCode, &'static str) {
        use DomainError::*;
        match self {
            DuplicateLogin => (StatusCode::BAD_REQUEST, "Login duplicado"),
            DuplicateCpf => (StatusCode::BAD_REQUEST, "Cpf duplicado"),
            DuplicateEmail => (StatusCode::BAD_REQUEST, "Email duplicado"),
            InvalidEmail => (StatusCode::BAD_REQUEST, "Email inválido"),
            UnknownServiceFailure => (
                StatusCode::BAD_REQUEST,
                "Erro desconhecido provavelmente por conta do sql",
            ),
            InvalidPhone => (StatusCode::BAD_REQUEST, "Telefone inválido!"),
            Forbidden => (
                StatusCode::FORBIDDEN,
                "Este usuário não tem permissão para essa operação",
            ),
            InvalidSession => (
                StatusCode::UNAUTHORIZED,
                "Este usuário não está autorizado(logado). Sessão inválida?",
            ),
            InvalidCpf => (StatusCode::BAD_REQUEST, "Cpf inválido!"),
            InvalidBirthDate => (
                StatusCode::BAD_REQUEST,
                "Data de nascimento inválida! deve estar no formato AAAA-MM-DD!",
            ),
            UserNotFound => (
                StatusCode::NOT_FOUND,
                "Foi tentado atualizar um usuário inexistente",
            ),
            InvalidClass => (StatusCode::BAD_REQUEST, "Turma inválida"),
            SearchFailure => (StatusCode::INTERNAL_SERVER_ERROR, SEARCH_FAILURE),
            Unmapped(_) => (StatusCode::INTERNAL_SERVER_ERROR, UNMAPPED_FAILURE),
        }
    }
}

/// Rejections raised before the directory is ever called.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RequestError {
    #[error("body could not be decoded: {0}")]
    MalformedBody(String),
    #[error("requester login is empty")]
    MissingRequesterIdentity,
    #[error("required field missing for {0:?}")]
    MissingRequiredField(Precondition),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    pub fn message(&self) -> &'static str {
        match self {
            RequestError::MalformedBody(_) | RequestError::MissingRequesterIdentity => {
                MALFORMED_REQUEST
            }
            RequestError::MissingRequiredField(Precondition::Create) => {
                "Algum campo necessário para o cadastro não foi fornecido"
            }
            RequestError::MissingRequiredField(Precondition::Update) => {
                "Algum campo necessário para a atualização não foi fornecido"
            }
            RequestError::MissingRequiredField(Precondition::Delete) => {
                "É necessário informar o Id do usuário que deseja excluir"
            }
        }
    }
}
