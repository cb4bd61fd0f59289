use serde::{Deserialize, Serialize};

pub type SessionId = u64;
pub type UserId = i64;
pub type ClassId = i64;

// ========== USER ==========
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct User {
    pub id: UserId, // 0 = not persisted yet
    pub login: String,
    pub cpf: String,
    pub password: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub birth_date: String, // YYYY-MM-DD
    pub permission: u64,
    pub active: bool,
    pub class: Class,
}

// ========== CLASS ==========
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Class {
    pub id: ClassId, // 0 = unaffiliated
    pub label: String,
    pub grade: Grade,
    pub shift: Shift,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Grade {
    pub id: i64,
    pub label: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Shift {
    pub id: i64,
    pub label: String,
}

impl Class {
    /// Reference to a class by id only, labels left for the directory to resolve.
    pub fn with_id(id: ClassId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// "<grade> <class> <shift>", blank for users without a class.
    pub fn description(&self) -> String {
        if self.id == 0 {
            return String::new();
        }
        format!("{} {} {}", self.grade.label, self.label, self.shift.label)
    }
}

// ========== VIEW ==========
/// Caller-facing projection of a user merged with its class labels.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct UserView {
    #[serde(rename = "IdDoUsuario")]
    pub id: UserId,
    #[serde(rename = "Login")]
    pub login: String,
    #[serde(rename = "Cpf")]
    pub cpf: String,
    #[serde(rename = "Senha")]
    pub password: String,
    #[serde(rename = "Nome")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Telefone")]
    pub phone: String,
    #[serde(rename = "DataDeNascimento")]
    pub birth_date: String,
    #[serde(rename = "Permissao")]
    pub permission: u64,
    #[serde(rename = "Ativo")]
    pub active: bool,
    #[serde(rename = "Turma")]
    pub class_id: ClassId,
    #[serde(rename = "TurmaDescrisao")]
    pub class_description: String,
    #[serde(rename = "Serie")]
    pub grade_id: i64,
    #[serde(rename = "Turno")]
    pub shift_id: i64,
    /// False when a best-effort lookup behind this view failed.
    #[serde(rename = "Resolvido")]
    pub resolved: bool,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct UsersResponse {
    #[serde(rename = "UsuarioAtingidos")]
    pub affected_users: Vec<UserView>,
}
