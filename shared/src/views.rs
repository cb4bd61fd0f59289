use lambda_http::{http::StatusCode, Body, Error, Response};

use crate::types::{User, UserView, UsersResponse};

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        UserView {
            id: user.id,
            login: user.login.clone(),
            cpf: user.cpf.clone(),
            password: user.password.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            birth_date: user.birth_date.clone(),
            permission: user.permission,
            active: user.active,
            class_id: user.class.id,
            class_description: user.class.description(),
            grade_id: user.class.grade.id,
            shift_id: user.class.shift.id,
            resolved: true,
        }
    }
}

/// Project users into views, keeping input order.
pub fn project<'a>(users: impl IntoIterator<Item = &'a User>) -> Vec<UserView> {
    users.into_iter().map(UserView::from).collect()
}

/// 200 with `{"UsuarioAtingidos": [...]}` as the body.
pub fn encode(views: Vec<UserView>, allowed_origin: &str) -> Result<Response<Body>, Error> {
    let response = UsersResponse {
        affected_users: views,
    };
    Ok(Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", allowed_origin)
        .body(serde_json::to_string(&response)?.into())
        .map_err(Box::new)?)
}

/// Fixed plain-text message with the given status.
pub fn message(
    status: StatusCode,
    text: &'static str,
    allowed_origin: &str,
) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("Access-Control-Allow-Origin", allowed_origin)
        .body(Body::from(text))
        .map_err(Box::new)?)
}
