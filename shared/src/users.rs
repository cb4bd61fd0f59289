use lambda_http::{
    http::{Method, StatusCode},
    Body, Error, Response,
};

use crate::directory::UserDirectory;
use crate::errors::DomainError;
use crate::request::{decode, Requester, UserOperation, Verb};
use crate::types::{Class, User, UserId, UserView};
use crate::views;

/// Users route: create (POST), search (GET), update (PUT), delete (DELETE).
///
/// Every request carries the requester's session id and login; the
/// directory decides whether that pair may perform the operation.
pub async fn handle_users(
    directory: &dyn UserDirectory,
    method: &Method,
    body: &[u8],
    allowed_origin: &str,
) -> Result<Response<Body>, Error> {
    let Some(verb) = Verb::from_method(method) else {
        return method_not_allowed(allowed_origin);
    };

    let (requester, operation) = match decode(verb, body) {
        Ok(decoded) => decoded,
        Err(e) => {
            tracing::warn!("Rejected {:?} request on users route: {}", verb, e);
            return views::message(e.status(), e.message(), allowed_origin);
        }
    };

    tracing::info!(
        "Users route {:?} requested by {} (session {})",
        verb,
        requester.login,
        requester.session_id
    );

    let outcome = match operation {
        UserOperation::Create(user) => create_user(directory, &requester, user).await,
        UserOperation::Search { term } => search_users(directory, &requester, &term).await,
        UserOperation::Update(user) => update_user(directory, &requester, &user).await,
        UserOperation::Delete { id } => delete_user(directory, &requester, id).await,
    };

    match outcome {
        Ok(views) => views::encode(views, allowed_origin),
        Err(e) => {
            if let DomainError::Unmapped(detail) = &e {
                tracing::error!("Unmapped failure from user directory: {}", detail);
            } else {
                tracing::warn!("User directory refused {:?}: {}", verb, e);
            }
            let (status, message) = e.http_outcome();
            views::message(status, message, allowed_origin)
        }
    }
}

/// Create, then read back the assigned id and the class labels.
async fn create_user(
    directory: &dyn UserDirectory,
    requester: &Requester,
    mut user: User,
) -> Result<Vec<UserView>, DomainError> {
    directory
        .authorize_and_create(requester.session_id, &requester.login, &user)
        .await?;

    let mut resolved = true;
    match directory.find_user_id_by_login(&user.login).await {
        Ok(id) => user.id = id,
        Err(e) => {
            tracing::warn!("Created user {} but could not read its id: {}", user.login, e);
            resolved = false;
        }
    }
    user.active = true;

    if user.class.id != 0 {
        match directory.find_class_by_id(user.class.id).await {
            Ok(class) => user.class = class,
            Err(e) => {
                tracing::warn!(
                    "Created user {} but could not load class {}: {}",
                    user.login,
                    user.class.id,
                    e
                );
                user.class = Class::default();
                resolved = false;
            }
        }
    }

    let mut view = UserView::from(&user);
    view.resolved = resolved;
    Ok(vec![view])
}

async fn search_users(
    directory: &dyn UserDirectory,
    requester: &Requester,
    term: &str,
) -> Result<Vec<UserView>, DomainError> {
    let found = directory
        .authorize_and_search(requester.session_id, &requester.login, term)
        .await?;
    Ok(views::project(&found))
}

async fn update_user(
    directory: &dyn UserDirectory,
    requester: &Requester,
    user: &User,
) -> Result<Vec<UserView>, DomainError> {
    let updated = directory
        .authorize_and_update(requester.session_id, &requester.login, user)
        .await?;
    Ok(views::project([&updated]))
}

/// Delete, then echo the record back. A failed echo still answers 200,
/// with an empty view flagged as unresolved.
async fn delete_user(
    directory: &dyn UserDirectory,
    requester: &Requester,
    id: UserId,
) -> Result<Vec<UserView>, DomainError> {
    directory
        .authorize_and_delete(requester.session_id, &requester.login, id)
        .await?;

    let view = match directory.find_user_by_id(id).await {
        Ok(deleted) => UserView::from(&deleted),
        Err(e) => {
            tracing::warn!("Deleted user {} but could not read it back: {}", id, e);
            UserView::default()
        }
    };
    Ok(vec![view])
}

fn method_not_allowed(allowed_origin: &str) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(StatusCode::METHOD_NOT_ALLOWED)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", allowed_origin)
        .body(
            serde_json::json!({"error": "Method not allowed"})
                .to_string()
                .into(),
        )
        .map_err(Box::new)?)
}
