use super::{Reject, Reply, body, route_not_found, to_json};
use crate::entities::{Permissions, User};
use crate::http::{ApiRequest, Method};
use crate::mock::db::{Account, Database, full_name};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

#[derive(Deserialize)]
struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
struct NewUserPayload {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    email: Option<String>,
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    bio: Option<String>,
    avatar: Option<String>,
    grupo: Option<String>,
}

pub(super) fn handle(db: &mut Database, request: &ApiRequest, rest: &[&str]) -> Reply {
    match (request.method, rest) {
        (Method::Get, ["whoami"]) => whoami(db),
        (Method::Post, ["login"]) => login(db, request),
        (Method::Post, ["logout"]) => {
            db.session = None;
            Ok(json!({}))
        }
        (Method::Post, ["add-user"]) => add_user(db, request),
        (Method::Get, ["list-users"]) => {
            require_session(db)?;
            let users: Vec<&User> = db.accounts.all().iter().map(|a| &a.user).collect();
            Ok(json!({ "users": to_json(&users)? }))
        }
        (Method::Get, ["list-roles"]) => {
            require_session(db)?;
            Ok(json!({ "roles": to_json(&db.roles.all())? }))
        }
        _ => Err(route_not_found(request)),
    }
}

fn require_session(db: &Database) -> Result<(), Reject> {
    db.session_user().map(|_| ()).ok_or_else(Reject::no_session)
}

fn whoami(db: &Database) -> Reply {
    match db.session_user() {
        Some(user) => Ok(json!({ "authenticated": true, "user": to_json(user)? })),
        None => Ok(json!({ "authenticated": false, "user": null })),
    }
}

fn login(db: &mut Database, request: &ApiRequest) -> Reply {
    let credentials: Credentials = body(request)?;
    let account = db
        .accounts
        .all()
        .iter()
        .find(|a| a.user.username == credentials.username && a.password == credentials.password)
        .cloned();

    match account {
        Some(account) => {
            debug!(username = %account.user.username, "mock session opened");
            db.session = Some(account.user.id);
            to_json(&account.user)
        }
        None => Err(Reject::unauthorized()),
    }
}

fn add_user(db: &mut Database, request: &ApiRequest) -> Reply {
    require_session(db)?;
    let payload: NewUserPayload = body(request)?;
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(Reject::bad_request("Usuário e senha são obrigatórios."));
    }
    if db
        .accounts
        .all()
        .iter()
        .any(|a| a.user.username == payload.username)
    {
        return Err(Reject::bad_request("Nome de usuário já cadastrado."));
    }

    let account = db.accounts.insert(|id| Account {
        user: User {
            id,
            username: payload.username,
            name: full_name(&payload.first_name, &payload.last_name),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            avatar: payload.avatar,
            bio: payload.bio,
            permissions: Permissions::default(),
            grupo: payload.grupo,
            roles: Vec::new(),
        },
        password: payload.password,
    });
    to_json(&account.user)
}
