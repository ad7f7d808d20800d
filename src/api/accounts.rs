//! Accounts API: session identity and user administration.

use crate::entities::{NewUser, Role, User};
use crate::errors::Result;
use crate::http::ApiClient;
use serde::{Deserialize, Serialize};

const WHOAMI: &str = "/api/accounts/whoami";
const LOGIN: &str = "/api/accounts/login";
const LOGOUT: &str = "/api/accounts/logout";
const ADD_USER: &str = "/api/accounts/add-user";
const LIST_USERS: &str = "/api/accounts/list-users";
const LIST_ROLES: &str = "/api/accounts/list-roles";

/// Answer of `GET /api/accounts/whoami`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhoAmI {
    #[serde(default)]
    pub authenticated: bool,
    #[serde(default)]
    pub user: Option<User>,
}

impl WhoAmI {
    /// The user, only when the server also says the session is authenticated.
    #[must_use]
    pub fn into_user(self) -> Option<User> {
        if self.authenticated { self.user } else { None }
    }
}

/// Answer of `POST /api/accounts/logout`; the server sends `{}` once the session is gone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LogoutResponse {
    #[serde(default)]
    pub authenticated: bool,
}

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct UsersEnvelope {
    users: Vec<User>,
}

#[derive(Deserialize)]
struct RolesEnvelope {
    roles: Vec<Role>,
}

pub async fn whoami(client: &ApiClient) -> Result<WhoAmI> {
    client.get(WHOAMI).await
}

/// Opens a session. Bad credentials come back as an HTTP 401 error.
pub async fn login(client: &ApiClient, username: &str, password: &str) -> Result<User> {
    client
        .post(LOGIN, &Credentials { username, password })
        .await
}

pub async fn logout(client: &ApiClient) -> Result<LogoutResponse> {
    client.post_empty(LOGOUT).await
}

pub async fn add_user(client: &ApiClient, new_user: &NewUser) -> Result<User> {
    client.post(ADD_USER, new_user).await
}

pub async fn list_users(client: &ApiClient) -> Result<Vec<User>> {
    let envelope: UsersEnvelope = client.get(LIST_USERS).await?;
    Ok(envelope.users)
}

pub async fn list_roles(client: &ApiClient) -> Result<Vec<Role>> {
    let envelope: RolesEnvelope = client.get(LIST_ROLES).await?;
    Ok(envelope.roles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{mock_client, mock_client_logged_in};

    #[tokio::test]
    async fn test_whoami_anonymous() -> Result<()> {
        let (client, _mock) = mock_client()?;
        let answer = whoami(&client).await?;
        assert!(!answer.authenticated);
        assert!(answer.into_user().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_login_then_whoami() -> Result<()> {
        let (client, _mock) = mock_client()?;
        let user = login(&client, "admin", "admin123").await?;
        assert_eq!(user.username, "admin");

        let answer = whoami(&client).await?;
        assert_eq!(answer.into_user().map(|u| u.id), Some(user.id));
        Ok(())
    }

    #[tokio::test]
    async fn test_login_with_bad_password_is_unauthorized() -> Result<()> {
        let (client, _mock) = mock_client()?;
        let result = login(&client, "admin", "wrong").await;
        assert!(matches!(result, Err(ref e @ Error::Http { status: 401, .. }) if e.is_unauthorized()));
        Ok(())
    }

    #[tokio::test]
    async fn test_logout_returns_unauthenticated() -> Result<()> {
        let (client, _mock) = mock_client_logged_in().await?;
        let resp = logout(&client).await?;
        assert!(!resp.authenticated);
        assert!(whoami(&client).await?.into_user().is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_list_users_and_roles_unwrap_envelopes() -> Result<()> {
        let (client, _mock) = mock_client_logged_in().await?;
        let users = list_users(&client).await?;
        assert!(users.iter().any(|u| u.username == "leitor"));

        let roles = list_roles(&client).await?;
        assert!(roles.iter().any(|r| r.name == "gestor"));
        Ok(())
    }

    #[tokio::test]
    async fn test_add_user_returns_created_user() -> Result<()> {
        let (client, _mock) = mock_client_logged_in().await?;
        let created = add_user(
            &client,
            &NewUser {
                username: "novo".to_string(),
                password: "senha-forte".to_string(),
                email: Some("novo@gfinancas.local".to_string()),
                ..Default::default()
            },
        )
        .await?;
        assert_eq!(created.username, "novo");
        assert!(created.roles.is_empty());
        Ok(())
    }
}
