use super::OutputFormat;
use super::utils::{Credentials, lines, login_with, open_screen, render};
use crate::entities::User;
use crate::errors::Result;
use crate::router::routes::{LOGIN, LOGOUT};
use crate::session::AppContext;

fn describe(user: &User) -> String {
    let roles = if user.roles.is_empty() {
        "sem papéis".to_string()
    } else {
        user.roles.join(", ")
    };
    format!("#{} {} ({}) [{}]", user.id, user.display_name(), user.username, roles)
}

pub(super) async fn whoami(ctx: &AppContext, format: OutputFormat) -> Result<String> {
    let user = ctx.accounts.who_am_i().await?;
    render(format, &user, |user| {
        user.as_ref()
            .map_or_else(|| "Nenhuma sessão ativa.".to_string(), describe)
    })
}

pub(super) async fn login(ctx: &AppContext, credentials: &Credentials, format: OutputFormat) -> Result<String> {
    ctx.router.push_name(LOGIN).await?;
    login_with(ctx, credentials).await?;
    let user = ctx.accounts.logged_user().await;
    render(format, &user, |user| {
        user.as_ref()
            .map_or_else(String::new, |u| format!("Sessão aberta: {}", describe(u)))
    })
}

pub(super) async fn logout(ctx: &AppContext) -> Result<String> {
    ctx.router.push_name(LOGOUT).await?;
    if ctx.accounts.logout().await? {
        Ok("Sessão encerrada.".to_string())
    } else {
        Ok("O servidor manteve a sessão aberta.".to_string())
    }
}

pub(super) async fn users(ctx: &AppContext, credentials: &Credentials, format: OutputFormat) -> Result<String> {
    open_screen(ctx, "/gestao/usuarios", credentials).await?;
    let users = ctx.accounts.list_users().await?;
    render(format, users.as_slice(), |users| {
        lines(users, "Nenhum usuário cadastrado.", describe)
    })
}
