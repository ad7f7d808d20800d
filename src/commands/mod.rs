//! Command-line front end.
//!
//! Each subcommand first navigates to the screen that owns the data, so the
//! route guard decides whether a login is needed, then runs the store actions
//! and renders the cached result.

mod accounts;
mod core;
pub mod utils;

use crate::errors::Result;
use crate::session::AppContext;
use clap::{Parser, Subcommand, ValueEnum};
use utils::Credentials;

#[derive(Parser, Debug)]
#[command(name = "gfinancas-admin")]
#[command(version)]
#[command(about = "Departmental budget administration client for the gfinancas API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Username used when the server asks for a login
    #[arg(long, short, global = true, env = "GFINANCAS_USERNAME")]
    pub username: Option<String>,

    /// Password used when the server asks for a login
    #[arg(long, short, global = true, env = "GFINANCAS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Output format
    #[arg(long, short = 'o', global = true, default_value = "text", value_enum)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show who the current session belongs to
    Whoami,
    /// Open a session with --username/--password
    Login,
    /// Close the current session
    Logout,
    /// List users
    Users,
    /// List departamentos
    Departamentos,
    /// List elementos de despesa
    Elementos,
    /// List tipos de gasto, optionally only those of one elemento
    TiposGasto {
        #[arg(long)]
        elemento: Option<i64>,
    },
    /// List one page of despesas
    Despesas {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        per_page: u32,
        /// Only despesas of this departamento
        #[arg(long)]
        departamento: Option<i64>,
    },
    /// Total spent by a departamento
    TotalDespesas { departamento: i64 },
    /// List verbas
    Verbas,
    /// Allot a yearly verba to a departamento
    AddVerba {
        #[arg(long)]
        valor: Option<f64>,
        #[arg(long)]
        departamento: Option<i64>,
        #[arg(long)]
        ano: Option<i32>,
        #[arg(long)]
        descricao: Option<String>,
    },
    /// Delete a despesa by id
    DeleteDespesa { id: i64 },
    /// List subordinações between departamentos
    Subordinacoes,
    /// List responsabilidades of users over departamentos
    Responsabilidades,
}

/// Runs `cli` against `ctx` and returns the rendered output.
pub async fn run(ctx: &AppContext, cli: &Cli) -> Result<String> {
    let credentials = Credentials {
        username: cli.username.clone(),
        password: cli.password.clone(),
    };
    let format = cli.format;

    match &cli.command {
        Command::Whoami => accounts::whoami(ctx, format).await,
        Command::Login => accounts::login(ctx, &credentials, format).await,
        Command::Logout => accounts::logout(ctx).await,
        Command::Users => accounts::users(ctx, &credentials, format).await,
        Command::Departamentos => core::departamentos(ctx, &credentials, format).await,
        Command::Elementos => core::elementos(ctx, &credentials, format).await,
        Command::TiposGasto { elemento } => core::tipos_gasto(ctx, &credentials, format, *elemento).await,
        Command::Despesas {
            page,
            per_page,
            departamento,
        } => core::despesas(ctx, &credentials, format, *page, *per_page, *departamento).await,
        Command::TotalDespesas { departamento } => {
            core::total_despesas(ctx, &credentials, format, *departamento).await
        }
        Command::Verbas => core::verbas(ctx, &credentials, format).await,
        Command::AddVerba {
            valor,
            departamento,
            ano,
            descricao,
        } => {
            let verba = crate::entities::NewVerba {
                valor: *valor,
                departamento_id: *departamento,
                ano: *ano,
                descricao: descricao.clone(),
            };
            core::add_verba(ctx, &credentials, format, &verba).await
        }
        Command::DeleteDespesa { id } => core::delete_despesa(ctx, &credentials, *id).await,
        Command::Subordinacoes => core::subordinacoes(ctx, &credentials, format).await,
        Command::Responsabilidades => core::responsabilidades(ctx, &credentials, format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::test_utils::{ADMIN_PASSWORD, ADMIN_USERNAME, init_test_tracing, mock_context};

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["gfinancas-admin", "-u", ADMIN_USERNAME, "-p", ADMIN_PASSWORD];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_parse_despesas_defaults() {
        let parsed = cli(&["despesas"]);
        assert!(matches!(
            parsed.command,
            Command::Despesas {
                page: 1,
                per_page: 10,
                departamento: None
            }
        ));
        assert_eq!(parsed.format, OutputFormat::Text);
    }

    #[tokio::test]
    async fn test_protected_command_logs_in_on_redirect() -> Result<()> {
        init_test_tracing();
        let (ctx, _mock) = mock_context()?;

        let output = run(&ctx, &cli(&["departamentos"])).await?;
        assert!(output.contains("Reitoria"));
        assert!(ctx.accounts.is_authenticated().await);
        Ok(())
    }

    #[tokio::test]
    async fn test_protected_command_without_credentials_fails() -> Result<()> {
        init_test_tracing();
        let (ctx, mock) = mock_context()?;
        let parsed = Cli {
            command: Command::Verbas,
            username: None,
            password: None,
            format: OutputFormat::Text,
        };

        let result = run(&ctx, &parsed).await;
        assert!(matches!(result, Err(Error::Config { .. })));
        let paths: Vec<String> = mock.requests().await.into_iter().map(|(_, p)| p).collect();
        assert_eq!(paths, vec!["/api/accounts/whoami".to_string()]);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_verba_renders_json() -> Result<()> {
        init_test_tracing();
        let (ctx, _mock) = mock_context()?;

        let output = run(
            &ctx,
            &cli(&["-o", "json", "add-verba", "--valor", "100", "--departamento", "3", "--ano", "2024"]),
        )
        .await?;
        let value: serde_json::Value = serde_json::from_str(&output).map_err(|source| Error::Decode {
            path: "add-verba".to_string(),
            source,
        })?;
        assert_eq!(value["ano"], 2024);
        assert_eq!(value["departamento_id"], 3);
        assert_eq!(ctx.core.verbas().await.len(), 1);
        Ok(())
    }
}
