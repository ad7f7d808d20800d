use super::OutputFormat;
use super::utils::{Credentials, lines, money, open_screen, render};
use crate::entities::{NewVerba, PageRequest};
use crate::errors::Result;
use crate::session::AppContext;

const GESTAO: &str = "/gestao";
const GASTOS: &str = "/gastos";

pub(super) async fn departamentos(
    ctx: &AppContext,
    credentials: &Credentials,
    format: OutputFormat,
) -> Result<String> {
    open_screen(ctx, GESTAO, credentials).await?;
    let departamentos = ctx.core.list_departamentos().await?;
    render(format, departamentos.as_slice(), |deps| {
        lines(deps, "Nenhum departamento cadastrado.", |d| {
            let subordinados: Vec<&str> = d.subordinacoes.iter().map(|s| s.nome.as_str()).collect();
            let mut line = format!("#{} {} - {} ({})", d.id, d.nome, d.description, d.tipo_entidade);
            if !subordinados.is_empty() {
                line.push_str(&format!(" > {}", subordinados.join(", ")));
            }
            line
        })
    })
}

pub(super) async fn elementos(ctx: &AppContext, credentials: &Credentials, format: OutputFormat) -> Result<String> {
    open_screen(ctx, GESTAO, credentials).await?;
    let elementos = ctx.core.list_elementos().await?;
    render(format, elementos.as_slice(), |items| {
        lines(items, "Nenhum elemento cadastrado.", |e| {
            format!("#{} {} - {}", e.id, e.elemento, e.descricao)
        })
    })
}

pub(super) async fn tipos_gasto(
    ctx: &AppContext,
    credentials: &Credentials,
    format: OutputFormat,
    elemento: Option<i64>,
) -> Result<String> {
    open_screen(ctx, GESTAO, credentials).await?;
    let tipos = match elemento {
        Some(id) => ctx.core.list_tipos_gasto_por_elemento(id).await?,
        None => ctx.core.list_tipos_gasto().await?,
    };
    render(format, tipos.as_slice(), |items| {
        lines(items, "Nenhum tipo de gasto encontrado.", |t| {
            let elemento = t
                .elemento_id
                .map_or_else(String::new, |id| format!(" [elemento {id}]"));
            format!("#{} {} - {}{}", t.id, t.tipo_gasto, t.descricao, elemento)
        })
    })
}

pub(super) async fn despesas(
    ctx: &AppContext,
    credentials: &Credentials,
    format: OutputFormat,
    page: u32,
    per_page: u32,
    departamento: Option<i64>,
) -> Result<String> {
    open_screen(ctx, GASTOS, credentials).await?;
    let request = PageRequest::new(page, per_page);
    let result = match departamento {
        Some(id) => ctx.core.list_despesas_departamento(id, request).await?,
        None => ctx.core.list_despesas(request).await?,
    };
    render(format, &result, |page| {
        let body = lines(&page.despesas, "Nenhuma despesa registrada.", |d| {
            let data = d
                .data
                .map_or_else(|| "-".to_string(), |dt| dt.format("%d/%m/%Y").to_string());
            format!(
                "#{} {} {} dep {} - {}",
                d.id,
                data,
                money(d.valor),
                d.departamento_id,
                d.justificativa
            )
        });
        format!(
            "{body}\nPágina {} de {} ({} despesas)",
            page.paginacao.pagina_atual, page.paginacao.total_paginas, page.paginacao.total_despesas
        )
    })
}

pub(super) async fn total_despesas(
    ctx: &AppContext,
    credentials: &Credentials,
    format: OutputFormat,
    departamento: i64,
) -> Result<String> {
    open_screen(ctx, GASTOS, credentials).await?;
    let total = ctx.core.total_despesas_departamento(departamento).await?;
    render(format, &total, |t| {
        format!("Departamento {}: {}", t.departamento_id, money(t.total))
    })
}

pub(super) async fn verbas(ctx: &AppContext, credentials: &Credentials, format: OutputFormat) -> Result<String> {
    open_screen(ctx, GESTAO, credentials).await?;
    let verbas = ctx.core.list_verbas().await?;
    render(format, verbas.as_slice(), |items| {
        lines(items, "Nenhuma verba estipulada.", |v| {
            format!("#{} {} dep {} {} {}", v.id, v.ano, v.departamento_id, money(v.valor), v.descricao)
                .trim_end()
                .to_string()
        })
    })
}

pub(super) async fn add_verba(
    ctx: &AppContext,
    credentials: &Credentials,
    format: OutputFormat,
    verba: &NewVerba,
) -> Result<String> {
    open_screen(ctx, GESTAO, credentials).await?;
    let created = ctx.core.add_verba(verba).await?;
    render(format, &created, |v| {
        format!(
            "Verba #{} criada: {} para o departamento {} em {}",
            v.id,
            money(v.valor),
            v.departamento_id,
            v.ano
        )
    })
}

pub(super) async fn delete_despesa(ctx: &AppContext, credentials: &Credentials, id: i64) -> Result<String> {
    open_screen(ctx, GASTOS, credentials).await?;
    ctx.core.delete_despesa(id).await?;
    Ok(format!("Despesa #{id} removida."))
}

pub(super) async fn subordinacoes(
    ctx: &AppContext,
    credentials: &Credentials,
    format: OutputFormat,
) -> Result<String> {
    open_screen(ctx, GESTAO, credentials).await?;
    let subordinacoes = ctx.core.list_subordinacoes().await?;
    render(format, subordinacoes.as_slice(), |items| {
        lines(items, "Nenhuma subordinação cadastrada.", |s| {
            format!(
                "#{} {} -> {} {}",
                s.id,
                s.subordinado.nome,
                s.superior.nome,
                s.observacao.as_deref().unwrap_or_default()
            )
            .trim_end()
            .to_string()
        })
    })
}

pub(super) async fn responsabilidades(
    ctx: &AppContext,
    credentials: &Credentials,
    format: OutputFormat,
) -> Result<String> {
    open_screen(ctx, GESTAO, credentials).await?;
    let responsabilidades = ctx.core.list_responsabilidades().await?;
    render(format, responsabilidades.as_slice(), |items| {
        lines(items, "Nenhuma responsabilidade atribuída.", |r| {
            format!(
                "#{} {} responde por {}",
                r.id, r.usuario.username, r.departamento.nome
            )
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{init_test_tracing, logged_in_context, sample_despesa};

    fn no_credentials() -> Credentials {
        Credentials::default()
    }

    #[tokio::test]
    async fn test_despesas_page_footer() -> Result<()> {
        init_test_tracing();
        let (ctx, _mock) = logged_in_context().await?;
        for valor in [10.0, 20.0, 30.0] {
            ctx.core.add_despesa(&sample_despesa(valor)).await?;
        }

        let output = despesas(&ctx, &no_credentials(), OutputFormat::Text, 1, 2, None).await?;
        assert!(output.contains("R$ 30.00"));
        assert!(!output.contains("R$ 10.00"));
        assert!(output.ends_with("Página 1 de 2 (3 despesas)"));
        Ok(())
    }

    #[tokio::test]
    async fn test_total_and_delete() -> Result<()> {
        init_test_tracing();
        let (ctx, _mock) = logged_in_context().await?;
        let first = ctx.core.add_despesa(&sample_despesa(12.5)).await?;
        ctx.core.add_despesa(&sample_despesa(7.5)).await?;

        let output = total_despesas(&ctx, &no_credentials(), OutputFormat::Text, 1).await?;
        assert_eq!(output, "Departamento 1: R$ 20.00");

        delete_despesa(&ctx, &no_credentials(), first.id).await?;
        let output = total_despesas(&ctx, &no_credentials(), OutputFormat::Text, 1).await?;
        assert_eq!(output, "Departamento 1: R$ 7.50");
        Ok(())
    }

    #[tokio::test]
    async fn test_tipos_gasto_filtered_by_elemento() -> Result<()> {
        init_test_tracing();
        let (ctx, _mock) = logged_in_context().await?;
        let output = tipos_gasto(&ctx, &no_credentials(), OutputFormat::Text, Some(2)).await?;
        assert!(output.contains("Limpeza"));
        assert!(!output.contains("Papelaria"));
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_listings_use_placeholders() -> Result<()> {
        init_test_tracing();
        let (ctx, _mock) = logged_in_context().await?;
        assert_eq!(
            subordinacoes(&ctx, &no_credentials(), OutputFormat::Text).await?,
            "Nenhuma subordinação cadastrada."
        );
        assert_eq!(
            responsabilidades(&ctx, &no_credentials(), OutputFormat::Json).await?,
            "[]"
        );
        Ok(())
    }
}
