//! Core business API: departamentos, elementos, tipos de gasto, despesas, verbas,
//! subordinações and responsabilidades.
//!
//! Reads pass server errors through untouched. Mutations re-wrap HTTP failures
//! into [`Error::Server`] with the server's `error` message, or
//! [`GENERIC_SERVER_ERROR`] when it sent none.

use super::validation;
use crate::entities::{
    Departamento, DepartamentoInput, Despesa, DespesaUpdate, DespesasPage, Elemento, ElementoInput,
    NewDespesa, NewResponsabilidade, NewSubordinacao, NewVerba, PageRequest, Responsabilidade,
    ResponsabilidadeUpdate, Subordinacao, SubordinacaoUpdate, TipoGasto, TipoGastoInput,
    TotalDespesas, Verba, VerbaUpdate,
};
use crate::errors::{Error, GENERIC_SERVER_ERROR, Result};
use crate::http::ApiClient;
use serde::Deserialize;

const BASE: &str = "/api/core";

fn path(resource: &str, action: &str) -> String {
    format!("{BASE}/{resource}/{action}")
}

fn path_with_id(resource: &str, action: &str, id: i64) -> String {
    format!("{BASE}/{resource}/{action}/{id}")
}

fn rewrap(err: Error) -> Error {
    err.into_server_error(GENERIC_SERVER_ERROR)
}

// Per-endpoint envelopes

#[derive(Deserialize)]
struct DepartamentosEnvelope {
    departamentos: Vec<Departamento>,
}

#[derive(Deserialize)]
struct ElementosEnvelope {
    elementos: Vec<Elemento>,
}

#[derive(Deserialize)]
struct TiposGastoEnvelope {
    #[serde(rename = "tipoGastos", alias = "tiposGastos", alias = "tipo_gastos")]
    tipos_gasto: Vec<TipoGasto>,
}

#[derive(Deserialize)]
struct VerbasEnvelope {
    verbas: Vec<Verba>,
}

#[derive(Deserialize)]
struct SubordinacoesEnvelope {
    subordinacoes: Vec<Subordinacao>,
}

// Departamentos

pub async fn list_departamentos(client: &ApiClient) -> Result<Vec<Departamento>> {
    let envelope: DepartamentosEnvelope = client.get(&path("departamentos", "list")).await?;
    Ok(envelope.departamentos)
}

pub async fn add_departamento(client: &ApiClient, input: &DepartamentoInput) -> Result<Departamento> {
    client
        .post(&path("departamentos", "add"), input)
        .await
        .map_err(rewrap)
}

pub async fn update_departamento(
    client: &ApiClient,
    id: i64,
    input: &DepartamentoInput,
) -> Result<Departamento> {
    validation::require_id("departamento_id", id)?;
    client
        .put(&path_with_id("departamentos", "update", id), input)
        .await
        .map_err(rewrap)
}

pub async fn delete_departamento(client: &ApiClient, id: i64) -> Result<()> {
    validation::require_id("departamento_id", id)?;
    client
        .delete(&path_with_id("departamentos", "delete", id))
        .await
        .map_err(rewrap)
}

// Elementos

pub async fn list_elementos(client: &ApiClient) -> Result<Vec<Elemento>> {
    let envelope: ElementosEnvelope = client.get(&path("elementos", "list")).await?;
    Ok(envelope.elementos)
}

pub async fn add_elemento(client: &ApiClient, input: &ElementoInput) -> Result<Elemento> {
    validation::elemento(input)?;
    client
        .post(&path("elementos", "add"), input)
        .await
        .map_err(rewrap)
}

pub async fn update_elemento(client: &ApiClient, id: i64, input: &ElementoInput) -> Result<Elemento> {
    validation::require_id("elemento_id", id)?;
    validation::elemento(input)?;
    client
        .put(&path_with_id("elementos", "update", id), input)
        .await
        .map_err(rewrap)
}

pub async fn delete_elemento(client: &ApiClient, id: i64) -> Result<()> {
    validation::require_id("elemento_id", id)?;
    client
        .delete(&path_with_id("elementos", "delete", id))
        .await
        .map_err(rewrap)
}

// Tipos de gasto

pub async fn list_tipos_gasto(client: &ApiClient) -> Result<Vec<TipoGasto>> {
    let envelope: TiposGastoEnvelope = client.get(&path("tiposgastos", "list")).await?;
    Ok(envelope.tipos_gasto)
}

/// Tipos de gasto linked to one elemento.
pub async fn list_tipos_gasto_por_elemento(client: &ApiClient, elemento_id: i64) -> Result<Vec<TipoGasto>> {
    validation::require_id("elemento_id", elemento_id)?;
    let envelope: TiposGastoEnvelope = client
        .get(&path_with_id("tiposgastos", "elemento", elemento_id))
        .await?;
    Ok(envelope.tipos_gasto)
}

pub async fn add_tipo_gasto(client: &ApiClient, input: &TipoGastoInput) -> Result<TipoGasto> {
    validation::tipo_gasto(input)?;
    client
        .post(&path("tiposgastos", "add"), input)
        .await
        .map_err(rewrap)
}

pub async fn update_tipo_gasto(client: &ApiClient, id: i64, input: &TipoGastoInput) -> Result<TipoGasto> {
    validation::require_id("tipo_gasto_id", id)?;
    validation::tipo_gasto(input)?;
    client
        .put(&path_with_id("tiposgastos", "update", id), input)
        .await
        .map_err(rewrap)
}

pub async fn delete_tipo_gasto(client: &ApiClient, id: i64) -> Result<()> {
    validation::require_id("tipo_gasto_id", id)?;
    client
        .delete(&path_with_id("tiposgastos", "delete", id))
        .await
        .map_err(rewrap)
}

// Despesas

/// One page of all despesas, newest first.
pub async fn list_despesas(client: &ApiClient, page: PageRequest) -> Result<DespesasPage> {
    client
        .get_with_query(&path("despesas", "list"), page.to_query())
        .await
}

pub async fn list_despesas_departamento(
    client: &ApiClient,
    departamento_id: i64,
    page: PageRequest,
) -> Result<DespesasPage> {
    validation::require_id("departamento_id", departamento_id)?;
    client
        .get_with_query(
            &path_with_id("despesas", "departamento", departamento_id),
            page.to_query(),
        )
        .await
}

pub async fn total_despesas_departamento(client: &ApiClient, departamento_id: i64) -> Result<TotalDespesas> {
    validation::require_id("departamento_id", departamento_id)?;
    client
        .get(&format!(
            "{}/total",
            path_with_id("despesas", "departamento", departamento_id)
        ))
        .await
}

pub async fn add_despesa(client: &ApiClient, despesa: &NewDespesa) -> Result<Despesa> {
    validation::new_despesa(despesa)?;
    client
        .post(&path("despesas", "add"), despesa)
        .await
        .map_err(rewrap)
}

pub async fn update_despesa(client: &ApiClient, id: i64, update: &DespesaUpdate) -> Result<Despesa> {
    validation::require_id("despesa_id", id)?;
    client
        .put(&path_with_id("despesas", "update", id), update)
        .await
        .map_err(rewrap)
}

pub async fn delete_despesa(client: &ApiClient, id: i64) -> Result<()> {
    validation::require_id("despesa_id", id)?;
    client
        .delete(&path_with_id("despesas", "delete", id))
        .await
        .map_err(rewrap)
}

// Verbas

pub async fn list_verbas(client: &ApiClient) -> Result<Vec<Verba>> {
    let envelope: VerbasEnvelope = client.get(&path("verbas", "list")).await?;
    Ok(envelope.verbas)
}

pub async fn add_verba(client: &ApiClient, verba: &NewVerba) -> Result<Verba> {
    validation::new_verba(verba)?;
    client
        .post(&path("verbas", "add"), verba)
        .await
        .map_err(rewrap)
}

pub async fn update_verba(client: &ApiClient, id: i64, update: &VerbaUpdate) -> Result<Verba> {
    validation::require_id("verba_id", id)?;
    client
        .put(&path_with_id("verbas", "update", id), update)
        .await
        .map_err(rewrap)
}

pub async fn delete_verba(client: &ApiClient, id: i64) -> Result<()> {
    validation::require_id("verba_id", id)?;
    client
        .delete(&path_with_id("verbas", "delete", id))
        .await
        .map_err(rewrap)
}

// Subordinações

pub async fn list_subordinacoes(client: &ApiClient) -> Result<Vec<Subordinacao>> {
    let envelope: SubordinacoesEnvelope = client.get(&path("subordinacoes", "list")).await?;
    Ok(envelope.subordinacoes)
}

pub async fn add_subordinacao(client: &ApiClient, subordinacao: &NewSubordinacao) -> Result<Subordinacao> {
    validation::new_subordinacao(subordinacao)?;
    client
        .post(&path("subordinacoes", "add"), subordinacao)
        .await
        .map_err(rewrap)
}

pub async fn update_subordinacao(
    client: &ApiClient,
    id: i64,
    update: &SubordinacaoUpdate,
) -> Result<Subordinacao> {
    validation::require_id("subordinacao_id", id)?;
    client
        .put(&path_with_id("subordinacoes", "update", id), update)
        .await
        .map_err(rewrap)
}

pub async fn delete_subordinacao(client: &ApiClient, id: i64) -> Result<()> {
    validation::require_id("subordinacao_id", id)?;
    client
        .delete(&path_with_id("subordinacoes", "delete", id))
        .await
        .map_err(rewrap)
}

// Responsabilidades

/// The only core listing that answers with a bare array.
pub async fn list_responsabilidades(client: &ApiClient) -> Result<Vec<Responsabilidade>> {
    client.get(&path("responsabilidades", "list")).await
}

pub async fn add_responsabilidade(
    client: &ApiClient,
    responsabilidade: &NewResponsabilidade,
) -> Result<Responsabilidade> {
    validation::new_responsabilidade(responsabilidade)?;
    client
        .post(&path("responsabilidades", "add"), responsabilidade)
        .await
        .map_err(rewrap)
}

pub async fn update_responsabilidade(
    client: &ApiClient,
    id: i64,
    update: &ResponsabilidadeUpdate,
) -> Result<Responsabilidade> {
    validation::require_id("responsabilidade_id", id)?;
    client
        .put(&path_with_id("responsabilidades", "update", id), update)
        .await
        .map_err(rewrap)
}

pub async fn delete_responsabilidade(client: &ApiClient, id: i64) -> Result<()> {
    validation::require_id("responsabilidade_id", id)?;
    client
        .delete(&path_with_id("responsabilidades", "delete", id))
        .await
        .map_err(rewrap)
}
