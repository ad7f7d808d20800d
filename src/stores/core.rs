//! Core store - caches for every core business collection.
//!
//! List actions replace a whole collection with the server's answer. Mutations
//! reconcile a single record by id and report to the [`NotificationStore`].

use super::cache::{Collection, LoadGuard};
use super::notifications::{NotificationStore, Severity};
use crate::api::core as api;
use crate::entities::{
    Departamento, DepartamentoInput, Despesa, DespesaUpdate, DespesasPage, Elemento, ElementoInput,
    NewDespesa, NewResponsabilidade, NewSubordinacao, NewVerba, PageRequest, Paginacao, Record,
    Responsabilidade, ResponsabilidadeUpdate, Subordinacao, SubordinacaoUpdate, TipoGasto,
    TipoGastoInput, TotalDespesas, Verba, VerbaUpdate,
};
use crate::errors::{Error, Result};
use crate::http::ApiClient;
use std::fmt::Debug;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

#[derive(Debug, Default)]
struct State {
    departamentos: Collection<Departamento>,
    elementos: Collection<Elemento>,
    tipos_gasto: Collection<TipoGasto>,
    /// Tipos de gasto of the elemento last asked for
    tipos_gasto_elemento: Collection<TipoGasto>,
    despesas: Collection<Despesa>,
    despesas_paginacao: Paginacao,
    /// Department filter of the cached despesas page, `None` for all departments
    despesas_departamento: Option<i64>,
    total_despesas: Option<TotalDespesas>,
    verbas: Collection<Verba>,
    subordinacoes: Collection<Subordinacao>,
    responsabilidades: Collection<Responsabilidade>,
    error: Option<String>,
}

type Slot<T> = fn(&mut State) -> &mut Collection<T>;

#[derive(Clone)]
pub struct CoreStore {
    api: ApiClient,
    notifications: NotificationStore,
    state: Arc<RwLock<State>>,
}

impl CoreStore {
    #[must_use]
    pub fn new(api: ApiClient, notifications: NotificationStore) -> Self {
        Self {
            api,
            notifications,
            state: Arc::new(RwLock::new(State::default())),
        }
    }

    /// Read-and-replace: loading is raised for the request and lowered on both paths,
    /// or by the guard when the caller drops the action mid-request.
    async fn read_and_replace<T, Fut>(&self, what: &'static str, slot: Slot<T>, fetch: Fut) -> Result<Vec<T>>
    where
        T: Record + Clone + Debug + 'static,
        Fut: Future<Output = Result<Vec<T>>>,
    {
        slot(&mut *self.state.write().await).begin_load();
        let guard = LoadGuard::new(&self.state, move |s: &mut State| slot(s).cancel_load());
        let result = fetch.await;

        let mut state = self.state.write().await;
        guard.disarm();
        match result {
            Ok(items) => {
                info!("{} cache refreshed with {} items.", what, items.len());
                slot(&mut *state).replace(items.clone());
                Ok(items)
            }
            Err(e) => {
                error!("Failed to refresh {}: {}", what, e);
                slot(&mut *state).fail(e.to_string());
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Mutate-one: on success `apply` reconciles the cache and a success snackbar is
    /// shown; on failure the error is recorded, shown, and returned.
    async fn mutate<R, Fut, F>(&self, success: &str, request: Fut, apply: F) -> Result<R>
    where
        Fut: Future<Output = Result<R>>,
        F: FnOnce(&mut State, &R),
    {
        match request.await {
            Ok(value) => {
                apply(&mut *self.state.write().await, &value);
                self.notifications
                    .show_snackbar(success, Severity::Success)
                    .await;
                Ok(value)
            }
            Err(e) => {
                self.record_failure(&e).await;
                Err(e)
            }
        }
    }

    async fn record_failure(&self, e: &Error) {
        error!("Core action failed: {}", e);
        self.state.write().await.error = Some(e.to_string());
        self.notifications
            .show_snackbar(e.to_string(), Severity::Error)
            .await;
    }

    async fn snapshot<T: Clone>(&self, slot: fn(&State) -> &Collection<T>) -> Collection<T> {
        slot(&*self.state.read().await).clone()
    }

    // Departamentos

    pub async fn list_departamentos(&self) -> Result<Vec<Departamento>> {
        self.read_and_replace(
            "Departamentos",
            |s| &mut s.departamentos,
            api::list_departamentos(&self.api),
        )
        .await
    }

    pub async fn add_departamento(&self, input: &DepartamentoInput) -> Result<Departamento> {
        self.mutate(
            "Departamento criado com sucesso.",
            api::add_departamento(&self.api, input),
            |s, d| s.departamentos.append(d.clone()),
        )
        .await
    }

    pub async fn update_departamento(&self, id: i64, input: &DepartamentoInput) -> Result<Departamento> {
        self.mutate(
            "Departamento atualizado com sucesso.",
            api::update_departamento(&self.api, id, input),
            |s, d| reconcile_update(&mut s.departamentos, d),
        )
        .await
    }

    pub async fn delete_departamento(&self, id: i64) -> Result<()> {
        self.mutate(
            "Departamento removido com sucesso.",
            api::delete_departamento(&self.api, id),
            |s, _| reconcile_delete(&mut s.departamentos, id),
        )
        .await
    }

    // Elementos

    pub async fn list_elementos(&self) -> Result<Vec<Elemento>> {
        self.read_and_replace("Elementos", |s| &mut s.elementos, api::list_elementos(&self.api))
            .await
    }

    pub async fn add_elemento(&self, input: &ElementoInput) -> Result<Elemento> {
        self.mutate(
            "Elemento criado com sucesso.",
            api::add_elemento(&self.api, input),
            |s, e| s.elementos.append(e.clone()),
        )
        .await
    }

    pub async fn update_elemento(&self, id: i64, input: &ElementoInput) -> Result<Elemento> {
        self.mutate(
            "Elemento atualizado com sucesso.",
            api::update_elemento(&self.api, id, input),
            |s, e| reconcile_update(&mut s.elementos, e),
        )
        .await
    }

    pub async fn delete_elemento(&self, id: i64) -> Result<()> {
        self.mutate(
            "Elemento removido com sucesso.",
            api::delete_elemento(&self.api, id),
            |s, _| reconcile_delete(&mut s.elementos, id),
        )
        .await
    }

    // Tipos de gasto

    pub async fn list_tipos_gasto(&self) -> Result<Vec<TipoGasto>> {
        self.read_and_replace(
            "Tipos de gasto",
            |s| &mut s.tipos_gasto,
            api::list_tipos_gasto(&self.api),
        )
        .await
    }

    pub async fn list_tipos_gasto_por_elemento(&self, elemento_id: i64) -> Result<Vec<TipoGasto>> {
        self.read_and_replace(
            "Tipos de gasto do elemento",
            |s| &mut s.tipos_gasto_elemento,
            api::list_tipos_gasto_por_elemento(&self.api, elemento_id),
        )
        .await
    }

    pub async fn add_tipo_gasto(&self, input: &TipoGastoInput) -> Result<TipoGasto> {
        self.mutate(
            "Tipo de gasto criado com sucesso.",
            api::add_tipo_gasto(&self.api, input),
            |s, t| s.tipos_gasto.append(t.clone()),
        )
        .await
    }

    pub async fn update_tipo_gasto(&self, id: i64, input: &TipoGastoInput) -> Result<TipoGasto> {
        self.mutate(
            "Tipo de gasto atualizado com sucesso.",
            api::update_tipo_gasto(&self.api, id, input),
            |s, t| reconcile_update(&mut s.tipos_gasto, t),
        )
        .await
    }

    pub async fn delete_tipo_gasto(&self, id: i64) -> Result<()> {
        self.mutate(
            "Tipo de gasto removido com sucesso.",
            api::delete_tipo_gasto(&self.api, id),
            |s, _| reconcile_delete(&mut s.tipos_gasto, id),
        )
        .await
    }

    // Despesas

    async fn load_despesas_page<Fut>(&self, departamento: Option<i64>, fetch: Fut) -> Result<DespesasPage>
    where
        Fut: Future<Output = Result<DespesasPage>>,
    {
        self.state.write().await.despesas.begin_load();
        let guard = LoadGuard::new(&self.state, |s: &mut State| s.despesas.cancel_load());
        let result = fetch.await;

        let mut state = self.state.write().await;
        guard.disarm();
        match result {
            Ok(page) => {
                info!(
                    "Despesas page {} of {} cached ({} items).",
                    page.paginacao.pagina_atual,
                    page.paginacao.total_paginas,
                    page.despesas.len()
                );
                state.despesas.replace(page.despesas.clone());
                state.despesas_paginacao = page.paginacao.clone();
                state.despesas_departamento = departamento;
                Ok(page)
            }
            Err(e) => {
                error!("Failed to load despesas: {}", e);
                state.despesas.fail(e.to_string());
                state.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn list_despesas(&self, page: PageRequest) -> Result<DespesasPage> {
        self.load_despesas_page(None, api::list_despesas(&self.api, page))
            .await
    }

    pub async fn list_despesas_departamento(&self, departamento_id: i64, page: PageRequest) -> Result<DespesasPage> {
        self.load_despesas_page(
            Some(departamento_id),
            api::list_despesas_departamento(&self.api, departamento_id, page),
        )
        .await
    }

    pub async fn total_despesas_departamento(&self, departamento_id: i64) -> Result<TotalDespesas> {
        match api::total_despesas_departamento(&self.api, departamento_id).await {
            Ok(total) => {
                self.state.write().await.total_despesas = Some(total.clone());
                Ok(total)
            }
            Err(e) => {
                self.state.write().await.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn add_despesa(&self, despesa: &NewDespesa) -> Result<Despesa> {
        self.mutate(
            "Despesa registrada com sucesso.",
            api::add_despesa(&self.api, despesa),
            |s, d| s.despesas.append(d.clone()),
        )
        .await
    }

    pub async fn update_despesa(&self, id: i64, update: &DespesaUpdate) -> Result<Despesa> {
        self.mutate(
            "Despesa atualizada com sucesso.",
            api::update_despesa(&self.api, id, update),
            |s, d| reconcile_update(&mut s.despesas, d),
        )
        .await
    }

    pub async fn delete_despesa(&self, id: i64) -> Result<()> {
        self.mutate(
            "Despesa removida com sucesso.",
            api::delete_despesa(&self.api, id),
            |s, _| reconcile_delete(&mut s.despesas, id),
        )
        .await
    }

    // Verbas

    pub async fn list_verbas(&self) -> Result<Vec<Verba>> {
        self.read_and_replace("Verbas", |s| &mut s.verbas, api::list_verbas(&self.api))
            .await
    }

    pub async fn add_verba(&self, verba: &NewVerba) -> Result<Verba> {
        self.mutate(
            "Verba criada com sucesso.",
            api::add_verba(&self.api, verba),
            |s, v| s.verbas.append(v.clone()),
        )
        .await
    }

    pub async fn update_verba(&self, id: i64, update: &VerbaUpdate) -> Result<Verba> {
        self.mutate(
            "Verba atualizada com sucesso.",
            api::update_verba(&self.api, id, update),
            |s, v| reconcile_update(&mut s.verbas, v),
        )
        .await
    }

    pub async fn delete_verba(&self, id: i64) -> Result<()> {
        self.mutate(
            "Verba removida com sucesso.",
            api::delete_verba(&self.api, id),
            |s, _| reconcile_delete(&mut s.verbas, id),
        )
        .await
    }

    // Subordinações

    pub async fn list_subordinacoes(&self) -> Result<Vec<Subordinacao>> {
        self.read_and_replace(
            "Subordinações",
            |s| &mut s.subordinacoes,
            api::list_subordinacoes(&self.api),
        )
        .await
    }

    pub async fn add_subordinacao(&self, subordinacao: &NewSubordinacao) -> Result<Subordinacao> {
        self.mutate(
            "Subordinação criada com sucesso.",
            api::add_subordinacao(&self.api, subordinacao),
            |s, sub| s.subordinacoes.append(sub.clone()),
        )
        .await
    }

    pub async fn update_subordinacao(&self, id: i64, update: &SubordinacaoUpdate) -> Result<Subordinacao> {
        self.mutate(
            "Subordinação atualizada com sucesso.",
            api::update_subordinacao(&self.api, id, update),
            |s, sub| reconcile_update(&mut s.subordinacoes, sub),
        )
        .await
    }

    pub async fn delete_subordinacao(&self, id: i64) -> Result<()> {
        self.mutate(
            "Subordinação removida com sucesso.",
            api::delete_subordinacao(&self.api, id),
            |s, _| reconcile_delete(&mut s.subordinacoes, id),
        )
        .await
    }

    // Responsabilidades

    pub async fn list_responsabilidades(&self) -> Result<Vec<Responsabilidade>> {
        self.read_and_replace(
            "Responsabilidades",
            |s| &mut s.responsabilidades,
            api::list_responsabilidades(&self.api),
        )
        .await
    }

    pub async fn add_responsabilidade(&self, responsabilidade: &NewResponsabilidade) -> Result<Responsabilidade> {
        self.mutate(
            "Responsabilidade atribuída com sucesso.",
            api::add_responsabilidade(&self.api, responsabilidade),
            |s, r| s.responsabilidades.append(r.clone()),
        )
        .await
    }

    pub async fn update_responsabilidade(
        &self,
        id: i64,
        update: &ResponsabilidadeUpdate,
    ) -> Result<Responsabilidade> {
        self.mutate(
            "Responsabilidade atualizada com sucesso.",
            api::update_responsabilidade(&self.api, id, update),
            |s, r| reconcile_update(&mut s.responsabilidades, r),
        )
        .await
    }

    pub async fn delete_responsabilidade(&self, id: i64) -> Result<()> {
        self.mutate(
            "Responsabilidade removida com sucesso.",
            api::delete_responsabilidade(&self.api, id),
            |s, _| reconcile_delete(&mut s.responsabilidades, id),
        )
        .await
    }

    // Cached state

    pub async fn departamentos(&self) -> Collection<Departamento> {
        self.snapshot(|s| &s.departamentos).await
    }

    pub async fn elementos(&self) -> Collection<Elemento> {
        self.snapshot(|s| &s.elementos).await
    }

    pub async fn tipos_gasto(&self) -> Collection<TipoGasto> {
        self.snapshot(|s| &s.tipos_gasto).await
    }

    pub async fn tipos_gasto_elemento(&self) -> Collection<TipoGasto> {
        self.snapshot(|s| &s.tipos_gasto_elemento).await
    }

    pub async fn despesas(&self) -> Collection<Despesa> {
        self.snapshot(|s| &s.despesas).await
    }

    pub async fn verbas(&self) -> Collection<Verba> {
        self.snapshot(|s| &s.verbas).await
    }

    pub async fn subordinacoes(&self) -> Collection<Subordinacao> {
        self.snapshot(|s| &s.subordinacoes).await
    }

    pub async fn responsabilidades(&self) -> Collection<Responsabilidade> {
        self.snapshot(|s| &s.responsabilidades).await
    }

    pub async fn despesas_paginacao(&self) -> Paginacao {
        self.state.read().await.despesas_paginacao.clone()
    }

    pub async fn total_paginas(&self) -> u32 {
        self.state.read().await.despesas_paginacao.total_paginas
    }

    pub async fn despesas_departamento(&self) -> Option<i64> {
        self.state.read().await.despesas_departamento
    }

    pub async fn total_despesas(&self) -> Option<TotalDespesas> {
        self.state.read().await.total_despesas.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    pub async fn clear_error(&self) {
        self.state.write().await.error = None;
    }
}

fn reconcile_update<T: Record + Clone + Debug>(cache: &mut Collection<T>, record: &T) {
    if !cache.upsert(record.clone()) {
        debug!("Updated record {} is not cached; cache left as is.", record.id());
    }
}

fn reconcile_delete<T: Record + Clone + Debug>(cache: &mut Collection<T>, id: i64) {
    if cache.remove(id).is_none() {
        debug!("Deleted record {} was not cached.", id);
    }
}
