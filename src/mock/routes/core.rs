use super::{Reject, Reply, body, parse_id, route_not_found, to_json};
use crate::entities::{
    Departamento, Despesa, DespesasPage, Elemento, Paginacao, Responsabilidade, Subordinacao,
    TipoGasto, Verba,
};
use crate::http::{ApiRequest, Method};
use crate::mock::db::Database;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

const DEFAULT_PER_PAGE: usize = 10;

const DEPARTAMENTO_NOT_FOUND: &str = "Departamento não encontrado.";
const DUPLICATE_VERBA: &str = "Já existe uma verba estipulada para este departamento neste ano.";
const SELF_SUBORDINATE: &str = "Um departamento não pode ser subordinado a si mesmo.";
const NON_POSITIVE_VALOR: &str = "O valor da despesa deve ser maior que zero.";

#[derive(Deserialize)]
struct DepartamentoPayload {
    nome: Option<String>,
    description: Option<String>,
    #[serde(rename = "tipoEntidade")]
    tipo_entidade: Option<String>,
    #[serde(rename = "responsavelId")]
    responsavel_id: Option<i64>,
    done: Option<bool>,
}

#[derive(Deserialize)]
struct ElementoPayload {
    elemento: Option<String>,
    descricao: Option<String>,
}

#[derive(Deserialize)]
struct TipoGastoPayload {
    #[serde(rename = "tipoGasto")]
    tipo_gasto: Option<String>,
    descricao: Option<String>,
    elemento_id: Option<i64>,
}

#[derive(Deserialize)]
struct DespesaPayload {
    valor: Option<f64>,
    departamento_id: Option<i64>,
    elemento_id: Option<i64>,
    tipo_gasto_id: Option<i64>,
    user_id: Option<i64>,
    justificativa: Option<String>,
}

#[derive(Deserialize)]
struct VerbaPayload {
    valor: Option<f64>,
    departamento_id: Option<i64>,
    ano: Option<i32>,
    descricao: Option<String>,
}

#[derive(Deserialize)]
struct SubordinacaoPayload {
    #[serde(rename = "IdDepartamentoA")]
    superior_id: Option<i64>,
    #[serde(rename = "IdDepartamentoB")]
    subordinado_id: Option<i64>,
    #[serde(rename = "Observacao")]
    observacao: Option<String>,
}

#[derive(Deserialize)]
struct ResponsabilidadePayload {
    usuario_id: Option<i64>,
    departamento_id: Option<i64>,
    observacao: Option<String>,
}

#[allow(clippy::too_many_lines)]
pub(super) fn handle(db: &mut Database, request: &ApiRequest, user_id: i64, rest: &[&str]) -> Reply {
    match (request.method, rest) {
        (Method::Get, ["departamentos", "list"]) => {
            let departamentos: Vec<Departamento> = db
                .departamentos
                .all()
                .iter()
                .map(|d| db.departamento_view(d))
                .collect();
            Ok(json!({ "departamentos": to_json(&departamentos)? }))
        }
        (Method::Post, ["departamentos", "add"]) => add_departamento(db, request),
        (Method::Put, ["departamentos", "update", id]) => update_departamento(db, request, parse_id(id)?),
        (Method::Delete, ["departamentos", "delete", id]) => {
            let id = parse_id(id)?;
            db.departamentos
                .remove(id)
                .ok_or_else(|| Reject::not_found(DEPARTAMENTO_NOT_FOUND))?;
            Ok(json!({}))
        }

        (Method::Get, ["elementos", "list"]) => Ok(json!({ "elementos": to_json(&db.elementos.all())? })),
        (Method::Post, ["elementos", "add"]) => add_elemento(db, request),
        (Method::Put, ["elementos", "update", id]) => update_elemento(db, request, parse_id(id)?),
        (Method::Delete, ["elementos", "delete", id]) => {
            db.elementos
                .remove(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Elemento não encontrado."))?;
            Ok(json!({}))
        }

        (Method::Get, ["tiposgastos", "list"]) => Ok(json!({ "tipoGastos": to_json(&db.tipos_gasto.all())? })),
        (Method::Get, ["tiposgastos", "elemento", id]) => {
            let elemento_id = parse_id(id)?;
            db.elementos
                .find(elemento_id)
                .ok_or_else(|| Reject::not_found("Elemento não encontrado."))?;
            let tipos: Vec<&TipoGasto> = db
                .tipos_gasto
                .all()
                .iter()
                .filter(|t| t.elemento_id == Some(elemento_id))
                .collect();
            Ok(json!({ "tipo_gastos": to_json(&tipos)? }))
        }
        (Method::Post, ["tiposgastos", "add"]) => add_tipo_gasto(db, request),
        (Method::Put, ["tiposgastos", "update", id]) => update_tipo_gasto(db, request, parse_id(id)?),
        (Method::Delete, ["tiposgastos", "delete", id]) => {
            db.tipos_gasto
                .remove(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Tipo de gasto não encontrado."))?;
            Ok(json!({}))
        }

        (Method::Get, ["despesas", "list"]) => {
            let all = db.despesas.all().to_vec();
            to_json(&paginate(all, request))
        }
        (Method::Get, ["despesas", "departamento", id]) => {
            let departamento_id = existing_departamento(db, parse_id(id)?)?;
            let rows = db
                .despesas
                .all()
                .iter()
                .filter(|d| d.departamento_id == departamento_id)
                .cloned()
                .collect();
            to_json(&paginate(rows, request))
        }
        (Method::Get, ["despesas", "departamento", id, "total"]) => {
            let departamento_id = existing_departamento(db, parse_id(id)?)?;
            let total: f64 = db
                .despesas
                .all()
                .iter()
                .filter(|d| d.departamento_id == departamento_id)
                .map(|d| d.valor)
                .sum();
            Ok(json!({ "departamento_id": departamento_id, "total": total }))
        }
        (Method::Post, ["despesas", "add"]) => add_despesa(db, request, user_id),
        (Method::Put, ["despesas", "update", id]) => update_despesa(db, request, parse_id(id)?),
        (Method::Delete, ["despesas", "delete", id]) => {
            db.despesas
                .remove(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Despesa não encontrada."))?;
            Ok(json!({}))
        }

        (Method::Get, ["verbas", "list"]) => Ok(json!({ "verbas": to_json(&db.verbas.all())? })),
        (Method::Post, ["verbas", "add"]) => add_verba(db, request),
        (Method::Put, ["verbas", "update", id]) => update_verba(db, request, parse_id(id)?),
        (Method::Delete, ["verbas", "delete", id]) => {
            db.verbas
                .remove(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Verba não encontrada."))?;
            Ok(json!({}))
        }

        (Method::Get, ["subordinacoes", "list"]) => {
            Ok(json!({ "subordinacoes": to_json(&db.subordinacoes.all())? }))
        }
        (Method::Post, ["subordinacoes", "add"]) => add_subordinacao(db, request),
        (Method::Put, ["subordinacoes", "update", id]) => {
            let payload: SubordinacaoPayload = body(request)?;
            let subordinacao = db
                .subordinacoes
                .find_mut(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Subordinação não encontrada."))?;
            if payload.observacao.is_some() {
                subordinacao.observacao = payload.observacao;
            }
            to_json(&*subordinacao)
        }
        (Method::Delete, ["subordinacoes", "delete", id]) => {
            db.subordinacoes
                .remove(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Subordinação não encontrada."))?;
            Ok(json!({}))
        }

        (Method::Get, ["responsabilidades", "list"]) => to_json(&db.responsabilidades.all()),
        (Method::Post, ["responsabilidades", "add"]) => add_responsabilidade(db, request),
        (Method::Put, ["responsabilidades", "update", id]) => {
            let payload: ResponsabilidadePayload = body(request)?;
            let responsabilidade = db
                .responsabilidades
                .find_mut(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Responsabilidade não encontrada."))?;
            if payload.observacao.is_some() {
                responsabilidade.observacao = payload.observacao;
            }
            to_json(&*responsabilidade)
        }
        (Method::Delete, ["responsabilidades", "delete", id]) => {
            db.responsabilidades
                .remove(parse_id(id)?)
                .ok_or_else(|| Reject::not_found("Responsabilidade não encontrada."))?;
            Ok(json!({}))
        }

        _ => Err(route_not_found(request)),
    }
}

fn existing_departamento(db: &Database, id: i64) -> Result<i64, Reject> {
    db.departamentos
        .find(id)
        .map(|d| d.id)
        .ok_or_else(|| Reject::not_found(DEPARTAMENTO_NOT_FOUND))
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, Reject> {
    value.ok_or_else(|| Reject::bad_request(format!("O campo {field} é obrigatório.")))
}

/// Newest first, `page`/`per_page` from the query string. Out-of-range pages
/// clamp to the nearest valid one.
fn paginate(mut rows: Vec<Despesa>, request: &ApiRequest) -> DespesasPage {
    rows.sort_by(|a, b| b.data.cmp(&a.data).then(b.id.cmp(&a.id)));

    let per_page = request
        .query_param("per_page")
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or(DEFAULT_PER_PAGE);
    let total = rows.len();
    let total_paginas = total.div_ceil(per_page).max(1);
    let page = request
        .query_param("page")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, total_paginas);

    let despesas = rows
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    DespesasPage {
        despesas,
        paginacao: Paginacao {
            pagina_atual: u32::try_from(page).unwrap_or(u32::MAX),
            total_paginas: u32::try_from(total_paginas).unwrap_or(u32::MAX),
            total_despesas: u64::try_from(total).unwrap_or(u64::MAX),
            tem_proxima: page < total_paginas,
            tem_anterior: page > 1,
        },
    }
}

fn add_departamento(db: &mut Database, request: &ApiRequest) -> Reply {
    let payload: DepartamentoPayload = body(request)?;
    let nome = required(payload.nome.filter(|n| !n.trim().is_empty()), "nome")?;
    let created = db.departamentos.insert(|id| Departamento {
        id,
        nome,
        description: payload.description.unwrap_or_default(),
        tipo_entidade: payload.tipo_entidade.unwrap_or_default(),
        responsavel_id: payload.responsavel_id,
        done: payload.done.unwrap_or(false),
        subordinacoes: Vec::new(),
    });
    to_json(&created)
}

fn update_departamento(db: &mut Database, request: &ApiRequest, id: i64) -> Reply {
    let payload: DepartamentoPayload = body(request)?;
    let departamento = db
        .departamentos
        .find_mut(id)
        .ok_or_else(|| Reject::not_found(DEPARTAMENTO_NOT_FOUND))?;
    if let Some(nome) = payload.nome {
        departamento.nome = nome;
    }
    if let Some(description) = payload.description {
        departamento.description = description;
    }
    if let Some(tipo_entidade) = payload.tipo_entidade {
        departamento.tipo_entidade = tipo_entidade;
    }
    if payload.responsavel_id.is_some() {
        departamento.responsavel_id = payload.responsavel_id;
    }
    if let Some(done) = payload.done {
        departamento.done = done;
    }
    let updated = departamento.clone();
    to_json(&db.departamento_view(&updated))
}

fn add_elemento(db: &mut Database, request: &ApiRequest) -> Reply {
    let payload: ElementoPayload = body(request)?;
    let elemento = required(payload.elemento, "elemento")?;
    let created = db.elementos.insert(|id| Elemento {
        id,
        elemento,
        descricao: payload.descricao.unwrap_or_default(),
    });
    to_json(&created)
}

fn update_elemento(db: &mut Database, request: &ApiRequest, id: i64) -> Reply {
    let payload: ElementoPayload = body(request)?;
    let elemento = db
        .elementos
        .find_mut(id)
        .ok_or_else(|| Reject::not_found("Elemento não encontrado."))?;
    if let Some(value) = payload.elemento {
        elemento.elemento = value;
    }
    if let Some(descricao) = payload.descricao {
        elemento.descricao = descricao;
    }
    to_json(&*elemento)
}

fn add_tipo_gasto(db: &mut Database, request: &ApiRequest) -> Reply {
    let payload: TipoGastoPayload = body(request)?;
    let tipo_gasto = required(payload.tipo_gasto, "tipoGasto")?;
    if let Some(elemento_id) = payload.elemento_id {
        db.elementos
            .find(elemento_id)
            .ok_or_else(|| Reject::not_found("Elemento não encontrado."))?;
    }
    let created = db.tipos_gasto.insert(|id| TipoGasto {
        id,
        tipo_gasto,
        descricao: payload.descricao.unwrap_or_default(),
        elemento_id: payload.elemento_id,
    });
    to_json(&created)
}

fn update_tipo_gasto(db: &mut Database, request: &ApiRequest, id: i64) -> Reply {
    let payload: TipoGastoPayload = body(request)?;
    let tipo = db
        .tipos_gasto
        .find_mut(id)
        .ok_or_else(|| Reject::not_found("Tipo de gasto não encontrado."))?;
    if let Some(value) = payload.tipo_gasto {
        tipo.tipo_gasto = value;
    }
    if let Some(descricao) = payload.descricao {
        tipo.descricao = descricao;
    }
    if payload.elemento_id.is_some() {
        tipo.elemento_id = payload.elemento_id;
    }
    to_json(&*tipo)
}

fn add_despesa(db: &mut Database, request: &ApiRequest, user_id: i64) -> Reply {
    let payload: DespesaPayload = body(request)?;
    let valor = required(payload.valor, "valor")?;
    if valor.is_nan() || valor <= 0.0 {
        return Err(Reject::bad_request(NON_POSITIVE_VALOR));
    }
    let departamento_id = existing_departamento(db, required(payload.departamento_id, "departamento_id")?)?;

    let created = db.despesas.insert(|id| Despesa {
        id,
        valor,
        departamento_id,
        elemento_id: payload.elemento_id,
        tipo_gasto_id: payload.tipo_gasto_id,
        user_id: Some(payload.user_id.unwrap_or(user_id)),
        justificativa: payload.justificativa.unwrap_or_default(),
        data: Some(Utc::now()),
    });
    to_json(&created)
}

fn update_despesa(db: &mut Database, request: &ApiRequest, id: i64) -> Reply {
    let payload: DespesaPayload = body(request)?;
    if payload.valor.is_some_and(|v| v.is_nan() || v <= 0.0) {
        return Err(Reject::bad_request(NON_POSITIVE_VALOR));
    }
    if let Some(departamento_id) = payload.departamento_id {
        existing_departamento(db, departamento_id)?;
    }
    let despesa = db
        .despesas
        .find_mut(id)
        .ok_or_else(|| Reject::not_found("Despesa não encontrada."))?;
    if let Some(valor) = payload.valor {
        despesa.valor = valor;
    }
    if let Some(departamento_id) = payload.departamento_id {
        despesa.departamento_id = departamento_id;
    }
    if payload.elemento_id.is_some() {
        despesa.elemento_id = payload.elemento_id;
    }
    if payload.tipo_gasto_id.is_some() {
        despesa.tipo_gasto_id = payload.tipo_gasto_id;
    }
    if let Some(justificativa) = payload.justificativa {
        despesa.justificativa = justificativa;
    }
    to_json(&*despesa)
}

fn add_verba(db: &mut Database, request: &ApiRequest) -> Reply {
    let payload: VerbaPayload = body(request)?;
    let valor = required(payload.valor, "valor")?;
    let ano = required(payload.ano, "ano")?;
    let departamento_id = existing_departamento(db, required(payload.departamento_id, "departamento_id")?)?;

    if db
        .verbas
        .all()
        .iter()
        .any(|v| v.departamento_id == departamento_id && v.ano == ano)
    {
        return Err(Reject::bad_request(DUPLICATE_VERBA));
    }

    let created = db.verbas.insert(|id| Verba {
        id,
        valor,
        departamento_id,
        ano,
        descricao: payload.descricao.unwrap_or_default(),
        data_atribuicao: Some(Utc::now()),
    });
    to_json(&created)
}

fn update_verba(db: &mut Database, request: &ApiRequest, id: i64) -> Reply {
    let payload: VerbaPayload = body(request)?;
    let verba = db
        .verbas
        .find_mut(id)
        .ok_or_else(|| Reject::not_found("Verba não encontrada."))?;
    if let Some(valor) = payload.valor {
        verba.valor = valor;
    }
    if let Some(descricao) = payload.descricao {
        verba.descricao = descricao;
    }
    to_json(&*verba)
}

fn add_subordinacao(db: &mut Database, request: &ApiRequest) -> Reply {
    let payload: SubordinacaoPayload = body(request)?;
    let superior_id = required(payload.superior_id, "IdDepartamentoA")?;
    let subordinado_id = required(payload.subordinado_id, "IdDepartamentoB")?;
    if superior_id == subordinado_id {
        return Err(Reject::bad_request(SELF_SUBORDINATE));
    }
    let superior = db
        .departamento_ref(superior_id)
        .ok_or_else(|| Reject::not_found(DEPARTAMENTO_NOT_FOUND))?;
    let subordinado = db
        .departamento_ref(subordinado_id)
        .ok_or_else(|| Reject::not_found(DEPARTAMENTO_NOT_FOUND))?;

    let created = db.subordinacoes.insert(|id| Subordinacao {
        id,
        superior,
        subordinado,
        data: Some(Utc::now()),
        observacao: payload.observacao,
    });
    to_json(&created)
}

fn add_responsabilidade(db: &mut Database, request: &ApiRequest) -> Reply {
    let payload: ResponsabilidadePayload = body(request)?;
    let usuario = db
        .usuario_ref(required(payload.usuario_id, "usuario_id")?)
        .ok_or_else(|| Reject::not_found("Usuário não encontrado."))?;
    let departamento = db
        .departamento_ref(required(payload.departamento_id, "departamento_id")?)
        .ok_or_else(|| Reject::not_found(DEPARTAMENTO_NOT_FOUND))?;

    let created = db.responsabilidades.insert(|id| Responsabilidade {
        id,
        usuario,
        departamento,
        data_criacao: Some(Utc::now()),
        observacao: payload.observacao,
    });
    to_json(&created)
}
