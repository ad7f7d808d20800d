//! Local precondition checks, one per operation that has any.
//!
//! Every failure is a [`ValidationError`] and is raised before a request exists.

use crate::entities::{ElementoInput, NewDespesa, NewResponsabilidade, NewSubordinacao, NewVerba, TipoGastoInput};
use crate::errors::ValidationError;

/// Column width of the elemento/tipoGasto text fields on the server.
pub const MAX_TEXT_LEN: usize = 256;

type Checked = std::result::Result<(), ValidationError>;

/// Ids that end up in a path must be positive.
pub const fn require_id(field: &'static str, id: i64) -> Checked {
    if id > 0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidId { field })
    }
}

fn require_present_id(field: &'static str, id: Option<i64>) -> Checked {
    match id {
        None | Some(0) => Err(ValidationError::Missing { field }),
        Some(id) => require_id(field, id),
    }
}

fn max_len(field: &'static str, value: Option<&str>) -> Checked {
    let len = value.map_or(0, |v| v.chars().count());
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::TooLong {
            field,
            max: MAX_TEXT_LEN,
            len,
        });
    }
    Ok(())
}

/// `valor`, `departamento_id` and `ano` must all be set and non-zero.
pub fn new_verba(verba: &NewVerba) -> Checked {
    match verba.valor {
        None => return Err(ValidationError::Missing { field: "valor" }),
        Some(v) if v == 0.0 || v.is_nan() => return Err(ValidationError::Missing { field: "valor" }),
        Some(_) => {}
    }
    require_present_id("departamento_id", verba.departamento_id)?;
    match verba.ano {
        None | Some(0) => Err(ValidationError::Missing { field: "ano" }),
        Some(_) => Ok(()),
    }
}

pub fn new_despesa(despesa: &NewDespesa) -> Checked {
    require_id("departamento_id", despesa.departamento_id)?;
    require_id("elemento_id", despesa.elemento_id)?;
    require_id("tipo_gasto_id", despesa.tipo_gasto_id)?;
    if despesa.valor.is_nan() || despesa.valor <= 0.0 {
        return Err(ValidationError::NonPositive { field: "valor" });
    }
    Ok(())
}

pub fn new_subordinacao(subordinacao: &NewSubordinacao) -> Checked {
    require_id("IdDepartamentoA", subordinacao.superior_id)?;
    require_id("IdDepartamentoB", subordinacao.subordinado_id)?;
    if subordinacao.superior_id == subordinacao.subordinado_id {
        return Err(ValidationError::SameDepartment);
    }
    Ok(())
}

pub fn new_responsabilidade(responsabilidade: &NewResponsabilidade) -> Checked {
    require_present_id("usuario_id", responsabilidade.usuario_id)?;
    require_present_id("departamento_id", responsabilidade.departamento_id)
}

pub fn elemento(input: &ElementoInput) -> Checked {
    max_len("elemento", input.elemento.as_deref())?;
    max_len("descricao", input.descricao.as_deref())
}

pub fn tipo_gasto(input: &TipoGastoInput) -> Checked {
    max_len("tipoGasto", input.tipo_gasto.as_deref())?;
    max_len("descricao", input.descricao.as_deref())
}
