//! Entity module - typed records mirroring the gfinancas API resources.
//! Each entity file holds the record returned by the server and the payloads
//! sent to create or update it. The client never owns these records; it caches them.

pub mod departamento;
pub mod despesa;
pub mod elemento;
pub mod responsabilidade;
pub mod subordinacao;
pub mod tipo_gasto;
pub mod user;
pub mod verba;

pub use departamento::{Departamento, DepartamentoInput, DepartamentoRef};
pub use despesa::{Despesa, DespesaUpdate, DespesasPage, NewDespesa, PageRequest, Paginacao, TotalDespesas};
pub use elemento::{Elemento, ElementoInput};
pub use responsabilidade::{NewResponsabilidade, Responsabilidade, ResponsabilidadeUpdate, UsuarioRef};
pub use subordinacao::{NewSubordinacao, Subordinacao, SubordinacaoUpdate};
pub use tipo_gasto::{TipoGasto, TipoGastoInput};
pub use user::{NewUser, Permissions, Role, User};
pub use verba::{NewVerba, Verba, VerbaUpdate};

use serde::{Deserialize, Deserializer};

/// A cached record addressed by its server-assigned id.
pub trait Record {
    fn id(&self) -> i64;
}

/// Decimal columns arrive either as JSON numbers or as strings such as `"150.00"`.
pub(crate) fn decimal<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Treats an explicit `null` the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
