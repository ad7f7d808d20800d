//! Record factories for seeding the mock database.

use crate::entities::Departamento;
use rand::Rng;
use rand::seq::SliceRandom;

const VERBS: &[&str] = &[
    "planejar", "executar", "comprar", "licitar", "auditar", "contratar", "empenhar",
    "liquidar", "pagar", "arquivar", "orçar", "fiscalizar", "registrar", "atender",
];

const TIPOS_ENTIDADE: &[&str] = &["Setor", "Coordenação", "Diretoria", "Núcleo"];

/// A departamento with a random verb as its description.
pub(crate) fn departamento<R: Rng + ?Sized>(rng: &mut R, id: i64) -> Departamento {
    let description = VERBS.choose(rng).copied().unwrap_or("planejar");
    let tipo_entidade = TIPOS_ENTIDADE.choose(rng).copied().unwrap_or("Setor");
    Departamento {
        id,
        nome: format!("Departamento {id}"),
        description: description.to_string(),
        tipo_entidade: tipo_entidade.to_string(),
        responsavel_id: None,
        done: rng.gen_bool(0.2),
        subordinacoes: Vec::new(),
    }
}
