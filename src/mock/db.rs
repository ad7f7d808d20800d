//! In-memory tables behind the mock server.

use super::factories;
use crate::config::Fixtures;
use crate::entities::{
    Departamento, DepartamentoRef, Despesa, Elemento, Permissions, Record, Responsabilidade, Role,
    Subordinacao, TipoGasto, User, UsuarioRef, Verba,
};
use rand::Rng;

/// Rows of one resource plus the id the next insert gets. Ids are never reused.
#[derive(Debug)]
pub(crate) struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T: Record + Clone> Table<T> {
    /// Seeds a row with a fixed id.
    pub(crate) fn seed(&mut self, row: T) {
        self.next_id = self.next_id.max(row.id() + 1);
        self.rows.push(row);
    }

    pub(crate) fn insert(&mut self, build: impl FnOnce(i64) -> T) -> T {
        let row = build(self.next_id);
        self.next_id += 1;
        self.rows.push(row.clone());
        row
    }

    pub(crate) fn all(&self) -> &[T] {
        &self.rows
    }

    pub(crate) fn find(&self, id: i64) -> Option<&T> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    pub(crate) fn remove(&mut self, id: i64) -> Option<T> {
        let index = self.rows.iter().position(|row| row.id() == id)?;
        Some(self.rows.remove(index))
    }

    pub(crate) const fn next_id(&self) -> i64 {
        self.next_id
    }
}

/// A user together with the password the mock checks at login.
#[derive(Debug, Clone)]
pub(crate) struct Account {
    pub(crate) user: User,
    pub(crate) password: String,
}

impl Record for Account {
    fn id(&self) -> i64 {
        self.user.id
    }
}

#[derive(Debug, Default)]
pub(crate) struct Database {
    /// User id of the open session
    pub(crate) session: Option<i64>,
    pub(crate) accounts: Table<Account>,
    pub(crate) roles: Table<Role>,
    pub(crate) departamentos: Table<Departamento>,
    pub(crate) elementos: Table<Elemento>,
    pub(crate) tipos_gasto: Table<TipoGasto>,
    pub(crate) despesas: Table<Despesa>,
    pub(crate) verbas: Table<Verba>,
    pub(crate) subordinacoes: Table<Subordinacao>,
    pub(crate) responsabilidades: Table<Responsabilidade>,
}

impl Database {
    /// Loads the fixtures, then appends `generated_departamentos` factory departments.
    pub(crate) fn seed<R: Rng + ?Sized>(fixtures: &Fixtures, rng: &mut R) -> Self {
        let mut db = Self::default();

        for f in &fixtures.users {
            db.accounts.seed(Account {
                user: User {
                    id: f.id,
                    username: f.username.clone(),
                    name: full_name(&f.first_name, &f.last_name),
                    first_name: f.first_name.clone(),
                    last_name: f.last_name.clone(),
                    email: f.email.clone(),
                    avatar: None,
                    bio: None,
                    permissions: Permissions {
                        admin: f.admin,
                        staff: f.staff,
                    },
                    grupo: f.grupo.clone(),
                    roles: f.roles.clone(),
                },
                password: f.password.clone(),
            });
        }
        for f in &fixtures.roles {
            db.roles.seed(Role {
                id: f.id,
                name: f.name.clone(),
            });
        }
        for f in &fixtures.departamentos {
            db.departamentos.seed(Departamento {
                id: f.id,
                nome: f.nome.clone(),
                description: f.description.clone(),
                tipo_entidade: f.tipo_entidade.clone(),
                responsavel_id: f.responsavel_id,
                done: false,
                subordinacoes: Vec::new(),
            });
        }
        for _ in 0..fixtures.generated_departamentos {
            let generated = factories::departamento(rng, db.departamentos.next_id());
            db.departamentos.seed(generated);
        }
        for f in &fixtures.elementos {
            db.elementos.seed(Elemento {
                id: f.id,
                elemento: f.elemento.clone(),
                descricao: f.descricao.clone(),
            });
        }
        for f in &fixtures.tipos_gasto {
            db.tipos_gasto.seed(TipoGasto {
                id: f.id,
                tipo_gasto: f.tipo_gasto.clone(),
                descricao: f.descricao.clone(),
                elemento_id: f.elemento_id,
            });
        }

        tracing::debug!(
            users = db.accounts.all().len(),
            departamentos = db.departamentos.all().len(),
            "mock database seeded"
        );
        db
    }

    pub(crate) fn session_user(&self) -> Option<&User> {
        self.session
            .and_then(|id| self.accounts.find(id))
            .map(|account| &account.user)
    }

    pub(crate) fn departamento_ref(&self, id: i64) -> Option<DepartamentoRef> {
        self.departamentos.find(id).map(|d| DepartamentoRef {
            id: d.id,
            nome: d.nome.clone(),
        })
    }

    pub(crate) fn usuario_ref(&self, id: i64) -> Option<UsuarioRef> {
        self.accounts.find(id).map(|a| UsuarioRef {
            id: a.user.id,
            username: a.user.username.clone(),
        })
    }

    /// The department as served, with its direct subordinates filled in.
    pub(crate) fn departamento_view(&self, departamento: &Departamento) -> Departamento {
        let subordinacoes = self
            .subordinacoes
            .all()
            .iter()
            .filter(|s| s.superior.id == departamento.id)
            .map(|s| s.subordinado.clone())
            .collect();
        Departamento {
            subordinacoes,
            ..departamento.clone()
        }
    }
}

pub(crate) fn full_name(first: &str, last: &str) -> String {
    format!("{first} {last}").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_seed_appends_generated_departamentos() -> Result<()> {
        let fixtures = Fixtures::embedded()?;
        let db = Database::seed(&fixtures, &mut StdRng::seed_from_u64(1));

        let ids: Vec<i64> = db.departamentos.all().iter().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(db.departamentos.next_id(), 5);
        assert!(db.session_user().is_none());
        Ok(())
    }

    #[test]
    fn test_table_never_reuses_ids() {
        let mut table: Table<Role> = Table::default();
        let first = table.insert(|id| Role {
            id,
            name: "a".to_string(),
        });
        table.remove(first.id);
        let second = table.insert(|id| Role {
            id,
            name: "b".to_string(),
        });
        assert_ne!(first.id, second.id);
        assert!(table.find(first.id).is_none());
    }
}
