//! Named field registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::ForcingError;
use crate::mesh::AmrMesh;

use super::{Field, FieldHandle, FieldState};

/// Repository of the named fields of a simulation.
///
/// Fields are allocated on the repository's mesh and handed out as
/// [`FieldHandle`]s.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use abl_forcing::field::{FieldRepo, FieldState};
/// use abl_forcing::mesh::{AmrMesh, Geometry};
/// use abl_forcing::types::IndexBox;
///
/// let geom = Geometry::new(IndexBox::from_dims([8, 8, 4]), [0.0; 3], [80.0, 80.0, 40.0]);
/// let mut repo = FieldRepo::new(Arc::new(AmrMesh::single_level(geom, 8)));
///
/// repo.declare_field("velocity", 3, 1, &[FieldState::New, FieldState::Old]).unwrap();
/// assert!(repo.field_exists("velocity"));
/// assert!(repo.get_field("pressure").is_err());
/// ```
#[derive(Clone, Debug)]
pub struct FieldRepo {
    mesh: Arc<AmrMesh>,
    fields: HashMap<String, FieldHandle>,
}

impl FieldRepo {
    /// Create an empty repository on `mesh`.
    pub fn new(mesh: Arc<AmrMesh>) -> Self {
        Self {
            mesh,
            fields: HashMap::new(),
        }
    }

    /// Mesh the fields live on.
    pub fn mesh(&self) -> &Arc<AmrMesh> {
        &self.mesh
    }

    /// Declare a field, or return the existing one if it was already
    /// declared with the same number of components.
    ///
    /// Redeclaring with additional states does not allocate them; declare
    /// every state the field needs the first time.
    pub fn declare_field(
        &mut self,
        name: &str,
        ncomp: usize,
        nghost: i32,
        states: &[FieldState],
    ) -> Result<FieldHandle, ForcingError> {
        if let Some(existing) = self.fields.get(name) {
            let existing_ncomp = existing.read()?.ncomp();
            if existing_ncomp != ncomp {
                return Err(ForcingError::FieldRedeclared {
                    name: name.to_string(),
                    existing: existing_ncomp,
                    requested: ncomp,
                });
            }
            return Ok(existing.clone());
        }

        let handle = FieldHandle::new(Field::new(name, ncomp, nghost, states, &self.mesh));
        self.fields.insert(name.to_string(), handle.clone());
        Ok(handle)
    }

    /// Look up a field by name.
    pub fn get_field(&self, name: &str) -> Result<FieldHandle, ForcingError> {
        self.fields
            .get(name)
            .cloned()
            .ok_or_else(|| ForcingError::FieldNotFound(name.to_string()))
    }

    /// Whether a field with this name exists.
    pub fn field_exists(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Number of declared fields.
    pub fn num_fields(&self) -> usize {
        self.fields.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Geometry;
    use crate::types::IndexBox;

    fn make_repo() -> FieldRepo {
        let geom = Geometry::new(
            IndexBox::from_dims([4, 4, 4]),
            [0.0; 3],
            [4.0, 4.0, 4.0],
        );
        FieldRepo::new(Arc::new(AmrMesh::single_level(geom, 4)))
    }

    #[test]
    fn test_declare_returns_shared_handle() {
        let mut repo = make_repo();
        let a = repo.declare_field("density", 1, 0, &[FieldState::New]).unwrap();
        let b = repo.declare_field("density", 1, 0, &[FieldState::New]).unwrap();

        a.write().unwrap().fill_state(FieldState::New, &[1.5]).unwrap();
        let guard = b.read().unwrap();
        let arr = guard.state(FieldState::New).unwrap();
        assert!(arr.level(crate::types::LevelIndex::ZERO).unwrap()[0]
            .data()
            .iter()
            .all(|&v| v == 1.5));
        assert_eq!(repo.num_fields(), 1);
    }

    #[test]
    fn test_redeclare_with_different_components() {
        let mut repo = make_repo();
        repo.declare_field("velocity", 3, 0, &[FieldState::New]).unwrap();
        let err = repo
            .declare_field("velocity", 2, 0, &[FieldState::New])
            .unwrap_err();
        assert!(matches!(
            err,
            ForcingError::FieldRedeclared { existing: 3, requested: 2, .. }
        ));
    }

    #[test]
    fn test_missing_field() {
        let repo = make_repo();
        let err = repo.get_field("temperature").unwrap_err();
        assert_eq!(err.to_string(), "Field 'temperature' not found");
    }
}
