//! Registered meshes.

use crate::error::{Error, Result};
use crate::mesh::Mesh;

/// Number of meshes a scene can hold.
pub const MESH_SLOTS: usize = 32;

/// Handle returned by [`MeshTable::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Append-only, fixed-capacity list of meshes.
#[derive(Debug, Default)]
pub struct MeshTable {
    meshes: Vec<Mesh>,
}

impl MeshTable {
    pub fn new() -> Self {
        Self {
            meshes: Vec::with_capacity(MESH_SLOTS),
        }
    }

    pub fn add(&mut self, mesh: Mesh) -> Result<MeshId> {
        if self.meshes.len() >= MESH_SLOTS {
            return Err(Error::MeshTableFull(MESH_SLOTS));
        }
        self.meshes.push(mesh);
        Ok(MeshId(self.meshes.len() - 1))
    }

    pub fn get(&self, id: MeshId) -> Option<&Mesh> {
        self.meshes.get(id.0)
    }

    pub fn get_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.meshes.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Mesh> {
        self.meshes.iter()
    }

    /// Total triangles across every registered mesh.
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_registration_order() {
        let mut table = MeshTable::new();
        let a = table.add(Mesh::quad(0)).unwrap();
        let b = table.add(Mesh::cube(1)).unwrap();
        assert_eq!((a.index(), b.index()), (0, 1));
        assert_eq!(table.get(b).unwrap().name(), "cube");
        assert_eq!(table.triangle_count(), 14);
    }

    #[test]
    fn add_fails_past_capacity() {
        let mut table = MeshTable::new();
        for _ in 0..MESH_SLOTS {
            table.add(Mesh::quad(0)).unwrap();
        }
        assert!(matches!(table.add(Mesh::quad(0)), Err(Error::MeshTableFull(32))));
        assert_eq!(table.len(), MESH_SLOTS);
    }
}
