use std::collections::HashMap;
use std::rc::Rc;

/// CPU-side triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new(positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        Self { positions, indices }
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Owner of scene resources shared by the client's world renderer.
///
/// Meshes are cached by name and handed out as `Rc<Mesh>`. Dropping a cache
/// entry never invalidates handles already held by callers.
#[derive(Debug, Default)]
pub struct SceneManager {
    meshes: HashMap<String, Rc<Mesh>>,
}

impl SceneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `mesh` under `name`, replacing any previous entry.
    pub fn add_mesh(&mut self, name: impl Into<String>, mesh: Mesh) -> Rc<Mesh> {
        let mesh = Rc::new(mesh);
        self.meshes.insert(name.into(), Rc::clone(&mesh));
        mesh
    }

    pub fn get_mesh(&self, name: &str) -> Option<Rc<Mesh>> {
        self.meshes.get(name).cloned()
    }

    /// Returns the cached mesh for `name`, building it with `make` on a miss.
    pub fn get_or_load_mesh<F>(&mut self, name: &str, make: F) -> Rc<Mesh>
    where
        F: FnOnce() -> Mesh,
    {
        if let Some(mesh) = self.meshes.get(name) {
            return Rc::clone(mesh);
        }
        self.add_mesh(name, make())
    }

    #[inline]
    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    /// Removes the cache entry holding exactly `mesh` (pointer identity).
    ///
    /// Returns `false` if the mesh is not cached.
    pub fn remove_mesh(&mut self, mesh: &Mesh) -> bool {
        let key = self
            .meshes
            .iter()
            .find(|(_, cached)| std::ptr::eq(Rc::as_ptr(cached), mesh))
            .map(|(name, _)| name.clone());

        match key {
            Some(name) => {
                self.meshes.remove(&name);
                log::debug!("mesh cache: removed '{name}'");
                true
            }
            None => false,
        }
    }

    /// Drops every cached mesh and returns how many entries were removed.
    pub fn cleanup_mesh_cache(&mut self) -> usize {
        let count = self.meshes.len();
        self.meshes.clear();
        if count > 0 {
            log::debug!("mesh cache: dropped {count} meshes");
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn get_or_load_builds_once() {
        let mut scene = SceneManager::new();
        let mut builds = 0;
        let a = scene.get_or_load_mesh("quad", || {
            builds += 1;
            quad()
        });
        let b = scene.get_or_load_mesh("quad", || {
            builds += 1;
            quad()
        });
        assert_eq!(builds, 1);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(a.triangle_count(), 2);
    }

    #[test]
    fn remove_mesh_uses_identity_not_equality() {
        let mut scene = SceneManager::new();
        let first = scene.add_mesh("a", quad());
        scene.add_mesh("b", quad());

        let lookalike = quad();
        assert!(!scene.remove_mesh(&lookalike));
        assert!(scene.remove_mesh(&first));
        assert_eq!(scene.mesh_count(), 1);
        assert!(scene.get_mesh("a").is_none());
        assert!(scene.get_mesh("b").is_some());
    }

    #[test]
    fn cleanup_empties_cache_but_keeps_handles_alive() {
        let mut scene = SceneManager::new();
        let held = scene.add_mesh("a", quad());
        scene.add_mesh("b", quad());

        assert_eq!(scene.cleanup_mesh_cache(), 2);
        assert_eq!(scene.mesh_count(), 0);
        assert_eq!(held.triangle_count(), 2);
        assert_eq!(scene.cleanup_mesh_cache(), 0);
    }
}
