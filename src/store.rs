//! Fixed-capacity, insertion-ordered storage for bodies.
//!
//! Bodies are only ever appended or cleared all at once, so a single store-wide generation
//! counter is enough to invalidate every outstanding [`BodyHandle`] on `clear`.

use crate::body::Body;
use crate::error::SimError;
use crate::math::{Real, Vec2, clamped_separation};
use crate::resources::MAX_CAPACITY;

/// Opaque reference to a body in a [`BodyStore`].
///
/// A handle resolves only against the store generation it was issued in; after `clear` it
/// resolves to `None` even if a new body has been inserted at the same index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    index: u32,
    generation: u32,
}

impl BodyHandle {
    pub fn index(&self) -> usize {
        self.index as usize
    }
}

#[derive(Clone, Debug)]
pub struct BodyStore {
    bodies: Vec<Body>,
    capacity: usize,
    generation: u32,
}

impl BodyStore {
    /// Store holding at most `capacity` bodies, clamped to `MAX_CAPACITY`. Storage grows on
    /// demand; `insert` enforces the bound.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_CAPACITY);
        Self {
            bodies: Vec::new(),
            capacity,
            generation: 0,
        }
    }

    /// Appends a body. A full store is left untouched.
    pub fn insert(&mut self, body: Body) -> Result<BodyHandle, SimError> {
        if self.bodies.len() >= self.capacity {
            return Err(SimError::CapacityExceeded {
                capacity: self.capacity,
            });
        }
        let handle = self.handle_at(self.bodies.len());
        self.bodies.push(body);
        Ok(handle)
    }

    /// Removes every body and invalidates all handles issued so far.
    pub fn clear(&mut self) {
        self.bodies.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        if handle.generation != self.generation {
            return None;
        }
        self.bodies.get(handle.index())
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        if handle.generation != self.generation {
            return None;
        }
        self.bodies.get_mut(handle.index())
    }

    /// Body closest to `point` by Euclidean distance; the earliest inserted wins ties.
    pub fn nearest_to(&self, point: Vec2) -> Option<BodyHandle> {
        let mut best: Option<(usize, Real)> = None;
        for (i, body) in self.bodies.iter().enumerate() {
            let dist_sq = body.position().distance_squared(point);
            match best {
                Some((_, best_sq)) if dist_sq >= best_sq => {}
                _ => best = Some((i, dist_sq)),
            }
        }
        best.map(|(i, _)| self.handle_at(i))
    }

    /// Live bodies with their handles, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (BodyHandle, &Body)> + '_ {
        self.bodies
            .iter()
            .enumerate()
            .map(|(i, body)| (self.handle_at(i), body))
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn bodies_mut(&mut self) -> &mut [Body] {
        &mut self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Incremented on every `clear`.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Kinetic plus pairwise potential energy, with the same separation clamp as the force law.
    pub fn total_energy(&self, g: Real, min_separation: Real) -> Real {
        let kinetic: Real = self.bodies.iter().map(Body::kinetic_energy).sum();
        let mut potential = 0.0;
        for (i, a) in self.bodies.iter().enumerate() {
            for b in &self.bodies[i + 1..] {
                let (_, dist) = clamped_separation(a.position(), b.position(), min_separation);
                potential -= g * a.mass() * b.mass() / dist;
            }
        }
        kinetic + potential
    }

    /// Mass-weighted mean position, or `None` for an empty store.
    pub fn center_of_mass(&self) -> Option<Vec2> {
        let total: Real = self.bodies.iter().map(Body::mass).sum();
        if total <= 0.0 {
            return None;
        }
        let weighted = self
            .bodies
            .iter()
            .fold(Vec2::ZERO, |acc, b| acc + b.position() * b.mass());
        Some(weighted / total)
    }

    fn handle_at(&self, index: usize) -> BodyHandle {
        BodyHandle {
            index: index as u32,
            generation: self.generation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_at(x: Real, y: Real) -> Body {
        Body::new(Vec2::new(x, y), Vec2::ZERO, 1.0).unwrap()
    }

    #[test]
    fn insert_beyond_capacity_fails_and_leaves_store_unchanged() {
        let mut store = BodyStore::with_capacity(2);
        store.insert(body_at(0.0, 0.0)).unwrap();
        store.insert(body_at(1.0, 0.0)).unwrap();

        let before: Vec<Body> = store.bodies().to_vec();
        let err = store.insert(body_at(2.0, 0.0)).unwrap_err();

        assert_eq!(err, SimError::CapacityExceeded { capacity: 2 });
        assert_eq!(store.len(), 2);
        assert_eq!(store.bodies(), before.as_slice());
    }

    #[test]
    fn huge_capacity_does_not_preallocate() {
        let mut store = BodyStore::with_capacity(usize::MAX);
        assert_eq!(store.capacity(), MAX_CAPACITY);
        let handle = store.insert(body_at(1.0, 2.0)).unwrap();
        assert_eq!(handle.index(), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn nearest_returns_minimum_distance_body() {
        let mut store = BodyStore::with_capacity(8);
        store.insert(body_at(-10.0, 0.0)).unwrap();
        let near = store.insert(body_at(4.0, 4.0)).unwrap();
        store.insert(body_at(50.0, 50.0)).unwrap();

        assert_eq!(store.nearest_to(Vec2::new(3.0, 2.0)), Some(near));
    }

    #[test]
    fn nearest_tie_goes_to_earliest_inserted() {
        let mut store = BodyStore::with_capacity(8);
        let first = store.insert(body_at(-1.0, 0.0)).unwrap();
        store.insert(body_at(1.0, 0.0)).unwrap();
        store.insert(body_at(0.0, 1.0)).unwrap();

        assert_eq!(store.nearest_to(Vec2::ZERO), Some(first));
    }

    #[test]
    fn nearest_on_empty_store_is_none() {
        let store = BodyStore::with_capacity(8);
        assert_eq!(store.nearest_to(Vec2::ZERO), None);
    }

    #[test]
    fn clear_invalidates_old_handles_even_when_index_is_reused() {
        let mut store = BodyStore::with_capacity(4);
        let old = store.insert(body_at(5.0, 5.0)).unwrap();
        store.clear();
        assert!(store.is_empty());
        assert!(store.get(old).is_none());

        let new = store.insert(body_at(-5.0, -5.0)).unwrap();
        assert_eq!(old.index(), new.index());
        assert_ne!(old, new);
        assert!(store.get(old).is_none());
        assert!(store.get_mut(old).is_none());
        assert_eq!(store.get(new).unwrap().position(), Vec2::new(-5.0, -5.0));
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut store = BodyStore::with_capacity(4);
        for x in [3.0, 1.0, 2.0] {
            store.insert(body_at(x, 0.0)).unwrap();
        }
        let xs: Vec<Real> = store.iter().map(|(_, b)| b.position().x).collect();
        assert_eq!(xs, vec![3.0, 1.0, 2.0]);
        let indices: Vec<usize> = store.iter().map(|(h, _)| h.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn center_of_mass_weights_by_mass() {
        let mut store = BodyStore::with_capacity(4);
        assert!(store.center_of_mass().is_none());
        store
            .insert(Body::new(Vec2::ZERO, Vec2::ZERO, 3.0).unwrap())
            .unwrap();
        store
            .insert(Body::new(Vec2::new(4.0, 0.0), Vec2::ZERO, 1.0).unwrap())
            .unwrap();
        assert_eq!(store.center_of_mass(), Some(Vec2::new(1.0, 0.0)));
    }

    #[test]
    fn total_energy_of_resting_pair_is_potential_only() {
        let mut store = BodyStore::with_capacity(4);
        store
            .insert(Body::new(Vec2::ZERO, Vec2::ZERO, 2.0).unwrap())
            .unwrap();
        store
            .insert(Body::new(Vec2::new(10.0, 0.0), Vec2::ZERO, 5.0).unwrap())
            .unwrap();
        let energy = store.total_energy(1.0, 0.5);
        assert!((energy + 1.0).abs() < 1e-12);
    }
}
