//! Barnes-Hut quadtree over the bodies of one force pass.

use crate::body::Body;
use crate::forces::pair_force;
use crate::math::{Real, Vec2, clamped_separation};

/// Bodies closer than this (squared) share a leaf instead of subdividing further.
const COINCIDENT_DIST_SQ: Real = 1e-12;
/// Depth at which subdivision stops and bodies share a leaf.
const MAX_DEPTH: usize = 48;

#[derive(Clone, Copy, Debug)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn get_quadrant_index(&self, point: Vec2) -> usize {
        let right = point.x > self.center.x;
        let top = point.y > self.center.y;
        match (right, top) {
            (false, true) => 0,
            (true, true) => 1,
            (false, false) => 2,
            (true, false) => 3,
        }
    }

    pub fn sub_quadrant(&self, index: usize) -> Rect {
        let quarter_size = self.size / 2.0;
        let offset = quarter_size / 2.0;
        let center = match index {
            0 => self.center + Vec2::new(-offset.x, offset.y),
            1 => self.center + Vec2::new(offset.x, offset.y),
            2 => self.center + Vec2::new(-offset.x, -offset.y),
            3 => self.center + Vec2::new(offset.x, -offset.y),
            _ => self.center,
        };
        Rect {
            center,
            size: quarter_size,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let half = self.size / 2.0;
        (point.x - self.center.x).abs() <= half.x && (point.y - self.center.y).abs() <= half.y
    }

    /// Square bounds enclosing every body, padded by 10%.
    pub fn enclosing(bodies: &[Body]) -> Option<Rect> {
        let mut min = Vec2::splat(Real::INFINITY);
        let mut max = Vec2::splat(Real::NEG_INFINITY);
        for body in bodies {
            min = min.min(body.position());
            max = max.max(body.position());
        }
        if !min.x.is_finite() {
            return None;
        }
        let size = (max - min).max(Vec2::splat(1.0));
        let max_dim = size.x.max(size.y) * 1.1;
        Some(Rect {
            center: (min + max) / 2.0,
            size: Vec2::splat(max_dim),
        })
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Empty,
    /// `(store index, mass)` of the bodies in this leaf; more than one only when they coincide.
    Leaf {
        members: Vec<(usize, Real)>,
        position: Vec2,
    },
    Internal { children: [Option<usize>; 4] },
}

#[derive(Debug)]
pub struct Node {
    pub bounds: Rect,
    pub center_of_mass: Vec2,
    pub mass: Real,
    pub kind: NodeKind,
}

impl Node {
    pub fn empty(bounds: Rect) -> Self {
        Self {
            bounds,
            center_of_mass: Vec2::ZERO,
            mass: 0.0,
            kind: NodeKind::Empty,
        }
    }
}

#[derive(Debug, Default)]
pub struct QuadTree {
    pub nodes: Vec<Node>,
    pub root: Option<usize>,
}

impl QuadTree {
    /// Builds a tree over `bodies`, keyed by store index.
    pub fn build(bodies: &[Body]) -> Self {
        let mut tree = QuadTree::default();
        if let Some(bounds) = Rect::enclosing(bodies) {
            tree.reset(bounds);
            for (i, body) in bodies.iter().enumerate() {
                tree.insert(i, body.position(), body.mass());
            }
        }
        tree
    }

    pub fn reset(&mut self, bounds: Rect) {
        self.nodes.clear();
        self.root = Some(self.nodes.len());
        self.nodes.push(Node::empty(bounds));
    }

    pub fn insert(&mut self, index: usize, position: Vec2, mass: Real) {
        let root_index = match self.root {
            Some(index) => index,
            None => return,
        };
        self.insert_recursive(root_index, index, position, mass, 0);
    }

    fn insert_recursive(
        &mut self,
        node: usize,
        index: usize,
        position: Vec2,
        mass: Real,
        depth: usize,
    ) {
        let bounds = self.nodes[node].bounds;
        let existing_mass = self.nodes[node].mass;
        let existing_com = self.nodes[node].center_of_mass;
        let total_mass = existing_mass + mass;
        let com = (existing_com * existing_mass + position * mass) / total_mass;

        let kind = std::mem::replace(&mut self.nodes[node].kind, NodeKind::Empty);
        let kind = match kind {
            NodeKind::Empty => NodeKind::Leaf {
                members: vec![(index, mass)],
                position,
            },
            NodeKind::Leaf {
                mut members,
                position: existing_position,
            } => {
                if existing_position.distance_squared(position) < COINCIDENT_DIST_SQ
                    || depth >= MAX_DEPTH
                {
                    members.push((index, mass));
                    NodeKind::Leaf {
                        members,
                        position: existing_position,
                    }
                } else {
                    let children = self.subdivide(node);
                    let existing_child = children[bounds.get_quadrant_index(existing_position)];
                    if let Some(child) = existing_child {
                        for (moved, moved_mass) in members {
                            self.insert_recursive(
                                child,
                                moved,
                                existing_position,
                                moved_mass,
                                depth + 1,
                            );
                        }
                    }
                    if let Some(child) = children[bounds.get_quadrant_index(position)] {
                        self.insert_recursive(child, index, position, mass, depth + 1);
                    }
                    NodeKind::Internal { children }
                }
            }
            NodeKind::Internal { children } => {
                if let Some(child) = children[bounds.get_quadrant_index(position)] {
                    self.insert_recursive(child, index, position, mass, depth + 1);
                }
                NodeKind::Internal { children }
            }
        };

        let node = &mut self.nodes[node];
        node.kind = kind;
        node.mass = total_mass;
        node.center_of_mass = com;
    }

    fn subdivide(&mut self, node: usize) -> [Option<usize>; 4] {
        let mut children = [None; 4];
        for (quadrant, child) in children.iter_mut().enumerate() {
            let child_bounds = self.nodes[node].bounds.sub_quadrant(quadrant);
            let child_index = self.nodes.len();
            self.nodes.push(Node::empty(child_bounds));
            *child = Some(child_index);
        }
        children
    }

    /// Approximate net force on body `target`.
    ///
    /// A node is collapsed to its centre of mass when it does not contain the target and
    /// `width / distance < theta`. Leaves are always evaluated body by body.
    pub fn force_on(
        &self,
        target: usize,
        bodies: &[Body],
        g: Real,
        min_separation: Real,
        theta: Real,
    ) -> Vec2 {
        match self.root {
            Some(root) => self.force_recursive(root, target, bodies, g, min_separation, theta),
            None => Vec2::ZERO,
        }
    }

    fn force_recursive(
        &self,
        index: usize,
        target: usize,
        bodies: &[Body],
        g: Real,
        min_separation: Real,
        theta: Real,
    ) -> Vec2 {
        let node = &self.nodes[index];
        let body = &bodies[target];
        let position = body.position();
        match &node.kind {
            NodeKind::Empty => Vec2::ZERO,
            NodeKind::Leaf { members, .. } => members
                .iter()
                .filter(|&&(other, _)| other != target)
                .map(|&(other, _)| {
                    let b = &bodies[other];
                    pair_force(position, body.mass(), b.position(), b.mass(), g, min_separation)
                })
                .fold(Vec2::ZERO, |acc, f| acc + f),
            NodeKind::Internal { children } => {
                let (delta, dist) =
                    clamped_separation(position, node.center_of_mass, min_separation);
                let width = node.bounds.size.x;

                if !node.bounds.contains(position) && width / dist < theta {
                    delta * (g * body.mass() * node.mass / (dist * dist * dist))
                } else {
                    children
                        .iter()
                        .flatten()
                        .map(|&child| {
                            self.force_recursive(child, target, bodies, g, min_separation, theta)
                        })
                        .fold(Vec2::ZERO, |acc, f| acc + f)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(x: Real, y: Real, m: Real) -> Body {
        Body::new(Vec2::new(x, y), Vec2::ZERO, m).unwrap()
    }

    #[test]
    fn root_tracks_total_mass_and_center_of_mass() {
        let bodies = vec![body(-10.0, -5.0, 2.0), body(20.0, 15.0, 3.0)];
        let tree = QuadTree::build(&bodies);

        let root = &tree.nodes[tree.root.unwrap()];
        assert!((root.mass - 5.0).abs() < 1e-12);
        let expected = (Vec2::new(-10.0, -5.0) * 2.0 + Vec2::new(20.0, 15.0) * 3.0) / 5.0;
        assert!((root.center_of_mass - expected).length() < 1e-12);
        assert!((root.bounds.size.x - 33.0).abs() < 1e-9);
        assert!(tree.nodes.len() >= 3);
    }

    #[test]
    fn coincident_bodies_share_a_leaf_and_still_attract_others() {
        let bodies = vec![body(0.0, 0.0, 1.0), body(0.0, 0.0, 1.0), body(10.0, 0.0, 1.0)];
        let tree = QuadTree::build(&bodies);

        let f0 = tree.force_on(0, &bodies, 1.0, 0.5, 0.0);
        let f2 = tree.force_on(2, &bodies, 1.0, 0.5, 0.0);
        assert!((f0 - Vec2::new(0.01, 0.0)).length() < 1e-12);
        assert!((f2 - Vec2::new(-0.02, 0.0)).length() < 1e-12);
    }

    #[test]
    fn distant_cluster_is_approximated_by_its_center_of_mass() {
        let bodies = vec![
            body(0.0, 0.0, 1.0),
            body(1000.0, 0.5, 1.0),
            body(1000.0, -0.5, 1.0),
            body(1000.5, 0.0, 1.0),
        ];
        let tree = QuadTree::build(&bodies);
        let exact = crate::forces::net_forces(&bodies, 1.0, 0.5)[0];
        let approx = tree.force_on(0, &bodies, 1.0, 0.5, 0.9);
        assert!((exact - approx).length() < 1e-3 * exact.length());
    }

    #[test]
    fn empty_tree_exerts_no_force() {
        let tree = QuadTree::build(&[]);
        assert!(tree.root.is_none());
    }
}
