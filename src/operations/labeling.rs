use std::collections::HashMap;

use tracing::{debug, info};

use crate::math::Point3;
use crate::mesh::{Face, FaceCollection, UNLABELED};

/// Which faces count as neighbours when growing a component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdjacencyRule {
    /// Two faces are adjacent when some edge of one equals some edge of the
    /// other, in either winding direction. Coordinates must match exactly.
    #[default]
    SharedEdge,
    /// Compatibility predicate: vertex `k` of face `i` equals vertex `m` of
    /// face `j`, and vertex `k + 1` of `i` equals vertex `m + 1` of `i`
    /// (not of `j`). Any vertex shared in the same slot links the faces, even
    /// without a common edge. A reversed shared edge is missed unless one of
    /// its vertices also sits in the same slot of both faces.
    Legacy,
}

/// A component label for every face of a collection, by face index.
///
/// Labels start at 1 and are numbered in order of each component's lowest
/// face index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComponentLabels {
    labels: Vec<u32>,
}

impl ComponentLabels {
    /// Label of face `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.labels.get(index).copied()
    }

    /// All labels, parallel to the collection's faces.
    #[must_use]
    pub fn as_slice(&self) -> &[u32] {
        &self.labels
    }

    /// Number of labeled faces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns `true` if no face was labeled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Number of distinct components.
    #[must_use]
    pub fn component_count(&self) -> u32 {
        self.labels.iter().copied().max().unwrap_or(0)
    }

    /// Indices of the faces carrying `label`, ascending.
    #[must_use]
    pub fn members(&self, label: u32) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == label)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Partitions faces into connected components by flood fill.
///
/// Runs an explicit work stack over face indices: the first unlabeled face
/// seeds a new label, which then spreads to every unlabeled neighbour
/// reachable from it. The collection itself is not modified; use
/// [`FaceCollection::apply_labels`] to store the result on the faces.
pub struct LabelComponents {
    rule: AdjacencyRule,
}

impl LabelComponents {
    /// Creates a new `LabelComponents` operation.
    #[must_use]
    pub fn new(rule: AdjacencyRule) -> Self {
        Self { rule }
    }

    /// Executes the labeling, returning one positive label per face.
    #[must_use]
    pub fn execute(&self, faces: &FaceCollection) -> ComponentLabels {
        let n = faces.len();
        let mut labels = vec![UNLABELED; n];
        let edge_index = match self.rule {
            AdjacencyRule::SharedEdge => Some(EdgeIndex::build(faces)),
            AdjacencyRule::Legacy => None,
        };

        let mut next_label = 1;
        let mut stack = Vec::new();
        let mut seed_cursor = 0;

        while let Some(seed) = (seed_cursor..n).find(|&i| labels[i] == UNLABELED) {
            seed_cursor = seed + 1;
            labels[seed] = next_label;
            stack.push(seed);
            let mut size = 1_usize;

            while let Some(i) = stack.pop() {
                let mut claim = |j: usize, labels: &mut [u32]| {
                    if labels[j] == UNLABELED {
                        labels[j] = next_label;
                        stack.push(j);
                        size += 1;
                    }
                };
                match &edge_index {
                    Some(index) => {
                        for j in index.neighbours(&faces.faces[i]) {
                            claim(j, &mut labels);
                        }
                    }
                    None => {
                        for j in 0..n {
                            if labels[j] == UNLABELED
                                && legacy_adjacent(&faces.faces[i], &faces.faces[j])
                            {
                                claim(j, &mut labels);
                            }
                        }
                    }
                }
            }

            debug!(label = next_label, faces = size, seed, "component labeled");
            next_label += 1;
        }

        let result = ComponentLabels { labels };
        info!(
            faces = n,
            components = result.component_count(),
            rule = ?self.rule,
            "labeling finished"
        );
        result
    }
}

/// The compatibility predicate described on [`AdjacencyRule::Legacy`].
fn legacy_adjacent(a: &Face, b: &Face) -> bool {
    let na = a.vertices.len();
    let nb = b.vertices.len();
    if na == 0 || nb == 0 {
        return false;
    }
    for k in 0..na {
        let a_next = &a.vertices[(k + 1) % na];
        for m in 0..nb {
            // Index `m + 1` wraps by `b`'s length but reads from `a`.
            if a.vertices[k] == b.vertices[m]
                && a.vertices.get((m + 1) % nb).is_some_and(|p| p == a_next)
            {
                return true;
            }
        }
    }
    false
}

/// Exact, hashable identity of a point. `-0.0` and `0.0` share a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct PointKey([u64; 3]);

impl PointKey {
    /// Returns `None` for points with NaN coordinates, which never compare equal.
    fn new(p: &Point3) -> Option<Self> {
        if p.iter().any(|c| c.is_nan()) {
            return None;
        }
        let bits = |c: f64| if c == 0.0 { 0 } else { c.to_bits() };
        Some(Self([bits(p.x), bits(p.y), bits(p.z)]))
    }
}

/// Undirected edge key: endpoints stored in sorted order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EdgeKey(PointKey, PointKey);

impl EdgeKey {
    fn new(a: &Point3, b: &Point3) -> Option<Self> {
        let (a, b) = (PointKey::new(a)?, PointKey::new(b)?);
        Some(if a <= b { Self(a, b) } else { Self(b, a) })
    }
}

/// Maps every undirected edge to the faces that contain it.
struct EdgeIndex {
    faces_by_edge: HashMap<EdgeKey, Vec<usize>>,
}

impl EdgeIndex {
    fn build(faces: &FaceCollection) -> Self {
        let mut faces_by_edge: HashMap<EdgeKey, Vec<usize>> = HashMap::new();
        for (idx, face) in faces.iter().enumerate() {
            for (a, b) in face.edges() {
                if let Some(key) = EdgeKey::new(a, b) {
                    let owners = faces_by_edge.entry(key).or_default();
                    if owners.last() != Some(&idx) {
                        owners.push(idx);
                    }
                }
            }
        }
        Self { faces_by_edge }
    }

    /// Faces sharing at least one edge with `face` (may include `face` itself).
    fn neighbours<'a>(&'a self, face: &'a Face) -> impl Iterator<Item = usize> + 'a {
        face.edges()
            .filter_map(|(a, b)| EdgeKey::new(a, b))
            .filter_map(|key| self.faces_by_edge.get(&key))
            .flatten()
            .copied()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn face(points: &[Point3]) -> Face {
        Face::new(points.to_vec(), vec![])
    }

    /// Unit triangle translated along x.
    fn triangle_at(x: f64) -> Face {
        face(&[p(x, 0.0, 0.0), p(x + 1.0, 0.0, 0.0), p(x, 1.0, 0.0)])
    }

    fn label(faces: Vec<Face>, rule: AdjacencyRule) -> ComponentLabels {
        LabelComponents::new(rule).execute(&FaceCollection::from(faces))
    }

    #[test]
    fn empty_collection() {
        let labels = label(vec![], AdjacencyRule::SharedEdge);
        assert!(labels.is_empty());
        assert_eq!(labels.component_count(), 0);
    }

    #[test]
    fn reversed_shared_edge_joins_faces() {
        // Consistently wound mesh: the shared edge runs 1->2 in `a`, 2->1 in `b`.
        let a = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)]);
        let b = face(&[p(1.0, 1.0, 0.0), p(1.0, 0.0, 0.0), p(2.0, 0.0, 0.0)]);
        let labels = label(vec![a, b], AdjacencyRule::SharedEdge);
        assert_eq!(labels.as_slice(), &[1, 1]);
    }

    #[test]
    fn same_direction_shared_edge_joins_faces() {
        let a = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)]);
        let b = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, -1.0, 0.0)]);
        for rule in [AdjacencyRule::SharedEdge, AdjacencyRule::Legacy] {
            assert_eq!(label(vec![a.clone(), b.clone()], rule).as_slice(), &[1, 1]);
        }
    }

    #[test]
    fn single_shared_vertex_is_not_an_edge() {
        let a = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        let b = face(&[p(0.0, 0.0, 0.0), p(-1.0, 0.0, 0.0), p(0.0, -1.0, 0.0)]);
        let labels = label(vec![a, b], AdjacencyRule::SharedEdge);
        assert_eq!(labels.as_slice(), &[1, 2]);
    }

    #[test]
    fn legacy_rule_links_faces_sharing_one_vertex_in_the_same_slot() {
        let a = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        let b = face(&[p(0.0, 0.0, 0.0), p(-1.0, 0.0, 0.0), p(0.0, -1.0, 0.0)]);
        let labels = label(vec![a, b], AdjacencyRule::Legacy);
        assert_eq!(labels.as_slice(), &[1, 1]);
    }

    #[test]
    fn legacy_rule_misses_reversed_edge_with_shifted_slots() {
        let a = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0)]);
        // The edge (1,0,0)-(1,1,0) is shared, but no endpoint keeps its slot.
        let b = face(&[p(2.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(1.0, 0.0, 0.0)]);
        let legacy = label(vec![a.clone(), b.clone()], AdjacencyRule::Legacy);
        assert_eq!(legacy.as_slice(), &[1, 2]);
        let shared = label(vec![a, b], AdjacencyRule::SharedEdge);
        assert_eq!(shared.as_slice(), &[1, 1]);
    }

    #[test]
    fn legacy_rule_tolerates_larger_neighbour() {
        let tri = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        let pent = face(&[
            p(5.0, 5.0, 5.0),
            p(6.0, 5.0, 5.0),
            p(0.0, 1.0, 0.0),
            p(6.0, 6.0, 5.0),
            p(5.5, 7.0, 5.0),
        ]);
        // The shared vertex sits in slot 2 of both faces, so the follow-up
        // lookup reads slot 3 of the triangle, which does not exist.
        let labels = label(vec![tri, pent], AdjacencyRule::Legacy);
        assert_eq!(labels.as_slice(), &[1, 2]);
    }

    #[test]
    fn disjoint_faces_get_one_label_each() {
        for n in 0..6 {
            let faces: Vec<Face> = (0..n).map(|i| triangle_at(f64::from(i) * 10.0)).collect();
            for rule in [AdjacencyRule::SharedEdge, AdjacencyRule::Legacy] {
                let labels = label(faces.clone(), rule);
                let expected: Vec<u32> = (1..=n).collect();
                assert_eq!(labels.as_slice(), expected.as_slice());
            }
        }
    }

    #[test]
    fn strip_is_one_component_and_separate_shell_is_another() {
        // Quad strip of three quads, then an isolated quad, then one more strip quad.
        let quad = |x0: f64, x1: f64| {
            face(&[p(x0, 0.0, 0.0), p(x1, 0.0, 0.0), p(x1, 1.0, 0.0), p(x0, 1.0, 0.0)])
        };
        let faces = vec![
            quad(0.0, 1.0),
            quad(1.0, 2.0),
            quad(10.0, 11.0),
            quad(2.0, 3.0),
        ];
        let labels = label(faces, AdjacencyRule::SharedEdge);
        assert_eq!(labels.as_slice(), &[1, 1, 2, 1]);
        assert_eq!(labels.component_count(), 2);
        assert_eq!(labels.members(1), vec![0, 1, 3]);
    }

    #[test]
    fn chain_reached_through_later_face() {
        // Face 0 touches only face 2; face 1 touches only face 2.
        let faces = vec![
            face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.5, -1.0, 0.0)]),
            face(&[p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0), p(0.5, 2.0, 0.0)]),
            face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(1.0, 1.0, 0.0), p(0.0, 1.0, 0.0)]),
        ];
        let labels = label(faces, AdjacencyRule::SharedEdge);
        assert_eq!(labels.as_slice(), &[1, 1, 1]);
    }

    #[test]
    fn signed_zero_matches() {
        let a = face(&[p(0.0, 0.0, 0.0), p(1.0, 0.0, 0.0), p(0.0, 1.0, 0.0)]);
        let b = face(&[p(-0.0, 0.0, 0.0), p(1.0, -0.0, 0.0), p(0.0, -1.0, 0.0)]);
        let labels = label(vec![a, b], AdjacencyRule::SharedEdge);
        assert_eq!(labels.as_slice(), &[1, 1]);
    }

    #[test]
    fn apply_labels_writes_back() {
        let mut faces = FaceCollection::from(vec![triangle_at(0.0), triangle_at(5.0)]);
        let labels = LabelComponents::new(AdjacencyRule::default()).execute(&faces);
        assert!(!faces.is_fully_labeled());
        faces.apply_labels(&labels);
        assert!(faces.is_fully_labeled());
        assert_eq!(faces.faces[1].label, 2);
        faces.clear_labels();
        assert!(faces.iter().all(|f| f.label == UNLABELED));
    }
}
