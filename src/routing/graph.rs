//! Neighbor graph over spots and the bend-penalized shortest path search

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap, HashMap};

use crate::geometry::{Point, Rect};

use super::spots::SpotKey;

/// Direction of travel along a graph edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Extra cost for turning onto an edge of the given weight
pub fn bend_penalty(weight: f64) -> f64 {
    (weight + 1.0).powi(2)
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    to: usize,
    weight: f64,
    axis: Axis,
}

/// Spots connected to their immediate row and column neighbors
#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Point>,
    index: HashMap<SpotKey, usize>,
    adjacency: Vec<Vec<Edge>>,
}

impl Graph {
    /// Link each spot to the next one in its row and column unless the
    /// segment between them crosses an obstacle body.
    pub fn build(spots: &BTreeSet<SpotKey>, obstacles: &[Rect]) -> Self {
        let nodes: Vec<Point> = spots.iter().map(|k| k.point()).collect();
        let index: HashMap<SpotKey, usize> =
            spots.iter().enumerate().map(|(i, k)| (*k, i)).collect();
        let mut graph = Graph {
            adjacency: vec![Vec::new(); nodes.len()],
            nodes,
            index,
        };

        // Keys iterate x-major, so each column arrives sorted by y and each
        // row collects its spots sorted by x.
        let mut columns: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        let mut rows: BTreeMap<i64, Vec<usize>> = BTreeMap::new();
        for (i, key) in spots.iter().enumerate() {
            columns.entry(key.x).or_default().push(i);
            rows.entry(key.y).or_default().push(i);
        }

        for line in columns.values() {
            graph.link_neighbors(line, Axis::Vertical, obstacles);
        }
        for line in rows.values() {
            graph.link_neighbors(line, Axis::Horizontal, obstacles);
        }
        graph
    }

    fn link_neighbors(&mut self, line: &[usize], axis: Axis, obstacles: &[Rect]) {
        for pair in line.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let (pa, pb) = (self.nodes[a], self.nodes[b]);
            if obstacles.iter().any(|r| r.crossed_by(pa, pb)) {
                continue;
            }
            let weight = pa.manhattan(pb);
            self.adjacency[a].push(Edge { to: b, weight, axis });
            self.adjacency[b].push(Edge { to: a, weight, axis });
        }
    }

    pub fn node(&self, key: SpotKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Cheapest route from `from` to `to`.
    ///
    /// Cost is Manhattan length plus [`bend_penalty`] of the outgoing edge at
    /// every change of axis. The search starts heading along `start_axis`; a
    /// route that reaches `to` off `end_axis` pays one more penalty for a leg
    /// of `end_leg`. `None` when `to` is unreachable.
    pub fn shortest_path(
        &self,
        from: usize,
        to: usize,
        start_axis: Option<Axis>,
        end_axis: Option<Axis>,
        end_leg: f64,
    ) -> Option<Vec<Point>> {
        let mut dist = vec![f64::INFINITY; self.nodes.len() * SLOTS];
        let mut prev: Vec<Option<usize>> = vec![None; self.nodes.len() * SLOTS];
        let mut queue = BinaryHeap::new();
        let mut best: Option<(f64, usize)> = None;

        let start = state(from, start_axis);
        dist[start] = 0.0;
        queue.push(Frontier {
            cost: 0.0,
            node: from,
            heading: start_axis,
        });

        while let Some(Frontier {
            cost,
            node,
            heading,
        }) = queue.pop()
        {
            let current = state(node, heading);
            if cost > dist[current] {
                continue;
            }
            if best.is_some_and(|(best_cost, _)| cost >= best_cost) {
                break;
            }

            if node == to {
                let arrival = match (heading, end_axis) {
                    (Some(h), Some(e)) if h != e => bend_penalty(end_leg),
                    _ => 0.0,
                };
                let total = cost + arrival;
                if best.map_or(true, |(best_cost, _)| total < best_cost) {
                    best = Some((total, current));
                }
            }

            for edge in &self.adjacency[node] {
                let turn = match heading {
                    Some(h) if h != edge.axis => bend_penalty(edge.weight),
                    _ => 0.0,
                };
                let next_cost = cost + edge.weight + turn;
                let next = state(edge.to, Some(edge.axis));
                if next_cost < dist[next] {
                    dist[next] = next_cost;
                    prev[next] = Some(current);
                    queue.push(Frontier {
                        cost: next_cost,
                        node: edge.to,
                        heading: Some(edge.axis),
                    });
                }
            }
        }

        let (_, goal) = best?;
        let mut trail = vec![goal];
        let mut cursor = goal;
        while let Some(p) = prev[cursor] {
            trail.push(p);
            cursor = p;
        }
        trail.reverse();
        Some(trail.into_iter().map(|s| self.nodes[s / SLOTS]).collect())
    }
}

/// Search states per node: arrived horizontally, vertically, or not at all
const SLOTS: usize = 3;

fn state(node: usize, heading: Option<Axis>) -> usize {
    node * SLOTS
        + match heading {
            Some(Axis::Horizontal) => 0,
            Some(Axis::Vertical) => 1,
            None => 2,
        }
}

/// Queue entry; the heap pops the lowest cost, then the lowest node index
struct Frontier {
    cost: f64,
    node: usize,
    heading: Option<Axis>,
}

impl Ord for Frontier {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
            .then_with(|| other.heading.cmp(&self.heading))
    }
}

impl PartialOrd for Frontier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier {}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_spots(xs: &[f64], ys: &[f64]) -> BTreeSet<SpotKey> {
        xs.iter()
            .flat_map(|&x| ys.iter().map(move |&y| SpotKey::of(Point::new(x, y))))
            .collect()
    }

    #[test]
    fn test_build_links_only_neighbors() {
        let spots = grid_spots(&[0.0, 10.0, 20.0], &[0.0, 10.0]);
        let graph = Graph::build(&spots, &[]);
        assert_eq!(graph.node_count(), 6);
        // 2 rows x 2 links + 3 columns x 1 link
        assert_eq!(graph.edge_count(), 7);
    }

    #[test]
    fn test_build_omits_blocked_edges() {
        let spots = grid_spots(&[0.0, 50.0, 100.0], &[0.0, 50.0, 100.0]);
        let obstacle = Rect::new(25.0, 25.0, 50.0, 50.0);
        let graph = Graph::build(&spots, &[obstacle]);
        // The middle row and column each lose both links through the center
        assert_eq!(graph.edge_count(), 12 - 4);
    }

    #[test]
    fn test_straight_path_has_no_bends() {
        let spots = grid_spots(&[0.0, 10.0, 20.0, 30.0], &[0.0, 10.0]);
        let graph = Graph::build(&spots, &[]);
        let from = graph.node(SpotKey::of(Point::new(0.0, 0.0))).unwrap();
        let to = graph.node(SpotKey::of(Point::new(30.0, 0.0))).unwrap();
        let path = graph
            .shortest_path(from, to, Some(Axis::Horizontal), Some(Axis::Horizontal), 20.0)
            .unwrap();
        assert!(path.iter().all(|p| p.y == 0.0));
        assert_eq!(path.first(), Some(&Point::new(0.0, 0.0)));
        assert_eq!(path.last(), Some(&Point::new(30.0, 0.0)));
    }

    #[test]
    fn test_path_detours_around_obstacle() {
        let spots = grid_spots(&[0.0, 50.0, 100.0], &[0.0, 50.0, 100.0]);
        let obstacle = Rect::new(25.0, 25.0, 50.0, 50.0);
        let graph = Graph::build(&spots, &[obstacle]);
        let from = graph.node(SpotKey::of(Point::new(0.0, 50.0))).unwrap();
        let to = graph.node(SpotKey::of(Point::new(100.0, 50.0))).unwrap();
        let path = graph
            .shortest_path(from, to, Some(Axis::Horizontal), Some(Axis::Horizontal), 20.0)
            .unwrap();
        for pair in path.windows(2) {
            assert!(!obstacle.crossed_by(pair[0], pair[1]));
        }
    }

    #[test]
    fn test_unreachable_returns_none() {
        let spots = grid_spots(&[0.0, 100.0], &[0.0]);
        let wall = Rect::new(40.0, -10.0, 20.0, 20.0);
        let graph = Graph::build(&spots, &[wall]);
        assert!(graph.shortest_path(0, 1, None, None, 20.0).is_none());
    }

    #[test]
    fn test_bend_penalty_prefers_single_bend() {
        // Reaching (40, 40) from (0, 0) heading right: one bend is always
        // cheaper than a staircase of the same length.
        let steps = [0.0, 10.0, 20.0, 30.0, 40.0];
        let spots = grid_spots(&steps, &steps);
        let graph = Graph::build(&spots, &[]);
        let from = graph.node(SpotKey::of(Point::new(0.0, 0.0))).unwrap();
        let to = graph.node(SpotKey::of(Point::new(40.0, 40.0))).unwrap();
        let path = graph
            .shortest_path(from, to, Some(Axis::Horizontal), None, 20.0)
            .unwrap();
        let turns = path
            .windows(3)
            .filter(|w| (w[0].x == w[1].x) != (w[1].x == w[2].x))
            .count();
        assert_eq!(turns, 1);
    }

    #[test]
    fn test_bend_penalty_value() {
        assert_eq!(bend_penalty(0.0), 1.0);
        assert_eq!(bend_penalty(9.0), 100.0);
    }
}
