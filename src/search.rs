//! Role-aware weighted shortest paths over a [`GraphSnapshot`].
//!
//! Edge weights are derived at search time: planar Euclidean distance plus a
//! fixed penalty when a floor change lands on an elevator or a staircase.
//! Missing nodes, dangling adjacency and unreachable goals all yield `None`.

use std::{cmp::Ordering, collections::BinaryHeap};

use ahash::{AHashMap, AHashSet};
use serde::Serialize;

use crate::{
    model::{Access, Node, NodeKind, Role},
    snapshot::GraphSnapshot,
};

/// Added when a floor change ends on an elevator (wait time).
pub const ELEVATOR_PENALTY: f64 = 300.0;
/// Added when a floor change ends on a staircase (effort).
pub const STAIRS_PENALTY: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub path: Vec<String>,
    pub cost: f64,
}

/// Whether `role` may step into `to`.
///
/// Non-employees are kept out of employee-only nodes, except that mobility-impaired
/// students may use employee elevators. Mobility-impaired students never enter stairs.
pub fn is_admissible(role: Role, to: &Node) -> bool {
    if role != Role::Employee && to.access == Access::Employee {
        let carve_out = role == Role::PwdStudent && to.kind == NodeKind::Elevator;
        if !carve_out {
            return false;
        }
    }
    !(role == Role::PwdStudent && to.kind == NodeKind::Stairs)
}

pub fn edge_weight(from: &Node, to: &Node) -> f64 {
    let mut weight = from.distance_to(to);
    if from.floor != to.floor {
        match to.kind {
            NodeKind::Elevator => weight += ELEVATOR_PENALTY,
            NodeKind::Stairs => weight += STAIRS_PENALTY,
            _ => {}
        }
    }
    weight
}

/// Total weight of consecutive hops along `path`, or `None` if a hop is not an edge
/// of the snapshot.
pub fn path_cost(snapshot: &GraphSnapshot, path: &[String]) -> Option<f64> {
    let mut total = 0.0;
    for pair in path.windows(2) {
        let (from, to) = (&pair[0], &pair[1]);
        if snapshot.neighbors(from).binary_search(to).is_err() {
            return None;
        }
        total += edge_weight(snapshot.node(from)?, snapshot.node(to)?);
    }
    if path.len() == 1 && !snapshot.contains(&path[0]) {
        return None;
    }
    Some(total)
}

pub fn shortest_path(
    snapshot: &GraphSnapshot,
    start: &str,
    end: &str,
    role: Role,
) -> Option<Vec<String>> {
    find_route(snapshot, start, end, role).map(|route| route.path)
}

pub fn find_route(snapshot: &GraphSnapshot, start: &str, end: &str, role: Role) -> Option<Route> {
    if !snapshot.contains(start) || !snapshot.contains(end) {
        return None;
    }
    let mut dist: AHashMap<&str, f64> = AHashMap::new();
    let mut prev: AHashMap<&str, &str> = AHashMap::new();
    let mut settled: AHashSet<&str> = AHashSet::new();
    let mut frontier = BinaryHeap::new();
    dist.insert(start, 0.0);
    frontier.push(Frontier {
        cost: 0.0,
        id: start,
    });

    while let Some(Frontier { cost, id }) = frontier.pop() {
        if !settled.insert(id) {
            continue;
        }
        if id == end {
            break;
        }
        let Some(from) = snapshot.node(id) else {
            continue;
        };
        for next in snapshot.neighbors(id) {
            let next = next.as_str();
            if settled.contains(next) {
                continue;
            }
            let Some(to) = snapshot.node(next) else {
                continue;
            };
            if !is_admissible(role, to) {
                continue;
            }
            let candidate = cost + edge_weight(from, to);
            let known = dist.get(next).copied().unwrap_or(f64::INFINITY);
            if candidate < known {
                dist.insert(next, candidate);
                prev.insert(next, id);
                frontier.push(Frontier {
                    cost: candidate,
                    id: next,
                });
            }
        }
    }

    let cost = *dist.get(end)?;
    let path = backtrack(&prev, start, end, snapshot.node_count())?;
    Some(Route { path, cost })
}

fn backtrack(
    prev: &AHashMap<&str, &str>,
    start: &str,
    end: &str,
    limit: usize,
) -> Option<Vec<String>> {
    let mut path = vec![end.to_string()];
    let mut current = end;
    while current != start {
        current = *prev.get(current)?;
        path.push(current.to_string());
        if path.len() > limit {
            return None;
        }
    }
    path.reverse();
    Some(path)
}

/// Min-heap entry; equal costs pop the smaller identifier first.
#[derive(Debug, Clone, Copy)]
struct Frontier<'a> {
    cost: f64,
    id: &'a str,
}

impl Ord for Frontier<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.id.cmp(self.id))
    }
}

impl PartialOrd for Frontier<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Frontier<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Frontier<'_> {}
