use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    model::{EdgeRecord, NodeRecord},
    snapshot::{BuiltGraph, GraphBuilder},
};

const CELL_SPACING: i64 = 10;

#[derive(Clone, Debug)]
pub struct BuildingDataset {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl BuildingDataset {
    pub fn build(&self) -> BuiltGraph {
        GraphBuilder::from_records(self.nodes.clone(), &self.edges)
    }
}

/// Grid floors joined by a stair column at the first corner and an elevator
/// shaft at the opposite one.
#[derive(Clone, Copy, Debug)]
pub struct BuildingShape {
    pub floors: usize,
    pub width: usize,
    pub height: usize,
    /// Share of hallway cells turned into employee-only rooms.
    pub employee_ratio: f64,
    /// Share of in-floor corridors left out.
    pub drop_ratio: f64,
}

impl BuildingShape {
    pub fn grid(floors: usize, width: usize, height: usize) -> Self {
        Self {
            floors,
            width,
            height,
            employee_ratio: 0.0,
            drop_ratio: 0.0,
        }
    }
}

pub fn cell_id(floor: usize, row: usize, col: usize) -> String {
    format!("F{floor}-{row}-{col}")
}

pub fn generate_building(shape: BuildingShape, seed: u64) -> BuildingDataset {
    assert!(
        shape.floors > 0 && shape.width > 1 && shape.height > 0,
        "building must have at least one floor of two cells"
    );
    let mut rng = StdRng::seed_from_u64(seed);
    let stairs = (0, 0);
    let elevator = (shape.height - 1, shape.width - 1);
    let mut nodes = Vec::with_capacity(shape.floors * shape.width * shape.height);
    let mut edges = Vec::new();

    for floor in 0..shape.floors {
        for row in 0..shape.height {
            for col in 0..shape.width {
                let (kind, access) = if (row, col) == stairs {
                    ("stairs", None)
                } else if (row, col) == elevator {
                    let restricted = rng.gen_bool(shape.employee_ratio.clamp(0.0, 1.0));
                    ("elevator", restricted.then_some("employee"))
                } else if rng.gen_bool(shape.employee_ratio.clamp(0.0, 1.0)) {
                    ("room", Some("employee"))
                } else {
                    ("hallway", Some("all"))
                };
                nodes.push(NodeRecord::new(
                    &cell_id(floor, row, col),
                    floor as i64 + 1,
                    col as i64 * CELL_SPACING,
                    row as i64 * CELL_SPACING,
                    kind,
                    access,
                ));
                if col + 1 < shape.width && !rng.gen_bool(shape.drop_ratio.clamp(0.0, 1.0)) {
                    edges.push(EdgeRecord::new(
                        &cell_id(floor, row, col),
                        &cell_id(floor, row, col + 1),
                    ));
                }
                if row + 1 < shape.height && !rng.gen_bool(shape.drop_ratio.clamp(0.0, 1.0)) {
                    edges.push(EdgeRecord::new(
                        &cell_id(floor, row, col),
                        &cell_id(floor, row + 1, col),
                    ));
                }
            }
        }
        if floor + 1 < shape.floors {
            for (row, col) in [stairs, elevator] {
                edges.push(EdgeRecord::new(
                    &cell_id(floor, row, col),
                    &cell_id(floor + 1, row, col),
                ));
            }
        }
    }
    BuildingDataset { nodes, edges }
}
