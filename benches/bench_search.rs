use std::{sync::Arc, time::Duration};

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use floorgraph::{
    GraphStore, NavService, ReloadCoordinator, Role, SqliteSource,
    bench_utils::{BuildingDataset, BuildingShape, cell_id, generate_building},
    find_route,
};

const BUILDING_SEED: u64 = 0x4D41;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

struct ReadyBuilding {
    label: String,
    shape: BuildingShape,
    store: GraphStore,
}

fn bench_shapes() -> &'static [(usize, usize, usize)] {
    #[cfg(feature = "bench-ci")]
    {
        &[(2, 10, 10), (4, 20, 20)]
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        &[(3, 20, 20), (6, 40, 40), (10, 60, 60)]
    }
}

fn shape(floors: usize, width: usize, height: usize) -> BuildingShape {
    BuildingShape {
        employee_ratio: 0.05,
        drop_ratio: 0.1,
        ..BuildingShape::grid(floors, width, height)
    }
}

fn ready_buildings() -> Vec<ReadyBuilding> {
    bench_shapes()
        .iter()
        .map(|&(floors, width, height)| {
            let shape = shape(floors, width, height);
            let dataset = generate_building(shape, BUILDING_SEED + (floors * width) as u64);
            let built = dataset.build();
            let store = GraphStore::new();
            store.replace(built.nodes, built.adjacency);
            ReadyBuilding {
                label: format!("{floors}x{width}x{height}"),
                shape,
                store,
            }
        })
        .collect()
}

fn materialize(dataset: &BuildingDataset) -> SqliteSource {
    let source = SqliteSource::open_in_memory().expect("source");
    for node in &dataset.nodes {
        source.insert_node(node).expect("node");
    }
    for edge in &dataset.edges {
        source.insert_edge(edge).expect("edge");
    }
    source
}

fn bench_cross_building(c: &mut Criterion) {
    let cases = ready_buildings();
    let mut group = c.benchmark_group("route_cross_building");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for case in &cases {
        let start = cell_id(0, case.shape.height / 2, 1);
        let end = cell_id(case.shape.floors - 1, case.shape.height / 2, case.shape.width - 2);
        for role in [Role::Employee, Role::PwdStudent, Role::General] {
            let id = format!("{}_{}", case.label, role.as_str());
            group.bench_function(BenchmarkId::from_parameter(id), |b| {
                b.iter(|| {
                    let snapshot = case.store.snapshot();
                    find_route(&snapshot, &start, &end, role)
                });
            });
        }
    }
    group.finish();
}

fn bench_same_floor(c: &mut Criterion) {
    let cases = ready_buildings();
    let mut group = c.benchmark_group("route_same_floor");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for case in &cases {
        let start = cell_id(0, 0, 1);
        let end = cell_id(0, case.shape.height - 1, case.shape.width - 2);
        group.bench_function(BenchmarkId::from_parameter(&case.label), |b| {
            b.iter(|| find_route(&case.store.snapshot(), &start, &end, Role::General));
        });
    }
    group.finish();
}

fn bench_reload(c: &mut Criterion) {
    let mut group = c.benchmark_group("reload");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for &(floors, width, height) in bench_shapes() {
        let dataset = generate_building(shape(floors, width, height), BUILDING_SEED);
        let source = materialize(&dataset);
        let coordinator = ReloadCoordinator::new(Arc::new(GraphStore::new()));
        let label = format!("{floors}x{width}x{height}");
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter(|| coordinator.reload(&source).expect("reload"));
        });
    }
    group.finish();
}

fn bench_service_query(c: &mut Criterion) {
    let &(floors, width, height) = bench_shapes().last().expect("shape");
    let dataset = generate_building(shape(floors, width, height), BUILDING_SEED);
    let service = NavService::new(materialize(&dataset));
    service.reload().expect("reload");
    let request = floorgraph::PathRequest::new(
        &cell_id(0, 1, 1),
        &cell_id(floors - 1, height - 2, width - 2),
        "pwd-student",
    );
    c.bench_function("service_find_path", |b| {
        b.iter(|| service.find_path(&request));
    });
}

criterion_group!(
    name = search_benches;
    config = Criterion::default();
    targets = bench_cross_building, bench_same_floor, bench_reload, bench_service_query
);
criterion_main!(search_benches);
