//! End-to-end read → draw scenarios against an in-memory scene.

use eustress_topomap::mesh_builder::extrude_ring;
use eustress_topomap::ring::assemble_ring;
use eustress_topomap::scene::MeshKind;
use eustress_topomap::{ArcRef, MapScene, SceneMesh, TopoMap, TopoMapConfig, TopoMapError};

/// Scene keeping every live mesh by id
#[derive(Default)]
struct RecordingScene {
    next_id: u32,
    live: Vec<(u32, SceneMesh)>,
    disposed: u32,
    peak_live: usize,
}

impl MapScene for RecordingScene {
    type Handle = u32;

    fn add(&mut self, mesh: SceneMesh) -> u32 {
        self.next_id += 1;
        self.live.push((self.next_id, mesh));
        self.peak_live = self.peak_live.max(self.live.len());
        self.next_id
    }

    fn dispose(&mut self, _handle: &u32) {
        self.disposed += 1;
    }

    fn remove(&mut self, handle: u32) {
        self.live.retain(|(id, _)| *id != handle);
    }
}

impl RecordingScene {
    fn positions(&self) -> Vec<Vec<[f32; 3]>> {
        self.live.iter().map(|(_, m)| m.buffers.positions.clone()).collect()
    }
}

const SINGLE_TRIANGLE: &str = r#"{
    "type": "Topology",
    "arcs": [[[0, 0], [1, 0], [0, 1], [-1, -1]]],
    "objects": { "map": { "type": "GeometryCollection", "geometries": [
        { "type": "Polygon", "arcs": [[0]] }
    ] } }
}"#;

/// Two islands sharing a border arc, a multi-part region and a coastline,
/// quantized with a transform.
const ARCHIPELAGO: &str = r#"{
    "type": "Topology",
    "transform": { "scale": [0.01, 0.01], "translate": [139.0, 35.0] },
    "arcs": [
        [[100, 0], [0, 100]],
        [[100, 100], [-100, 0], [0, -100], [100, 0]],
        [[100, 0], [100, 0], [0, 100], [-100, 0]],
        [[400, 400], [50, 0], [0, 50], [-50, -50]],
        [[600, 600], [50, 0], [0, 50], [-50, -50]],
        [[0, 300], [200, 20], [200, -20]]
    ],
    "objects": { "map": { "type": "GeometryCollection", "geometries": [
        { "type": "Polygon", "arcs": [[0, 1]] },
        { "type": "Polygon", "arcs": [[2, -1]] },
        { "type": "MultiPolygon", "arcs": [[[3]], [[4]]] },
        { "type": "LineString", "arcs": [5] }
    ] } }
}"#;

#[test]
fn single_polygon_end_to_end() {
    let mut map: TopoMap<u32> = TopoMap::new(&TopoMapConfig::default());
    map.read(SINGLE_TRIANGLE).unwrap();

    let catalog = map.catalog();
    let ring = assemble_ring(&[ArcRef::from(0)], catalog.arcs(), map.projector()).unwrap();
    assert_eq!(ring.len(), 4);
    assert!(ring.is_closed());

    let solid = extrude_ring(&ring, &TopoMapConfig::default().extrusion).unwrap();
    assert!(solid.volume() > 0.0);

    let mut scene = RecordingScene::default();
    let report = map.draw(&mut scene);
    assert_eq!(report.published, 1);
    assert!(report.diagnostics.is_empty());
    assert_eq!(scene.live.len(), 1);
    assert_eq!(scene.live[0].1.kind, MeshKind::Solid);
    assert!((scene.live[0].1.buffers.volume() - solid.volume()).abs() < 1e-6);
}

#[test]
fn archipelago_publishes_one_solid_and_one_line() {
    let mut map: TopoMap<u32> = TopoMap::default();
    map.change_center_pos(35.0, 139.0);
    map.read(ARCHIPELAGO).unwrap();

    let mut scene = RecordingScene::default();
    let report = map.draw(&mut scene);

    assert_eq!(report.published, 2);
    assert!(report.diagnostics.is_empty());
    let kinds: Vec<MeshKind> = scene.live.iter().map(|(_, m)| m.kind).collect();
    assert_eq!(kinds, vec![MeshKind::Line, MeshKind::Solid]);

    let solid = &scene.live[1].1.buffers;
    assert!(solid.volume() > 0.0);
    // Each of the four rings is an independent closed prism
    let extrusion = TopoMapConfig::default().extrusion;
    let mut expected = 0.0;
    for refs in [vec![0, 1], vec![2, -1], vec![3], vec![4]] {
        let refs: Vec<ArcRef> = refs.into_iter().map(ArcRef::from).collect();
        let ring = assemble_ring(&refs, map.catalog().arcs(), map.projector()).unwrap();
        assert!(ring.is_closed());
        expected += extrude_ring(&ring, &extrusion).unwrap().volume();
    }
    assert!((solid.volume() - expected).abs() < 1e-4);
}

#[test]
fn redraw_is_idempotent_and_never_leaks() {
    let mut map: TopoMap<u32> = TopoMap::default();
    map.read(ARCHIPELAGO).unwrap();
    let mut scene = RecordingScene::default();

    map.draw(&mut scene);
    let first = scene.positions();
    let report = map.draw(&mut scene);
    let second = scene.positions();

    assert_eq!(report.disposed, 2);
    assert_eq!(scene.disposed, 2);
    assert_eq!(first, second);
    // one solid + one LineString
    assert_eq!(scene.peak_live, 2);
}

#[test]
fn empty_inputs_publish_nothing() {
    let mut map: TopoMap<u32> = TopoMap::default();
    let err = map.read("{}").unwrap_err();
    assert!(matches!(err, TopoMapError::PayloadFormat(_)));

    let mut scene = RecordingScene::default();
    let report = map.draw(&mut scene);
    assert_eq!(report.published, 0);
    assert!(scene.live.is_empty());

    map.read(r#"{ "arcs": [], "objects": { "map": { "geometries": [] } } }"#).unwrap();
    assert!(map.catalog().is_empty());
    map.draw(&mut scene);
    assert!(scene.live.is_empty());
    assert!(!map.is_drawn());
}

#[test]
fn reread_replaces_catalog_and_redraw_clears_old_meshes() {
    let mut map: TopoMap<u32> = TopoMap::default();
    let mut scene = RecordingScene::default();

    map.read(ARCHIPELAGO).unwrap();
    map.draw(&mut scene);
    assert_eq!(scene.live.len(), 2);

    map.read(SINGLE_TRIANGLE).unwrap();
    assert_eq!(map.catalog().regions().len(), 1);
    map.draw(&mut scene);
    assert_eq!(scene.live.len(), 1);

    map.read(r#"{ "arcs": [], "objects": { "map": { "geometries": [] } } }"#).unwrap();
    map.draw(&mut scene);
    assert!(scene.live.is_empty());
}

#[test]
fn bad_region_is_reported_and_neighbours_still_render() {
    let payload = r#"{
        "arcs": [[[0, 0], [1, 0], [0, 1], [-1, -1]]],
        "objects": { "map": { "geometries": [
            { "type": "Polygon", "arcs": [[0]] },
            { "type": "Polygon", "arcs": [[-9]] },
            { "type": "LineString", "arcs": [12] }
        ] } }
    }"#;
    let mut map: TopoMap<u32> = TopoMap::default();
    map.read(payload).unwrap();

    let mut scene = RecordingScene::default();
    let report = map.draw(&mut scene);
    assert_eq!(report.published, 1);
    assert_eq!(
        report.diagnostics.iter().map(|d| d.region).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(matches!(
        report.diagnostics[0].error,
        TopoMapError::ArcIndexOutOfRange { arc: 8, len: 1 }
    ));
}

#[test]
fn polar_regions_stay_finite() {
    let payload = r#"{
        "arcs": [[[-180, -90], [360, 0], [0, 10], [-360, 0], [0, -10]]],
        "objects": { "map": { "geometries": [ { "type": "Polygon", "arcs": [[0]] } ] } }
    }"#;
    let mut map: TopoMap<u32> = TopoMap::default();
    map.read(payload).unwrap();

    let mut scene = RecordingScene::default();
    map.draw(&mut scene);
    let solid = &scene.live[0].1.buffers;
    assert!(solid.positions.iter().flatten().all(|c| c.is_finite()));
    assert!(solid.volume() > 0.0);
}

#[test]
fn each_line_string_is_its_own_mesh() {
    let payload = r#"{
        "arcs": [
            [[0, 0], [1, 0], [0, 1], [-1, -1]],
            [[0, 2], [2, 0]],
            [[0, 3], [1, 1], [1, -1]]
        ],
        "objects": { "map": { "geometries": [
            { "type": "LineString", "arcs": [1] },
            { "type": "Polygon", "arcs": [[0]] },
            { "type": "LineString", "arcs": [-3] }
        ] } }
    }"#;
    let mut map: TopoMap<u32> = TopoMap::default();
    map.read(payload).unwrap();

    let mut scene = RecordingScene::default();
    let report = map.draw(&mut scene);
    assert_eq!(report.published, 3);
    let kinds: Vec<MeshKind> = scene.live.iter().map(|(_, m)| m.kind).collect();
    assert_eq!(kinds, vec![MeshKind::Line, MeshKind::Line, MeshKind::Solid]);
    // two-point and three-point paths
    assert_eq!(scene.live[0].1.buffers.vertex_count(), 4);
    assert_eq!(scene.live[1].1.buffers.vertex_count(), 6);

    map.draw(&mut scene);
    assert_eq!(scene.live.len(), 3);
    assert_eq!(scene.disposed, 3);
}

#[test]
fn overflowing_coordinates_are_reported_and_neighbours_still_render() {
    // arc 1 accumulates past f64::MAX and decodes to an infinite longitude
    let payload = r#"{
        "arcs": [
            [[0, 0], [1, 0], [0, 1], [-1, -1]],
            [[1e308, 0], [1e308, 0], [0, 1]]
        ],
        "objects": { "map": { "geometries": [
            { "type": "Polygon", "arcs": [[0]] },
            { "type": "Polygon", "arcs": [[1]] },
            { "type": "LineString", "arcs": [1] }
        ] } }
    }"#;
    let mut map: TopoMap<u32> = TopoMap::default();
    map.read(payload).unwrap();
    assert_eq!(map.catalog().arcs().get(1).unwrap()[1].lon, f64::INFINITY);

    let mut scene = RecordingScene::default();
    let report = map.draw(&mut scene);

    assert_eq!(report.published, 1);
    assert_eq!(
        report.diagnostics.iter().map(|d| d.region).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert!(report
        .diagnostics
        .iter()
        .all(|d| matches!(d.error, TopoMapError::ProjectionSingularity { .. })));
    assert_eq!(scene.live[0].1.kind, MeshKind::Solid);
    assert!(scene.live[0].1.buffers.positions.iter().flatten().all(|c| c.is_finite()));
}

#[test]
fn out_of_range_latitude_limit_keeps_poles_finite() {
    let payload = r#"{
        "arcs": [[[-180, -90], [360, 0], [0, 10], [-360, 0], [0, -10]]],
        "objects": { "map": { "geometries": [ { "type": "Polygon", "arcs": [[0]] } ] } }
    }"#;
    for limit in [90.0, 95.0, -10.0, f64::NAN] {
        let mut config = TopoMapConfig::default();
        config.projection.max_latitude = limit;
        let mut map: TopoMap<u32> = TopoMap::new(&config);
        map.read(payload).unwrap();

        let mut scene = RecordingScene::default();
        let report = map.draw(&mut scene);
        assert!(report.diagnostics.is_empty(), "limit {limit}");
        let solid = &scene.live[0].1.buffers;
        assert!(solid.positions.iter().flatten().all(|c| c.is_finite()));
        assert!(solid.volume() > 0.0);
    }
}
