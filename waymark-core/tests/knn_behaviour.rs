//! Behavioural tests for point-of-interest nearest-neighbour queries.

use std::cell::RefCell;

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use waymark_core::{Edge, Engine, KnnMetric, Node, NodeId, Query, QueryOutcome, RoadGraph};

#[derive(Debug, Default)]
struct KnnWorld {
    engine: RefCell<Engine>,
    nodes: RefCell<Vec<NodeId>>,
}

impl KnnWorld {
    fn ask(&self, poi: &str, metric: KnnMetric) {
        let outcome = self.engine.borrow_mut().execute(&Query::Knn {
            point: Coord { x: 0.1, y: 0.0 },
            poi: poi.to_owned(),
            k: 2,
            metric,
        });
        let QueryOutcome::Nodes(nodes) = outcome else {
            panic!("knn query produced {outcome:?}");
        };
        self.nodes.replace(nodes);
    }
}

#[fixture]
fn world() -> KnnWorld {
    KnnWorld::default()
}

#[given("a network where the closest shop is reached by a detour")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_detour_network(world: &KnnWorld) {
    let shop = |id, x| Node::new(id, Coord { x, y: 0.0 }, vec!["shop".to_owned()]);
    let nodes = vec![
        Node::untagged(1, Coord { x: 0.0, y: 0.0 }),
        shop(2, 1.0),
        shop(3, 2.0),
        shop(4, -1.5),
    ];
    let edges = vec![
        Edge::new(1, 1, 2, 50.0),
        Edge::new(2, 1, 3, 10.0),
        Edge::new(3, 1, 4, 20.0),
    ];
    let graph = RoadGraph::from_parts(nodes, edges).expect("valid detour network");
    world.engine.replace(Engine::new(graph));
}

#[when("I ask for the two nearest shops by planar distance")]
fn when_planar(world: &KnnWorld) {
    world.ask("shop", KnnMetric::Euclidean);
}

#[when("I ask for the two nearest shops by road distance")]
fn when_network(world: &KnnWorld) {
    world.ask("shop", KnnMetric::Network);
}

#[when("I ask for the two nearest fuel stations by road distance")]
fn when_fuel(world: &KnnWorld) {
    world.ask("fuel", KnnMetric::Network);
}

#[then("the shops returned are 2 and 4")]
fn then_planar_shops(world: &KnnWorld) {
    assert_eq!(*world.nodes.borrow(), vec![2, 4]);
}

#[then("the shops returned are 3 and 4")]
fn then_network_shops(world: &KnnWorld) {
    assert_eq!(*world.nodes.borrow(), vec![3, 4]);
}

#[then("no junctions are returned")]
fn then_nothing(world: &KnnWorld) {
    assert!(world.nodes.borrow().is_empty());
}

#[scenario(path = "tests/features/knn.feature", index = 0)]
fn planar_ranking(world: KnnWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/knn.feature", index = 1)]
fn network_ranking(world: KnnWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/knn.feature", index = 2)]
fn unknown_tags(world: KnnWorld) {
    let _ = world;
}
