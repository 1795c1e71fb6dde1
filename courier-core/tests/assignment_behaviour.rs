//! Behavioural tests for balanced assignment through the pipeline.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use courier_core::test_support::{InputOrderOptimizer, StubGeocoder, StubMatrixProvider};
use courier_core::{
    AddressRecord, AssignError, Geocoder, MemoryGeocodeCache, Pipeline, PipelineError,
    PlanOutcome,
};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct AssignmentWorld {
    depots: RefCell<Vec<AddressRecord>>,
    deliveries: RefCell<Vec<AddressRecord>>,
    calls: RefCell<Option<Arc<AtomicUsize>>>,
    result: RefCell<Option<Result<PlanOutcome, PipelineError>>>,
}

#[fixture]
fn world() -> AssignmentWorld {
    AssignmentWorld::default()
}

fn geocoding_service() -> StubGeocoder {
    StubGeocoder::default()
        .with_address("Leeds Depot", Coord { x: -1.55, y: 53.80 })
        .with_address("York Depot", Coord { x: -1.08, y: 53.96 })
        .with_address("Harrogate Depot", Coord { x: -1.54, y: 53.99 })
        .with_address("1 Leeds Road", Coord { x: -1.551, y: 53.801 })
        .with_address("2 Leeds Road", Coord { x: -1.553, y: 53.802 })
        .with_address("1 York Road", Coord { x: -1.081, y: 53.961 })
        .with_address("2 York Road", Coord { x: -1.083, y: 53.962 })
}

#[given("depots in Leeds and York")]
fn given_two_depots(world: &AssignmentWorld) {
    *world.depots.borrow_mut() = vec![
        AddressRecord::new("Leeds", "Leeds Depot"),
        AddressRecord::new("York", "York Depot"),
    ];
}

#[given("three depots")]
fn given_three_depots(world: &AssignmentWorld) {
    given_two_depots(world);
    world
        .depots
        .borrow_mut()
        .push(AddressRecord::new("Harrogate", "Harrogate Depot"));
}

#[given("two deliveries near each depot")]
fn given_deliveries(world: &AssignmentWorld) {
    *world.deliveries.borrow_mut() = vec![
        AddressRecord::new("L1", "1 Leeds Road"),
        AddressRecord::new("Y1", "1 York Road"),
        AddressRecord::new("L2", "2 Leeds Road"),
        AddressRecord::new("Y2", "2 York Road"),
    ];
}

#[when("the deliveries are planned")]
fn when_planned(world: &AssignmentWorld) {
    let service = geocoding_service();
    *world.calls.borrow_mut() = Some(service.calls());
    let mut pipeline = Pipeline::new(
        Geocoder::new(service, MemoryGeocodeCache::default()),
        StubMatrixProvider::default(),
        InputOrderOptimizer,
    );
    let outcome = pipeline.run(&world.depots.borrow(), &world.deliveries.borrow());
    *world.result.borrow_mut() = Some(outcome);
}

#[then("each vehicle receives the two deliveries near its depot")]
fn then_split(world: &AssignmentWorld) {
    let result = world.result.borrow();
    let outcome = result
        .as_ref()
        .expect("plan attempted")
        .as_ref()
        .expect("plan succeeds");
    let names: Vec<Vec<&str>> = outcome
        .routes()
        .map(|route| route.stops.iter().map(|stop| stop.name.as_str()).collect())
        .collect();
    assert_eq!(names, vec![vec!["L1", "L2"], vec!["Y1", "Y2"]]);
}

#[then("an invalid depot count of 3 is reported")]
fn then_invalid_depots(world: &AssignmentWorld) {
    let result = world.result.borrow();
    match result.as_ref().expect("plan attempted") {
        Err(PipelineError::Assign(AssignError::InvalidDepotCount { found })) => {
            assert_eq!(*found, 3);
        }
        other => panic!("expected an invalid depot count, got {other:?}"),
    }
}

#[then("no address was geocoded")]
fn then_no_geocoding(world: &AssignmentWorld) {
    let calls = world.calls.borrow();
    let counter = calls.as_ref().expect("geocoding service created");
    assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[scenario(path = "tests/features/assignment.feature", index = 0)]
fn splitting_two_clusters(world: AssignmentWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/assignment.feature", index = 1)]
fn rejecting_a_third_depot(world: AssignmentWorld) {
    let _ = world;
}
