//! Behavioural tests for cache-first geocoding.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use courier_core::test_support::{InputOrderOptimizer, StubGeocoder, StubMatrixProvider};
use courier_core::{AddressRecord, Geocoder, MemoryGeocodeCache, Pipeline};
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

#[derive(Debug, Default)]
struct CacheWorld {
    service: RefCell<Option<StubGeocoder>>,
    calls: RefCell<Option<Arc<AtomicUsize>>>,
    lookups: RefCell<Vec<usize>>,
}

#[fixture]
fn world() -> CacheWorld {
    CacheWorld::default()
}

fn take_service(world: &CacheWorld) -> StubGeocoder {
    world
        .service
        .borrow_mut()
        .take()
        .expect("geocoding service configured")
}

#[given("a geocoding service that knows every address")]
fn given_service(world: &CacheWorld) {
    let service = StubGeocoder::default()
        .with_address("West Depot", Coord { x: -1.55, y: 53.80 })
        .with_address("East Depot", Coord { x: -1.35, y: 53.80 })
        .with_address("1 West Lane", Coord { x: -1.551, y: 53.801 })
        .with_address("1 East Lane", Coord { x: -1.349, y: 53.801 });
    *world.calls.borrow_mut() = Some(service.calls());
    *world.service.borrow_mut() = Some(service);
}

#[when("the same run is planned twice")]
fn when_planned_twice(world: &CacheWorld) {
    let depots = [
        AddressRecord::new("West", "West Depot"),
        AddressRecord::new("East", "East Depot"),
    ];
    let deliveries = [
        AddressRecord::new("A", "1 West Lane"),
        AddressRecord::new("B", "1 East Lane"),
    ];
    let mut pipeline = Pipeline::new(
        Geocoder::new(take_service(world), MemoryGeocodeCache::default()),
        StubMatrixProvider::default(),
        InputOrderOptimizer,
    );
    for _ in 0..2 {
        let outcome = pipeline.run(&depots, &deliveries).expect("run succeeds");
        world.lookups.borrow_mut().push(outcome.geocoding_lookups);
    }
}

#[when("one address is resolved twice with different formatting")]
fn when_resolved_twice(world: &CacheWorld) {
    let mut geocoder = Geocoder::new(take_service(world), MemoryGeocodeCache::default());
    let first = geocoder.resolve("1 West Lane").expect("first lookup");
    let second = geocoder.resolve("  1  WEST lane ").expect("second lookup");
    assert_eq!(first, second);
}

#[then("the second run issues no geocoding lookups")]
fn then_no_lookups(world: &CacheWorld) {
    assert_eq!(*world.lookups.borrow(), vec![4, 0]);
}

#[then("the geocoding service was called once")]
fn then_called_once(world: &CacheWorld) {
    let calls = world.calls.borrow();
    let counter = calls.as_ref().expect("geocoding service configured");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[scenario(path = "tests/features/geocode_cache.feature", index = 0)]
fn second_run_is_free(world: CacheWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/geocode_cache.feature", index = 1)]
fn formatting_shares_entry(world: CacheWorld) {
    let _ = world;
}
