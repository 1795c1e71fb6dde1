//! Behavioural tests for the JSON file geocode cache across runs.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use courier_core::test_support::{InputOrderOptimizer, StubGeocoder, StubMatrixProvider};
use courier_core::{AddressRecord, Geocoder, Pipeline};
use courier_data::JsonFileGeocodeCache;
use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

#[derive(Debug, Default)]
struct PersistWorld {
    dir: RefCell<Option<TempDir>>,
    cache_path: RefCell<Option<Utf8PathBuf>>,
    service: RefCell<Option<StubGeocoder>>,
    lookups: RefCell<Vec<usize>>,
}

#[fixture]
fn world() -> PersistWorld {
    PersistWorld::default()
}

fn prepare_cache_path(world: &PersistWorld) -> Utf8PathBuf {
    let dir = TempDir::new().expect("tempdir");
    let path = Utf8PathBuf::from_path_buf(dir.path().join("cache/coords.json"))
        .expect("utf-8 tempdir");
    *world.dir.borrow_mut() = Some(dir);
    *world.cache_path.borrow_mut() = Some(path.clone());
    path
}

#[given("an empty cache file")]
fn given_empty_cache(world: &PersistWorld) {
    prepare_cache_path(world);
}

#[given("a corrupt cache file")]
fn given_corrupt_cache(world: &PersistWorld) {
    let path = prepare_cache_path(world);
    courier_fs::write_atomic(&path, b"[1, 2").expect("seed corrupt cache");
}

#[given("a geocoding service that knows every address")]
fn given_service(world: &PersistWorld) {
    let service = StubGeocoder::default()
        .with_address("West Depot", Coord { x: -1.55, y: 53.80 })
        .with_address("East Depot", Coord { x: -1.35, y: 53.80 })
        .with_address("1 West Lane", Coord { x: -1.551, y: 53.801 })
        .with_address("1 East Lane", Coord { x: -1.349, y: 53.801 })
        .with_address("2 East Lane", Coord { x: -1.348, y: 53.802 });
    *world.service.borrow_mut() = Some(service);
}

#[when("a run is planned and the cache is reloaded for a second run")]
fn when_planned_across_reload(world: &PersistWorld) {
    let path = world
        .cache_path
        .borrow()
        .clone()
        .expect("cache path prepared");
    let service = world
        .service
        .borrow()
        .clone()
        .expect("geocoding service configured");
    let depots = [
        AddressRecord::new("West", "West Depot"),
        AddressRecord::new("East", "East Depot"),
    ];
    let deliveries = [
        AddressRecord::new("A", "1 West Lane"),
        AddressRecord::new("B", "1 East Lane"),
        AddressRecord::new("C", "2 East Lane"),
    ];
    for _ in 0..2 {
        let cache = JsonFileGeocodeCache::load(path.clone()).expect("cache loads");
        let mut pipeline = Pipeline::new(
            Geocoder::new(service.clone(), cache),
            StubMatrixProvider::default(),
            InputOrderOptimizer,
        );
        let outcome = pipeline.run(&depots, &deliveries).expect("run succeeds");
        world.lookups.borrow_mut().push(outcome.geocoding_lookups);
    }
}

#[then("the second run issues no geocoding lookups")]
fn then_no_lookups(world: &PersistWorld) {
    assert_eq!(world.lookups.borrow().get(1), Some(&0));
}

#[then("the first run looks up every address")]
fn then_first_run_looks_up_all(world: &PersistWorld) {
    assert_eq!(*world.lookups.borrow(), vec![5, 0]);
}

#[scenario(path = "tests/features/persistent_cache.feature", index = 0)]
fn reloaded_cache_is_warm(world: PersistWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/persistent_cache.feature", index = 1)]
fn corrupt_cache_starts_cold(world: PersistWorld) {
    let _ = world;
}
