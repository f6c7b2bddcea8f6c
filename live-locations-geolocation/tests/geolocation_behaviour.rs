//! Behavioural tests for [`Geolocator`].
//!
//! These tests use [`ScriptedPlatform`] so no positioning hardware is needed.

use std::cell::RefCell;
use std::sync::{Arc, Mutex};

use live_locations_core::{PositionError, PositionErrorCode, PositionReading};
use live_locations_geolocation::test_support::ScriptedPlatform;
use live_locations_geolocation::{
    Geolocator, NativeError, PositionEvent, PositionOptions, WatchId,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tokio::runtime::Runtime;

type Events = Arc<Mutex<Vec<PositionEvent>>>;

struct GeolocationWorld {
    runtime: Runtime,
    platform: RefCell<Option<Arc<ScriptedPlatform>>>,
    geolocator: RefCell<Option<Geolocator<ScriptedPlatform>>>,
    result: RefCell<Option<Result<PositionReading, PositionError>>>,
    watch: RefCell<Option<WatchId>>,
    events: Events,
}

#[fixture]
fn world() -> GeolocationWorld {
    GeolocationWorld {
        runtime: tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build Tokio runtime"),
        platform: RefCell::new(None),
        geolocator: RefCell::new(None),
        result: RefCell::new(None),
        watch: RefCell::new(None),
        events: Arc::default(),
    }
}

fn sample_reading(latitude: f64, longitude: f64) -> PositionReading {
    PositionReading::new(latitude, longitude, 15.0, 1_700_000_000_000)
}

fn install(world: &GeolocationWorld, platform: ScriptedPlatform) {
    let platform = Arc::new(platform);
    world
        .geolocator
        .replace(Some(Geolocator::from_shared(Arc::clone(&platform))));
    world.platform.replace(Some(platform));
}

/// Let spawned delivery tasks run to quiescence.
fn settle(world: &GeolocationWorld) {
    world.runtime.block_on(async {
        for _ in 0..16 {
            tokio::task::yield_now().await;
        }
    });
}

fn delivered(world: &GeolocationWorld) -> Vec<PositionEvent> {
    world.events.lock().expect("lock events").clone()
}

// --- Given steps ---

#[given("a platform without positioning capability")]
fn given_unsupported(world: &GeolocationWorld) {
    world.geolocator.replace(Some(Geolocator::unsupported()));
}

#[given("a platform reporting latitude {latitude} and longitude {longitude}")]
fn given_reporting(world: &GeolocationWorld, latitude: f64, longitude: f64) {
    install(
        world,
        ScriptedPlatform::with_reading(sample_reading(latitude, longitude)),
    );
}

#[given("a platform denying permission")]
fn given_denied(world: &GeolocationWorld) {
    install(
        world,
        ScriptedPlatform::with_error(NativeError::new(1, "User denied Geolocation")),
    );
}

#[given("a platform streaming two readings and one error")]
fn given_streaming(world: &GeolocationWorld) {
    let events = vec![
        Ok(sample_reading(51.5, -0.12)),
        Err(NativeError::new(2, "Position unavailable")),
        Ok(sample_reading(51.6, -0.13)),
    ];
    install(world, ScriptedPlatform::with_stream(events).keep_open());
}

// --- When steps ---

#[when("I request the current position")]
fn when_request(world: &GeolocationWorld) {
    let guard = world.geolocator.borrow();
    let geolocator = guard.as_ref().expect("geolocator must be initialised");
    let result = world.runtime.block_on(geolocator.get_current_position());
    world.result.replace(Some(result));
}

#[when("I watch the position with callbacks")]
fn when_watch(world: &GeolocationWorld) {
    let guard = world.geolocator.borrow();
    let geolocator = guard.as_ref().expect("geolocator must be initialised");
    let readings = Arc::clone(&world.events);
    let errors = Arc::clone(&world.events);
    let id = {
        let _entered = world.runtime.enter();
        geolocator.watch_position_with(
            move |reading| {
                readings
                    .lock()
                    .expect("lock events")
                    .push(PositionEvent::Reading(reading));
            },
            move |error| {
                errors
                    .lock()
                    .expect("lock events")
                    .push(PositionEvent::Error(error));
            },
        )
    };
    world.watch.replace(Some(id));
    settle(world);
}

#[when("I clear the watch twice")]
fn when_clear_twice(world: &GeolocationWorld) {
    let id = (*world.watch.borrow()).expect("watch must be started");
    let guard = world.geolocator.borrow();
    let geolocator = guard.as_ref().expect("geolocator must be initialised");
    geolocator.clear_watch(id);
    geolocator.clear_watch(id);
    settle(world);
}

#[when("I clear watch {raw}")]
fn when_clear_raw(world: &GeolocationWorld, raw: i64) {
    let guard = world.geolocator.borrow();
    let geolocator = guard.as_ref().expect("geolocator must be initialised");
    geolocator.clear_watch(WatchId::from_raw(raw));
    settle(world);
}

#[when("the platform reports another reading")]
fn when_platform_reports(world: &GeolocationWorld) {
    let guard = world.platform.borrow();
    let platform = guard.as_ref().expect("platform must be initialised");
    platform.push_reading(sample_reading(51.7, -0.14));
    settle(world);
}

// --- Then steps ---

#[then("the request fails with code {code} and a {fragment} message")]
fn then_fails(world: &GeolocationWorld, code: u16, fragment: String) {
    let borrowed = world.result.borrow();
    let err = borrowed
        .as_ref()
        .expect("request must have run")
        .as_ref()
        .expect_err("request should fail");
    assert_eq!(err.code.code(), code);
    assert!(
        err.message.contains(&fragment),
        "expected {fragment:?} in {:?}",
        err.message
    );
}

#[then("the reading has latitude {latitude} and longitude {longitude}")]
fn then_reading(world: &GeolocationWorld, latitude: f64, longitude: f64) {
    let borrowed = world.result.borrow();
    let reading = borrowed
        .as_ref()
        .expect("request must have run")
        .as_ref()
        .expect("request should succeed");
    assert_eq!((reading.latitude, reading.longitude), (latitude, longitude));
}

#[then("the platform was asked for a fresh high-accuracy fix")]
fn then_fresh_fix(world: &GeolocationWorld) {
    let guard = world.platform.borrow();
    let platform = guard.as_ref().expect("platform must be initialised");
    assert_eq!(platform.recorded_options(), vec![PositionOptions::ONE_SHOT]);
}

#[then("{readings} readings and {errors} error are delivered")]
fn then_delivered(world: &GeolocationWorld, readings: usize, errors: usize) {
    let events = delivered(world);
    let reading_count = events
        .iter()
        .filter(|event| matches!(event, PositionEvent::Reading(_)))
        .count();
    let error_count = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                PositionEvent::Error(PositionError {
                    code: PositionErrorCode::PositionUnavailable,
                    ..
                })
            )
        })
        .count();
    assert_eq!((reading_count, error_count), (readings, errors));
    assert_eq!(events.len(), readings + errors, "unexpected events {events:?}");
    assert!(
        matches!(
            events.as_slice(),
            [
                PositionEvent::Reading(_),
                PositionEvent::Error(_),
                PositionEvent::Reading(_)
            ]
        ),
        "events arrived out of order: {events:?}"
    );
}

#[then("no callbacks are delivered")]
fn then_nothing(world: &GeolocationWorld) {
    assert!(delivered(world).is_empty());
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/geolocation.feature", name = $title)]
        fn $fn_name(world: GeolocationWorld) {
            let _ = world;
        }
    };
}

register_scenario!(
    unsupported_fails_immediately,
    "a platform without positioning capability fails immediately"
);
register_scenario!(
    one_shot_requests_fresh_fix,
    "a one-shot request asks for a fresh high-accuracy fix"
);
register_scenario!(
    denied_permission_surfaces_error,
    "a denied permission is surfaced as a structured error"
);
register_scenario!(
    watch_delivers_in_order,
    "a watch delivers readings and errors in order"
);
register_scenario!(
    clearing_stops_callbacks,
    "clearing a watch stops further callbacks"
);
register_scenario!(
    clearing_unknown_watch_is_no_op,
    "clearing a never-issued watch is a no-op"
);
