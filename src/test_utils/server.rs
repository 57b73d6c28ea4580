use axum_test::TestServer;
use rusqlite::Connection;

use crate::{AppState, Environment, RetryPolicy, build_router, seed_database, timezone};

fn get_test_state() -> AppState {
    let connection = Connection::open_in_memory().expect("Could not open database in memory.");

    AppState::new(
        connection,
        Environment::Production,
        "Etc/UTC",
        RetryPolicy::default(),
    )
    .expect("Could not create app state.")
}

/// A server over an empty database.
pub(crate) fn get_test_server() -> TestServer {
    TestServer::new(build_router(get_test_state()))
}

/// A server over a database with the reference data, two customers and five
/// transactions.
pub(crate) fn get_seeded_server() -> TestServer {
    let state = get_test_state();
    let today = timezone::today(&state.local_timezone);
    state
        .database
        .run(|connection| seed_database(today, connection))
        .expect("Could not seed database.");

    TestServer::new(build_router(state))
}
