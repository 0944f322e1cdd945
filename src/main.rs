//! Process entry point.
//!
//! Reads the environment, installs logging, wires database → controller →
//! router, and serves until SIGTERM or Ctrl-C.
//!
//! Try:
//!   PORT=3000 cargo run
//!   curl -X POST localhost:3000/person \
//!        -d '{"firstName":"Testy","lastName":"McTesterson","dob":"1970-01-01"}'

use std::process::ExitCode;
use std::sync::Arc;

use person_api::config::{Config, DatastoreKind};
use person_api::controller::Controller;
use person_api::db::Database;
use person_api::db::dummy::DummyDb;
use person_api::db::memory::MemoryDb;
use person_api::telemetry::{LogFormat, init_logging};
use person_api::{Error, Server, app};
use tracing::{error, info, info_span};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_logging(LogFormat::default());
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    init_logging(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "the server encountered an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), Error> {
    let database: Arc<dyn Database> = match config.datastore {
        DatastoreKind::Memory => Arc::new(MemoryDb::new()),
        DatastoreKind::Dummy => Arc::new(DummyDb::new()),
    };
    info!(datastore = ?config.datastore, "database ready");

    let controls = Controller::new(database, info_span!("controller"));
    let service = app::service(&controls);

    Server::bind(config.addr)
        .await?
        .grace_period(config.shutdown_grace)
        .serve(service)
        .await
}
