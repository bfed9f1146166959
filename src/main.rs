use log::{error, info, LevelFilter};
use rocket::Error as RocketError;
use thiserror::Error;

/// Errors that stop the ledger from coming up at all.
#[derive(Debug, Error)]
enum Error {
    #[error("Ledger failed to start: {0}")]
    Launch(#[from] RocketError),
}

async fn serve() -> Result<(), Error> {
    info!("Reading ledger configuration");
    let rocket = election_ledger::build().ignite().await?;
    let config = rocket.config();
    info!(
        "Election ledger accepting requests at {}:{}",
        config.address, config.port
    );
    // Request logging is ours from here on.
    log4rs_dynamic_filters::DynamicLevelFilter::set("rocket", LevelFilter::Off);
    let _ = rocket.launch().await?;
    info!("Election ledger stopped");
    Ok(())
}

#[rocket::main]
async fn main() {
    if let Err(e) = log4rs::init_file("log4rs.yaml", log4rs_dynamic_filters::default_deserializers()) {
        eprintln!("Could not read log4rs.yaml: {e}");
        std::process::exit(1)
    }

    if let Err(err) = serve().await {
        error!("{err}");
        std::process::exit(1)
    }
}
