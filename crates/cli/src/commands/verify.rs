use cassie_core::{CoreError, DestinationDatabase};

use crate::config::DatabaseConfig;
use crate::destination::SqlDestination;

pub async fn run(database: DatabaseConfig) -> anyhow::Result<()> {
    let destination = SqlDestination::connect(database).await?;

    if !destination.verify_connection().await {
        return Err(CoreError::connection("verification query failed").into());
    }

    println!("Destination database is reachable");
    Ok(())
}
