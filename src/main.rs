//! Roverpool command line entry point

use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    roverpool::cli::run().await
}
