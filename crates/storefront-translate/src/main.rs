//! Storefront translate - Main Entry Point

use anyhow::Result;
use clap::Parser;
use storefront_translate::Args;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    storefront_translate::run(args).await
}
