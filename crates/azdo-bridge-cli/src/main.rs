mod cli;
mod logging;
mod problem;
mod server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::run().await
}
