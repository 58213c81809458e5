use clap::Parser;
use std::sync::Arc;
use vibe_backend::{Args, Backend, logger, serve};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init(args.log_level);
    let backend = Arc::new(Backend::from_args(&args)?);
    serve(backend, &args).await
}
