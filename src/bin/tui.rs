use anyhow::Result;
use std::fs::File;

#[tokio::main]
async fn main() -> Result<()> {
    // The terminal belongs to the UI; logs go to a file next to the panic log.
    if let Ok(file) = File::create("randuck-tui.log") {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("randuck=info"))
            .target(env_logger::Target::Pipe(Box::new(file)))
            .init();
    }
    randuck::tui::run().await
}
