use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    apilens_cli::main_entry().await
}
