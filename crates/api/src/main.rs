use catalogo_api::{HttpConfig, app};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    catalogo_observability::init();

    let http = HttpConfig::from_env()?;
    let running = app::build_composer(http).start().await?;

    running.wait().await?;
    Ok(())
}
