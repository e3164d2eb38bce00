use anyhow::Result;
use skycast_core::Config;

fn main() -> Result<()> {
    // Initialize logging
    skycast_core::init()?;

    let config = match Config::load_validated() {
        Ok((config, _)) => config,
        Err(e) => {
            tracing::error!("{:#}, falling back to defaults", e);
            Config::default()
        }
    };

    tracing::info!("SkyCast starting");
    skycast_ui::run(config)?;
    tracing::info!("SkyCast exited");

    Ok(())
}
