mod app;
mod config;
mod effects;
mod output;

use jobwatch_logging::watch_info;

fn main() -> anyhow::Result<()> {
    let path = config::config_path_from_env();
    let (config, source) = config::load(&path)?;
    let config = config.with_env_overrides(|key| std::env::var(key).ok());
    config.validate()?;

    jobwatch_logging::initialize(&config.log_destination(), config.log_level()?);
    watch_info!("{}", source);

    app::run(config)
}
