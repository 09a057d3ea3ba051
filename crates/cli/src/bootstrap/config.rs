use answer_domain::{CliOverrides, Config};

/// The file the configuration will be read from, if any.
pub fn config_source(path: Option<&str>) -> Option<String> {
    path.map(str::to_string).or_else(Config::get_config_path)
}

pub fn load_config(path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    Ok(Config::load(path, cli_overrides)?)
}
