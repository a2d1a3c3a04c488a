//! Routes command implementation

use anyhow::Result;
use tierlog_core::{constants, LogConfig};
use tierlog_sink::{route, RotationConfig, Route};

use crate::output::{print_info, print_routes};

pub fn execute(config: &LogConfig) -> Result<()> {
    if config.is_console() {
        print_info(&format!(
            "Console output: {} and above go to stderr",
            config.level
        ));
        return Ok(());
    }

    print_routes(&routes(config, &constants::pod_name()));
    Ok(())
}

fn routes(config: &LogConfig, pod: &str) -> Vec<Route> {
    let rotation = RotationConfig::new(config.file_max_age(), config.file_rotation_time());
    route(
        &config.log_dir,
        pod,
        &config.service_name,
        config.level,
        &rotation,
    )
}
