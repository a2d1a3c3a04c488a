//! Assembles cores from options

use std::path::Path;
use std::sync::Arc;
use tierlog_core::{constants, Error, Result, Severity, Threshold};
use tierlog_sink::{
    log_dir, ConsoleEncoder, Core, Encoder, EncoderConfig, JsonEncoder, LevelAndAbove,
    LevelEncoding, RotatingFile, RotationConfig, SinkCore, Tee,
};
use tracing::debug;

use crate::logger::Logger;
use crate::options::Options;

/// Build a logger and the handle to its shared threshold.
///
/// With an empty log path or in development mode there is a single console
/// core gated by the threshold. Otherwise every level from the configured
/// minimum up to Fatal gets its own JSON file that accepts only that level.
pub fn build(options: Options) -> Result<(Logger, Threshold)> {
    let threshold = Threshold::new(options.level);

    let cores = if options.is_console() {
        vec![console_core(&options, &threshold)]
    } else {
        let dir = log_dir(
            &options.log_path,
            &constants::pod_name(),
            &options.service_name,
        );
        let rotation = RotationConfig::new(options.file_max_age, options.file_rotation_time);
        file_cores(&dir, options.level, &rotation)?
    };

    let mut core: Arc<dyn Core> = Arc::new(Tee::new(cores));
    if let Some(wrap) = &options.wrap_core {
        core = wrap(core);
    }

    let logger = Logger::from_parts(core, threshold.clone(), options);
    Ok((logger, threshold))
}

fn console_core(options: &Options, threshold: &Threshold) -> Arc<dyn Core> {
    let encoder = ConsoleEncoder::new(
        EncoderConfig::production().with_level_encoding(LevelEncoding::LowercaseColor),
    );
    Arc::new(SinkCore::new(
        Arc::new(encoder),
        options.console_output.clone(),
        Arc::new(threshold.clone()),
    ))
}

fn file_cores(dir: &Path, min: Severity, rotation: &RotationConfig) -> Result<Vec<Arc<dyn Core>>> {
    std::fs::create_dir_all(dir).map_err(|source| Error::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let encoder: Arc<dyn Encoder> = Arc::new(JsonEncoder::new(EncoderConfig::production()));
    let cores = LevelAndAbove::new(min)
        .enable_levels()
        .into_iter()
        .map(|(level, enabler)| {
            let file = RotatingFile::create(dir, level, rotation)?;
            Ok(Arc::new(SinkCore::new(encoder.clone(), Arc::new(file), enabler)) as Arc<dyn Core>)
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("Routing {} levels to {}", cores.len(), dir.display());
    Ok(cores)
}
