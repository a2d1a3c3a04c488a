//! Emit command implementation

use anyhow::Result;
use serde_json::Value;
use tierlog::Field;
use tierlog_core::LogConfig;

use crate::cli::EmitArgs;
use crate::output::print_error;

/// Exit status when a Panic (or development DPanic) entry is emitted
pub const FAULT_EXIT_CODE: i32 = 2;

pub fn execute(config: &LogConfig, args: EmitArgs) -> Result<()> {
    let composite = tierlog::try_init(super::options(config))?;
    let fields: Vec<Field> = args
        .fields
        .into_iter()
        .map(|(key, value)| field(key, value))
        .collect();

    // Fatal entries flush and exit inside `log`
    let outcome = composite.logger().log(args.at, &args.message, &fields);
    composite.flush()?;

    if let Err(fault) = outcome {
        print_error(&fault.to_string());
        std::process::exit(FAULT_EXIT_CODE);
    }
    Ok(())
}

/// `n=3` becomes a number, `ok=true` a bool, anything else a string
fn field(key: String, raw: String) -> Field {
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) if !value.is_string() => Field::new(key, value),
        _ => Field::string(key, raw),
    }
}
