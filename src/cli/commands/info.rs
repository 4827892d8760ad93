//! Info command implementation

use crate::config::{parse_spec, InfoArgs};

/// Print the spec with every default filled in, as YAML
pub fn run_info(args: InfoArgs) -> Result<(), String> {
    let spec = parse_spec(&args.config).map_err(|e| format!("Config error: {e}"))?;
    let yaml =
        serde_yaml::to_string(&spec).map_err(|e| format!("YAML serialization error: {e}"))?;
    println!("{yaml}");
    Ok(())
}
