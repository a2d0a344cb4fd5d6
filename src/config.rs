//! Sheet options from `config.toml`.
//!
//! ```toml
//! [sheet]
//! reference_mode = "literal"   # or "legacy"
//! recalc_mode = "direct"       # or "transitive"
//! relocate_on_copy = false
//! rows = 20
//! cols = 10
//! ```

use cellgrid_core::SheetOptions;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    sheet: SheetOptions,
}

/// Resolve sheet options. Problems with the file become warnings and the defaults
/// are used instead; a missing default file is not worth a warning.
pub fn load_options(config_file: Option<&PathBuf>, skip: bool) -> (SheetOptions, Vec<String>) {
    let mut warnings = Vec::new();
    if skip {
        return (SheetOptions::default(), warnings);
    }

    let Some(path) = config_file.cloned().or_else(user_config_path) else {
        return (SheetOptions::default(), warnings);
    };
    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (SheetOptions::default(), warnings);
    }

    match read_config(&path) {
        Ok(file) => (file.sheet, warnings),
        Err(warning) => {
            warnings.push(warning);
            (SheetOptions::default(), warnings)
        }
    }
}

fn read_config(path: &Path) -> Result<ConfigFile, String> {
    let meta = std::fs::metadata(path)
        .map_err(|err| format!("Failed to read metadata for {}: {}", path.display(), err))?;
    if meta.len() > MAX_CONFIG_FILE_BYTES {
        return Err(format!(
            "Refusing to read {}: file too large ({} bytes, max {})",
            path.display(),
            meta.len(),
            MAX_CONFIG_FILE_BYTES
        ));
    }
    let content = std::fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {}", path.display(), err))?;
    parse_config(&content).map_err(|err| format!("Failed to parse {}: {}", path.display(), err))
}

fn parse_config(content: &str) -> Result<ConfigFile, toml::de::Error> {
    toml::from_str(content)
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "cellgrid")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
