//! Default install locations and Start-Menu shortcut lookup.

use std::env;
use std::path::{Path, PathBuf};

use dsomig_log as logger;

/// Standalone launcher install location.
pub const DEFAULT_SOURCE: &str = r"C:\Program Files (x86)\Drakensang Online";
/// Steam library location of the same game.
pub const DEFAULT_DESTINATION: &str =
    r"C:\Program Files (x86)\Steam\steamapps\common\Drakensang Online";

const SHORTCUT_SUBPATH: [&str; 7] = [
    "AppData",
    "Roaming",
    "Microsoft",
    "Windows",
    "Start Menu",
    "Programs",
    "Drakensang Online",
];

/// Start-Menu entry of the standalone launcher below a user's home directory.
pub fn shortcut_path_under(path_home: &Path) -> PathBuf {
    SHORTCUT_SUBPATH
        .iter()
        .fold(path_home.to_path_buf(), |path, part| path.join(part))
}

/// Resolve the current user's shortcut path, or `None` when no home
/// directory can be determined.
pub fn resolve_user_shortcut_path() -> Option<PathBuf> {
    let path_home = dirs::home_dir();
    logger::debug(&format!(
        "Detected current user: {}",
        current_user_name(path_home.as_deref())
    ));

    let Some(path_home) = path_home else {
        logger::debug("Home directory not found; no shortcut to remove");
        return None;
    };
    let path_shortcut = shortcut_path_under(&path_home);
    logger::debug(&format!(
        "Resolved shortcut path: {}",
        path_shortcut.display()
    ));
    Some(path_shortcut)
}

fn current_user_name(path_home: Option<&Path>) -> String {
    ["USERNAME", "USER"]
        .iter()
        .find_map(|key| env::var(key).ok().filter(|v| !v.is_empty()))
        .or_else(|| {
            path_home
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "unknown".to_string())
}
