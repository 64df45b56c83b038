use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const TEMPLATE_FILE_NAME: &str = "setup.py.template";
pub const OUTPUT_FILE_NAME: &str = "setup.py";

/// Directory the running binary was installed into.
pub fn install_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().map_err(|e| {
        Error::internal_io(e.to_string(), Some("locate executable".to_string()))
    })?;

    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        Error::internal_unexpected(format!(
            "Executable path has no parent directory: {}",
            exe.display()
        ))
    })
}

/// Template location: the explicit override, else the copy shipped next to the binary.
pub fn template_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(path) => absolutize(path),
        None => Ok(install_dir()?.join(TEMPLATE_FILE_NAME)),
    }
}

pub fn output_path(output_dir: &Path) -> Result<PathBuf> {
    Ok(absolutize(output_dir)?.join(OUTPUT_FILE_NAME))
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().map_err(|e| {
        Error::internal_io(e.to_string(), Some("resolve working directory".to_string()))
    })?;
    Ok(cwd.join(path))
}
