//! Input path handling

use crate::error::CliError;
use pagemerge_engine::Input;
use std::path::Path;

/// Resolve an input path given on the command line
///
/// Fails with [`CliError::FileNotFound`] when the path is not an existing
/// file, so nothing is read before both inputs are known to be present.
pub fn resolve_input(path: &Path, role: &'static str) -> Result<Input, CliError> {
    if !path.is_file() {
        return Err(CliError::FileNotFound {
            role,
            path: path.to_path_buf(),
        });
    }
    log::debug!("{role} input: {}", path.display());
    Ok(Input::from_file(path))
}
