//! Save-to-file: output validation and the verbatim write.
//!
//! Saving refuses (as a user warning, not an error) when there is no
//! real code in the output area: either nothing was generated yet, or a
//! request is still in flight and the area shows the placeholder.

use std::path::Path;

use thiserror::Error;
use tracing::info;

/// Transient message shown in the output area while a request runs.
pub const PLACEHOLDER: &str = ">>> Generating C code... Please wait.";

/// Marker identifying placeholder output; matched by prefix so the check
/// survives trailing whitespace edits.
const PLACEHOLDER_MARKER: &str = ">>> Generating";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SaveWarning {
    #[error("There is no code to save.")]
    NothingToSave,
}

/// Check whether the current output is real code worth writing.
pub fn validate(output: &str) -> Result<(), SaveWarning> {
    let trimmed = output.trim();
    if trimmed.is_empty() || trimmed.contains(PLACEHOLDER_MARKER) {
        return Err(SaveWarning::NothingToSave);
    }
    Ok(())
}

/// Write the output verbatim to `path`. Direct overwrite, default text
/// encoding, no transformation.
pub fn write_source(path: &Path, text: &str) -> std::io::Result<()> {
    std::fs::write(path, text)?;
    info!(path = %path.display(), bytes = text.len(), "Saved generated code");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_output_is_refused() {
        assert_eq!(validate(""), Err(SaveWarning::NothingToSave));
        assert_eq!(validate("   \n\t "), Err(SaveWarning::NothingToSave));
    }

    #[test]
    fn placeholder_output_is_refused() {
        assert_eq!(validate(PLACEHOLDER), Err(SaveWarning::NothingToSave));
        assert_eq!(
            validate(&format!("{PLACEHOLDER}\n\n")),
            Err(SaveWarning::NothingToSave)
        );
    }

    #[test]
    fn real_code_passes() {
        assert_eq!(validate("int main(void) { return 0; }"), Ok(()));
    }

    #[test]
    fn write_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        let code = "#include <stdio.h>\n\nint main(void) {\n    return 0;\n}\n";

        write_source(&path, code).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), code);
    }

    #[test]
    fn write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        std::fs::write(&path, "old contents that are much longer than the new ones").unwrap();

        write_source(&path, "int x;").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "int x;");
    }
}
