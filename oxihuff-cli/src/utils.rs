//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use std::ffi::OsString;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Extension of compressed files.
pub const COMPRESSED_EXTENSION: &str = "huf";

/// Create a byte progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Create a byte counter for output of unknown length.
pub fn create_spinner(enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("[{elapsed_precise}] {spinner} {bytes} {msg}")
            .expect("spinner template is valid"),
    );
    pb
}

/// Default output path for compressing `input`: `<input>.huf`.
pub fn compressed_path(input: &Path) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(COMPRESSED_EXTENSION);
    PathBuf::from(name)
}

/// Default output path for decompressing `input`.
///
/// Strips a trailing `.huf`, otherwise appends `.out`.
pub fn decompressed_path(input: &Path) -> PathBuf {
    if input.extension().is_some_and(|ext| ext == COMPRESSED_EXTENSION) {
        return input.with_extension("");
    }
    let mut name = OsString::from(input.as_os_str());
    name.push(".out");
    PathBuf::from(name)
}

/// Whether `a` and `b` name the same file once `..` and symlinks resolve.
///
/// A path that does not exist yet cannot be an existing input, so the
/// literal comparison is enough there.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (std::fs::canonicalize(a), std::fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

/// Create `output` for writing, refusing to clobber it unless `force`.
pub fn create_output(
    input: &Path,
    output: &Path,
    force: bool,
) -> Result<BufWriter<File>, Box<dyn std::error::Error>> {
    if is_same_file(input, output) {
        return Err(format!("output {} is the input file", output.display()).into());
    }
    if output.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )
        .into());
    }
    Ok(BufWriter::new(File::create(output)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compressed_path() {
        assert_eq!(
            compressed_path(Path::new("dir/notes.txt")),
            PathBuf::from("dir/notes.txt.huf")
        );
    }

    #[test]
    fn test_decompressed_path() {
        assert_eq!(
            decompressed_path(Path::new("notes.txt.huf")),
            PathBuf::from("notes.txt")
        );
        assert_eq!(
            decompressed_path(Path::new("notes.bin")),
            PathBuf::from("notes.bin.out")
        );
    }

    #[test]
    fn test_create_output_rejects_input() {
        let path = Path::new("same.bin");
        assert!(create_output(path, path, true).is_err());
    }

    #[test]
    fn test_create_output_rejects_aliased_input() {
        let dir = std::env::temp_dir()
            .join(format!("oxihuff_alias_test_{}", std::process::id()));
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        let input = dir.join("data.bin");
        std::fs::write(&input, b"12345678").unwrap();

        let alias = dir.join("sub").join("..").join("data.bin");
        assert!(create_output(&input, &alias, true).is_err());
        assert_eq!(std::fs::read(&input).unwrap(), b"12345678");

        let other = dir.join("data.bin.huf");
        assert!(create_output(&input, &other, true).is_ok());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
