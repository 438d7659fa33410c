//! File access shared by the commands. A path of `-` means stdin or stdout.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use super::CommandError;

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

pub fn read_bytes(path: &Path) -> Result<Vec<u8>, CommandError> {
    let read_error = |source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    };
    if is_stdio(path) {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map_err(read_error)?;
        return Ok(buf);
    }
    fs::read(path).map_err(read_error)
}

pub fn read_text(path: &Path) -> Result<String, CommandError> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| CommandError::Read {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

/// Write to `output`, or to stdout when there is none.
pub fn write_output(output: Option<&Path>, bytes: &[u8]) -> Result<(), CommandError> {
    match output {
        Some(path) if !is_stdio(path) => fs::write(path, bytes).map_err(|source| CommandError::Write {
            path: path.to_path_buf(),
            source,
        }),
        _ => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(bytes)
                .and_then(|()| stdout.flush())
                .map_err(|source| CommandError::Write {
                    path: "-".into(),
                    source,
                })
        }
    }
}
