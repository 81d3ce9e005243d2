//! Serialization of the assembled byte image (the "object format").
//!
//! The component design does not mandate a particular envelope, only
//! that it losslessly round-trips a byte sequence and that implementations
//! SHOULD stay compatible with the reference tool's envelope, a plain JSON
//! array of integers. `serde_json` gives us that for free without hand-
//! rolling a parser for a format this simple.

use std::fs;
use std::io;
use std::path::Path;

/// Writes `bytes` to `path` as a JSON array of unsigned byte values.
pub fn save(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let json = serde_json::to_string(bytes)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(path, json)
}

/// Reads a JSON array of unsigned byte values from `path`.
pub fn load(path: &Path) -> io::Result<Vec<u8>> {
    let contents = fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::env::temp_dir;

    #[test]
    fn round_trips_a_byte_image() {
        let path = temp_dir().join("mos6502-toolchain-objfile-test.out");
        let bytes = vec![0xA9, 0x05, 0x85, 0x10, 0x00];
        save(&path, &bytes).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded, bytes);
        let _ = fs::remove_file(&path);
    }
}
