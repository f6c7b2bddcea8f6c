//! Filesystem helpers for reading recorded input, built on `cap-std` and
//! `camino`.
#![forbid(unsafe_code)]

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open a UTF-8 file path for reading using ambient authority.
///
/// # Errors
///
/// Returns the underlying I/O error when the file is missing or unreadable.
pub fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::io::{Read, Write};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> (TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp dir");
        (dir, root)
    }

    #[rstest]
    fn opens_existing_file(workdir: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workdir;
        let path = root.join("replay.json");
        let mut file = std::fs::File::create(&path).expect("create file");
        file.write_all(b"[]").expect("write file");

        let mut contents = String::new();
        open_utf8_file(&path)
            .expect("file should open")
            .read_to_string(&mut contents)
            .expect("file should read");
        assert_eq!(contents, "[]");
    }

    #[rstest]
    fn missing_file_is_not_found(workdir: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workdir;
        let err = open_utf8_file(&root.join("absent.json")).expect_err("file is absent");
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[rstest]
    fn directory_cannot_be_read_as_a_file(workdir: (TempDir, Utf8PathBuf)) {
        let (_dir, root) = workdir;
        let outcome = open_utf8_file(&root).and_then(|mut file| {
            let mut contents = String::new();
            file.read_to_string(&mut contents)
        });
        assert!(outcome.is_err());
    }
}
