//! Fixture archives for unit tests.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// One tar member of a fixture.
pub(crate) enum Entry {
    Dir(&'static str),
    File(&'static str, &'static str),
}

impl Entry {
    pub(crate) fn dir(path: &'static str) -> Self {
        Self::Dir(path)
    }

    pub(crate) fn file(path: &'static str, body: &'static str) -> Self {
        Self::File(path, body)
    }
}

/// A file-list archive written to a temporary directory.
pub(crate) struct ArchiveFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl ArchiveFixture {
    pub(crate) fn plain(entries: &[Entry]) -> Self {
        Self::write(tar_bytes(entries))
    }

    pub(crate) fn gzip(entries: &[Entry]) -> Self {
        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        gz.write_all(&tar_bytes(entries)).unwrap();
        Self::write(gz.finish().unwrap())
    }

    pub(crate) fn zstd(entries: &[Entry]) -> Self {
        Self::write(zstd::encode_all(&tar_bytes(entries)[..], 3).unwrap())
    }

    fn write(bytes: Vec<u8>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("core.files");
        fs::write(&path, bytes).unwrap();
        Self { _dir: dir, path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }
}

fn tar_bytes(entries: &[Entry]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for entry in entries {
        let mut header = tar::Header::new_gnu();
        match entry {
            Entry::Dir(path) => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_size(0);
                header.set_mode(0o755);
                builder.append_data(&mut header, path, std::io::empty()).unwrap();
            }
            Entry::File(path, body) => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_size(body.len() as u64);
                header.set_mode(0o644);
                builder
                    .append_data(&mut header, path, body.as_bytes())
                    .unwrap();
            }
        }
    }
    builder.into_inner().unwrap()
}
