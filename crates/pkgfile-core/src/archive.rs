//! Streaming access to file-list archives.
//!
//! Handles tar streams compressed with gzip, zstd, bzip2 or xz (or stored
//! uncompressed). Compression is sniffed from the leading magic bytes, so
//! the file extension does not matter. Entries are produced lazily in
//! physical order; nothing is extracted to disk and the stream cannot be
//! rewound.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use tar::EntryType;

use crate::error::{EngineError, Result};
use crate::manifest::{MANIFEST_NAME, ManifestLines};

/// Magic bytes for ZSTD compression (Little Endian: 0xFD2FB528 -> 28 B5 2F FD)
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];
/// Magic bytes for gzip.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];
/// Magic bytes for bzip2 (`BZh`).
pub const BZIP2_MAGIC: [u8; 3] = *b"BZh";
/// Magic bytes for xz.
pub const XZ_MAGIC: [u8; 6] = [0xFD, b'7', b'z', b'X', b'Z', 0x00];

/// Read buffer for the underlying file.
const READ_BUFFER: usize = 64 * 1024;

type Decoded = Box<dyn Read>;

/// Compression wrapped around the tar stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    /// Plain tar.
    None,
    /// gzip (`.tar.gz`), the historical pacman default.
    Gzip,
    /// Zstandard (`.tar.zst`).
    Zstd,
    /// bzip2 (`.tar.bz2`).
    Bzip2,
    /// xz (`.tar.xz`).
    Xz,
}

impl Compression {
    /// Detect compression from the first bytes of a file.
    pub fn detect(magic: &[u8]) -> Self {
        if magic.starts_with(&GZIP_MAGIC) {
            Self::Gzip
        } else if magic.starts_with(&ZSTD_MAGIC) {
            Self::Zstd
        } else if magic.starts_with(&BZIP2_MAGIC) {
            Self::Bzip2
        } else if magic.starts_with(&XZ_MAGIC) {
            Self::Xz
        } else {
            Self::None
        }
    }

    /// Short codec name.
    pub fn name(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Gzip => "gzip",
            Self::Zstd => "zstd",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
        }
    }
}

/// Kind of an archive entry, as far as the scan cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Regular file with a data body.
    Regular,
    /// Directory marker.
    Directory,
    /// Symbolic or hard link.
    Link,
    /// Anything else (devices, fifos, global headers).
    Other,
}

impl From<EntryType> for EntryKind {
    fn from(kind: EntryType) -> Self {
        if kind.is_file() {
            Self::Regular
        } else if kind.is_dir() {
            Self::Directory
        } else if kind.is_symlink() || kind.is_hard_link() {
            Self::Link
        } else {
            Self::Other
        }
    }
}

/// An opened archive, read once from front to back.
///
/// Dropping the stream closes the file and any decoder state.
pub struct ArchiveStream {
    path: PathBuf,
    compression: Compression,
    archive: tar::Archive<Decoded>,
}

impl fmt::Debug for ArchiveStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveStream")
            .field("path", &self.path)
            .field("compression", &self.compression)
            .finish_non_exhaustive()
    }
}

impl ArchiveStream {
    /// Open `path` for a single forward scan.
    ///
    /// # Errors
    ///
    /// - [`EngineError::NotFound`] if the path is missing or not a regular file.
    /// - [`EngineError::Open`] if the file or its decoder cannot be opened.
    pub fn open(path: &Path) -> Result<Self> {
        let not_found = || EngineError::NotFound {
            path: path.to_path_buf(),
        };
        let metadata = fs::metadata(path).map_err(|_| not_found())?;
        if !metadata.is_file() {
            return Err(not_found());
        }

        let open_err = |source| EngineError::Open {
            path: path.to_path_buf(),
            source,
        };
        let file = File::open(path).map_err(open_err)?;
        let mut reader = BufReader::with_capacity(READ_BUFFER, file);
        let compression = Compression::detect(reader.fill_buf().map_err(open_err)?);

        let decoded: Decoded = match compression {
            Compression::None => Box::new(reader),
            Compression::Gzip => Box::new(flate2::read::MultiGzDecoder::new(reader)),
            Compression::Zstd => {
                Box::new(zstd::stream::read::Decoder::with_buffer(reader).map_err(open_err)?)
            }
            Compression::Bzip2 => Box::new(bzip2::read::MultiBzDecoder::new(reader)),
            Compression::Xz => Box::new(xz2::read::XzDecoder::new_multi_decoder(reader)),
        };

        tracing::debug!(
            "Opened {} ({} compression)",
            path.display(),
            compression.name()
        );

        Ok(Self {
            path: path.to_path_buf(),
            compression,
            archive: tar::Archive::new(decoded),
        })
    }

    /// Path the stream was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Detected compression.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Iterate the entries in physical order.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Archive`] when called a second time on the
    /// same stream; archives are single pass.
    pub fn entries(&mut self) -> Result<Entries<'_>> {
        let inner = self
            .archive
            .entries()
            .map_err(|source| EngineError::Archive {
                path: self.path.clone(),
                source,
            })?;
        Ok(Entries {
            path: &self.path,
            inner,
        })
    }
}

/// Lazy iterator over the entries of an [`ArchiveStream`].
pub struct Entries<'a> {
    path: &'a Path,
    inner: tar::Entries<'a, Decoded>,
}

impl fmt::Debug for Entries<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<ArchiveEntry<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let archive_err = |source| EngineError::Archive {
            path: self.path.to_path_buf(),
            source,
        };

        let data = match self.inner.next()? {
            Ok(data) => data,
            Err(e) => return Some(Err(archive_err(e))),
        };
        let path = match data.path() {
            Ok(p) => p.to_string_lossy().into_owned(),
            Err(e) => return Some(Err(archive_err(e))),
        };
        let kind = EntryKind::from(data.header().entry_type());

        Some(Ok(ArchiveEntry { path, kind, data }))
    }
}

/// One entry of the archive with its unread data.
///
/// Unread data is skipped when the entry is dropped and the iterator
/// advances.
pub struct ArchiveEntry<'a> {
    path: String,
    kind: EntryKind,
    data: tar::Entry<'a, Decoded>,
}

impl fmt::Debug for ArchiveEntry<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArchiveEntry")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<'a> ArchiveEntry<'a> {
    /// Full path inside the archive.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Entry kind.
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Whether the entry is a regular file.
    pub fn is_regular(&self) -> bool {
        self.kind == EntryKind::Regular
    }

    /// Final path component.
    pub fn file_name(&self) -> &str {
        split_path(&self.path).1
    }

    /// Everything before the final component, or `.` at the top level.
    pub fn parent(&self) -> &str {
        split_path(&self.path).0
    }

    /// Whether this entry is a package's `files` manifest.
    pub fn is_manifest(&self) -> bool {
        self.file_name() == MANIFEST_NAME
    }

    /// Consume the entry and read its body as manifest lines.
    pub fn into_lines(self) -> ManifestLines<BufReader<tar::Entry<'a, Decoded>>> {
        ManifestLines::new(BufReader::new(self.data))
    }
}

/// Split a path into `(dirname, basename)` the way `dirname(3)` and
/// `basename(3)` would for a file path.
fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", base)) => ("/", base),
        Some((dir, base)) => (dir, base),
        None => (".", path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    fn tar_bytes(files: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, body) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(body.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, body.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn read_all(path: &Path) -> Vec<(String, EntryKind, Vec<String>)> {
        let mut stream = ArchiveStream::open(path).unwrap();
        let mut out = Vec::new();
        for entry in stream.entries().unwrap() {
            let entry = entry.unwrap();
            let path = entry.path().to_string();
            let kind = entry.kind();
            let lines = entry.into_lines().collect::<std::io::Result<Vec<_>>>().unwrap();
            out.push((path, kind, lines));
        }
        out
    }

    #[test]
    fn test_detect_compression() {
        assert_eq!(Compression::detect(&[0x1F, 0x8B, 0x08]), Compression::Gzip);
        assert_eq!(Compression::detect(&[0x28, 0xB5, 0x2F, 0xFD, 0x00]), Compression::Zstd);
        assert_eq!(Compression::detect(b"BZh91AY"), Compression::Bzip2);
        assert_eq!(Compression::detect(&XZ_MAGIC), Compression::Xz);
        assert_eq!(Compression::detect(b"bash-5.2-1/"), Compression::None);
        assert_eq!(Compression::detect(&[]), Compression::None);
    }

    #[test]
    fn test_split_path() {
        assert_eq!(split_path("bash-5.2-1/files"), ("bash-5.2-1", "files"));
        assert_eq!(split_path("core/bash-5.2-1/files"), ("core/bash-5.2-1", "files"));
        assert_eq!(split_path("files"), (".", "files"));
        assert_eq!(split_path("/files"), ("/", "files"));
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let err = ArchiveStream::open(&dir.path().join("core.files")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_open_directory_is_not_found() {
        let dir = tempdir().unwrap();
        let err = ArchiveStream::open(dir.path()).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_plain_tar_entries_in_order() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("core.files");
        fs::write(
            &path,
            tar_bytes(&[("b-1-1/files", "%FILES%\nusr/bin/b\n"), ("a-1-1/desc", "x\n")]),
        )
        .unwrap();

        let entries = read_all(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "b-1-1/files");
        assert_eq!(entries[0].1, EntryKind::Regular);
        assert_eq!(entries[0].2, vec!["usr/bin/b"]);
        assert_eq!(entries[1].0, "a-1-1/desc");
    }

    #[test]
    fn test_gzip_stream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("core.files");
        let mut gz = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        gz.write_all(&tar_bytes(&[("zlib-1.3-1/files", "%FILES%\nusr/lib/libz.so.1\n")]))
            .unwrap();
        fs::write(&path, gz.finish().unwrap()).unwrap();

        let stream = ArchiveStream::open(&path).unwrap();
        assert_eq!(stream.compression(), Compression::Gzip);
        drop(stream);

        let entries = read_all(&path);
        assert_eq!(entries[0].2, vec!["usr/lib/libz.so.1"]);
    }

    #[test]
    fn test_zstd_stream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("extra.files");
        let compressed =
            zstd::encode_all(&tar_bytes(&[("jq-1.7-1/files", "%FILES%\nusr/bin/jq\n")])[..], 3)
                .unwrap();
        fs::write(&path, compressed).unwrap();

        let entries = read_all(&path);
        assert_eq!(entries[0].0, "jq-1.7-1/files");
        assert_eq!(entries[0].2, vec!["usr/bin/jq"]);
    }

    #[test]
    fn test_bzip2_stream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("old.files");
        let mut bz = bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
        bz.write_all(&tar_bytes(&[("sed-4.9-1/files", "%FILES%\nusr/bin/sed\n")]))
            .unwrap();
        fs::write(&path, bz.finish().unwrap()).unwrap();

        let entries = read_all(&path);
        assert_eq!(entries[0].2, vec!["usr/bin/sed"]);
    }

    #[test]
    fn test_xz_stream() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("extra.files");
        let mut xz = xz2::write::XzEncoder::new(Vec::new(), 6);
        xz.write_all(&tar_bytes(&[
            ("jq-1.7-1/desc", "%NAME%\njq\n"),
            ("jq-1.7-1/files", "%FILES%\nusr/bin/jq\nusr/share/man/man1/jq.1.gz\n"),
        ]))
        .unwrap();
        fs::write(&path, xz.finish().unwrap()).unwrap();

        let stream = ArchiveStream::open(&path).unwrap();
        assert_eq!(stream.compression(), Compression::Xz);
        drop(stream);

        let entries = read_all(&path);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].0, "jq-1.7-1/files");
        assert_eq!(entries[1].2, vec!["usr/bin/jq", "usr/share/man/man1/jq.1.gz"]);
    }

    #[test]
    fn test_entries_are_single_pass() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("core.files");
        fs::write(&path, tar_bytes(&[("a-1-1/files", "%FILES%\n")])).unwrap();

        let mut stream = ArchiveStream::open(&path).unwrap();
        assert_eq!(stream.entries().unwrap().count(), 1);
        assert!(stream.entries().is_err());
    }

    #[test]
    fn test_empty_file_has_no_entries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.files");
        fs::write(&path, b"").unwrap();

        let mut stream = ArchiveStream::open(&path).unwrap();
        assert_eq!(stream.entries().unwrap().count(), 0);
    }
}
