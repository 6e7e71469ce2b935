//! Persisted travel-time matrix artefacts.
//!
//! An artefact is a `WMTT` magic, a little-endian `u16` format version and a
//! `bincode` payload holding the node list and the square matrix computed
//! for it. Artefacts are produced offline by the `precompute` command.

use std::io::Read;

use bincode::{deserialize_from, serialize_into};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use waymark_core::{NodeId, TravelTimeMatrix};
use waymark_fs::{create_utf8_file, open_utf8_file};

use crate::error::{TravelTimeFileError, TravelTimeWriteError};

/// File identifier for travel-time artefacts.
pub const TRAVEL_TIME_MAGIC: [u8; 4] = *b"WMTT";

/// Supported version of the travel-time artefact format.
pub const TRAVEL_TIME_VERSION: u16 = 1;

/// Node list and the travel times between every ordered pair of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelTimeArtefact {
    /// Nodes indexing the matrix rows and columns.
    pub nodes: Vec<NodeId>,
    /// `matrix[i][j]` is the time from `nodes[i]` to `nodes[j]`.
    pub matrix: TravelTimeMatrix,
}

impl TravelTimeArtefact {
    /// Pair a node list with its matrix.
    pub const fn new(nodes: Vec<NodeId>, matrix: TravelTimeMatrix) -> Self {
        Self { nodes, matrix }
    }

    /// Whether the matrix has one row and one column per node.
    pub fn is_square(&self) -> bool {
        self.matrix.len() == self.nodes.len()
            && self.matrix.iter().all(|row| row.len() == self.nodes.len())
    }
}

#[derive(Serialize)]
struct TravelTimeFile<'a> {
    magic: [u8; 4],
    version: u16,
    artefact: &'a TravelTimeArtefact,
}

/// Persist `artefact` to `path`, truncating any existing file.
///
/// # Errors
/// Returns [`TravelTimeWriteError`] when the file cannot be created, the
/// payload cannot be encoded, or the data cannot be synced to disk.
pub fn write_travel_times(
    path: &Utf8Path,
    artefact: &TravelTimeArtefact,
) -> Result<(), TravelTimeWriteError> {
    let mut file = create_utf8_file(path).map_err(|source| TravelTimeWriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let payload = TravelTimeFile {
        magic: TRAVEL_TIME_MAGIC,
        version: TRAVEL_TIME_VERSION,
        artefact,
    };
    serialize_into(&mut file, &payload).map_err(|source| TravelTimeWriteError::Encode {
        path: path.to_path_buf(),
        source,
    })?;
    file.sync_all().map_err(|source| TravelTimeWriteError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!(
        "wrote {0}x{0} travel-time artefact to {path}",
        artefact.nodes.len()
    );
    Ok(())
}

/// Load a travel-time artefact written by [`write_travel_times`].
///
/// # Errors
/// Returns [`TravelTimeFileError`] when the file is unreadable, carries the
/// wrong magic or version, cannot be decoded, or holds a non-square matrix.
pub fn load_travel_times(path: &Utf8Path) -> Result<TravelTimeArtefact, TravelTimeFileError> {
    let io_error = |source| TravelTimeFileError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut file = open_utf8_file(path).map_err(io_error)?;

    let mut magic = [0_u8; 4];
    file.read_exact(&mut magic).map_err(io_error)?;
    if magic != TRAVEL_TIME_MAGIC {
        return Err(TravelTimeFileError::InvalidMagic {
            expected: TRAVEL_TIME_MAGIC,
            found: magic,
        });
    }

    let mut version_bytes = [0_u8; 2];
    file.read_exact(&mut version_bytes).map_err(io_error)?;
    let version = u16::from_le_bytes(version_bytes);
    if version != TRAVEL_TIME_VERSION {
        return Err(TravelTimeFileError::UnsupportedVersion {
            found: version,
            supported: TRAVEL_TIME_VERSION,
        });
    }

    let artefact: TravelTimeArtefact =
        deserialize_from(&mut file).map_err(|source| TravelTimeFileError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
    if !artefact.is_square() {
        return Err(TravelTimeFileError::Shape {
            nodes: artefact.nodes.len(),
        });
    }
    Ok(artefact)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    #[fixture]
    fn artefact_path() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("create temp dir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
        (dir, root.join("times.wmtt"))
    }

    fn sample() -> TravelTimeArtefact {
        TravelTimeArtefact::new(
            vec![1, 4],
            vec![
                vec![Some(Duration::ZERO), Some(Duration::from_secs(90))],
                vec![None, Some(Duration::ZERO)],
            ],
        )
    }

    fn write_header(path: &Utf8Path, magic: [u8; 4], version: u16) -> std::fs::File {
        let mut file = std::fs::File::create(path).expect("create artefact file");
        file.write_all(&magic).expect("write magic");
        file.write_all(&version.to_le_bytes()).expect("write version");
        file
    }

    #[rstest]
    fn written_artefacts_load_back(
        #[from(artefact_path)] (_dir, path): (TempDir, Utf8PathBuf),
    ) {
        write_travel_times(&path, &sample()).expect("persist artefact");
        assert_eq!(load_travel_times(&path).expect("load artefact"), sample());
    }

    #[rstest]
    fn missing_file_is_an_io_error() {
        let error = load_travel_times(Utf8Path::new("/non-existent/times.wmtt"))
            .expect_err("missing file should error");
        assert!(matches!(error, TravelTimeFileError::Io { .. }));
    }

    #[rstest]
    fn wrong_magic_is_rejected(#[from(artefact_path)] (_dir, path): (TempDir, Utf8PathBuf)) {
        std::fs::write(&path, b"BAD!").expect("write corrupt header");
        let error = load_travel_times(&path).expect_err("invalid magic should fail");
        assert!(matches!(error, TravelTimeFileError::InvalidMagic { found, .. } if &found == b"BAD!"));
    }

    #[rstest]
    fn future_versions_are_rejected(
        #[from(artefact_path)] (_dir, path): (TempDir, Utf8PathBuf),
    ) {
        drop(write_header(&path, TRAVEL_TIME_MAGIC, TRAVEL_TIME_VERSION + 1));
        let error = load_travel_times(&path).expect_err("unsupported version should fail");
        assert!(matches!(
            error,
            TravelTimeFileError::UnsupportedVersion { found: 2, supported: 1 }
        ));
    }

    #[rstest]
    fn truncated_payload_is_a_decode_error(
        #[from(artefact_path)] (_dir, path): (TempDir, Utf8PathBuf),
    ) {
        drop(write_header(&path, TRAVEL_TIME_MAGIC, TRAVEL_TIME_VERSION));
        let error = load_travel_times(&path).expect_err("decode should fail");
        assert!(matches!(error, TravelTimeFileError::Decode { .. }));
    }

    #[rstest]
    fn ragged_matrix_is_rejected(#[from(artefact_path)] (_dir, path): (TempDir, Utf8PathBuf)) {
        let ragged = TravelTimeArtefact::new(vec![1, 2], vec![vec![Some(Duration::ZERO)]]);
        write_travel_times(&path, &ragged).expect("persist artefact");
        let error = load_travel_times(&path).expect_err("shape check should fail");
        assert!(matches!(error, TravelTimeFileError::Shape { nodes: 2 }));
    }
}
