use std::{
    fs, io,
    path::{Path, PathBuf},
};

use csolver::{FormatError, Grid};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access maze file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Malformed maze file {path:?}: {source}")]
    Format {
        path: PathBuf,
        #[source]
        source: FormatError,
    },
}

pub fn load_grid(path: &Path) -> Result<Grid, StorageError> {
    let content = fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_owned(),
        source,
    })?;

    let grid = content.parse().map_err(|source| StorageError::Format {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("loaded maze from {:?}", path);
    Ok(grid)
}

pub fn save_grid(grid: &Grid, path: &Path) -> Result<(), StorageError> {
    fs::write(path, grid.to_string()).map_err(|source| StorageError::Io {
        path: path.to_owned(),
        source,
    })?;
    log::debug!("saved maze to {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use csolver::{Block, MazeGenerator};

    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("msolver-{}-{}.txt", std::process::id(), name))
    }

    #[test]
    fn saved_maze_loads_back() {
        let path = temp_file("roundtrip");
        let (grid, start, finish) = MazeGenerator::new(Some(4)).build(21, 15).unwrap();

        save_grid(&grid, &path).unwrap();
        let loaded = load_grid(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, grid);
        assert_eq!(loaded.block(start), Block::Start);
        assert_eq!(loaded.block(finish), Block::Finish);
    }

    #[test]
    fn errors_carry_the_path() {
        let path = temp_file("does-not-exist");
        assert!(matches!(load_grid(&path), Err(StorageError::Io { .. })));

        let path = temp_file("malformed");
        fs::write(&path, "2 2\n.o\n").unwrap();
        let err = load_grid(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        match err {
            StorageError::Format { path: p, source } => {
                assert_eq!(p, path);
                assert!(matches!(source, FormatError::MissingRow { line: 3, .. }));
            }
            other => panic!("unexpected error {:?}", other),
        }
    }
}
