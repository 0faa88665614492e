//! Struct archiving functionality
//!
//! To add archiving functionality to a struct implement the `Archived` trait.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use std::path::Path;
use std::fs::{File, OpenOptions};
use csv::WriterBuilder;
pub use csv::Writer;
use serde::Serialize;
use thiserror::Error;

// Internal imports
use crate::session::Session;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// An object used to write CSV archive files.
#[derive(Default)]
pub struct Archiver {
    writer: Option<Writer<File>>
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors which can occur while archiving.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Could not open the archive file: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Could not write the record: {0}")]
    CsvError(#[from] csv::Error),

    #[error("The archiver has not been initialised")]
    NotInitialised
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A trait which enables a struct to be archived as a csv.
///
/// To implement this trait, the struct shall have an `Archiver` member per
/// archived quantity. The archivers shall be setup in the struct's `init` or
/// `new` functions. 
pub trait Archived {
    /// Write the archives for this struct
    fn write(&mut self) -> Result<(), ArchiveError>;
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Archiver {
    /// Create a new archiver from a paricular path relative to the session's
    /// archive root.
    pub fn from_path<P: AsRef<Path>>(
        session: &Session, path: P
    ) -> Result<Self, ArchiveError> {
        let session_path = session.arch_root.join(path);

        // Create any intermediate directories
        if let Some(parent) = session_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Create the file if it does not exist
        File::create(&session_path)?;

        // Open the file in append mode
        let file = OpenOptions::new().append(true).open(session_path)?;

        let w = WriterBuilder::new()
            .has_headers(true)
            .from_writer(file);

        Ok(Self {
            writer: Some(w)
        })
    }

    /// Determine if the archiver has a file to write to.
    pub fn is_init(&self) -> bool {
        self.writer.is_some()
    }

    /// Serialise a record into the archive.
    pub fn serialise<T: Serialize>(
        &mut self, record: T
    ) -> Result<(), ArchiveError> {
        match self.writer {
            Some(ref mut w) => {
                w.serialize(record)?;
                w.flush()?
            },
            None => return Err(ArchiveError::NotInitialised)
        }

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    fn test_session(name: &str) -> Session {
        let root: PathBuf = std::env::temp_dir()
            .join(format!("veh_sim_archive_{}_{}", name, std::process::id()));
        let arch_root = root.join("arch");
        std::fs::create_dir_all(&arch_root).unwrap();

        Session {
            log_file_path: root.join("test.log"),
            session_root: root,
            arch_root,
        }
    }

    #[derive(Serialize)]
    struct Sample {
        tick: u64,
        value: f64
    }

    #[test]
    fn test_archiver_writes_header_and_records() {
        let session = test_session("records");
        let mut arch = Archiver::from_path(&session, "mod/sample.csv").unwrap();
        assert!(arch.is_init());

        arch.serialise(Sample { tick: 0, value: 1.5 }).unwrap();
        arch.serialise(Sample { tick: 1, value: -2.25 }).unwrap();

        let contents = std::fs::read_to_string(
            session.arch_root.join("mod/sample.csv")
        ).unwrap();
        assert_eq!(contents, "tick,value\n0,1.5\n1,-2.25\n");

        std::fs::remove_dir_all(&session.session_root).unwrap();
    }

    #[test]
    fn test_uninit_archiver() {
        let mut arch = Archiver::default();
        assert!(!arch.is_init());
        assert!(matches!(
            arch.serialise(Sample { tick: 0, value: 0.0 }),
            Err(ArchiveError::NotInitialised)
        ));
    }
}
