//! Persistence sinks for lowered programs.
//!
//! The bytecode file is a 3-byte `QBC` magic, a little-endian `u16` format
//! version, then the bincode encoding of the [`TargetProgram`].

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{listing, PersistError, TargetProgram};

pub const MAGIC: &[u8; 3] = b"QBC";
pub const FORMAT_VERSION: u16 = 1;

/// Receives the finished program at the end of code generation.
pub trait ProgramSink {
    fn persist(&mut self, program: &TargetProgram) -> Result<(), PersistError>;
}

/// Writes the binary bytecode format to a file.
pub struct BytecodeSink {
    path: PathBuf,
}

impl BytecodeSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        BytecodeSink { path: path.into() }
    }
}

impl ProgramSink for BytecodeSink {
    fn persist(&mut self, program: &TargetProgram) -> Result<(), PersistError> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        write_bytecode(&mut writer, program)?;
        writer.flush()?;
        debug!(path = %self.path.display(), "wrote bytecode");
        Ok(())
    }
}

/// Writes the human-readable listing to a file.
pub struct AssemblySink {
    path: PathBuf,
}

impl AssemblySink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        AssemblySink { path: path.into() }
    }
}

impl ProgramSink for AssemblySink {
    fn persist(&mut self, program: &TargetProgram) -> Result<(), PersistError> {
        std::fs::write(&self.path, listing(program))?;
        debug!(path = %self.path.display(), "wrote assembly listing");
        Ok(())
    }
}

/// Keeps a copy of the last persisted program.
#[derive(Default)]
pub struct MemorySink {
    pub program: Option<TargetProgram>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgramSink for MemorySink {
    fn persist(&mut self, program: &TargetProgram) -> Result<(), PersistError> {
        self.program = Some(program.clone());
        Ok(())
    }
}

pub fn write_bytecode<W: Write>(
    mut writer: W,
    program: &TargetProgram,
) -> Result<(), PersistError> {
    writer.write_all(MAGIC)?;
    writer.write_all(&FORMAT_VERSION.to_le_bytes())?;
    bincode::serialize_into(writer, program)?;
    Ok(())
}

pub fn read_bytecode<R: Read>(mut reader: R) -> Result<TargetProgram, PersistError> {
    let mut magic = [0u8; 3];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(PersistError::BadMagic);
    }
    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let found = u16::from_le_bytes(version);
    if found != FORMAT_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found,
            expected: FORMAT_VERSION,
        });
    }
    Ok(bincode::deserialize_from(reader)?)
}

/// Read a bytecode file written by [`BytecodeSink`].
pub fn load_bytecode(path: &Path) -> Result<TargetProgram, PersistError> {
    read_bytecode(BufReader::new(File::open(path)?))
}
