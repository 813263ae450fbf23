//! Program files.
//!
//! A program file holds one serialized `RexProgram`, either as JSON or in
//! bincode's binary encoding. References are validated on load, so a file
//! with a forward or dangling `LocalRef` is rejected.

use crate::rex::RexProgram;
use anyhow::{anyhow, Context, Result};
use clap::ValueEnum;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProgramFormat {
    Json,
    Bincode,
}

impl ProgramFormat {
    /// Guess the format from a file extension (`.json`, `.bin`, `.bincode`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "json" => Some(ProgramFormat::Json),
            "bin" | "bincode" => Some(ProgramFormat::Bincode),
            _ => None,
        }
    }

    fn resolve(format: Option<Self>, path: &Path) -> Result<Self> {
        format
            .or_else(|| Self::from_path(path))
            .ok_or_else(|| anyhow!("Cannot tell program format of {}", path.display()))
    }
}

pub fn encode_program(program: &RexProgram, format: ProgramFormat) -> Result<Vec<u8>> {
    match format {
        ProgramFormat::Json => {
            serde_json::to_vec_pretty(program).context("Failed to encode program as JSON")
        }
        ProgramFormat::Bincode => {
            bincode::serialize(program).context("Failed to encode program with bincode")
        }
    }
}

pub fn decode_program(bytes: &[u8], format: ProgramFormat) -> Result<RexProgram> {
    match format {
        ProgramFormat::Json => {
            serde_json::from_slice(bytes).context("Failed to decode JSON program")
        }
        ProgramFormat::Bincode => {
            bincode::deserialize(bytes).context("Failed to decode bincode program")
        }
    }
}

/// Load a program; the format defaults to the one implied by the extension
pub fn load_program(path: &Path, format: Option<ProgramFormat>) -> Result<RexProgram> {
    let format = ProgramFormat::resolve(format, path)?;
    let bytes = fs::read(path)
        .with_context(|| format!("Failed to read program file {}", path.display()))?;
    let program = decode_program(&bytes, format)
        .with_context(|| format!("Invalid program file {}", path.display()))?;
    log::debug!(
        "loaded program with {} expressions from {}",
        program.exprs().len(),
        path.display()
    );
    Ok(program)
}

pub fn save_program(program: &RexProgram, path: &Path, format: Option<ProgramFormat>) -> Result<()> {
    let format = ProgramFormat::resolve(format, path)?;
    let bytes = encode_program(program, format)?;
    fs::write(path, bytes)
        .with_context(|| format!("Failed to write program file {}", path.display()))
}
