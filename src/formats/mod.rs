//! Binary-format collaborator.
//!
//! Thin adapter over `goblin`. Parsing never raises: bytes that are not the
//! requested format yield `None`, and a parser panic on hostile input is
//! contained and reported the same way.

pub mod names;


use goblin::elf::Elf;
use goblin::pe::PE;
use serde::Serialize;
use std::panic;
use tracing::trace;

/// Coarse executable format from magic bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Format {
    Elf,
    Pe,
    MachO,
    Unknown,
}

/// Identifies the container format from leading magic bytes only.
pub fn detect(data: &[u8]) -> Format {
    if data.starts_with(b"\x7fELF") {
        return Format::Elf;
    }
    if data.starts_with(b"MZ") {
        return Format::Pe;
    }
    match data.get(0..4) {
        Some([0xfe, 0xed, 0xfa, 0xce])
        | Some([0xfe, 0xed, 0xfa, 0xcf])
        | Some([0xce, 0xfa, 0xed, 0xfe])
        | Some([0xcf, 0xfa, 0xed, 0xfe])
        | Some([0xca, 0xfe, 0xba, 0xbe]) => Format::MachO,
        _ => Format::Unknown,
    }
}

/// Parses `data` as ELF, or reports absence.
pub fn parse_elf(data: &[u8]) -> Option<Elf<'_>> {
    if detect(data) != Format::Elf {
        return None;
    }
    match panic::catch_unwind(|| Elf::parse(data)) {
        Ok(Ok(elf)) => Some(elf),
        Ok(Err(e)) => {
            trace!(error = %e, "ELF parse rejected input");
            None
        }
        Err(_) => {
            trace!("ELF parser panicked");
            None
        }
    }
}

/// Parses `data` as PE, or reports absence.
pub fn parse_pe(data: &[u8]) -> Option<PE<'_>> {
    if detect(data) != Format::Pe {
        return None;
    }
    match panic::catch_unwind(|| PE::parse(data)) {
        Ok(Ok(pe)) => Some(pe),
        Ok(Err(e)) => {
            trace!(error = %e, "PE parse rejected input");
            None
        }
        Err(_) => {
            trace!("PE parser panicked");
            None
        }
    }
}
