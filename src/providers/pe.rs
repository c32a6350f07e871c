//! PE providers: general file information, DOS header and COFF header.

use super::{scalar, Extraction, FeatureMap, FeatureProvider, OutputKind};
use crate::error::{Result, RevealerError};
use crate::formats::{self, names, Format};
use goblin::pe::PE;
use serde_json::json;

fn parsed(data: &[u8]) -> Result<PE<'_>> {
    formats::parse_pe(data).ok_or_else(|| RevealerError::UnsupportedFormat("not a PE image".into()))
}

/// Size, name, table counts and presence flags for optional directories.
#[derive(Debug, Default)]
pub struct GeneralFileInfo;

impl FeatureProvider for GeneralFileInfo {
    fn name(&self) -> &str {
        "pe_general"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn can_extract(&self, data: &[u8]) -> bool {
        formats::detect(data) == Format::Pe
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let pe = parsed(data)?;
        let opt = pe.header.optional_header.as_ref();
        let dirs = opt.map(|o| &o.data_directories);
        let general = json!({
            "virtual_size": opt.map(|o| o.windows_fields.size_of_image).unwrap_or(0),
            "name": pe.name.unwrap_or(""),
            "sizeof_headers": opt.map(|o| o.windows_fields.size_of_headers).unwrap_or(0),
            "has_signature": dirs.is_some_and(|d| d.get_certificate_table().is_some()),
            "has_debug": pe.debug_data.is_some(),
            "exports": pe.exports.len(),
            "imports": pe.imports.len(),
            "libraries": pe.libraries.len(),
            "has_relocations": dirs.is_some_and(|d| d.get_base_relocation_table().is_some()),
            "has_resources": dirs.is_some_and(|d| d.get_resource_table().is_some()),
            "has_tls": dirs.is_some_and(|d| d.get_tls_table().is_some()),
            "symbols": pe.header.coff_header.number_of_symbol_table,
            "is_64": pe.is_64,
            "is_dll": pe.is_lib,
        });
        let mut map = FeatureMap::new();
        map.insert("general".into(), general);
        scalar(map)
    }
}

/// MS-DOS stub header fields.
#[derive(Debug, Default)]
pub struct MsDosHeader;

impl FeatureProvider for MsDosHeader {
    fn name(&self) -> &str {
        "pe_dos_header"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn can_extract(&self, data: &[u8]) -> bool {
        formats::detect(data) == Format::Pe
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let pe = parsed(data)?;
        let dos = &pe.header.dos_header;
        let header = json!({
            "magic": dos.signature,
            "pages_file": dos.pages_in_file,
            "checksum": dos.checksum,
            "oem_id": dos.oem_id,
            "oem_info": dos.oem_info,
            "pe_pointer": dos.pe_pointer,
        });
        let mut map = FeatureMap::new();
        map.insert("dos_header".into(), header);
        scalar(map)
    }
}

/// COFF file header fields and the raw PE signature bytes.
#[derive(Debug, Default)]
pub struct PeHeader;

impl FeatureProvider for PeHeader {
    fn name(&self) -> &str {
        "pe_header"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn can_extract(&self, data: &[u8]) -> bool {
        formats::detect(data) == Format::Pe
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let pe = parsed(data)?;
        let coff = &pe.header.coff_header;
        let header = json!({
            "timestamp": coff.time_date_stamp,
            "machine": names::pe_machine(coff.machine),
            "characteristics": names::pe_characteristics(coff.characteristics),
            "numberof_sections": coff.number_of_sections,
            "numberof_symbols": coff.number_of_symbol_table,
            "pe_signature": pe.header.signature.to_le_bytes(),
        });
        let mut map = FeatureMap::new();
        map.insert("pe_header".into(), header);
        scalar(map)
    }
}
