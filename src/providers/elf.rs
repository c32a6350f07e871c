//! ELF providers: header fields, section table and needed libraries.

use super::{scalar, Extraction, FeatureMap, FeatureProvider, OutputKind};
use crate::entropy::shannon_entropy;
use crate::error::{Result, RevealerError};
use crate::formats::{self, names, Format};
use goblin::elf::Elf;
use serde_json::{json, Value};

const SHT_NOBITS: u32 = 8;

fn parsed(data: &[u8]) -> Result<Elf<'_>> {
    formats::parse_elf(data).ok_or_else(|| RevealerError::UnsupportedFormat("not an ELF image".into()))
}

/// ELF file header fields.
#[derive(Debug, Default)]
pub struct ElfHeader;

impl FeatureProvider for ElfHeader {
    fn name(&self) -> &str {
        "elf_header"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn can_extract(&self, data: &[u8]) -> bool {
        formats::detect(data) == Format::Elf
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let elf = parsed(data)?;
        let h = &elf.header;
        let header = json!({
            "header_size": h.e_ehsize,
            "entrypoint": h.e_entry,
            "file_type": names::elf_file_type(h.e_type),
            "identity_class": names::elf_class(h.e_ident[4]),
            "identity_os_abi": names::elf_os_abi(h.e_ident[7]),
            "little_endian": elf.little_endian,
            "machine_type": names::elf_machine(h.e_machine),
            "numberof_sections": h.e_shnum,
            "numberof_segments": h.e_phnum,
            "program_header_size": h.e_phentsize,
            "program_header_offset": h.e_phoff,
            "section_header_size": h.e_shentsize,
            "section_header_offset": h.e_shoff,
            "section_name_table_idx": h.e_shstrndx,
            "arm_flags_list": names::elf_arm_flags(h.e_machine, h.e_flags),
            "hexagon_flags_list": names::elf_hexagon_flags(h.e_machine, h.e_flags),
            "mips_flags_list": names::elf_mips_flags(h.e_machine, h.e_flags),
            "ppc64_flags_list": names::elf_ppc64_flags(h.e_machine, h.e_flags),
            "processor_flag": h.e_flags,
        });
        let mut map = FeatureMap::new();
        map.insert("elf_header".into(), header);
        scalar(map)
    }
}

/// Per-section attributes keyed by section name.
///
/// Sections sharing a name collapse to the last one in table order.
#[derive(Debug, Default)]
pub struct Sections;

impl FeatureProvider for Sections {
    fn name(&self) -> &str {
        "elf_sections"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn can_extract(&self, data: &[u8]) -> bool {
        formats::detect(data) == Format::Elf
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let elf = parsed(data)?;
        let mut sections = FeatureMap::new();
        for sh in &elf.section_headers {
            let name = elf.shdr_strtab.get_at(sh.sh_name).unwrap_or("").to_string();
            let contents = if sh.sh_type == SHT_NOBITS {
                &[][..]
            } else {
                let start = (sh.sh_offset as usize).min(data.len());
                let end = start.saturating_add(sh.sh_size as usize).min(data.len());
                &data[start..end]
            };
            sections.insert(
                name,
                json!({
                    "alignment": sh.sh_addralign,
                    "entropy": shannon_entropy(contents),
                    "entry_size": sh.sh_entsize,
                    "file_offset": sh.sh_offset,
                    "flags": sh.sh_flags,
                    "flags_list": names::elf_section_flags(sh.sh_flags),
                    // Samples are never rewritten, so these match file_offset and size.
                    "offset": sh.sh_offset,
                    "original_size": sh.sh_size,
                    "size": sh.sh_size,
                    "type": names::elf_section_type(sh.sh_type),
                    "virtual_address": sh.sh_addr,
                }),
            );
        }
        let mut map = FeatureMap::new();
        map.insert("section_counts".into(), json!(elf.section_headers.len()));
        map.insert("sections".into(), Value::Object(sections));
        scalar(map)
    }
}

/// Shared libraries named by `DT_NEEDED` entries.
#[derive(Debug, Default)]
pub struct ElfLibraries;

impl FeatureProvider for ElfLibraries {
    fn name(&self) -> &str {
        "elf_libraries"
    }

    fn kind(&self) -> OutputKind {
        OutputKind::Scalar
    }

    fn can_extract(&self, data: &[u8]) -> bool {
        formats::detect(data) == Format::Elf
    }

    fn extract(&self, data: &[u8]) -> Result<Extraction> {
        let elf = parsed(data)?;
        let mut map = FeatureMap::new();
        map.insert("libraries".into(), json!(elf.libraries));
        map.insert("libraries_counts".into(), json!(elf.libraries.len()));
        scalar(map)
    }
}
