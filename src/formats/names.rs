//! Symbolic names for numeric header fields.
//!
//! Unknown values render as hex so records stay total.

pub fn elf_file_type(e_type: u16) -> String {
    match e_type {
        0 => "NONE".into(),
        1 => "REL".into(),
        2 => "EXEC".into(),
        3 => "DYN".into(),
        4 => "CORE".into(),
        other => format!("0x{:04x}", other),
    }
}

pub fn elf_class(class: u8) -> String {
    match class {
        1 => "CLASS32".into(),
        2 => "CLASS64".into(),
        other => format!("0x{:02x}", other),
    }
}

pub fn elf_os_abi(abi: u8) -> String {
    match abi {
        0 => "SYSTEMV".into(),
        1 => "HPUX".into(),
        2 => "NETBSD".into(),
        3 => "LINUX".into(),
        6 => "SOLARIS".into(),
        9 => "FREEBSD".into(),
        12 => "OPENBSD".into(),
        97 => "ARM".into(),
        255 => "STANDALONE".into(),
        other => format!("0x{:02x}", other),
    }
}

pub fn elf_machine(machine: u16) -> String {
    match machine {
        0 => "NONE".into(),
        2 => "SPARC".into(),
        3 => "i386".into(),
        8 => "MIPS".into(),
        20 => "PPC".into(),
        21 => "PPC64".into(),
        40 => "ARM".into(),
        42 => "SH".into(),
        43 => "SPARCV9".into(),
        50 => "IA_64".into(),
        62 => "x86_64".into(),
        164 => "HEXAGON".into(),
        183 => "AARCH64".into(),
        243 => "RISCV".into(),
        258 => "LOONGARCH".into(),
        other => format!("0x{:04x}", other),
    }
}

pub fn elf_section_type(sh_type: u32) -> String {
    match sh_type {
        0 => "NULL".into(),
        1 => "PROGBITS".into(),
        2 => "SYMTAB".into(),
        3 => "STRTAB".into(),
        4 => "RELA".into(),
        5 => "HASH".into(),
        6 => "DYNAMIC".into(),
        7 => "NOTE".into(),
        8 => "NOBITS".into(),
        9 => "REL".into(),
        10 => "SHLIB".into(),
        11 => "DYNSYM".into(),
        14 => "INIT_ARRAY".into(),
        15 => "FINI_ARRAY".into(),
        16 => "PREINIT_ARRAY".into(),
        17 => "GROUP".into(),
        18 => "SYMTAB_SHNDX".into(),
        0x6fff_fff6 => "GNU_HASH".into(),
        0x6fff_fffd => "GNU_VERDEF".into(),
        0x6fff_fffe => "GNU_VERNEED".into(),
        0x6fff_ffff => "GNU_VERSYM".into(),
        other => format!("0x{:08x}", other),
    }
}

const ELF_SECTION_FLAGS: &[(u64, &str)] = &[
    (0x1, "WRITE"),
    (0x2, "ALLOC"),
    (0x4, "EXECINSTR"),
    (0x10, "MERGE"),
    (0x20, "STRINGS"),
    (0x40, "INFO_LINK"),
    (0x80, "LINK_ORDER"),
    (0x100, "OS_NONCONFORMING"),
    (0x200, "GROUP"),
    (0x400, "TLS"),
    (0x800, "COMPRESSED"),
];

pub fn elf_section_flags(flags: u64) -> Vec<&'static str> {
    ELF_SECTION_FLAGS
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|&(_, name)| name)
        .collect()
}

const EM_MIPS: u16 = 8;
const EM_MIPS_RS3_LE: u16 = 10;
const EM_PPC64: u16 = 21;
const EM_ARM: u16 = 40;
const EM_HEXAGON: u16 = 164;

const ARM_FLAGS: &[(u32, &str)] = &[(0x0200, "SOFT_FLOAT"), (0x0400, "VFP_FLOAT")];

const MIPS_FLAGS: &[(u32, &str)] = &[
    (0x0001, "NOREORDER"),
    (0x0002, "PIC"),
    (0x0004, "CPIC"),
    (0x0020, "ABI2"),
    (0x0100, "32BITMODE"),
    (0x0200, "FP64"),
    (0x0400, "NAN2008"),
];

/// Flag names of an ARM `e_flags` word; empty for other machines.
pub fn elf_arm_flags(machine: u16, flags: u32) -> Vec<String> {
    if machine != EM_ARM {
        return Vec::new();
    }
    let mut out: Vec<String> = bit_names(ARM_FLAGS, flags);
    match flags >> 24 {
        0 => {}
        ver @ 1..=5 => out.push(format!("EABI_VER{}", ver)),
        other => out.push(format!("EABI_0x{:02x}", other)),
    }
    out
}

/// Flag names of a MIPS `e_flags` word; empty for other machines.
pub fn elf_mips_flags(machine: u16, flags: u32) -> Vec<String> {
    if machine != EM_MIPS && machine != EM_MIPS_RS3_LE {
        return Vec::new();
    }
    let mut out = bit_names(MIPS_FLAGS, flags);
    let abi = match flags & 0x0000_f000 {
        0 => None,
        0x1000 => Some("ABI_O32"),
        0x2000 => Some("ABI_O64"),
        0x3000 => Some("ABI_EABI32"),
        0x4000 => Some("ABI_EABI64"),
        _ => Some("ABI_UNKNOWN"),
    };
    out.extend(abi.map(String::from));
    let arch = match flags >> 28 {
        0x0 => "ARCH_1",
        0x1 => "ARCH_2",
        0x2 => "ARCH_3",
        0x3 => "ARCH_4",
        0x4 => "ARCH_5",
        0x5 => "ARCH_32",
        0x6 => "ARCH_64",
        0x7 => "ARCH_32R2",
        0x8 => "ARCH_64R2",
        0x9 => "ARCH_32R6",
        0xa => "ARCH_64R6",
        _ => "ARCH_UNKNOWN",
    };
    out.push(arch.to_string());
    out
}

/// ABI level of a PPC64 `e_flags` word; empty for other machines.
pub fn elf_ppc64_flags(machine: u16, flags: u32) -> Vec<String> {
    if machine != EM_PPC64 || flags & 0x3 == 0 {
        return Vec::new();
    }
    vec![format!("ABI_V{}", flags & 0x3)]
}

/// Machine and ISA revisions of a Hexagon `e_flags` word; empty for other
/// machines.
pub fn elf_hexagon_flags(machine: u16, flags: u32) -> Vec<String> {
    if machine != EM_HEXAGON {
        return Vec::new();
    }
    let mut out = Vec::new();
    match flags & 0x0f {
        0 => {}
        mach => out.push(format!("MACH_V{}", mach + 1)),
    }
    match (flags >> 4) & 0x0f {
        0 => out.push("ISA_MACH".to_string()),
        isa => out.push(format!("ISA_V{}", isa + 1)),
    }
    out
}

fn bit_names(table: &[(u32, &str)], flags: u32) -> Vec<String> {
    table
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|&(_, name)| name.to_string())
        .collect()
}

pub fn pe_machine(machine: u16) -> String {
    match machine {
        0x0000 => "UNKNOWN".into(),
        0x014c => "I386".into(),
        0x0166 => "R4000".into(),
        0x01c0 => "ARM".into(),
        0x01c4 => "ARMNT".into(),
        0x0200 => "IA64".into(),
        0x0ebc => "EBC".into(),
        0x5064 => "RISCV64".into(),
        0x8664 => "AMD64".into(),
        0xaa64 => "ARM64".into(),
        other => format!("0x{:04x}", other),
    }
}

const PE_CHARACTERISTICS: &[(u16, &str)] = &[
    (0x0001, "RELOCS_STRIPPED"),
    (0x0002, "EXECUTABLE_IMAGE"),
    (0x0004, "LINE_NUMS_STRIPPED"),
    (0x0008, "LOCAL_SYMS_STRIPPED"),
    (0x0010, "AGGRESSIVE_WS_TRIM"),
    (0x0020, "LARGE_ADDRESS_AWARE"),
    (0x0080, "BYTES_REVERSED_LO"),
    (0x0100, "CHARA_32BIT_MACHINE"),
    (0x0200, "DEBUG_STRIPPED"),
    (0x0400, "REMOVABLE_RUN_FROM_SWAP"),
    (0x0800, "NET_RUN_FROM_SWAP"),
    (0x1000, "SYSTEM"),
    (0x2000, "DLL"),
    (0x4000, "UP_SYSTEM_ONLY"),
    (0x8000, "BYTES_REVERSED_HI"),
];

pub fn pe_characteristics(characteristics: u16) -> Vec<&'static str> {
    PE_CHARACTERISTICS
        .iter()
        .filter(|(bit, _)| characteristics & bit != 0)
        .map(|&(_, name)| name)
        .collect()
}
