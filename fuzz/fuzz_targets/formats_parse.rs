#![no_main]
use libfuzzer_sys::fuzz_target;
use revealer::formats::{detect, parse_elf, parse_pe, Format};

fuzz_target!(|data: &[u8]| {
    match detect(data) {
        Format::Elf => {
            let _ = parse_elf(data);
        }
        Format::Pe => {
            let _ = parse_pe(data);
        }
        _ => {
            assert!(parse_elf(data).is_none() && parse_pe(data).is_none());
        }
    }
});
