//! Flattening a parsed [`Header`] into the concrete section bytes it describes.

use crate::header::{data_label, text_label, Header, NUM_DATA_SECTIONS, NUM_TEXT_SECTIONS};

/// One non-empty section extracted from a DOL file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    /// Human-readable label, e.g. `"text0"` or `"data3"`.
    pub label: &'static str,
    /// File offset the section was read from.
    pub offset: u32,
    /// Load address the runtime will place this section at.
    pub load_addr: u32,
    /// Section size in bytes.
    pub size: u32,
    /// A copy of the section's bytes.
    pub data: Box<[u8]>,
}

/// The non-empty sections of a DOL file, preserving header order, plus their combined size.
///
/// This is exposed for validation and diagnostics only: the pipeline wraps the *entire* DOL file,
/// header included, rather than this flattened payload (see the pipeline module for why).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sections {
    pub sections: Vec<Section>,
    pub total_size: u64,
}

/// Returns, preserving header order, one entry per non-empty section.
///
/// Assumes `header` has already passed [`Header::validate`], so offsets and sizes are known to
/// fit within `bytes`.
#[must_use]
pub fn extract_sections(header: &Header, bytes: &[u8]) -> Sections {
    let mut sections = Vec::new();
    let mut total_size = 0u64;

    for i in 0..NUM_TEXT_SECTIONS {
        if header.text_sizes[i] != 0 {
            let section = build_section(text_label(i), header.text_offsets[i], header.text_addrs[i], header.text_sizes[i], bytes);
            total_size += u64::from(section.size);
            sections.push(section);
        }
    }
    for i in 0..NUM_DATA_SECTIONS {
        if header.data_sizes[i] != 0 {
            let section = build_section(data_label(i), header.data_offsets[i], header.data_addrs[i], header.data_sizes[i], bytes);
            total_size += u64::from(section.size);
            sections.push(section);
        }
    }

    Sections { sections, total_size }
}

fn build_section(label: &'static str, offset: u32, load_addr: u32, size: u32, bytes: &[u8]) -> Section {
    let start = offset as usize;
    let end = start + size as usize;
    Section { label, offset, load_addr, size, data: bytes[start..end].into() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::{ENTRY_POINT, HEADER_SIZE};

    #[test]
    fn extracts_a_single_text_section() {
        let mut bytes = vec![0u8; HEADER_SIZE + 16];
        bytes[0..4].copy_from_slice(&(HEADER_SIZE as u32).to_be_bytes());
        bytes[0x48..0x4C].copy_from_slice(&ENTRY_POINT.to_be_bytes());
        bytes[0x90..0x94].copy_from_slice(&16u32.to_be_bytes());
        bytes[0xE0..0xE4].copy_from_slice(&ENTRY_POINT.to_be_bytes());
        bytes[HEADER_SIZE..].copy_from_slice(&[0xAB; 16]);

        let header = Header::parse(&bytes).unwrap();
        let sections = extract_sections(&header, &bytes);

        assert_eq!(sections.sections.len(), 1);
        assert_eq!(sections.total_size, 16);
        assert_eq!(sections.sections[0].label, "text0");
        assert_eq!(&*sections.sections[0].data, &[0xAB; 16][..]);
    }

    #[test]
    fn empty_sections_are_omitted() {
        let mut bytes = vec![0u8; HEADER_SIZE];
        bytes[0xE0..0xE4].copy_from_slice(&ENTRY_POINT.to_be_bytes());
        let header = Header::parse(&bytes).unwrap();
        let sections = extract_sections(&header, &bytes);
        assert!(sections.sections.is_empty());
        assert_eq!(sections.total_size, 0);
    }
}
