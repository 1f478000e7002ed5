//src/csim/addresses.rs

use crate::csim::cache_configs::{Address, CacheGeometry, Tag};

/// Champs d'une adresse décodée. Jamais stocké, recalculé à chaque accès.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedAddress {
    pub offset: u32,
    pub index: usize,
    pub tag: Tag,
}

#[derive(Debug, Clone, Copy)]
pub struct AddressDecoder {
    offset_bits: u32,
    index_bits: u32,
}

impl AddressDecoder {
    pub fn new(geometry: &CacheGeometry) -> Self {
        Self {
            offset_bits: geometry.offset_bits(),
            index_bits: geometry.index_bits(),
        }
    }

    pub fn decode(&self, addr: Address) -> DecodedAddress {
        // Calcul en u64 pour que les décalages de 32 bits restent définis
        let addr = addr as u64;
        let offset_mask = (1u64 << self.offset_bits) - 1;
        let index_mask = (1u64 << self.index_bits) - 1;

        let offset = (addr & offset_mask) as u32;
        let index = ((addr >> self.offset_bits) & index_mask) as usize;
        let tag = (addr >> (self.offset_bits + self.index_bits)) as Tag;

        DecodedAddress { offset, index, tag }
    }

    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fully_associative() {
        // Un seul set: pas de bits d'index, le tag est l'adresse sans l'offset
        let decoder = AddressDecoder::new(&CacheGeometry::fully_associative(2, 4));
        let decoded = decoder.decode(0x0000_000B);
        assert_eq!(decoded.offset, 3);
        assert_eq!(decoded.index, 0);
        assert_eq!(decoded.tag, 2);
    }

    #[test]
    fn test_decode_set_associative() {
        // 16 octets par bloc (4 bits), 8 sets (3 bits)
        let decoder = AddressDecoder::new(&CacheGeometry::set_associative(8, 2, 16));
        let decoded = decoder.decode(0x1234_5678);
        assert_eq!(decoded.offset, 0x8);
        assert_eq!(decoded.index, (0x1234_5678 >> 4) & 0x7);
        assert_eq!(decoded.tag, 0x1234_5678 >> 7);
    }

    #[test]
    fn test_decode_full_width_fields() {
        // offset + index couvrent les 32 bits: le tag vaut toujours 0
        let decoder = AddressDecoder::new(&CacheGeometry::direct_mapped(1 << 16, 1 << 16));
        let decoded = decoder.decode(0xFFFF_FFFF);
        assert_eq!(decoded.offset, 0xFFFF);
        assert_eq!(decoded.index, 0xFFFF);
        assert_eq!(decoded.tag, 0);
    }

    #[test]
    fn test_decode_single_byte_blocks() {
        let decoder = AddressDecoder::new(&CacheGeometry::direct_mapped(4, 1));
        let decoded = decoder.decode(0x0000_0006);
        assert_eq!(decoded.offset, 0);
        assert_eq!(decoded.index, 2);
        assert_eq!(decoded.tag, 1);
    }
}
