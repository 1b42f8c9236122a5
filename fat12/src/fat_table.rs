//! Table d’allocation FAT12.
//!
//! Deux entrées de 12 bits sont rangées dans 3 octets :
//!
//! ```text
//!  octet 3n/2      octet 3n/2+1     octet 3n/2+2
//! [ a7 .. a0 ]   [ b3..b0 a11..a8 ] [ b11 .. b4 ]
//! ```
//!
//! L’entrée paire `a` prend l’octet bas et le quartet bas de l’octet suivant,
//! l’entrée impaire `b` prend le quartet haut et l’octet d’après.

use alloc::vec;
use alloc::vec::Vec;

use crate::chain::ClusterChain;
use crate::{BlockStore, FatError, Result, VolumeGeometry};

/// Plus petit numéro de cluster de données.
pub const FIRST_DATA_CLUSTER: u16 = 2;
/// Cluster marqué défectueux.
pub const FAT12_BAD_CLUSTER: u16 = 0xFF7;
/// Début de la plage "fin de chaîne" (0xFF8..=0xFFF).
pub const FAT12_EOC_MIN: u16 = 0xFF8;

/// Interprétation d’une entrée de la FAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterEntry {
    Free,
    Reserved,
    Next(u16),
    Bad,
    EndOfChain,
}

impl ClusterEntry {
    pub fn from_raw(value: u16) -> Self {
        match value {
            0x000 => Self::Free,
            0x001 => Self::Reserved,
            FAT12_BAD_CLUSTER => Self::Bad,
            v if v >= FAT12_EOC_MIN => Self::EndOfChain,
            v => Self::Next(v),
        }
    }
}

/// Copie en mémoire de la première FAT, lue une fois au montage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FatTable {
    bytes: Vec<u8>,
}

impl FatTable {
    /// Lit la FAT d’un bloc : `sectors_per_fat` secteurs après le boot sector.
    ///
    /// Le support doit déjà utiliser des blocs de `bytes_per_sector` octets.
    pub fn load<S: BlockStore>(store: &mut S, geometry: &VolumeGeometry) -> Result<Self> {
        let expected = geometry.fat_size_bytes();
        let mut bytes = vec![0u8; expected];

        let n = store.read_blocks(
            geometry.fat_offset(),
            geometry.sectors_per_fat() as usize,
            &mut bytes,
        );
        if n != expected {
            log::debug!("FAT: {n} octets lus sur {expected}");
            return Err(FatError::FatTableRead);
        }

        Ok(Self { bytes })
    }

    /// Construit une table depuis des octets bruts.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Nombre d’entrées de 12 bits entièrement contenues dans la table.
    pub fn entry_capacity(&self) -> usize {
        self.bytes.len() * 2 / 3
    }

    /// Valeur brute de l’entrée `cluster` (le cluster suivant dans la chaîne).
    pub fn next(&self, cluster: u16) -> Result<u16> {
        let n = cluster as usize;
        let off = 3 * n / 2;
        if off + 1 >= self.bytes.len() {
            return Err(FatError::InvalidCluster(cluster));
        }

        let lo = self.bytes[off] as u16;
        let hi = self.bytes[off + 1] as u16;

        let entry = if n % 2 == 0 {
            ((hi & 0x0F) << 8) | lo
        } else {
            (hi << 4) | (lo >> 4)
        };
        Ok(entry)
    }

    /// Entrée `cluster` interprétée.
    pub fn entry(&self, cluster: u16) -> Result<ClusterEntry> {
        self.next(cluster).map(ClusterEntry::from_raw)
    }

    /// Chaîne de clusters à partir de `start`, bornée à `limit` clusters.
    pub fn chain(&self, start: u16, limit: usize) -> ClusterChain<'_> {
        ClusterChain::new(self, start, limit)
    }
}

#[cfg(test)]
pub(crate) fn set_entry(fat: &mut [u8], cluster: u16, value: u16) {
    let n = cluster as usize;
    let off = 3 * n / 2;
    let value = value & 0x0FFF;
    if n % 2 == 0 {
        fat[off] = value as u8;
        fat[off + 1] = (fat[off + 1] & 0xF0) | (value >> 8) as u8;
    } else {
        fat[off] = (fat[off] & 0x0F) | ((value & 0x0F) << 4) as u8;
        fat[off + 1] = (value >> 4) as u8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_boot_sector, MemoryStore};

    #[test]
    fn even_and_odd_entries_share_three_bytes() {
        // a = 0x123, b = 0x456 -> 23 61 45
        let fat = FatTable::from_bytes(vec![0x23, 0x61, 0x45, 0x00, 0x00, 0x00]);
        assert_eq!(fat.next(0).unwrap(), 0x123);
        assert_eq!(fat.next(1).unwrap(), 0x456);
    }

    #[test]
    fn pairs_further_in_the_table() {
        // entrées 4 et 5 aux octets 6..9
        let mut bytes = vec![0u8; 12];
        bytes[6..9].copy_from_slice(&[0xFF, 0x8F, 0xAB]);
        let fat = FatTable::from_bytes(bytes);

        assert_eq!(fat.next(4).unwrap(), 0xFFF);
        assert_eq!(fat.next(5).unwrap(), 0xAB8);
        assert_eq!(fat.next(3).unwrap(), 0x000);
    }

    #[test]
    fn decode_matches_encode_for_many_pairs() {
        let pairs = [(0x000, 0xFFF), (0xABC, 0x123), (0x002, 0xFF8), (0x7F7, 0x800)];

        for (k, &(a, b)) in pairs.iter().enumerate() {
            let mut bytes = vec![0u8; 3 * pairs.len()];
            let even = 2 * k as u16;
            set_entry(&mut bytes, even, a);
            set_entry(&mut bytes, even + 1, b);

            let fat = FatTable::from_bytes(bytes);
            assert_eq!(fat.next(even).unwrap(), a, "entrée {even}");
            assert_eq!(fat.next(even + 1).unwrap(), b, "entrée {}", even + 1);
        }
    }

    #[test]
    fn setting_one_entry_keeps_its_neighbour() {
        let mut bytes = vec![0u8; 9];
        set_entry(&mut bytes, 2, 0x345);
        set_entry(&mut bytes, 3, 0xFFF);
        set_entry(&mut bytes, 4, 0xABC);

        let fat = FatTable::from_bytes(bytes);
        assert_eq!(fat.next(2).unwrap(), 0x345);
        assert_eq!(fat.next(3).unwrap(), 0xFFF);
        assert_eq!(fat.next(4).unwrap(), 0xABC);
    }

    #[test]
    fn out_of_table_index_is_invalid() {
        let fat = FatTable::from_bytes(vec![0u8; 6]);
        assert_eq!(fat.entry_capacity(), 4);
        assert!(fat.next(3).is_ok());
        assert_eq!(fat.next(4), Err(FatError::InvalidCluster(4)));
        assert_eq!(fat.next(0xFFF), Err(FatError::InvalidCluster(0xFFF)));
    }

    #[test]
    fn entry_classification() {
        assert_eq!(ClusterEntry::from_raw(0x000), ClusterEntry::Free);
        assert_eq!(ClusterEntry::from_raw(0x001), ClusterEntry::Reserved);
        assert_eq!(ClusterEntry::from_raw(0x002), ClusterEntry::Next(2));
        assert_eq!(ClusterEntry::from_raw(0xFF6), ClusterEntry::Next(0xFF6));
        assert_eq!(ClusterEntry::from_raw(0xFF7), ClusterEntry::Bad);
        assert_eq!(ClusterEntry::from_raw(0xFF8), ClusterEntry::EndOfChain);
        assert_eq!(ClusterEntry::from_raw(0xFFF), ClusterEntry::EndOfChain);
    }

    fn tiny_image() -> Vec<u8> {
        // 512 o/secteur, 1 FAT de 2 secteurs
        let mut img = vec![0u8; 512 * 8];
        img[11..13].copy_from_slice(&512u16.to_le_bytes());
        img[13] = 1;
        img[16] = 1;
        img[17..19].copy_from_slice(&16u16.to_le_bytes());
        img[19..21].copy_from_slice(&8u16.to_le_bytes());
        img[22..24].copy_from_slice(&2u16.to_le_bytes());
        // media + fin de chaîne pour les entrées 0 et 1
        img[512..515].copy_from_slice(&[0xF0, 0xFF, 0xFF]);
        img[512 + 1023] = 0x5A;
        img
    }

    #[test]
    fn load_reads_the_sectors_after_the_boot_sector() {
        let img = tiny_image();
        let g = VolumeGeometry::new(parse_boot_sector(&img).unwrap()).unwrap();
        let mut store = MemoryStore::new(img);

        let fat = FatTable::load(&mut store, &g).unwrap();
        assert_eq!(fat.as_bytes().len(), 1024);
        assert_eq!(fat.next(0).unwrap(), 0xFF0);
        assert_eq!(fat.next(1).unwrap(), 0xFFF);
        assert_eq!(fat.as_bytes()[1023], 0x5A);
    }

    #[test]
    fn load_rejects_a_short_read() {
        let mut img = tiny_image();
        img.truncate(512 + 700);
        let g = VolumeGeometry::new(parse_boot_sector(&img).unwrap()).unwrap();
        let mut store = MemoryStore::new(img);

        assert_eq!(FatTable::load(&mut store, &g), Err(FatError::FatTableRead));
    }
}
