//! Petites images FAT12 construites à la main pour les tests unitaires.
//!
//! Disposition : boot sector, 2 FAT d’un secteur, racine d’un secteur
//! (16 entrées), puis la zone de données à partir du secteur 4.

use alloc::vec;
use alloc::vec::Vec;

use crate::fat_table::set_entry;
use crate::{parse_boot_sector, MemoryStore, VolumeGeometry};

pub(crate) const SECTOR: usize = 512;
const FAT_COUNT: usize = 2;
const ROOT_ENTRIES: u16 = 16;
const DATA_START: usize = 4;

pub(crate) struct TestImage {
    pub(crate) bytes: Vec<u8>,
    spc: usize,
}

impl TestImage {
    pub(crate) fn new(sectors_per_cluster: u8, clusters: usize) -> Self {
        let spc = sectors_per_cluster as usize;
        let total = DATA_START + clusters * spc;
        let mut bytes = vec![0u8; total * SECTOR];

        let b = &mut bytes[0..SECTOR];
        b[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        b[3..11].copy_from_slice(b"MSWIN4.1");
        b[11..13].copy_from_slice(&(SECTOR as u16).to_le_bytes());
        b[13] = sectors_per_cluster;
        b[14..16].copy_from_slice(&1u16.to_le_bytes());
        b[16] = FAT_COUNT as u8;
        b[17..19].copy_from_slice(&ROOT_ENTRIES.to_le_bytes());
        b[19..21].copy_from_slice(&(total as u16).to_le_bytes());
        b[21] = 0xF8;
        b[22..24].copy_from_slice(&1u16.to_le_bytes());
        b[510] = 0x55;
        b[511] = 0xAA;

        let mut img = Self { bytes, spc };
        img.set_fat(0, 0xFF8);
        img.set_fat(1, 0xFFF);
        img
    }

    /// Écrit la même valeur dans les deux FAT.
    pub(crate) fn set_fat(&mut self, cluster: u16, value: u16) {
        for i in 0..FAT_COUNT {
            let start = (1 + i) * SECTOR;
            set_entry(&mut self.bytes[start..start + SECTOR], cluster, value);
        }
    }

    /// Chaîne les clusters dans l’ordre, le dernier en fin de chaîne.
    pub(crate) fn link(&mut self, chain: &[u16]) {
        for pair in chain.windows(2) {
            self.set_fat(pair[0], pair[1]);
        }
        if let Some(&last) = chain.last() {
            self.set_fat(last, 0xFFF);
        }
    }

    pub(crate) fn cluster_offset(&self, cluster: u16) -> usize {
        (DATA_START + (cluster as usize - 2) * self.spc) * SECTOR
    }

    pub(crate) fn root_entry(&mut self, slot: usize, entry: [u8; 32]) {
        let off = 3 * SECTOR + slot * 32;
        self.bytes[off..off + 32].copy_from_slice(&entry);
    }

    pub(crate) fn dir_entry(&mut self, cluster: u16, slot: usize, entry: [u8; 32]) {
        let off = self.cluster_offset(cluster) + slot * 32;
        self.bytes[off..off + 32].copy_from_slice(&entry);
    }

    pub(crate) fn write_cluster(&mut self, cluster: u16, data: &[u8]) {
        let off = self.cluster_offset(cluster);
        self.bytes[off..off + data.len()].copy_from_slice(data);
    }

    pub(crate) fn geometry(&self) -> VolumeGeometry {
        VolumeGeometry::new(parse_boot_sector(&self.bytes).unwrap()).unwrap()
    }

    pub(crate) fn into_store(self) -> MemoryStore {
        MemoryStore::new(self.bytes)
    }
}

pub(crate) fn entry(name: &[u8; 11], attr: u8, cluster: u16, size: u32) -> [u8; 32] {
    let mut e = [0u8; 32];
    e[0..11].copy_from_slice(name);
    e[11] = attr;
    e[26..28].copy_from_slice(&cluster.to_le_bytes());
    e[28..32].copy_from_slice(&size.to_le_bytes());
    e
}

/// Fragment de nom long : doit toujours être ignoré.
pub(crate) fn lfn_fragment() -> [u8; 32] {
    let mut e = [0xFFu8; 32];
    e[0] = 0x41;
    e[11] = 0x0F;
    e
}
