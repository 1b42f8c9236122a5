//! Image de disquette 1.44 Mo construite octet par octet.
//!
//! Géométrie standard : 512 o/secteur, 1 secteur/cluster, 2 FAT de 9
//! secteurs, 224 entrées racine (secteurs 19 à 32), données au secteur 33.

#![allow(dead_code)]

use fat12_reader::MemoryStore;

pub const SECTOR: usize = 512;
pub const TOTAL_SECTORS: usize = 2880;
const SECTORS_PER_FAT: usize = 9;
const FAT_COUNT: usize = 2;
const ROOT_ENTRIES: usize = 224;
const ROOT_START: usize = 1 + FAT_COUNT * SECTORS_PER_FAT;
const DATA_START: usize = ROOT_START + ROOT_ENTRIES * 32 / SECTOR;

pub struct Floppy {
    pub bytes: Vec<u8>,
}

impl Floppy {
    pub fn new() -> Self {
        let mut bytes = vec![0u8; TOTAL_SECTORS * SECTOR];

        let b = &mut bytes[..SECTOR];
        b[0..3].copy_from_slice(&[0xEB, 0x3C, 0x90]);
        b[3..11].copy_from_slice(b"MSDOS5.0");
        b[11..13].copy_from_slice(&(SECTOR as u16).to_le_bytes());
        b[13] = 1;
        b[14..16].copy_from_slice(&1u16.to_le_bytes());
        b[16] = FAT_COUNT as u8;
        b[17..19].copy_from_slice(&(ROOT_ENTRIES as u16).to_le_bytes());
        b[19..21].copy_from_slice(&(TOTAL_SECTORS as u16).to_le_bytes());
        b[21] = 0xF0;
        b[22..24].copy_from_slice(&(SECTORS_PER_FAT as u16).to_le_bytes());
        b[510] = 0x55;
        b[511] = 0xAA;

        let mut img = Self { bytes };
        img.set_fat(0, 0xFF0);
        img.set_fat(1, 0xFFF);
        img
    }

    /// Encode une entrée de 12 bits dans chaque copie de la FAT.
    pub fn set_fat(&mut self, cluster: u16, value: u16) {
        for copy in 0..FAT_COUNT {
            let base = (1 + copy * SECTORS_PER_FAT) * SECTOR;
            let off = base + cluster as usize * 3 / 2;
            let value = value & 0x0FFF;

            if cluster % 2 == 0 {
                self.bytes[off] = value as u8;
                self.bytes[off + 1] = (self.bytes[off + 1] & 0xF0) | (value >> 8) as u8;
            } else {
                self.bytes[off] = (self.bytes[off] & 0x0F) | ((value & 0x0F) << 4) as u8;
                self.bytes[off + 1] = (value >> 4) as u8;
            }
        }
    }

    pub fn link(&mut self, chain: &[u16]) {
        for pair in chain.windows(2) {
            self.set_fat(pair[0], pair[1]);
        }
        if let Some(&last) = chain.last() {
            self.set_fat(last, 0xFFF);
        }
    }

    pub fn cluster_offset(cluster: u16) -> usize {
        (DATA_START + cluster as usize - 2) * SECTOR
    }

    pub fn root_entry(&mut self, slot: usize, entry: [u8; 32]) {
        let off = ROOT_START * SECTOR + slot * 32;
        self.bytes[off..off + 32].copy_from_slice(&entry);
    }

    pub fn dir_entry(&mut self, cluster: u16, slot: usize, entry: [u8; 32]) {
        let off = Self::cluster_offset(cluster) + slot * 32;
        self.bytes[off..off + 32].copy_from_slice(&entry);
    }

    /// Écrit `data` à partir du début de `chain[0]`, un cluster par maillon.
    pub fn write_file(&mut self, chain: &[u16], data: &[u8]) {
        self.link(chain);
        for (cluster, piece) in chain.iter().zip(data.chunks(SECTOR)) {
            let off = Self::cluster_offset(*cluster);
            self.bytes[off..off + piece.len()].copy_from_slice(piece);
        }
    }

    pub fn store(&self) -> MemoryStore {
        MemoryStore::new(self.bytes.clone())
    }
}

/// Slot de répertoire 8.3 ; les dates sont celles du 2024/03/15 10:30:00.
pub fn entry(name: &[u8; 11], attr: u8, cluster: u16, size: u32) -> [u8; 32] {
    let date: u16 = ((2024 - 1980) << 9) | (3 << 5) | 15;
    let time: u16 = (10 << 11) | (30 << 5);

    let mut e = [0u8; 32];
    e[0..11].copy_from_slice(name);
    e[11] = attr;
    e[14..16].copy_from_slice(&time.to_le_bytes());
    e[16..18].copy_from_slice(&date.to_le_bytes());
    e[22..24].copy_from_slice(&time.to_le_bytes());
    e[24..26].copy_from_slice(&date.to_le_bytes());
    e[26..28].copy_from_slice(&cluster.to_le_bytes());
    e[28..32].copy_from_slice(&size.to_le_bytes());
    e
}
