//! Boot sector FAT12 et géométrie du volume.

use crate::{FatError, Result};

/// Nombre minimal d’octets du secteur 0 nécessaires pour lire le BPB.
pub const BPB_MIN_LEN: usize = 26;

/// Taille d’une entrée de répertoire.
pub const DIR_ENTRY_SIZE: usize = 32;

/// Paramètres du BPB lus dans le secteur 0.
///
/// Aucune vérification ici : c’est [`VolumeGeometry::new`] qui refuse les
/// valeurs dégénérées.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BpbParams {
    pub bytes_per_sector: u16,
    pub sectors_per_cluster: u8,
    pub fat_count: u8,
    pub max_root_entries: u16,
    pub total_sectors: u16,
    pub sectors_per_fat: u16,
}

/// Extrait les champs du BPB (little-endian, offsets fixes).
pub fn parse_boot_sector(sector: &[u8]) -> Result<BpbParams> {
    if sector.len() < BPB_MIN_LEN {
        return Err(FatError::BootSectorRead);
    }

    let b = sector;
    Ok(BpbParams {
        bytes_per_sector: u16::from_le_bytes([b[11], b[12]]),
        sectors_per_cluster: b[13],
        fat_count: b[16],
        max_root_entries: u16::from_le_bytes([b[17], b[18]]),
        total_sectors: u16::from_le_bytes([b[19], b[20]]),
        sectors_per_fat: u16::from_le_bytes([b[22], b[23]]),
    })
}

/// Géométrie d’un volume monté : paramètres du BPB plus les valeurs dérivées,
/// calculées une seule fois.
///
/// Les positions sont exprimées en secteurs depuis le début du support.
/// La zone réservée fait toujours un secteur (le boot sector).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeGeometry {
    params: BpbParams,
    cluster_size: u32,
    root_dir_sectors: u32,
    root_dir_start: u32,
    data_start: u32,
    cluster_count: u32,
}

impl VolumeGeometry {
    /// Valide les paramètres et calcule la disposition du volume.
    pub fn new(params: BpbParams) -> Result<Self> {
        if params.bytes_per_sector == 0
            || params.sectors_per_cluster == 0
            || params.fat_count == 0
            || params.sectors_per_fat == 0
        {
            log::debug!("BPB rejeté: {params:?}");
            return Err(FatError::InvalidGeometry);
        }

        let bps = params.bytes_per_sector as u32;
        let spc = params.sectors_per_cluster as u32;
        let fat_sectors = params.fat_count as u32 * params.sectors_per_fat as u32;

        let cluster_size = spc * bps;
        let root_dir_sectors = (params.max_root_entries as u32 * DIR_ENTRY_SIZE as u32) / bps;
        let root_dir_start = fat_sectors + 1;
        let data_start = fat_sectors + root_dir_sectors + 1;

        let total = params.total_sectors as u32;
        let cluster_count = if total > data_start {
            (total - data_start) / spc
        } else {
            0
        };

        Ok(Self {
            params,
            cluster_size,
            root_dir_sectors,
            root_dir_start,
            data_start,
            cluster_count,
        })
    }

    pub fn params(&self) -> &BpbParams {
        &self.params
    }

    pub fn bytes_per_sector(&self) -> u16 {
        self.params.bytes_per_sector
    }

    pub fn sectors_per_cluster(&self) -> u8 {
        self.params.sectors_per_cluster
    }

    pub fn fat_count(&self) -> u8 {
        self.params.fat_count
    }

    pub fn max_root_entries(&self) -> u16 {
        self.params.max_root_entries
    }

    pub fn total_sectors(&self) -> u16 {
        self.params.total_sectors
    }

    pub fn sectors_per_fat(&self) -> u16 {
        self.params.sectors_per_fat
    }

    /// Taille d’un cluster en octets.
    pub fn cluster_size(&self) -> u32 {
        self.cluster_size
    }

    /// Nombre de secteurs du répertoire racine.
    pub fn root_dir_sectors(&self) -> u32 {
        self.root_dir_sectors
    }

    /// Premier secteur du répertoire racine.
    pub fn root_dir_start_sector(&self) -> u32 {
        self.root_dir_start
    }

    /// Premier secteur de la zone de données (cluster 2).
    pub fn data_start_sector(&self) -> u32 {
        self.data_start
    }

    /// Nombre de clusters de données, 0 si le BPB ne permet pas de le savoir.
    pub fn cluster_count(&self) -> u32 {
        self.cluster_count
    }

    /// Taille de la FAT en octets.
    pub fn fat_size_bytes(&self) -> usize {
        self.params.sectors_per_fat as usize * self.params.bytes_per_sector as usize
    }

    /// Offset en octets du début de la FAT (juste après le boot sector).
    pub fn fat_offset(&self) -> u64 {
        self.params.bytes_per_sector as u64
    }

    /// Offset en octets du répertoire racine.
    pub fn root_dir_offset(&self) -> u64 {
        self.root_dir_start as u64 * self.params.bytes_per_sector as u64
    }

    /// Offset en octets d’un cluster de données.
    ///
    /// Avec un secteur par cluster, c’est `(data_start - 2 + cluster) * bps`.
    /// L’appelant garantit `cluster >= 2`.
    pub fn cluster_offset(&self, cluster: u16) -> u64 {
        let index = (cluster as u64).saturating_sub(2);
        let sector = self.data_start as u64 + index * self.params.sectors_per_cluster as u64;
        sector * self.params.bytes_per_sector as u64
    }
}
