//! Lecture des répertoires.
//!
//! La racine FAT12 est une zone fixe juste après les FAT ; les
//! sous-répertoires sont des chaînes de clusters ordinaires. Les deux sont
//! découpés en slots de 32 octets avec les mêmes règles de filtrage.

use alloc::vec;
use alloc::vec::Vec;

use crate::boot_sector::DIR_ENTRY_SIZE;
use crate::dir_entry::{ATTR_LONG_NAME, ENTRY_DELETED, ENTRY_END};
use crate::{BlockStore, DirectoryRecord, FatError, FatTable, Result, VolumeGeometry};

/// Cluster de départ qui désigne la racine.
pub const ROOT_CLUSTER: u16 = 0;

/// Liste le répertoire qui commence à `start_cluster` (0 = racine).
///
/// L’ordre du résultat est l’ordre sur le disque. `chain_limit` borne la
/// chaîne d’un sous-répertoire.
pub fn read_directory<S: BlockStore>(
    store: &mut S,
    table: &FatTable,
    geometry: &VolumeGeometry,
    start_cluster: u16,
    chain_limit: usize,
) -> Result<Vec<DirectoryRecord>> {
    let mut records = Vec::new();

    if start_cluster == ROOT_CLUSTER {
        let expected = geometry.root_dir_sectors() as usize * geometry.bytes_per_sector() as usize;
        let mut buf = vec![0u8; expected];

        let n = store.read_blocks(
            geometry.root_dir_offset(),
            geometry.root_dir_sectors() as usize,
            &mut buf,
        );
        if n != expected {
            log::debug!("racine: {n} octets lus sur {expected}");
            return Err(FatError::RootDirectoryRead);
        }

        scan_entries(&buf, None, &mut records);
        log::debug!("racine: {} entrées", records.len());
        return Ok(records);
    }

    let cluster_size = geometry.cluster_size() as usize;
    let mut buf = vec![0u8; cluster_size];

    for cluster in table.chain(start_cluster, chain_limit) {
        let cluster = cluster?;

        let n = store.read_blocks(
            geometry.cluster_offset(cluster),
            geometry.sectors_per_cluster() as usize,
            &mut buf,
        );
        if n != cluster_size {
            log::debug!("répertoire {start_cluster}: cluster {cluster}, {n} octets lus");
            return Err(FatError::SubdirectoryRead { cluster });
        }

        scan_entries(&buf, Some(start_cluster), &mut records);
    }

    log::debug!("répertoire {start_cluster}: {} entrées", records.len());
    Ok(records)
}

/// Décode les slots d’un buffer de répertoire et ajoute les entrées retenues.
///
/// - premier octet 0x00 : fin du buffer, le reste est libre (quel que soit l’attribut) ;
/// - attribut 0x0F (fragment LFN) : ignoré ;
/// - premier octet 0xE5 : entrée supprimée, jamais listée ;
/// - `self_cluster` : l’entrée qui pointe sur le répertoire lui-même (`.`) est écartée.
pub fn scan_entries(buf: &[u8], self_cluster: Option<u16>, out: &mut Vec<DirectoryRecord>) {
    for slot in buf.chunks_exact(DIR_ENTRY_SIZE) {
        if slot[0] == ENTRY_END {
            break;
        }
        if slot[11] == ATTR_LONG_NAME {
            continue;
        }
        if slot[0] == ENTRY_DELETED {
            continue;
        }

        let record = match DirectoryRecord::parse(slot) {
            Some(r) => r,
            None => continue,
        };

        if self_cluster == Some(record.first_cluster) {
            continue;
        }

        out.push(record);
    }
}
