//! Lecture du contenu des fichiers.

use alloc::vec;
use alloc::vec::Vec;

use crate::fat_table::FIRST_DATA_CLUSTER;
use crate::{
    BlockStore, DirectoryRecord, FatError, FatTable, Result, ShortReadPolicy, VolumeGeometry,
};

/// Lit les clusters d’un fichier, un buffer de `cluster_size` octets par
/// cluster, dans l’ordre de la chaîne.
///
/// Un fichier vide a un premier cluster à 0 : on rend une liste vide.
/// Un cluster lu partiellement est traité selon `policy`.
pub fn read_file<S: BlockStore>(
    store: &mut S,
    table: &FatTable,
    geometry: &VolumeGeometry,
    start_cluster: u16,
    chain_limit: usize,
    policy: ShortReadPolicy,
) -> Result<Vec<Vec<u8>>> {
    let mut clusters = Vec::new();
    if start_cluster < FIRST_DATA_CLUSTER {
        return Ok(clusters);
    }

    let cluster_size = geometry.cluster_size() as usize;

    for cluster in table.chain(start_cluster, chain_limit) {
        let cluster = cluster?;

        let mut buf = vec![0u8; cluster_size];
        let n = store.read_blocks(
            geometry.cluster_offset(cluster),
            geometry.sectors_per_cluster() as usize,
            &mut buf,
        );

        if n == cluster_size {
            clusters.push(buf);
            continue;
        }

        match policy {
            ShortReadPolicy::Skip => {
                log::warn!("fichier {start_cluster}: cluster {cluster} ignoré ({n} octets lus)");
            }
            ShortReadPolicy::Fail => return Err(FatError::FileRead { cluster }),
        }
    }

    Ok(clusters)
}

/// Lit un fichier et rend exactement `record.size` octets (moins si des
/// clusters ont été sautés).
pub fn read_file_contents<S: BlockStore>(
    store: &mut S,
    table: &FatTable,
    geometry: &VolumeGeometry,
    record: &DirectoryRecord,
    chain_limit: usize,
    policy: ShortReadPolicy,
) -> Result<Vec<u8>> {
    if !record.is_file() {
        return Err(FatError::NotAFile);
    }

    let mut remaining = record.size as usize;
    if remaining == 0 {
        return Ok(Vec::new());
    }

    let clusters = read_file(store, table, geometry, record.first_cluster, chain_limit, policy)?;

    // la taille de l’entrée peut être corrompue : on ne réserve que ce qui a été lu
    let available: usize = clusters.iter().map(Vec::len).sum();
    let mut out = Vec::with_capacity(remaining.min(available));
    for cluster in clusters {
        let take = core::cmp::min(remaining, cluster.len());
        out.extend_from_slice(&cluster[..take]);
        remaining -= take;

        if remaining == 0 {
            break;
        }
    }

    Ok(out)
}
