//! Montage d’un volume FAT12.
//!
//! [`MountedVolume`] possède le support, la géométrie et la FAT. Il n’y a
//! aucun état global : on peut monter plusieurs volumes à la fois.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use crate::chain::ClusterChain;
use crate::directory::{self, ROOT_CLUSTER};
use crate::{
    file, parse_boot_sector, BlockStore, DirectoryRecord, FatError, FatTable, MountOptions,
    Result, VolumeGeometry,
};

/// Volume FAT12 monté, en lecture seule.
#[derive(Debug)]
pub struct MountedVolume<S: BlockStore> {
    store: S,
    geometry: VolumeGeometry,
    table: FatTable,
    options: MountOptions,
}

impl<S: BlockStore> MountedVolume<S> {
    /// Monte le volume avec les options par défaut.
    pub fn mount(store: S) -> Result<Self> {
        Self::mount_with(store, MountOptions::default())
    }

    /// Monte le volume : boot sector, taille de secteur, puis FAT.
    ///
    /// La première erreur rencontrée est rendue et le support est fermé ;
    /// aucun volume à moitié monté n’est visible.
    pub fn mount_with(mut store: S, options: MountOptions) -> Result<Self> {
        match Self::init(&mut store) {
            Ok((geometry, table)) => {
                log::info!(
                    "volume monté: {} o/secteur, {} secteur(s)/cluster, {} clusters",
                    geometry.bytes_per_sector(),
                    geometry.sectors_per_cluster(),
                    geometry.cluster_count()
                );
                Ok(Self {
                    store,
                    geometry,
                    table,
                    options,
                })
            }
            Err(e) => {
                log::debug!("montage échoué: {e}");
                store.close();
                Err(e)
            }
        }
    }

    fn init(store: &mut S) -> Result<(VolumeGeometry, FatTable)> {
        let block = store.block_size();
        let mut sector = vec![0u8; block];
        let n = store.read_block(0, &mut sector);
        if n != block {
            return Err(FatError::BootSectorRead);
        }

        let geometry = VolumeGeometry::new(parse_boot_sector(&sector)?)?;
        log::debug!("géométrie: {geometry:?}");

        store.set_block_size(geometry.bytes_per_sector() as usize)?;
        let table = FatTable::load(store, &geometry)?;

        Ok((geometry, table))
    }

    /// Démonte : libère la FAT et ferme le support.
    pub fn unmount(mut self) {
        self.store.close();
        log::info!("volume démonté");
    }

    pub fn geometry(&self) -> &VolumeGeometry {
        &self.geometry
    }

    pub fn fat_table(&self) -> &FatTable {
        &self.table
    }

    pub fn options(&self) -> &MountOptions {
        &self.options
    }

    /// Longueur maximale autorisée pour une chaîne de ce volume.
    pub fn chain_limit(&self) -> usize {
        if let Some(limit) = self.options.chain_limit {
            return limit;
        }
        match self.geometry.cluster_count() {
            0 => self.table.entry_capacity(),
            n => n as usize,
        }
    }

    /// Chaîne de clusters à partir de `start`.
    pub fn chain(&self, start: u16) -> ClusterChain<'_> {
        self.table.chain(start, self.chain_limit())
    }

    /// Liste le répertoire qui commence à `start_cluster` (0 = racine).
    pub fn read_directory(&mut self, start_cluster: u16) -> Result<Vec<DirectoryRecord>> {
        let limit = self.chain_limit();
        directory::read_directory(
            &mut self.store,
            &self.table,
            &self.geometry,
            start_cluster,
            limit,
        )
    }

    pub fn read_root(&mut self) -> Result<Vec<DirectoryRecord>> {
        self.read_directory(ROOT_CLUSTER)
    }

    /// Clusters bruts d’un fichier, dans l’ordre de la chaîne.
    pub fn read_file(&mut self, start_cluster: u16) -> Result<Vec<Vec<u8>>> {
        let limit = self.chain_limit();
        file::read_file(
            &mut self.store,
            &self.table,
            &self.geometry,
            start_cluster,
            limit,
            self.options.file_short_read,
        )
    }

    /// Contenu d’un fichier, coupé à sa taille.
    pub fn read_file_contents(&mut self, record: &DirectoryRecord) -> Result<Vec<u8>> {
        let limit = self.chain_limit();
        file::read_file_contents(
            &mut self.store,
            &self.table,
            &self.geometry,
            record,
            limit,
            self.options.file_short_read,
        )
    }

    /// Résout un chemin absolu en une entrée de répertoire.
    ///
    /// - le chemin doit commencer par `/` ; `/` seul rend `Ok(None)` (la racine n’a pas d’entrée)
    /// - la recherche est case-insensitive sur les noms courts (8.3)
    /// - `.` et `..` ne sont pas interprétés ici, c’est à l’appelant de normaliser
    pub fn open_path(&mut self, path: &str) -> Result<Option<DirectoryRecord>> {
        if !path.starts_with('/') {
            return Err(FatError::InvalidPath);
        }

        let mut current = ROOT_CLUSTER;
        let mut last: Option<DirectoryRecord> = None;

        for part in path.split('/').filter(|s| !s.is_empty()) {
            if let Some(e) = &last {
                if !e.is_dir() {
                    return Err(FatError::NotADirectory);
                }
            }

            let target = normalize_name(part);
            let entries = self.read_directory(current)?;
            let found = entries
                .into_iter()
                .filter(|e| !e.is_volume_label())
                .find(|e| normalize_name(&e.short_name()) == target);

            match found {
                Some(e) => {
                    current = e.first_cluster;
                    last = Some(e);
                }
                None => return Ok(None),
            }
        }

        Ok(last)
    }

    /// Liste un répertoire à partir d’un chemin absolu (`/` = racine).
    pub fn list_dir_path(&mut self, path: &str) -> Result<Vec<DirectoryRecord>> {
        match self.open_path(path)? {
            None if is_root(path) => self.read_root(),
            None => Err(FatError::PathNotFound),
            Some(e) if e.is_dir() => self.read_directory(e.first_cluster),
            Some(_) => Err(FatError::NotADirectory),
        }
    }

    /// Lit un fichier à partir de son chemin absolu.
    ///
    /// `Ok(None)` si le chemin n’existe pas.
    pub fn read_file_by_path(&mut self, path: &str) -> Result<Option<Vec<u8>>> {
        let entry = match self.open_path(path)? {
            Some(e) => e,
            None if is_root(path) => return Err(FatError::NotAFile),
            None => return Ok(None),
        };

        if !entry.is_file() {
            return Err(FatError::NotAFile);
        }
        self.read_file_contents(&entry).map(Some)
    }
}

fn is_root(path: &str) -> bool {
    path.starts_with('/') && path.split('/').all(|s| s.is_empty())
}

/// Normalise un nom pour comparer facilement (on passe en majuscule).
fn normalize_name(s: &str) -> String {
    s.to_ascii_uppercase()
}
