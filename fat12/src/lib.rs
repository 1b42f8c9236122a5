//! Lecteur FAT12 (lecture seule).
//!
//! Ce crate lit un volume FAT12 (typiquement une image de disquette) à
//! travers un support bloc abstrait ([`BlockStore`]). Il permet :
//! - de décoder le boot sector et la FAT (entrées de 12 bits),
//! - de lister la racine et les sous-répertoires,
//! - de lire le contenu des fichiers en suivant leur chaîne de clusters.
//!
//! Notes importantes :
//! - Le cœur est en `no_std` (hors tests) et n’utilise que `core` et `alloc`.
//! - Pas d’écriture, pas de Long File Names : seuls les noms courts 8.3 sont lus.
//! - Aucun état global : tout passe par un [`MountedVolume`].
//!
//! ```
//! use fat12_reader::{MemoryStore, MountedVolume};
//!
//! let image = vec![0u8; 4096];
//! // une image vide n’a pas de géométrie valide
//! assert!(MountedVolume::mount(MemoryStore::new(image)).is_err());
//! ```

#![cfg_attr(not(test), no_std)]

extern crate alloc;

mod block_store;
mod boot_sector;
mod chain;
mod dir_entry;
mod directory;
mod error;
mod fat_table;
mod file;
mod options;
mod volume;

#[cfg(test)]
mod test_image;

pub use block_store::{check_block_size, BlockStore, MemoryStore, DEFAULT_BLOCK_SIZE};
pub use boot_sector::{parse_boot_sector, BpbParams, VolumeGeometry, DIR_ENTRY_SIZE};
pub use chain::ClusterChain;
pub use dir_entry::{Attributes, DirectoryRecord, FatDate, FatTime};
pub use directory::{read_directory, scan_entries, ROOT_CLUSTER};
pub use error::{FatError, Result};
pub use fat_table::{ClusterEntry, FatTable, FAT12_BAD_CLUSTER, FAT12_EOC_MIN};
pub use file::{read_file, read_file_contents};
pub use options::{MountOptions, ShortReadPolicy};
pub use volume::MountedVolume;
