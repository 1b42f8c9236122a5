//! Parcours d’une chaîne de clusters dans la FAT.

use crate::fat_table::{FatTable, FAT12_BAD_CLUSTER, FIRST_DATA_CLUSTER};
use crate::{FatError, Result};

/// Itérateur paresseux sur les clusters d’une chaîne.
///
/// Le premier élément est le cluster de départ. Le parcours s’arrête dès que
/// le lien suivant vaut 0xFF7 ou plus (défectueux ou fin de chaîne). Une
/// chaîne plus longue que `limit`, ou qui pointe vers un cluster libre, est
/// signalée par [`FatError::CorruptChain`] : c’est ce qui protège contre une
/// FAT bouclée. Après une erreur, l’itérateur ne rend plus rien.
///
/// Pour reparcourir la chaîne, il suffit d’en reconstruire un (ou de cloner).
#[derive(Debug, Clone)]
pub struct ClusterChain<'a> {
    table: &'a FatTable,
    start: u16,
    current: Option<u16>,
    yielded: usize,
    limit: usize,
}

impl<'a> ClusterChain<'a> {
    pub fn new(table: &'a FatTable, start: u16, limit: usize) -> Self {
        Self {
            table,
            start,
            current: Some(start),
            yielded: 0,
            limit,
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    fn fail(&mut self, err: FatError) -> Option<Result<u16>> {
        self.current = None;
        Some(Err(err))
    }
}

impl Iterator for ClusterChain<'_> {
    type Item = Result<u16>;

    fn next(&mut self) -> Option<Self::Item> {
        let cluster = self.current?;

        if cluster < FIRST_DATA_CLUSTER {
            return if self.yielded == 0 {
                self.fail(FatError::InvalidCluster(cluster))
            } else {
                log::warn!("chaîne {}: lien vers le cluster libre {cluster}", self.start);
                self.fail(FatError::CorruptChain { start: self.start })
            };
        }

        if self.yielded >= self.limit {
            log::warn!("chaîne {}: plus de {} clusters", self.start, self.limit);
            return self.fail(FatError::CorruptChain { start: self.start });
        }

        let next = match self.table.next(cluster) {
            Ok(n) => n,
            Err(e) => return self.fail(e),
        };

        self.current = if next < FAT12_BAD_CLUSTER {
            Some(next)
        } else {
            if next == FAT12_BAD_CLUSTER {
                log::warn!(
                    "chaîne {}: cluster {cluster} suivi d'un cluster défectueux",
                    self.start
                );
            }
            None
        };

        self.yielded += 1;
        Some(Ok(cluster))
    }
}

impl core::iter::FusedIterator for ClusterChain<'_> {}
