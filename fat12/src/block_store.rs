//! Accès bloc au support.
//!
//! Le lecteur ne connaît le support qu’à travers [`BlockStore`]. Une lecture
//! renvoie le nombre d’octets réellement lus : un compte plus petit que
//! demandé est la seule façon pour un support de signaler un échec, et c’est
//! au lecteur de décider si c’est fatal.

use alloc::vec::Vec;

use crate::{FatError, Result};

/// Taille de bloc par défaut d’un support, avant lecture du boot sector.
pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Support adressable par blocs (image disque, disquette, mémoire...).
pub trait BlockStore {
    /// Taille du bloc physique du support.
    fn physical_block_size(&self) -> usize;

    /// Taille de bloc actuellement configurée.
    fn block_size(&self) -> usize;

    /// Change la taille de bloc utilisée par les lectures.
    ///
    /// Doit échouer avec [`FatError::BlockSizeConfig`] si `bytes` n’est pas
    /// un multiple non nul de la taille physique.
    fn set_block_size(&mut self, bytes: usize) -> Result<()>;

    /// Lit `count` blocs consécutifs à partir de l’octet `byte_offset`.
    ///
    /// `buf` doit faire au moins `count * block_size()` octets.
    fn read_blocks(&mut self, byte_offset: u64, count: usize, buf: &mut [u8]) -> usize;

    /// Lit un seul bloc à partir de l’octet `byte_offset`.
    fn read_block(&mut self, byte_offset: u64, buf: &mut [u8]) -> usize {
        self.read_blocks(byte_offset, 1, buf)
    }

    /// Ferme le support. Les lectures suivantes n’ont plus de sens.
    fn close(&mut self) {}
}

impl<S: BlockStore + ?Sized> BlockStore for &mut S {
    fn physical_block_size(&self) -> usize {
        (**self).physical_block_size()
    }

    fn block_size(&self) -> usize {
        (**self).block_size()
    }

    fn set_block_size(&mut self, bytes: usize) -> Result<()> {
        (**self).set_block_size(bytes)
    }

    fn read_blocks(&mut self, byte_offset: u64, count: usize, buf: &mut [u8]) -> usize {
        (**self).read_blocks(byte_offset, count, buf)
    }

    fn read_block(&mut self, byte_offset: u64, buf: &mut [u8]) -> usize {
        (**self).read_block(byte_offset, buf)
    }

    fn close(&mut self) {
        (**self).close()
    }
}

/// Vérifie qu’une taille de bloc est un multiple non nul de la taille physique.
pub fn check_block_size(physical: usize, requested: usize) -> Result<()> {
    if requested == 0 || physical == 0 || requested % physical != 0 {
        return Err(FatError::BlockSizeConfig);
    }
    Ok(())
}

/// Support en mémoire : une image disque complète dans un `Vec<u8>`.
///
/// Les lectures au-delà de la fin de l’image sont simplement courtes.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    data: Vec<u8>,
    physical_block_size: usize,
    block_size: usize,
    closed: bool,
}

impl MemoryStore {
    /// Construit un support de blocs physiques de 512 octets.
    pub fn new(data: Vec<u8>) -> Self {
        Self::with_physical_block_size(data, DEFAULT_BLOCK_SIZE)
    }

    pub fn with_physical_block_size(data: Vec<u8>, physical_block_size: usize) -> Self {
        Self {
            data,
            physical_block_size,
            block_size: physical_block_size,
            closed: false,
        }
    }

    /// Donne accès à l’image brute.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Modifie l’image (utile pour simuler un support qui change).
    pub fn data_mut(&mut self) -> &mut Vec<u8> {
        &mut self.data
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl BlockStore for MemoryStore {
    fn physical_block_size(&self) -> usize {
        self.physical_block_size
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn set_block_size(&mut self, bytes: usize) -> Result<()> {
        check_block_size(self.physical_block_size, bytes)?;
        self.block_size = bytes;
        Ok(())
    }

    fn read_blocks(&mut self, byte_offset: u64, count: usize, buf: &mut [u8]) -> usize {
        if self.closed {
            return 0;
        }

        let wanted = core::cmp::min(count.saturating_mul(self.block_size), buf.len());
        let start = match usize::try_from(byte_offset) {
            Ok(s) if s < self.data.len() => s,
            _ => return 0,
        };

        let n = core::cmp::min(wanted, self.data.len() - start);
        buf[..n].copy_from_slice(&self.data[start..start + n]);
        n
    }

    fn close(&mut self) {
        self.closed = true;
    }
}
