//! Options de montage.

/// Que faire quand un cluster de fichier ne peut pas être lu en entier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortReadPolicy {
    /// On saute le cluster et on continue la chaîne (le contenu rendu a un trou).
    #[default]
    Skip,
    /// On s’arrête sur [`FatError::FileRead`](crate::FatError::FileRead).
    Fail,
}

/// Réglages d’un volume monté.
///
/// ```
/// use fat12_reader::{MountOptions, ShortReadPolicy};
///
/// let opts = MountOptions::new()
///     .short_read_policy(ShortReadPolicy::Fail)
///     .max_chain_len(128);
/// assert_eq!(opts.file_short_read, ShortReadPolicy::Fail);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountOptions {
    pub file_short_read: ShortReadPolicy,
    /// Longueur maximale d’une chaîne ; par défaut le nombre de clusters du volume.
    pub chain_limit: Option<usize>,
}

impl MountOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn short_read_policy(mut self, policy: ShortReadPolicy) -> Self {
        self.file_short_read = policy;
        self
    }

    pub fn max_chain_len(mut self, limit: usize) -> Self {
        self.chain_limit = Some(limit);
        self
    }
}
