//! Erreurs du lecteur FAT12.

use core::fmt;

/// Alias pratique pour les résultats du crate.
pub type Result<T> = core::result::Result<T, FatError>;

/// Erreurs possibles lors de l’accès à un volume FAT12.
///
/// Chaque lecture courte du support est remontée à l’appelant, sauf la
/// lecture d’un cluster de fichier en politique [`ShortReadPolicy::Skip`].
///
/// [`ShortReadPolicy::Skip`]: crate::ShortReadPolicy::Skip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatError {
    /// Impossible d’ouvrir le support (image absente, droits...).
    MediumOpen,
    /// Lecture courte du secteur 0.
    BootSectorRead,
    /// Champs du boot sector incohérents (ex: 0 octet par secteur).
    InvalidGeometry,
    /// Taille de bloc refusée par le support (pas un multiple de la taille physique).
    BlockSizeConfig,
    /// Lecture courte de la zone FAT.
    FatTableRead,
    /// Lecture courte du répertoire racine.
    RootDirectoryRead,
    /// Lecture courte d’un cluster de sous-répertoire.
    SubdirectoryRead { cluster: u16 },
    /// Lecture courte d’un cluster de fichier (politique `Fail`).
    FileRead { cluster: u16 },
    /// Numéro de cluster hors de la FAT ou réservé (< 2).
    InvalidCluster(u16),
    /// Chaîne bouclée, trop longue, ou qui pointe vers un cluster libre.
    CorruptChain { start: u16 },
    /// Chemin relatif ou vide.
    InvalidPath,
    /// Le chemin ne correspond à aucune entrée.
    PathNotFound,
    /// On tente de lister un fichier comme un répertoire.
    NotADirectory,
    /// On tente de lire un répertoire comme un fichier.
    NotAFile,
}

impl fmt::Display for FatError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MediumOpen => write!(f, "Impossible d'ouvrir le support"),
            Self::BootSectorRead => write!(f, "Lecture du boot sector impossible"),
            Self::InvalidGeometry => write!(f, "Géométrie du volume invalide"),
            Self::BlockSizeConfig => write!(f, "Taille de secteur refusée par le support"),
            Self::FatTableRead => write!(f, "Lecture de la FAT incomplète"),
            Self::RootDirectoryRead => write!(f, "Lecture du répertoire racine incomplète"),
            Self::SubdirectoryRead { cluster } => {
                write!(f, "Lecture du sous-répertoire incomplète (cluster {cluster})")
            }
            Self::FileRead { cluster } => {
                write!(f, "Lecture du fichier incomplète (cluster {cluster})")
            }
            Self::InvalidCluster(c) => write!(f, "Numéro de cluster invalide: {c:#05x}"),
            Self::CorruptChain { start } => {
                write!(f, "Chaîne de clusters corrompue (départ {start})")
            }
            Self::InvalidPath => write!(f, "Chemin invalide"),
            Self::PathNotFound => write!(f, "Fichier ou dossier non trouvé"),
            Self::NotADirectory => write!(f, "Ce n'est pas un dossier"),
            Self::NotAFile => write!(f, "Ce n'est pas un fichier"),
        }
    }
}

impl core::error::Error for FatError {}
