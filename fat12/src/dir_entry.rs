//! Entrées de répertoire FAT12 (format court 8.3).
//!
//! On ne gère pas les Long File Names (LFN) : leurs fragments (attribut
//! 0x0F) sont ignorés par le lecteur de répertoire, on ne décode ici que les
//! entrées “courtes” de 32 octets.

use alloc::string::String;
use core::fmt;

use bitflags::bitflags;

use crate::boot_sector::DIR_ENTRY_SIZE;

/// Valeur d’attribut d’un fragment de nom long.
pub const ATTR_LONG_NAME: u8 = 0x0F;
/// Premier octet d’un slot libre : tous les suivants le sont aussi.
pub const ENTRY_END: u8 = 0x00;
/// Premier octet d’une entrée supprimée.
pub const ENTRY_DELETED: u8 = 0xE5;

bitflags! {
    /// Attributs FAT d’une entrée (octet 11).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Attributes: u8 {
        const READ_ONLY = 0x01;
        const HIDDEN = 0x02;
        const SYSTEM = 0x04;
        const VOLUME_ID = 0x08;
        const DIRECTORY = 0x10;
        const ARCHIVE = 0x20;
    }
}

/// Date FAT compactée : `yyyyyyym mmmddddd`, années depuis 1980.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FatDate(pub u16);

impl FatDate {
    pub fn year(self) -> u16 {
        (self.0 >> 9) + 1980
    }

    pub fn month(self) -> u8 {
        ((self.0 >> 5) & 0x0F) as u8
    }

    pub fn day(self) -> u8 {
        (self.0 & 0x1F) as u8
    }

    /// Un jour à 0 veut dire "pas de date enregistrée".
    pub fn is_set(self) -> bool {
        self.day() != 0
    }
}

impl fmt::Display for FatDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{:02}/{:02}", self.year(), self.month(), self.day())
    }
}

/// Heure FAT compactée : `hhhhhmmm mmmsssss`, secondes par pas de 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FatTime(pub u16);

impl FatTime {
    pub fn hour(self) -> u8 {
        (self.0 >> 11) as u8
    }

    pub fn minute(self) -> u8 {
        ((self.0 >> 5) & 0x3F) as u8
    }

    pub fn second(self) -> u8 {
        ((self.0 & 0x1F) * 2) as u8
    }
}

impl fmt::Display for FatTime {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hour(), self.minute(), self.second())
    }
}

/// Entrée de répertoire décodée.
///
/// Le nom et l’extension sont sans les espaces de remplissage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryRecord {
    pub name: String,
    pub extension: String,
    pub attributes: u8,
    pub creation_time: FatTime,
    pub creation_date: FatDate,
    pub last_write_time: FatTime,
    pub last_write_date: FatDate,
    /// Premier cluster ; 0 pour un fichier vide ou pour `..` vers la racine.
    pub first_cluster: u16,
    /// Taille en octets (sans signification pour un répertoire).
    pub size: u32,
}

impl DirectoryRecord {
    /// Décode un slot de 32 octets, sans aucun filtrage.
    ///
    /// Retourne `None` si le slot est trop court.
    pub fn parse(entry: &[u8]) -> Option<Self> {
        if entry.len() < DIR_ENTRY_SIZE {
            return None;
        }

        let u16_at = |i: usize| u16::from_le_bytes([entry[i], entry[i + 1]]);

        Some(Self {
            name: decode_ascii_trim(&entry[0..8]),
            extension: decode_ascii_trim(&entry[8..11]),
            attributes: entry[11],
            creation_time: FatTime(u16_at(14)),
            creation_date: FatDate(u16_at(16)),
            last_write_time: FatTime(u16_at(22)),
            last_write_date: FatDate(u16_at(24)),
            first_cluster: u16_at(26),
            size: u32::from_le_bytes([entry[28], entry[29], entry[30], entry[31]]),
        })
    }

    pub fn attrs(&self) -> Attributes {
        Attributes::from_bits_retain(self.attributes)
    }

    pub fn is_dir(&self) -> bool {
        self.attributes & Attributes::DIRECTORY.bits() != 0
    }

    pub fn is_file(&self) -> bool {
        !self.is_dir() && !self.is_volume_label()
    }

    pub fn is_volume_label(&self) -> bool {
        self.attrs().contains(Attributes::VOLUME_ID)
    }

    /// Entrées `.` et `..` (et plus généralement tout nom commençant par un point).
    pub fn is_dot_entry(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Nom court reconstitué (ex: `HELLO.TXT`, `DIR`).
    pub fn short_name(&self) -> String {
        if self.extension.is_empty() {
            self.name.clone()
        } else {
            let mut s = String::with_capacity(self.name.len() + 1 + self.extension.len());
            s.push_str(&self.name);
            s.push('.');
            s.push_str(&self.extension);
            s
        }
    }
}

/// Décodage ASCII simple en supprimant les espaces de fin (padding FAT 8.3).
///
/// Les octets non ASCII (pages de code OEM) sont remplacés par `?`.
fn decode_ascii_trim(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);

    let mut s = String::with_capacity(end);
    for &b in &bytes[..end] {
        s.push(if b.is_ascii() { b as char } else { '?' });
    }
    s
}
