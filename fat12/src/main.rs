//! Petite CLI pour explorer une image FAT12 (disquette).
//!
//! Cette CLI s’appuie sur la bibliothèque `fat12_reader`:
//! - lecture: `ls`, `cat`, `info`, navigation avec `cd` et `pwd`
//! - mode non interactif via options ou mode shell interactif
//!
//! Exemple rapide:
//! ```text
//! fat12_cli --file floppy.img --ls /
//! fat12_cli --file floppy.img --cat /README.TXT
//! fat12_cli --file floppy.img --info -v
//! ```
use fat12_reader::{
    check_block_size, BlockStore, DirectoryRecord, FatError, MountedVolume, DEFAULT_BLOCK_SIZE,
};
use log::{Level, LevelFilter, Log};
use owo_colors::OwoColorize;
use std::env;
use std::fs::File;
use std::io::{self, ErrorKind, Read, Seek, SeekFrom, Write};
use std::process::ExitCode;

/// Support basé sur un fichier image.
struct FileStore {
    file: Option<File>,
    block_size: usize,
}

impl FileStore {
    fn open(path: &str) -> Result<Self, FatError> {
        let file = File::open(path).map_err(|e| {
            log::error!("ouverture de {path}: {e}");
            FatError::MediumOpen
        })?;
        Ok(Self {
            file: Some(file),
            block_size: DEFAULT_BLOCK_SIZE,
        })
    }
}

impl BlockStore for FileStore {
    fn physical_block_size(&self) -> usize {
        DEFAULT_BLOCK_SIZE
    }

    fn block_size(&self) -> usize {
        self.block_size
    }

    fn set_block_size(&mut self, bytes: usize) -> fat12_reader::Result<()> {
        check_block_size(DEFAULT_BLOCK_SIZE, bytes)?;
        self.block_size = bytes;
        Ok(())
    }

    fn read_blocks(&mut self, byte_offset: u64, count: usize, buf: &mut [u8]) -> usize {
        let file = match self.file.as_mut() {
            Some(f) => f,
            None => return 0,
        };

        let wanted = count.saturating_mul(self.block_size).min(buf.len());
        if let Err(e) = file.seek(SeekFrom::Start(byte_offset)) {
            log::warn!("seek {byte_offset}: {e}");
            return 0;
        }

        // read() peut rendre moins que demandé sans être en fin de fichier
        let mut done = 0;
        while done < wanted {
            match file.read(&mut buf[done..wanted]) {
                Ok(0) => break,
                Ok(n) => done += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    log::warn!("lecture à {byte_offset}: {e}");
                    break;
                }
            }
        }
        done
    }

    fn close(&mut self) {
        self.file = None;
    }
}

/// Logger minimal sur stderr, niveau en couleur.
struct CliLogger;

static LOGGER: CliLogger = CliLogger;

impl Log for CliLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = record.level();
        let tag = format!("{level:5}");
        let tag = match level {
            Level::Error => tag.bright_red().to_string(),
            Level::Warn => tag.bright_yellow().to_string(),
            Level::Info => tag.bright_blue().to_string(),
            Level::Debug => tag.bright_cyan().to_string(),
            Level::Trace => tag.bright_magenta().to_string(),
        };
        eprintln!("{tag} {}", record.args());
    }

    fn flush(&self) {}
}

fn init_logger(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    log::set_max_level(level);
    log::set_logger(&LOGGER)
}

/// Niveau de log : `FAT12_LOG` si présent, sinon warn / `-v` info / `-vv` debug.
fn log_level(verbosity: u8) -> LevelFilter {
    if let Some(level) = env::var("FAT12_LOG").ok().and_then(|v| v.parse().ok()) {
        return level;
    }
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}

/// Affiche l’usage de la CLI avec les commandes disponibles.
fn print_usage() {
    eprintln!(
        "Usage:
  fat12_cli --file <floppy.img> [--ls <path>] [--cat <path>] [--info] [-v|-vv]

Exemples:
  fat12_cli --file floppy.img --ls /
  fat12_cli --file floppy.img --cat /README.TXT
  fat12_cli --file floppy.img --info

Mode shell:
  fat12_cli --file floppy.img
  (puis: ls, cd, cat, pwd, info, help, exit)"
    );
}

/// Affiche l’aide du mode shell interactif.
fn print_shell_help() {
    println!(
        "Commandes:
  ls [path]            - lister un répertoire
  cat <path>           - lire un fichier
  cd [path]            - changer de répertoire courant
  pwd                  - afficher le répertoire courant
  info                 - géométrie du volume
  help                 - cette aide
  exit                 - quitter"
    );
}

/// Point d’entrée de la CLI: parse les arguments, monte l’image, puis
/// exécute la commande demandée ou bascule en mode shell interactif.
fn main() -> ExitCode {
    let mut args = env::args().skip(1);

    let mut image_path: Option<String> = None;
    let mut command: Option<String> = None;
    let mut target: Option<String> = None;
    let mut verbosity = 0u8;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--file" | "-f" => image_path = args.next(),
            "--ls" => {
                command = Some("ls".to_string());
                target = args.next();
            }
            "--cat" => {
                command = Some("cat".to_string());
                target = args.next();
            }
            "--info" => command = Some("info".to_string()),
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            _ => {
                eprintln!("Argument inconnu : {arg}");
                print_usage();
                return ExitCode::FAILURE;
            }
        }
    }

    if let Err(e) = init_logger(log_level(verbosity)) {
        eprintln!("Logger indisponible: {e}");
    }

    let image_path = match image_path {
        Some(p) => p,
        None => {
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let mut volume = match FileStore::open(&image_path).and_then(MountedVolume::mount) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Impossible de monter {image_path}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let ok = match command.as_deref() {
        Some("ls") => {
            let path = target
                .as_deref()
                .map(|p| resolve_path("/", p))
                .unwrap_or_else(|| "/".to_string());
            run_ls(&mut volume, &path)
        }
        Some("cat") => match target {
            Some(p) => run_cat(&mut volume, &resolve_path("/", &p)),
            None => {
                eprintln!("--cat nécessite un chemin");
                print_usage();
                false
            }
        },
        Some("info") => {
            run_info(&volume);
            true
        }
        Some(other) => {
            eprintln!("Commande inconnue : {other}");
            false
        }
        None => {
            run_shell(&mut volume);
            true
        }
    };

    volume.unmount();
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Résout un chemin absolu ou relatif à partir d'un répertoire courant.
///
/// Exemples :
/// - current="/DIR", path=".."          -> "/"
/// - current="/DIR", path="FILE.TXT"    -> "/DIR/FILE.TXT"
/// - current="/",     path="/AUTRE/XX"  -> "/AUTRE/XX"
fn resolve_path(current: &str, path: &str) -> String {
    let mut components: Vec<String> = Vec::new();

    if !path.starts_with('/') {
        for part in current.split('/') {
            push_component(&mut components, part);
        }
    }
    for part in path.split('/') {
        push_component(&mut components, part);
    }

    format!("/{}", components.join("/"))
}

/// Ajoute un composant de chemin en gérant `.` et `..`.
fn push_component(components: &mut Vec<String>, part: &str) {
    match part {
        "" | "." => {}
        ".." => {
            components.pop();
        }
        _ => components.push(part.to_string()),
    }
}

/// Taille lisible, en unités décimales (1 KB = 1000 octets).
fn human_size(size: u32) -> String {
    match size {
        0..=999 => format!("{size} byte"),
        1_000..=999_999 => format!("{:.2} KB", size as f64 / 1_000.0),
        _ => format!("{:.2} MB", size as f64 / 1_000_000.0),
    }
}

fn format_stamp(date: fat12_reader::FatDate, time: fat12_reader::FatTime) -> String {
    if date.is_set() {
        format!("{date} {:02}:{:02}", time.hour(), time.minute())
    } else {
        String::new()
    }
}

/// Une ligne de listing : type, nom, modification, création, taille.
fn format_entry(e: &DirectoryRecord) -> String {
    let kind = if e.is_dir() { "DIR " } else { "FILE" };
    let size = if e.is_dir() {
        String::new()
    } else {
        human_size(e.size)
    };
    format!(
        "{kind} {:<12} {:<16} {:<16} {:>11}",
        e.short_name(),
        format_stamp(e.last_write_date, e.last_write_time),
        format_stamp(e.creation_date, e.creation_time),
        size
    )
}

/// Liste un répertoire ; les entrées `.`/`..` et l’étiquette de volume sont masquées.
fn run_ls<S: BlockStore>(fs: &mut MountedVolume<S>, path: &str) -> bool {
    match fs.list_dir_path(path) {
        Ok(entries) => {
            println!("Listing de {path}:");
            let visible: Vec<_> = entries
                .iter()
                .filter(|e| !e.is_dot_entry() && !e.is_volume_label())
                .collect();
            if visible.is_empty() {
                println!("(vide)");
            }
            for e in visible {
                println!("{}", format_entry(e));
            }
            true
        }
        Err(e) => {
            eprintln!("Erreur ls {path}: {e}");
            false
        }
    }
}

/// Lit un fichier et écrit son contenu sur la sortie standard.
fn run_cat<S: BlockStore>(fs: &mut MountedVolume<S>, path: &str) -> bool {
    match fs.read_file_by_path(path) {
        Ok(Some(bytes)) => {
            let mut out = io::stdout();
            if let Err(e) = out.write_all(&bytes).and_then(|_| out.flush()) {
                eprintln!("Erreur d'écriture: {e}");
                return false;
            }
            true
        }
        Ok(None) => {
            eprintln!("Fichier introuvable : {path}");
            false
        }
        Err(e) => {
            eprintln!("Erreur cat {path}: {e}");
            false
        }
    }
}

/// Affiche la géométrie du volume monté.
fn run_info<S: BlockStore>(fs: &MountedVolume<S>) {
    let g = fs.geometry();
    println!("Octets par secteur    : {}", g.bytes_per_sector());
    println!("Secteurs par cluster  : {}", g.sectors_per_cluster());
    println!("Nombre de FAT         : {}", g.fat_count());
    println!("Secteurs par FAT      : {}", g.sectors_per_fat());
    println!("Entrées racine max    : {}", g.max_root_entries());
    println!("Secteurs au total     : {}", g.total_sectors());
    println!("Taille d'un cluster   : {} octets", g.cluster_size());
    println!(
        "Racine                : secteur {} ({} secteurs)",
        g.root_dir_start_sector(),
        g.root_dir_sectors()
    );
    println!("Zone de données       : secteur {}", g.data_start_sector());
    println!("Clusters de données   : {}", g.cluster_count());
}

/// Lance un petit shell interactif : navigation (`cd`, `pwd`), listage (`ls`),
/// lecture (`cat`) et géométrie (`info`).
fn run_shell<S: BlockStore>(fs: &mut MountedVolume<S>) {
    println!("FAT12 shell. Tapez 'help' pour l'aide, 'exit' pour quitter.");

    let stdin = io::stdin();
    let mut current_dir = String::from("/");

    loop {
        print!("fat12:{current_dir}> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut parts = line.split_whitespace();
        let cmd = match parts.next() {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            "exit" | "quit" => break,
            "help" => print_shell_help(),
            "pwd" => println!("{current_dir}"),
            "info" => run_info(fs),
            "ls" => {
                let target = match parts.next() {
                    Some(p) => resolve_path(&current_dir, p),
                    None => current_dir.clone(),
                };
                run_ls(fs, &target);
            }
            "cat" => match parts.next() {
                Some(p) => {
                    run_cat(fs, &resolve_path(&current_dir, p));
                    println!();
                }
                None => println!("Usage: cat <path>"),
            },
            "cd" => {
                let target = match parts.next() {
                    Some(p) => resolve_path(&current_dir, p),
                    None => "/".to_string(),
                };

                if target == "/" {
                    current_dir = target;
                    continue;
                }
                match fs.open_path(&target) {
                    Ok(Some(entry)) if entry.is_dir() => current_dir = target,
                    Ok(Some(_)) => println!("{target} n'est pas un répertoire"),
                    Ok(None) => println!("Répertoire introuvable : {target}"),
                    Err(e) => println!("Erreur cd vers {target}: {e}"),
                }
            }
            _ => println!("Commande inconnue: {cmd}. Tapez 'help'."),
        }
    }
}
