//! Fehlerdefinitionen für das Mapping-Modul

use crate::controller::snapshot::{Button, SideId};
use std::path::PathBuf;
use thiserror::Error;

/// Fehlertypen beim Laden und Prüfen der Modus-Konfiguration
#[derive(Debug, Error)]
pub enum MappingError {
    /// Die Modus-Datei konnte nicht gelesen werden
    #[error("Modus-Datei {path} nicht lesbar: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Die Modus-Datei ist kein gültiges TOML
    #[error("Modus-Datei fehlerhaft: {0}")]
    Parse(#[from] toml::de::Error),

    /// Ein Knopf ist auf der falschen Seite belegt
    #[error("Modus '{mode}': {button} gehört nicht zur Seite {side}")]
    WrongSide {
        mode: String,
        button: Button,
        side: SideId,
    },

    /// Ein Modus ohne Namen
    #[error("Modus an Position {0} hat keinen Namen")]
    EmptyName(usize),

    /// Zwei Modi mit demselben Namen
    #[error("Modusname '{0}' ist doppelt vergeben")]
    DuplicateName(String),

    /// Allgemeiner Konfigurationsfehler
    #[error("Konfigurationsfehler: {0}")]
    ConfigError(String),
}
