//! Modul für die Abbildung von Controller-Eingaben auf Ansicht, Werkzeuge und Eingabeereignisse.
//!
//! Die Engine ([`InputMapper`]) wird pro Tick mit einem Eingabe-Snapshot aufgerufen,
//! ermittelt den aktiven Modus und setzt Flanken und Stickauslenkungen in
//! Host-Operatoren, Kamera-Deltas und synthetische Maus-/Tastaturereignisse um.
//!
//! ```text
//! InputSnapshot ──► InputMapper ──┬──► Viewport      (Kamera)
//!                      │          ├──► Host          (Werkzeuge, Overlay)
//!                 Preferences     └──► EventInjector (Maus, Tastatur)
//! ```

pub mod axis;
pub mod config;
pub mod cursor;
pub mod dispatch;
pub mod edge;
pub mod engine;
pub mod error;
pub mod mode;
pub mod templates;
pub mod view;

#[cfg(test)]
pub mod test_support;

// Re-exports für einfacheren Zugriff
pub use config::{Mode, Preferences};
pub use engine::InputMapper;
pub use error::MappingError;
