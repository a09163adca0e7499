pub mod preferences;

pub use preferences::{
    ExportPreferences, MarginsMm, PaperChoice, Preferences, PreferencesError, PreferencesStore,
    PreviewPreferences,
};
