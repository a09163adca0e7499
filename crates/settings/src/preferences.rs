use log::{debug, warn};
use piecraft_printing::{ExportOptions, HeaderFooterTemplate, Margin, Orientation, PaperSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

const PREFERENCES_VERSION: u32 = 1;
const PREFERENCES_DIR: &str = ".piecraft";
const PREFERENCES_FILE: &str = "preferences.json";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("failed to read preferences {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse preferences {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize preferences {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write preferences {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to prepare directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub export: ExportPreferences,
    #[serde(default)]
    pub preview: PreviewPreferences,
}

fn default_version() -> u32 {
    PREFERENCES_VERSION
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: PREFERENCES_VERSION,
            export: ExportPreferences::default(),
            preview: PreviewPreferences::default(),
        }
    }
}

impl Preferences {
    pub fn sanitize(&mut self) {
        if self.version == 0 {
            self.version = PREFERENCES_VERSION;
        }
        self.export.sanitize();
        self.preview.sanitize();
    }

    /// Page geometry and footers for a new export.
    pub fn to_export_options(&self) -> ExportOptions {
        let export = &self.export;
        let indicator = HeaderFooterTemplate::parse(&export.page_indicator)
            .unwrap_or_else(|_| HeaderFooterTemplate::page_indicator());
        ExportOptions::new(
            export.paper.paper_size(),
            Orientation::Portrait,
            Margin::from_mm(
                export.margins_mm.top,
                export.margins_mm.bottom,
                export.margins_mm.left,
                export.margins_mm.right,
            ),
            HeaderFooterTemplate::branding(export.branding.trim()),
            indicator,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaperChoice {
    #[default]
    A4,
    Letter,
}

impl PaperChoice {
    pub fn paper_size(self) -> PaperSize {
        match self {
            PaperChoice::A4 => PaperSize::A4,
            PaperChoice::Letter => PaperSize::LETTER,
        }
    }
}

/// Margins in millimetres, measured from the paper edge to the text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarginsMm {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl Default for MarginsMm {
    fn default() -> Self {
        Self {
            top: 30.0,
            bottom: 35.0,
            left: 25.0,
            right: 25.0,
        }
    }
}

impl MarginsMm {
    fn sanitize(&mut self) {
        let defaults = MarginsMm::default();
        for (value, fallback) in [
            (&mut self.top, defaults.top),
            (&mut self.bottom, defaults.bottom),
            (&mut self.left, defaults.left),
            (&mut self.right, defaults.right),
        ] {
            if !value.is_finite() {
                *value = fallback;
            }
            *value = value.clamp(5.0, 60.0);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportPreferences {
    #[serde(default)]
    pub paper: PaperChoice,
    #[serde(default)]
    pub margins_mm: MarginsMm,
    /// Centered on every page. Empty disables it.
    #[serde(default = "default_branding")]
    pub branding: String,
    /// Footer template shown on multi-page documents.
    #[serde(default = "default_page_indicator")]
    pub page_indicator: String,
}

fn default_branding() -> String {
    "WizardTim.com".to_string()
}

fn default_page_indicator() -> String {
    "&rPage &p of &P".to_string()
}

impl Default for ExportPreferences {
    fn default() -> Self {
        Self {
            paper: PaperChoice::default(),
            margins_mm: MarginsMm::default(),
            branding: default_branding(),
            page_indicator: default_page_indicator(),
        }
    }
}

impl ExportPreferences {
    fn sanitize(&mut self) {
        self.margins_mm.sanitize();
        self.branding = self.branding.trim().to_string();
        if let Err(err) = HeaderFooterTemplate::parse(&self.page_indicator) {
            warn!("ignoring page indicator {:?}: {err}", self.page_indicator);
            self.page_indicator = default_page_indicator();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewPreferences {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_zoom_levels")]
    pub zoom_levels: Vec<u32>,
    #[serde(default = "default_base_dpi")]
    pub base_dpi: u32,
}

fn default_zoom_levels() -> Vec<u32> {
    vec![50]
}

fn default_base_dpi() -> u32 {
    96
}

impl Default for PreviewPreferences {
    fn default() -> Self {
        Self {
            enabled: false,
            zoom_levels: default_zoom_levels(),
            base_dpi: default_base_dpi(),
        }
    }
}

impl PreviewPreferences {
    fn sanitize(&mut self) {
        self.zoom_levels.retain(|zoom| (10..=400).contains(zoom));
        self.zoom_levels.sort_unstable();
        self.zoom_levels.dedup();
        if self.zoom_levels.is_empty() {
            self.zoom_levels = default_zoom_levels();
        }
        self.base_dpi = self.base_dpi.clamp(36, 300);
    }
}

#[derive(Debug)]
pub struct PreferencesStore {
    path: PathBuf,
    data: Preferences,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>, preferences: Preferences) -> Self {
        Self {
            path: path.into(),
            data: preferences,
        }
    }

    /// `<workspace>/.piecraft/preferences.json`
    pub fn default_path(workspace: impl AsRef<Path>) -> PathBuf {
        workspace.as_ref().join(PREFERENCES_DIR).join(PREFERENCES_FILE)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PreferencesError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            debug!("no preferences at {}, using defaults", path.display());
            let mut data = Preferences::default();
            data.sanitize();
            return Ok(Self { path, data });
        }

        let contents = fs::read_to_string(&path).map_err(|source| PreferencesError::Read {
            path: path.clone(),
            source,
        })?;
        let mut data: Preferences =
            serde_json::from_str(&contents).map_err(|source| PreferencesError::Parse {
                path: path.clone(),
                source,
            })?;
        data.sanitize();
        debug!("loaded preferences from {}", path.display());
        Ok(Self { path, data })
    }

    pub fn preferences(&self) -> &Preferences {
        &self.data
    }

    pub fn update<F>(&mut self, mut op: F) -> Result<(), PreferencesError>
    where
        F: FnMut(&mut Preferences),
    {
        op(&mut self.data);
        self.data.sanitize();
        self.save()
    }

    /// Restores defaults, keeping the previous file as `preferences.bak`.
    pub fn reset(&mut self) -> Result<(), PreferencesError> {
        self.backup_existing()?;
        self.data = Preferences::default();
        self.save()
    }

    pub fn save(&self) -> Result<(), PreferencesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| PreferencesError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let payload = serde_json::to_string_pretty(&self.data).map_err(|source| {
            PreferencesError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, payload.as_bytes()).map_err(|source| PreferencesError::Write {
            path: tmp_path.clone(),
            source,
        })?;
        fs::rename(&tmp_path, &self.path).map_err(|source| PreferencesError::Write {
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn backup_existing(&self) -> Result<(), PreferencesError> {
        if self.path.exists() {
            let backup = self.path.with_extension("bak");
            fs::copy(&self.path, &backup).map_err(|source| PreferencesError::Write {
                path: backup,
                source,
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use piecraft_printing::PaperId;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let store = PreferencesStore::load(PreferencesStore::default_path(dir.path())).unwrap();
        assert_eq!(store.preferences(), &Preferences::default());
        assert!(!store.path().exists());
    }

    #[test]
    fn sanitize_repairs_out_of_range_values() {
        let mut prefs = Preferences {
            version: 0,
            ..Preferences::default()
        };
        prefs.export.margins_mm.top = 500.0;
        prefs.export.margins_mm.left = f32::NAN;
        prefs.export.page_indicator = "&qbroken".into();
        prefs.export.branding = "  Pie Land  ".into();
        prefs.preview.zoom_levels = vec![1000, 100, 50, 100];
        prefs.preview.base_dpi = 5;
        prefs.sanitize();

        assert_eq!(prefs.version, PREFERENCES_VERSION);
        assert_eq!(prefs.export.margins_mm.top, 60.0);
        assert_eq!(prefs.export.margins_mm.left, 25.0);
        assert_eq!(prefs.export.page_indicator, default_page_indicator());
        assert_eq!(prefs.export.branding, "Pie Land");
        assert_eq!(prefs.preview.zoom_levels, vec![50, 100]);
        assert_eq!(prefs.preview.base_dpi, 36);
    }

    #[test]
    fn update_persists_and_reset_backs_up() {
        let dir = tempdir().unwrap();
        let path = PreferencesStore::default_path(dir.path());
        let mut store = PreferencesStore::load(&path).unwrap();
        store
            .update(|prefs| {
                prefs.export.paper = PaperChoice::Letter;
                prefs.preview.enabled = true;
            })
            .unwrap();

        let reloaded = PreferencesStore::load(&path).unwrap();
        assert_eq!(reloaded.preferences().export.paper, PaperChoice::Letter);
        assert!(reloaded.preferences().preview.enabled);
        assert!(!path.with_extension("tmp").exists());

        store.reset().unwrap();
        assert_eq!(store.preferences(), &Preferences::default());
        let backup = fs::read_to_string(path.with_extension("bak")).unwrap();
        assert!(backup.contains("\"letter\""));
    }

    #[test]
    fn parse_errors_carry_the_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("preferences.json");
        fs::write(&path, "{ not json").unwrap();
        match PreferencesStore::load(&path) {
            Err(PreferencesError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn export_options_follow_preferences() {
        let mut prefs = Preferences::default();
        prefs.export.paper = PaperChoice::Letter;
        prefs.export.branding = String::new();
        let options = prefs.to_export_options();
        assert_eq!(options.paper.id, PaperId::Letter);
        assert!(options.footer_template.is_empty());
        assert_eq!(
            *options.page_indicator_template,
            HeaderFooterTemplate::page_indicator()
        );
    }
}
