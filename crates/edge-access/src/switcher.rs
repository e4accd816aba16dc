//! Application switcher.
//!
//! The switcher lists the applications a user can move between and remembers
//! the last one they picked. The remembered value only chooses a default; it
//! is re-checked against the live grants every time it is read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use edge_core::{Application, ApplicationAccess};
use serde::Serialize;

use crate::error::AccessError;
use crate::resolver::{accessible_applications, has_application_access, primary_application_by};

/// One entry in the switcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitcherIcon {
    pub application: Application,
    pub label: &'static str,
    pub route: &'static str,
    pub icon: &'static str,
    /// Whether this is the application currently in use.
    pub active: bool,
}

// ---------------------------------------------------------------------------
// SelectionStore
// ---------------------------------------------------------------------------

/// Last selected application, stored as its identifier in a plain file.
#[derive(Debug, Clone)]
pub struct SelectionStore {
    path: PathBuf,
}

impl SelectionStore {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored selection. A missing file or an unrecognized identifier
    /// reads as no selection.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::SelectionStore` if the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<Application>, AccessError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(self.error(source)),
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        match raw.parse::<Application>() {
            Ok(application) => Ok(Some(application)),
            Err(error) => {
                tracing::warn!(path = %self.path.display(), %error, "ignoring stored selection");
                Ok(None)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `AccessError::SelectionStore` if the file cannot be written.
    pub fn save(&self, application: Application) -> Result<(), AccessError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| self.error(e))?;
        }
        fs::write(&self.path, application.as_str()).map_err(|e| self.error(e))
    }

    /// Forget the stored selection. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::SelectionStore` if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<(), AccessError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(self.error(source)),
        }
    }

    fn error(&self, source: io::Error) -> AccessError {
        AccessError::SelectionStore {
            path: self.path.clone(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// ApplicationSwitcher
// ---------------------------------------------------------------------------

/// Switcher over one user's grants.
#[derive(Debug, Clone)]
pub struct ApplicationSwitcher {
    access: Vec<ApplicationAccess>,
    priority: Vec<Application>,
    store: Option<SelectionStore>,
}

impl ApplicationSwitcher {
    #[must_use]
    pub fn new(access: &[ApplicationAccess]) -> Self {
        Self {
            access: access.to_vec(),
            priority: Vec::new(),
            store: None,
        }
    }

    /// Tie-break order used when nothing was selected yet.
    #[must_use]
    pub fn with_priority(mut self, priority: Vec<Application>) -> Self {
        self.priority = priority;
        self
    }

    #[must_use]
    pub fn with_store(mut self, store: SelectionStore) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn accessible(&self) -> Vec<Application> {
        accessible_applications(&self.access)
    }

    /// The stored selection if it is still granted, otherwise the primary
    /// application.
    #[must_use]
    pub fn current(&self) -> Option<Application> {
        let remembered = self.store.as_ref().and_then(|store| {
            store.load().unwrap_or_else(|error| {
                tracing::warn!(%error, "could not read last selected application");
                None
            })
        });
        remembered
            .filter(|application| has_application_access(&self.access, *application))
            .or_else(|| primary_application_by(&self.access, &self.priority))
    }

    /// Switcher entries; empty when there is nothing to switch between.
    #[must_use]
    pub fn icons(&self) -> Vec<SwitcherIcon> {
        let accessible = self.accessible();
        if accessible.len() <= 1 {
            return Vec::new();
        }
        let current = self.current();
        accessible
            .into_iter()
            .map(|application| SwitcherIcon {
                application,
                label: application.label(),
                route: application.route(),
                icon: application.icon(),
                active: current == Some(application),
            })
            .collect()
    }

    /// Switch to `application` and remember the choice.
    ///
    /// # Errors
    ///
    /// Returns `AccessError::NotAccessible` if the user has no grant for
    /// `application`, or `AccessError::SelectionStore` if persisting fails.
    pub fn select(&self, application: Application) -> Result<Application, AccessError> {
        if !has_application_access(&self.access, application) {
            return Err(AccessError::NotAccessible(application));
        }
        if let Some(store) = &self.store {
            store.save(application)?;
        }
        tracing::debug!(%application, "application selected");
        Ok(application)
    }
}
