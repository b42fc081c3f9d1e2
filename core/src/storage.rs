use std::cell::RefCell;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::StorageError;
use crate::types::UserPhysiology;

/// Lagring av brukerprofil. Feil er aldri fatale for økta.
pub trait ProfileStore {
    fn load(&self) -> Result<Option<UserPhysiology>, StorageError>;
    fn save(&self, profile: &UserPhysiology) -> Result<(), StorageError>;
}

/// Leser inn profil fra disk (JSON).
/// Hvis filen ikke finnes, returneres None.
pub fn load_profile(path: impl AsRef<Path>) -> Result<Option<UserPhysiology>, StorageError> {
    let path = path.as_ref();
    if !path.exists() {
        info!("no profile at {}, using defaults", path.display());
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    let profile: UserPhysiology = serde_json::from_str(&contents)?;
    info!(
        "profile loaded from {} (max_hr={}, rest_hr={})",
        path.display(),
        profile.max_hr,
        profile.rest_hr
    );
    Ok(Some(profile))
}

/// Lagrer profil til disk som JSON (pretty-print).
pub fn save_profile(profile: &UserPhysiology, path: impl AsRef<Path>) -> Result<(), StorageError> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(profile)?;
    std::fs::write(path, json)?;
    info!("profile saved to {}", path.display());
    Ok(())
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<UserPhysiology>, StorageError> {
        load_profile(&self.path)
    }

    fn save(&self, profile: &UserPhysiology) -> Result<(), StorageError> {
        save_profile(profile, &self.path)
    }
}

/// Kun i minnet (tester, Python).
#[derive(Debug, Default)]
pub struct MemoryStore {
    profile: RefCell<Option<UserPhysiology>>,
}

impl ProfileStore for MemoryStore {
    fn load(&self) -> Result<Option<UserPhysiology>, StorageError> {
        Ok(*self.profile.borrow())
    }

    fn save(&self, profile: &UserPhysiology) -> Result<(), StorageError> {
        *self.profile.borrow_mut() = Some(*profile);
        Ok(())
    }
}

/// Last profil; alle feil (lesing, parsing, ugyldige verdier) gir default.
pub fn load_or_default(store: &dyn ProfileStore) -> UserPhysiology {
    match store.load() {
        Ok(Some(p)) => match p.validate() {
            Ok(()) => p,
            Err(e) => {
                warn!("stored profile rejected: {e}");
                UserPhysiology::default()
            }
        },
        Ok(None) => UserPhysiology::default(),
        Err(e) => {
            warn!("profile load failed: {e}");
            UserPhysiology::default()
        }
    }
}

/// Lagre uten å feile; returnerer om det gikk.
pub fn save_quietly(store: &dyn ProfileStore, profile: &UserPhysiology) -> bool {
    match store.save(profile) {
        Ok(()) => true,
        Err(e) => {
            warn!("profile save failed: {e}");
            false
        }
    }
}
