//! File based preset storage: one pretty printed JSON file per preset id.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{Error, Preset, PresetId, Result};

// -------------------------------------------------------------------------------------------------

/// Default preset folder, relative to the working directory.
pub const DEFAULT_FOLDER_PATH: &str = "data";

// -------------------------------------------------------------------------------------------------

/// Maps preset ids to files in a preset folder and reads and writes [`Preset`]s.
///
/// Files are named after the id, zero padded to two digits: preset `1` lives in `01.json`,
/// preset `123` in `123.json`.
#[derive(Debug, Clone)]
pub struct PresetStore {
    folder: PathBuf,
}

impl Default for PresetStore {
    fn default() -> Self {
        Self::new(DEFAULT_FOLDER_PATH)
    }
}

impl PresetStore {
    /// Create a new store for the given folder. The folder is not created here: see
    /// [`Self::set_folder`].
    pub fn new<P: Into<PathBuf>>(folder: P) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// The folder presets are saved to and loaded from.
    pub fn folder(&self) -> &Path {
        &self.folder
    }

    /// Set a new preset folder, creating it if it doesn't exist yet.
    ///
    /// ### Errors
    /// Returns an error if the folder could not be created. The new path is applied anyway.
    pub fn set_folder<P: Into<PathBuf>>(&mut self, folder: P) -> Result<()> {
        self.folder = folder.into();
        if !self.folder.exists() {
            log::info!(target: "PresetStore", "Creating folder '{}'", self.folder.display());
            fs::create_dir_all(&self.folder)?;
        }
        Ok(())
    }

    /// File path of the given preset id.
    pub fn path(&self, id: PresetId) -> PathBuf {
        self.folder.join(format!("{id:02}.json"))
    }

    /// true when a file for the given preset id exists.
    pub fn exists(&self, id: PresetId) -> bool {
        self.path(id).is_file()
    }

    /// Write the given preset, replacing an existing file. Missing folders get created.
    ///
    /// The preset is written to a temporary file first, which then gets moved into place,
    /// so a failed save never leaves a partial preset file behind.
    ///
    /// ### Errors
    /// Returns an error if the file could not be written.
    pub fn save(&self, id: PresetId, preset: &Preset) -> Result<()> {
        let path = self.path(id);
        log::info!(target: "PresetStore", "Saving preset {} to '{}'", id, path.display());
        let contents = preset.to_json_string()?;
        if !self.folder.as_os_str().is_empty() {
            fs::create_dir_all(&self.folder)?;
        }
        let temp_path = path.with_extension("json.tmp");
        if let Err(err) = fs::write(&temp_path, contents).and_then(|_| fs::rename(&temp_path, &path))
        {
            let _ = fs::remove_file(&temp_path);
            return Err(err.into());
        }
        Ok(())
    }

    /// Read the preset with the given id.
    ///
    /// ### Errors
    /// Returns [`Error::NotFound`] if there's no file for the preset, or an IO or JSON error
    /// if the file could not be read or parsed.
    pub fn load(&self, id: PresetId) -> Result<Preset> {
        let path = self.path(id);
        if !path.is_file() {
            return Err(Error::NotFound(path));
        }
        log::debug!(target: "PresetStore", "Loading preset {} from '{}'", id, path.display());
        Preset::from_json_str(&fs::read_to_string(&path)?)
    }

    /// Delete the preset with the given id. Returns false if there was no such preset.
    ///
    /// ### Errors
    /// Returns an error if an existing file could not be removed.
    pub fn delete(&self, id: PresetId) -> Result<bool> {
        let path = self.path(id);
        if !path.is_file() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        log::info!(target: "PresetStore", "Preset {} deleted", id);
        Ok(true)
    }

    /// Copy the file of preset `from` to preset `to`, byte by byte.
    ///
    /// ### Errors
    /// Returns [`Error::NotFound`] if the source preset does not exist, or an IO error if
    /// copying failed.
    pub fn clone_preset(&self, from: PresetId, to: PresetId) -> Result<()> {
        let from_path = self.path(from);
        if !from_path.is_file() {
            return Err(Error::NotFound(from_path));
        }
        log::info!(target: "PresetStore", "Cloning preset {} to {}", from, to);
        fs::copy(&from_path, self.path(to))?;
        Ok(())
    }
}

// -------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn file_names() {
        let store = PresetStore::new("presets");
        assert_eq!(store.path(1), Path::new("presets").join("01.json"));
        assert_eq!(store.path(42), Path::new("presets").join("42.json"));
        assert_eq!(store.path(123), Path::new("presets").join("123.json"));
        assert_eq!(PresetStore::default().folder(), Path::new("data"));
    }

    #[test]
    fn save_load_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path());
        let mut preset = Preset::new();
        preset.set_raw_value("params", "x", json!(10));

        assert!(!store.exists(1));
        assert!(matches!(store.load(1), Err(Error::NotFound(_))));

        store.save(1, &preset).unwrap();
        assert!(store.exists(1));
        assert!(!store.path(1).with_extension("json.tmp").exists());
        assert_eq!(store.load(1).unwrap(), preset);

        assert!(store.delete(1).unwrap());
        assert!(!store.exists(1));
        assert!(!store.delete(1).unwrap());
    }

    #[test]
    fn clone_preset() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path());
        assert!(matches!(store.clone_preset(3, 4), Err(Error::NotFound(_))));
        assert!(!store.exists(4));

        let mut preset = Preset::new();
        preset.set_raw_value("params", "y", json!(0.5));
        store.save(3, &preset).unwrap();
        store.clone_preset(3, 4).unwrap();
        assert_eq!(
            fs::read(store.path(3)).unwrap(),
            fs::read(store.path(4)).unwrap()
        );
    }

    #[test]
    fn set_folder_creates_folder() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("nested").join("presets");
        let mut store = PresetStore::default();
        store.set_folder(&folder).unwrap();
        assert!(folder.is_dir());
        assert_eq!(store.folder(), folder.as_path());
    }

    #[test]
    fn failed_saves_leave_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut preset = Preset::new();
        preset.set_raw_value("params", "x", json!(1));

        // the folder is a regular file
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = PresetStore::new(&blocker);
        assert!(store.save(1, &preset).is_err());
        assert!(!store.path(1).exists());
        assert!(!store.path(1).with_extension("json.tmp").exists());
        assert_eq!(fs::read(&blocker).unwrap(), Vec::<u8>::new());

        // the preset path is taken by a folder, so the temporary file can't be moved
        let store = PresetStore::new(dir.path());
        fs::create_dir(store.path(2)).unwrap();
        assert!(store.save(2, &preset).is_err());
        assert!(store.path(2).is_dir());
        assert!(!store.path(2).with_extension("json.tmp").exists());
    }

    #[test]
    fn malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = PresetStore::new(dir.path());
        fs::write(store.path(7), "{ not json").unwrap();
        assert!(matches!(store.load(7), Err(Error::Json(_))));
    }
}
