//! Persisted pilot settings.
//!
//! The settings live in three independently addressable byte slots, the
//! layout of the device EEPROM map. Loading repairs anything out of range
//! to the defaults; saving writes exactly one slot.

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::constants::{DEFAULT_VOLUME, MAX_SENS, MAX_VOLUME, MIN_SENS, MIN_VOLUME};
use crate::error::{Result, VarioError};

/// Value of a never-written byte, as on a blank EEPROM
pub const ERASED: u8 = 0xFF;

/// Number of persisted slots
pub const SLOT_COUNT: usize = 3;

/// One persisted setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Volume,
    Sensitivity,
    Falling,
}

impl SettingsField {
    pub const ALL: [SettingsField; SLOT_COUNT] = [
        SettingsField::Volume,
        SettingsField::Sensitivity,
        SettingsField::Falling,
    ];

    /// Byte address of the field in the store
    pub fn slot(self) -> usize {
        match self {
            SettingsField::Volume => 0,
            SettingsField::Sensitivity => 1,
            SettingsField::Falling => 2,
        }
    }
}

/// Byte store holding the settings slots
pub trait SettingsStore {
    fn read(&mut self, field: SettingsField) -> Result<u8>;
    fn write(&mut self, field: SettingsField, value: u8) -> Result<()>;
}

/// Pilot settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// Tone amplitude, 0..=20
    pub volume: u8,
    /// Minimum climb frequency that triggers the climb tone, 10..=40
    pub sensitivity: i8,
    /// Whether the sink tone is enabled
    pub falling_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            sensitivity: MIN_SENS,
            falling_enabled: true,
        }
    }
}

impl Settings {
    /// Decode the three raw slots, `None` if any of them is out of range
    pub fn from_bytes(bytes: [u8; SLOT_COUNT]) -> Option<Self> {
        let volume = bytes[0];
        let sensitivity = bytes[1] as i8;
        let falling = bytes[2];

        if !(MIN_VOLUME..=MAX_VOLUME).contains(&volume)
            || !(MIN_SENS..=MAX_SENS).contains(&sensitivity)
            || falling > 1
        {
            return None;
        }

        Some(Self {
            volume,
            sensitivity,
            falling_enabled: falling == 1,
        })
    }

    pub fn to_bytes(&self) -> [u8; SLOT_COUNT] {
        SettingsField::ALL.map(|field| self.byte(field))
    }

    /// Raw slot value of one field
    pub fn byte(&self, field: SettingsField) -> u8 {
        match field {
            SettingsField::Volume => self.volume,
            SettingsField::Sensitivity => self.sensitivity as u8,
            SettingsField::Falling => self.falling_enabled as u8,
        }
    }

    /// Load the settings, repairing a corrupted or unreadable store
    ///
    /// Corruption is not an error: the defaults are written back to every
    /// slot and returned. A failure to write them back is only logged.
    pub fn load<S: SettingsStore + ?Sized>(store: &mut S) -> Self {
        match read_all(store) {
            Ok(bytes) => {
                if let Some(settings) = Self::from_bytes(bytes) {
                    log::info!(
                        "Settings loaded: volume={} sensitivity={} falling={}",
                        settings.volume,
                        settings.sensitivity,
                        settings.falling_enabled
                    );
                    return settings;
                }
                log::warn!("Stored settings {:?} out of range, restoring defaults", bytes);
            }
            Err(e) => log::warn!("Could not read settings ({}), restoring defaults", e),
        }

        let defaults = Self::default();
        for field in SettingsField::ALL {
            if let Err(e) = defaults.save(store, field) {
                log::warn!("Could not persist default {:?}: {}", field, e);
            }
        }
        defaults
    }

    /// Persist a single field
    pub fn save<S: SettingsStore + ?Sized>(&self, store: &mut S, field: SettingsField) -> Result<()> {
        store.write(field, self.byte(field))
    }
}

fn read_all<S: SettingsStore + ?Sized>(store: &mut S) -> Result<[u8; SLOT_COUNT]> {
    let mut bytes = [ERASED; SLOT_COUNT];
    for field in SettingsField::ALL {
        bytes[field.slot()] = store.read(field)?;
    }
    Ok(bytes)
}

/// Volatile store, starts erased
#[derive(Debug, Clone)]
pub struct MemoryStore {
    bytes: [u8; SLOT_COUNT],
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_bytes([ERASED; SLOT_COUNT])
    }

    pub fn with_bytes(bytes: [u8; SLOT_COUNT]) -> Self {
        Self { bytes, writes: 0 }
    }

    pub fn with_settings(settings: &Settings) -> Self {
        Self::with_bytes(settings.to_bytes())
    }

    pub fn bytes(&self) -> [u8; SLOT_COUNT] {
        self.bytes
    }

    /// Number of slot writes since creation
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for MemoryStore {
    fn read(&mut self, field: SettingsField) -> Result<u8> {
        Ok(self.bytes[field.slot()])
    }

    fn write(&mut self, field: SettingsField, value: u8) -> Result<()> {
        self.bytes[field.slot()] = value;
        self.writes += 1;
        Ok(())
    }
}

/// Settings kept in a small binary file, one byte per slot
pub struct FileStore {
    path: PathBuf,
    file: File,
}

impl FileStore {
    /// Open the store, creating an erased file if it does not exist
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let len = file.metadata()?.len() as usize;
        if len < SLOT_COUNT {
            log::info!("Initialising settings file {}", path.display());
            file.seek(SeekFrom::Start(len as u64))?;
            file.write_all(&vec![ERASED; SLOT_COUNT - len])?;
            file.sync_data()?;
        }

        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for FileStore {
    fn read(&mut self, field: SettingsField) -> Result<u8> {
        let mut byte = [0u8; 1];
        self.file.seek(SeekFrom::Start(field.slot() as u64))?;
        self.file.read_exact(&mut byte).map_err(|e| {
            VarioError::Store(format!("{}: slot {}: {}", self.path.display(), field.slot(), e))
        })?;
        Ok(byte[0])
    }

    fn write(&mut self, field: SettingsField, value: u8) -> Result<()> {
        self.file.seek(SeekFrom::Start(field.slot() as u64))?;
        self.file.write_all(&[value])?;
        self.file.sync_data()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStore;

    impl SettingsStore for BrokenStore {
        fn read(&mut self, _field: SettingsField) -> Result<u8> {
            Err(VarioError::Store("bus error".into()))
        }

        fn write(&mut self, _field: SettingsField, _value: u8) -> Result<()> {
            Err(VarioError::Store("bus error".into()))
        }
    }

    #[test]
    fn test_erased_store_loads_defaults() {
        let mut store = MemoryStore::new();
        let settings = Settings::load(&mut store);

        assert_eq!(settings, Settings::default());
        assert_eq!(store.bytes(), [5, 10, 1]);
    }

    #[test]
    fn test_valid_store_is_untouched() {
        let mut store = MemoryStore::with_bytes([12, 30, 0]);
        let settings = Settings::load(&mut store);

        assert_eq!(settings.volume, 12);
        assert_eq!(settings.sensitivity, 30);
        assert!(!settings.falling_enabled);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_any_out_of_range_field_repairs_all() {
        for bytes in [[21, 10, 1], [5, 9, 1], [5, 41, 0], [5, 20, 2], [5, 0xF6, 1]] {
            let mut store = MemoryStore::with_bytes(bytes);
            assert_eq!(Settings::load(&mut store), Settings::default(), "{:?}", bytes);
            assert_eq!(store.bytes(), [5, 10, 1]);
        }
    }

    #[test]
    fn test_unreadable_store_falls_back_to_defaults() {
        assert_eq!(Settings::load(&mut BrokenStore), Settings::default());
    }

    #[test]
    fn test_save_writes_single_slot() {
        let mut store = MemoryStore::with_bytes([5, 10, 1]);
        let settings = Settings {
            volume: 9,
            sensitivity: 20,
            falling_enabled: false,
        };

        settings.save(&mut store, SettingsField::Sensitivity).unwrap();

        assert_eq!(store.bytes(), [5, 20, 1]);
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.bin");

        {
            let mut store = FileStore::open(&path).unwrap();
            assert_eq!(store.read(SettingsField::Volume).unwrap(), ERASED);

            let settings = Settings::load(&mut store);
            let changed = Settings {
                volume: 17,
                ..settings
            };
            changed.save(&mut store, SettingsField::Volume).unwrap();
        }

        let mut store = FileStore::open(&path).unwrap();
        let settings = Settings::load(&mut store);
        assert_eq!(settings.volume, 17);
        assert_eq!(settings.sensitivity, 10);
        assert!(settings.falling_enabled);
        assert_eq!(std::fs::read(&path).unwrap(), vec![17, 10, 1]);
    }
}
