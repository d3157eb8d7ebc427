//! Byte-level key-value storage backed by LMDB.
//!
//! The planner keeps only a handful of keys (the serialized document and the
//! theme preference), each holding one JSON value. LMDB gives those writes
//! full ACID semantics without a server process.

use std::fs;
use std::path::{Path, PathBuf};

use lmdb::{Database, DatabaseFlags, Environment, Transaction, WriteFlags};
use log::{debug, info, warn};

use crate::error::StorageError;
use crate::store::KeyValueStore;

const DB_NAME: &str = "planner";

/// An open LMDB environment plus the single named database the planner uses.
///
/// The environment lives in the directory `<name>.lmdb`. After
/// [`LocalDbState::close_database`] every operation fails with
/// [`StorageError::Closed`].
pub struct LocalDbState {
    env: Option<Environment>,
    db: Option<Database>,
    path: PathBuf,
}

impl LocalDbState {
    /// Opens (or creates) the environment at `<name>.lmdb`.
    pub fn init(name: &str, map_size: usize) -> Result<Self, StorageError> {
        let path = PathBuf::from(format!("{name}.lmdb"));
        let (env, db) = open_environment(&path, map_size)?;
        info!("Opened planner database at {}", path.display());
        Ok(Self {
            env: Some(env),
            db: Some(db),
            path,
        })
    }

    fn handles(&self) -> Result<(&Environment, Database), StorageError> {
        match (&self.env, self.db) {
            (Some(env), Some(db)) => Ok((env, db)),
            _ => Err(StorageError::Closed),
        }
    }

    pub fn get_by_key(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let (env, db) = self.handles()?;
        let txn = env.begin_ro_txn()?;
        let value = match txn.get(db, &key) {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(lmdb::Error::NotFound) => None,
            Err(e) => return Err(e.into()),
        };
        txn.abort();
        Ok(value)
    }

    pub fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let (env, db) = self.handles()?;
        let mut txn = env.begin_rw_txn()?;
        txn.put(db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        debug!("Stored {} bytes under '{key}'", value.len());
        Ok(())
    }

    /// Drops the environment. LMDB flushes and releases its lock on drop.
    pub fn close_database(&mut self) -> Result<(), StorageError> {
        self.db = None;
        if let Some(env) = self.env.take() {
            env.sync(true)?;
            drop(env);
            info!("Closed planner database at {}", self.path.display());
        }
        Ok(())
    }
}

impl KeyValueStore for LocalDbState {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.get_by_key(key)
    }

    fn write(&mut self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.put(key, bytes)
    }
}

impl Drop for LocalDbState {
    fn drop(&mut self) {
        if let Err(e) = self.close_database() {
            warn!("Failed to close LMDB environment cleanly: {e}");
        }
    }
}

fn open_environment(path: &Path, map_size: usize) -> Result<(Environment, Database), StorageError> {
    fs::create_dir_all(path)?;
    let env = Environment::new()
        .set_max_dbs(1)
        .set_map_size(map_size)
        .open(path)?;
    let db = env.create_db(Some(DB_NAME), DatabaseFlags::empty())?;
    Ok((env, db))
}
