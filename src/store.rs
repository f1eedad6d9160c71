// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Formatter;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::ToSql;
use rusqlite::Transaction;
use rusqlite::types::ToSqlOutput;

use crate::error::Fallible;
use crate::types::timestamp::Timestamp;

/// The persisted slots.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Key {
    CurrentChallenge,
    UserStats,
    Theme,
}

impl Key {
    pub fn as_str(&self) -> &'static str {
        match self {
            Key::CurrentChallenge => "currentChallenge",
            Key::UserStats => "userStats",
            Key::Theme => "appTheme",
        }
    }
}

impl Display for Key {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl ToSql for Key {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

/// A key-value store of opaque blobs.
pub trait Store {
    fn load(&self, key: Key) -> Fallible<Option<Vec<u8>>>;

    fn save(&mut self, key: Key, blob: &[u8]) -> Fallible<()>;

    fn remove(&mut self, key: Key) -> Fallible<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    blobs: HashMap<Key, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load(&self, key: Key) -> Fallible<Option<Vec<u8>>> {
        Ok(self.blobs.get(&key).cloned())
    }

    fn save(&mut self, key: Key, blob: &[u8]) -> Fallible<()> {
        self.blobs.insert(key, blob.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: Key) -> Fallible<()> {
        self.blobs.remove(&key);
        Ok(())
    }
}

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let mut conn = Connection::open(database_path)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating schema in {database_path}.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        Ok(Self { conn })
    }
}

impl Store for SqliteStore {
    fn load(&self, key: Key) -> Fallible<Option<Vec<u8>>> {
        let sql = "select slot_value from slots where slot_key = ?;";
        let blob: Option<Vec<u8>> = self
            .conn
            .query_row(sql, [key], |row| row.get(0))
            .optional()?;
        Ok(blob)
    }

    fn save(&mut self, key: Key, blob: &[u8]) -> Fallible<()> {
        let sql = "insert into slots (slot_key, slot_value, updated_at) values (?, ?, ?) \
                   on conflict (slot_key) do update set slot_value = excluded.slot_value, updated_at = excluded.updated_at;";
        let tx = self.conn.transaction()?;
        tx.execute(sql, (key, blob, Timestamp::now().to_rfc3339()))?;
        tx.commit()?;
        Ok(())
    }

    fn remove(&mut self, key: Key) -> Fallible<()> {
        self.conn
            .execute("delete from slots where slot_key = ?;", [key])?;
        Ok(())
    }
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["slots"], |row| row.get(0))?;
    Ok(count > 0)
}
