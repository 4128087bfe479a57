//! One-time code storage with per-key expiration.

use crate::Result;
use parking_lot::RwLock;
use rand::Rng;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Generate a six digit code. Leading zeros are significant, so the code is
/// always handled as a string.
pub fn generate_code() -> String {
    let n = rand::thread_rng().gen_range(0..=999_999u32);
    format!("{:06}", n)
}

/// Key-value store holding codes keyed by phone number.
///
/// The only operations the auth flow needs: set with ttl, get, delete.
/// A managed cache service can stand in behind this trait; expired entries
/// must never be returned by `get`.
pub trait CodeStore: Send + Sync {
    fn put(&self, phone: &str, code: &str, ttl: Duration) -> Result<()>;
    fn get(&self, phone: &str) -> Result<Option<String>>;
    fn delete(&self, phone: &str) -> Result<()>;
    /// liveness probe for the health endpoint
    fn ping(&self) -> Result<()> {
        Ok(())
    }
}

fn key(phone: &str) -> String {
    format!("otp:{}", phone)
}

/// In-process code store. A later `put` for the same phone number replaces
/// any unexpired prior code, last write wins.
#[derive(Debug, Default)]
pub struct MemoryCodeStore {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCodeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeStore for MemoryCodeStore {
    fn put(&self, phone: &str, code: &str, ttl: Duration) -> Result<()> {
        self.entries
            .write()
            .insert(key(phone), (code.to_owned(), Instant::now() + ttl));
        Ok(())
    }

    fn get(&self, phone: &str) -> Result<Option<String>> {
        let k = key(phone);
        let expired = {
            let entries = self.entries.read();
            match entries.get(&k) {
                Some((code, expires_at)) if Instant::now() < *expires_at => {
                    return Ok(Some(code.clone()))
                }
                Some(_) => true,
                None => false,
            }
        };
        if expired {
            self.entries.write().remove(&k);
        }
        Ok(None)
    }

    fn delete(&self, phone: &str) -> Result<()> {
        self.entries.write().remove(&key(phone));
        Ok(())
    }
}
