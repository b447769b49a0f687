//! Key model and the read-only store contract the codec consumes.

use std::collections::HashMap;

use zeroize::Zeroize;

/// A symmetric key distributed out of band by the UID2 operator.
///
/// Immutable after load. Master keys carry a site id of -1; site keys
/// carry the id of the site they are scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key {
    pub id: i64,
    pub site_id: i32,
    /// Millisecond epoch timestamps.
    pub created: i64,
    pub activates: i64,
    pub expires: i64,
    /// 16- or 32-byte AES secret.
    pub secret: Vec<u8>,
}

impl Key {
    pub fn new(
        id: i64,
        site_id: i32,
        created: i64,
        activates: i64,
        expires: i64,
        secret: Vec<u8>,
    ) -> Self {
        Self {
            id,
            site_id,
            created,
            activates,
            expires,
            secret,
        }
    }

    /// A key may encrypt or decrypt at `now` iff `activates <= now < expires`.
    pub fn is_active(&self, now_ms: i64) -> bool {
        self.activates <= now_ms && now_ms < self.expires
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}

/// Read-only lookup contract between the codec and whatever refresh layer
/// owns the keys. Implementations must be safe for concurrent reads.
pub trait KeyStore {
    fn try_get_key(&self, id: i64) -> Option<&Key>;

    /// The site key to encrypt with for `site_id` at `now`: active, and
    /// latest-activated among the active ones.
    fn try_get_active_site_key(&self, site_id: i32, now_ms: i64) -> Option<&Key>;

    /// Whether the store contents can still be trusted at `now`.
    fn is_valid(&self, now_ms: i64) -> bool;
}

/// In-memory [`KeyStore`] the operator refresh layer swaps in wholesale.
#[derive(Debug, Default)]
pub struct KeyContainer {
    keys_by_id: HashMap<i64, Key>,
    keys_by_site: HashMap<i32, Vec<Key>>,
    latest_key_expiry: i64,
}

impl KeyContainer {
    pub fn new(keys: Vec<Key>) -> Self {
        let mut keys_by_id = HashMap::new();
        let mut keys_by_site: HashMap<i32, Vec<Key>> = HashMap::new();
        let mut latest_key_expiry = i64::MIN;
        for key in keys {
            if key.expires > latest_key_expiry {
                latest_key_expiry = key.expires;
            }
            if key.site_id > 0 {
                keys_by_site.entry(key.site_id).or_default().push(key.clone());
            }
            keys_by_id.insert(key.id, key);
        }
        for site_keys in keys_by_site.values_mut() {
            site_keys.sort_by_key(|key| key.activates);
        }
        Self {
            keys_by_id,
            keys_by_site,
            latest_key_expiry,
        }
    }

    pub fn len(&self) -> usize {
        self.keys_by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys_by_id.is_empty()
    }
}

impl KeyStore for KeyContainer {
    fn try_get_key(&self, id: i64) -> Option<&Key> {
        self.keys_by_id.get(&id)
    }

    fn try_get_active_site_key(&self, site_id: i32, now_ms: i64) -> Option<&Key> {
        let site_keys = self.keys_by_site.get(&site_id)?;
        // Sorted by activation at construction; scan from the newest
        site_keys.iter().rev().find(|key| key.is_active(now_ms))
    }

    fn is_valid(&self, now_ms: i64) -> bool {
        !self.keys_by_id.is_empty() && self.latest_key_expiry > now_ms
    }
}
