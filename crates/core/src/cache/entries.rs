//! Named caches and stored response entries.
//!
//! Mirrors the browser Cache API: responses live in named caches, writes go
//! through an opened cache, and a global match searches every cache in the
//! order the caches were created.

use std::sync::Arc;

use bytes::Bytes;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

use super::connection::CacheDb;
use super::hash::compute_cache_key;
use super::storage::{CacheHandle, CacheStorage};
use crate::{Error, Request, Response, ResponseOrigin};

/// An opened cache, scoped to one name.
#[derive(Clone, Debug)]
pub struct NamedCache {
    db: CacheDb,
    name: String,
}

/// Raw entry columns, decoded outside the connection thread.
type EntryRow = (String, u16, String, Vec<u8>);

fn decode_entry(row: EntryRow) -> Result<Response, Error> {
    let (url, status, headers_json, body) = row;
    let headers: Vec<(String, String)> = serde_json::from_str(&headers_json)?;
    Ok(Response { url, status, headers, body: Bytes::from(body), origin: ResponseOrigin::Cache })
}

impl CacheDb {
    /// Open the cache called `name`, creating it on first use.
    pub async fn open_cache(&self, name: &str) -> Result<NamedCache, Error> {
        let owned = name.to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        self.conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO caches (name, created_at) VALUES (?1, ?2) ON CONFLICT(name) DO NOTHING",
                    params![owned, created_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)?;

        Ok(NamedCache { db: self.clone(), name: name.to_string() })
    }

    /// Look `request` up across every cache, oldest cache first.
    ///
    /// Only GET requests can match.
    pub async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        if !request.is_get() {
            return Ok(None);
        }

        let key_hash = compute_cache_key(&request.method, &request.url);
        let row = self
            .conn
            .call(move |conn| -> Result<Option<EntryRow>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT e.response_url, e.status_code, e.headers_json, e.body
                     FROM entries e JOIN caches c ON c.name = e.cache_name
                     WHERE e.key_hash = ?1
                     ORDER BY c.rowid ASC
                     LIMIT 1",
                )?;

                let result = stmt.query_row(params![key_hash], |row| {
                    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
                });

                match result {
                    Ok(row) => Ok(Some(row)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(e.into()),
                }
            })
            .await
            .map_err(Error::from)?;

        row.map(decode_entry).transpose()
    }

    /// Names of all caches, in creation order.
    pub async fn cache_names(&self) -> Result<Vec<String>, Error> {
        self.conn
            .call(|conn| -> Result<Vec<String>, Error> {
                let mut stmt = conn.prepare("SELECT name FROM caches ORDER BY rowid ASC")?;
                let names = stmt
                    .query_map([], |row| row.get(0))?
                    .collect::<Result<Vec<String>, _>>()?;
                Ok(names)
            })
            .await
            .map_err(Error::from)
    }
}

impl NamedCache {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Insert or replace the entry for `request`.
    ///
    /// Non-GET requests are rejected, as with the Cache API.
    pub async fn put(&self, request: &Request, response: &Response) -> Result<(), Error> {
        if !request.is_get() {
            return Err(Error::InvalidInput(format!("cannot cache a {} request", request.method)));
        }

        let cache_name = self.name.clone();
        let key_hash = compute_cache_key(&request.method, &request.url);
        let method = request.method.to_ascii_uppercase();
        let url = request.url.clone();
        let response_url = response.url.clone();
        let status = response.status;
        let headers_json = serde_json::to_string(&response.headers)?;
        let body = response.body.to_vec();
        let stored_at = chrono::Utc::now().to_rfc3339();

        self.db
            .conn
            .call(move |conn| -> Result<(), Error> {
                conn.execute(
                    "INSERT INTO entries (
                        cache_name, key_hash, method, url, response_url,
                        status_code, headers_json, body, stored_at
                    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                    ON CONFLICT(cache_name, key_hash) DO UPDATE SET
                        method = excluded.method,
                        url = excluded.url,
                        response_url = excluded.response_url,
                        status_code = excluded.status_code,
                        headers_json = excluded.headers_json,
                        body = excluded.body,
                        stored_at = excluded.stored_at",
                    params![cache_name, key_hash, method, url, response_url, status, headers_json, body, stored_at],
                )?;
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Number of entries stored in this cache.
    pub async fn entry_count(&self) -> Result<u64, Error> {
        let cache_name = self.name.clone();
        self.db
            .conn
            .call(move |conn| -> Result<u64, Error> {
                let count: i64 =
                    conn.query_row("SELECT COUNT(*) FROM entries WHERE cache_name = ?1", params![cache_name], |row| {
                        row.get(0)
                    })?;
                Ok(count as u64)
            })
            .await
            .map_err(Error::from)
    }
}

#[async_trait::async_trait]
impl CacheStorage for CacheDb {
    async fn match_request(&self, request: &Request) -> Result<Option<Response>, Error> {
        CacheDb::match_request(self, request).await
    }

    async fn open(&self, name: &str) -> Result<Arc<dyn CacheHandle>, Error> {
        let cache = self.open_cache(name).await?;
        Ok(Arc::new(cache))
    }
}

#[async_trait::async_trait]
impl CacheHandle for NamedCache {
    fn name(&self) -> &str {
        &self.name
    }

    async fn put(&self, request: &Request, response: &Response) -> Result<(), Error> {
        NamedCache::put(self, request, response).await
    }
}
