use crate::link::{ShortId, ShortLink};
use crate::store::{sorted_links, LinkStore};
use crate::{Error, Result};
use bytes::{BufMut, BytesMut};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use tracing::{debug, info, warn};

const LOG_HEADER_SIZE: usize = 16;
const LOG_MAGIC: u32 = 0x4C4E4B00; // "LNK\0"
const LOG_VERSION: u32 = 1;
const RECORD_LEN_SIZE: usize = 4;
const RECORD_CRC_SIZE: usize = 4;
/// Largest encoded link accepted; longer length prefixes are corruption.
pub const MAX_RECORD_SIZE: usize = 1024 * 1024;

/// Append-only file of short links.
/// Format: [magic(4) | version(4) | reserved(8)] [record...]
/// Record: [len(4) | bincode(ShortLink) | crc(4)], crc over len and body
pub struct LogStore {
    inner: Mutex<LogInner>,
}

struct LogInner {
    file: File,
    index: HashMap<ShortId, ShortLink>,
}

impl LogStore {
    /// Create a new log file. Fails if it already exists.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        let mut header = BytesMut::with_capacity(LOG_HEADER_SIZE);
        header.put_u32(LOG_MAGIC); // big-endian for magic
        header.put_u32_le(LOG_VERSION);
        header.put_u64_le(0); // reserved
        file.write_all(&header)?;
        file.sync_all()?;

        info!(path = %path.display(), "created link log");
        Ok(Self {
            inner: Mutex::new(LogInner {
                file,
                index: HashMap::new(),
            }),
        })
    }

    /// Open an existing log, verifying every record and dropping a torn tail.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut file = OpenOptions::new().read(true).write(true).open(path)?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)?;

        if buf.len() < LOG_HEADER_SIZE {
            return Err(Error::Corruption("Link log header truncated".to_string()));
        }
        let magic = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]);
        if magic != LOG_MAGIC {
            return Err(Error::Corruption("Invalid link log magic".to_string()));
        }
        let version = u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
        if version != LOG_VERSION {
            return Err(Error::Corruption(format!(
                "Unsupported link log version {}",
                version
            )));
        }

        let (links, valid_end) = scan_records(&buf[LOG_HEADER_SIZE..])?;
        let valid_end = (LOG_HEADER_SIZE + valid_end) as u64;
        if valid_end < buf.len() as u64 {
            warn!(
                path = %path.display(),
                discarded = buf.len() as u64 - valid_end,
                "truncating torn record at end of link log"
            );
            file.set_len(valid_end)?;
            file.sync_all()?;
        }

        let mut index = HashMap::with_capacity(links.len());
        for link in links {
            index.insert(link.id.clone(), link);
        }
        info!(path = %path.display(), links = index.len(), "opened link log");

        Ok(Self {
            inner: Mutex::new(LogInner { file, index }),
        })
    }

    /// Open `path` if it exists, otherwise create it (and its parent directory).
    pub fn open_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::open(path);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Self::create(path)
    }
}

/// Parses records from `data` (the bytes after the header). Returns the
/// decoded links and the length of the prefix holding complete records.
/// Only a plausible record cut short by the end of the file counts as torn.
fn scan_records(data: &[u8]) -> Result<(Vec<ShortLink>, usize)> {
    let mut links = Vec::new();
    let mut pos = 0usize;

    loop {
        let remaining = data.len() - pos;
        if remaining < RECORD_LEN_SIZE {
            break;
        }

        let len_bytes = [data[pos], data[pos + 1], data[pos + 2], data[pos + 3]];
        let len = u32::from_le_bytes(len_bytes) as usize;
        if len == 0 || len > MAX_RECORD_SIZE {
            return Err(Error::Corruption(format!(
                "Record at offset {} has invalid length {}",
                LOG_HEADER_SIZE + pos,
                len
            )));
        }
        let record_size = RECORD_LEN_SIZE + len + RECORD_CRC_SIZE;
        if remaining < record_size {
            break;
        }

        let body = &data[pos + RECORD_LEN_SIZE..pos + RECORD_LEN_SIZE + len];
        let crc_at = pos + RECORD_LEN_SIZE + len;
        let expected_crc = u32::from_le_bytes([
            data[crc_at],
            data[crc_at + 1],
            data[crc_at + 2],
            data[crc_at + 3],
        ]);
        if record_crc(&len_bytes, body) != expected_crc {
            return Err(Error::ChecksumMismatch);
        }

        let link: ShortLink = bincode::deserialize(body)
            .map_err(|e| Error::Corruption(format!("Deserialize error: {}", e)))?;
        links.push(link);
        pos += record_size;
    }

    Ok((links, pos))
}

fn record_crc(len_bytes: &[u8], body: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(len_bytes);
    hasher.update(body);
    hasher.finalize()
}

fn encode_record(link: &ShortLink) -> Result<BytesMut> {
    let data = bincode::serialize(link)
        .map_err(|e| Error::Internal(format!("Serialize error: {}", e)))?;
    if data.len() > MAX_RECORD_SIZE {
        return Err(Error::InvalidArgument(format!(
            "Link record of {} bytes exceeds {} bytes",
            data.len(),
            MAX_RECORD_SIZE
        )));
    }
    let len_bytes = (data.len() as u32).to_le_bytes();

    let mut buf = BytesMut::with_capacity(RECORD_LEN_SIZE + data.len() + RECORD_CRC_SIZE);
    buf.put_slice(&len_bytes);
    buf.put_slice(&data);
    buf.put_u32_le(record_crc(&len_bytes, &data));
    Ok(buf)
}

/// File operations an append needs.
trait LogFile: Write + Seek {
    fn sync(&mut self) -> std::io::Result<()>;
    fn truncate_to(&mut self, len: u64) -> std::io::Result<()>;
}

impl LogFile for File {
    fn sync(&mut self) -> std::io::Result<()> {
        self.sync_data()
    }

    fn truncate_to(&mut self, len: u64) -> std::io::Result<()> {
        self.set_len(len)
    }
}

/// Appends `record` and syncs it. On failure the file is cut back to its
/// previous end so that later appends start on a record boundary.
fn append_record<F: LogFile>(file: &mut F, record: &[u8]) -> Result<()> {
    let end = file.seek(SeekFrom::End(0))?;
    let written = file.write_all(record).and_then(|_| file.sync());
    if let Err(e) = written {
        warn!(offset = end, error = %e, "link append failed, rolling back");
        if let Err(rollback) = file.truncate_to(end).and_then(|_| file.sync()) {
            warn!(offset = end, error = %rollback, "link log rollback failed");
        }
        return Err(e.into());
    }
    Ok(())
}

impl LinkStore for LogStore {
    fn insert(&self, link: ShortLink) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.index.contains_key(&link.id) {
            return Err(Error::AlreadyExists(link.id.to_string()));
        }

        let record = encode_record(&link)?;
        append_record(&mut inner.file, &record)?;

        debug!(id = %link.id, bytes = record.len(), "appended link record");
        inner.index.insert(link.id.clone(), link);
        Ok(())
    }

    fn get(&self, id: &ShortId) -> Result<Option<ShortLink>> {
        Ok(self.inner.lock().index.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ShortLink>> {
        Ok(sorted_links(self.inner.lock().index.values()))
    }

    fn len(&self) -> Result<usize> {
        Ok(self.inner.lock().index.len())
    }
}
