use std::path::PathBuf;

use tokio::fs;
use tokio::io::AsyncReadExt;
use tracing::{info, warn};

use crate::protocol::{self, Reply, BUFFER_SIZE};

/// Performs the filesystem effect for a parsed command and produces the
/// replies to put on the wire.
///
/// Every filesystem error is converted into a status reply; none escape as
/// protocol faults, and each request gets exactly one attempt. Filenames
/// are joined onto the served root without any validation, so `../` and
/// absolute names escape it. That matches the wire protocol as deployed;
/// sandboxing is out of scope.
pub struct Executor {
    root: PathBuf,
}

impl Executor {
    pub fn new(root: impl Into<PathBuf>) -> Executor {
        Executor { root: root.into() }
    }

    fn resolve(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Read at most one buffer's worth of the file and reply with that
    /// chunk. Larger files are truncated at the protocol level; there is
    /// no continuation mechanism.
    pub async fn get(&self, name: &str) -> Reply {
        let mut file = match fs::File::open(self.resolve(name)).await {
            Ok(file) => file,
            Err(err) => {
                warn!(%name, %err, "get: file not found or unable to open");
                return Reply::Status(protocol::GET_FAILED.to_string());
            }
        };
        let mut chunk = vec![0u8; BUFFER_SIZE];
        match file.read(&mut chunk).await {
            Ok(read_bytes) => {
                chunk.truncate(read_bytes);
                info!(%name, bytes = read_bytes, "get: serving file chunk");
                Reply::FileChunk(chunk)
            }
            Err(err) => {
                warn!(%name, %err, "get: reading file failed");
                Reply::Status(protocol::GET_FAILED.to_string())
            }
        }
    }

    /// Store the uploaded payload, creating or truncating the file.
    /// Exactly the received byte count lands on disk. The protocol sends
    /// no reply for an upload, so a failure is only logged here.
    pub async fn put(&self, name: &str, payload: &[u8]) {
        match fs::write(self.resolve(name), payload).await {
            Ok(()) => info!(%name, bytes = payload.len(), "put: stored file"),
            Err(err) => warn!(%name, %err, "put: writing to file failed"),
        }
    }

    pub async fn delete(&self, name: &str) -> Reply {
        match fs::remove_file(self.resolve(name)).await {
            Ok(()) => {
                info!(%name, "delete: removed file");
                Reply::Status(protocol::DELETE_OK.to_string())
            }
            Err(err) => {
                warn!(%name, %err, "delete: file not found or unable to delete");
                Reply::Status(protocol::DELETE_FAILED.to_string())
            }
        }
    }

    /// Enumerate the served directory, one reply per entry, closed by the
    /// end-of-list sentinel. The sentinel is sent even when the directory
    /// is empty or unreadable, so a listing always terminates.
    pub async fn list(&self) -> Vec<Reply> {
        let mut replies = Vec::new();
        match fs::read_dir(&self.root).await {
            Ok(mut entries) => loop {
                match entries.next_entry().await {
                    Ok(Some(entry)) => {
                        let name = entry.file_name().to_string_lossy().into_owned();
                        replies.push(Reply::ListEntry(name));
                    }
                    Ok(None) => break,
                    Err(err) => {
                        warn!(%err, "ls: reading directory entry failed");
                        break;
                    }
                }
            },
            Err(err) => warn!(%err, "ls: cannot open directory"),
        }
        replies.push(Reply::ListEnd);
        replies
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn executor(dir: &TempDir) -> Executor {
        Executor::new(dir.path())
    }

    #[tokio::test]
    async fn get_missing_file_replies_with_failure_status() {
        let dir = TempDir::new().unwrap();
        let reply = executor(&dir).get("nope.txt").await;
        assert_eq!(reply, Reply::Status(protocol::GET_FAILED.into()));
    }

    #[tokio::test]
    async fn put_then_get_round_trips_the_payload() {
        let dir = TempDir::new().unwrap();
        let exec = executor(&dir);
        exec.put("test.txt", b"hello").await;

        // exactly the payload on disk, no padding from the receive buffer
        let on_disk = std::fs::read(dir.path().join("test.txt")).unwrap();
        assert_eq!(on_disk, b"hello");

        assert_eq!(exec.get("test.txt").await, Reply::FileChunk(b"hello".to_vec()));
    }

    #[tokio::test]
    async fn get_truncates_large_files_to_one_chunk() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("big.bin"), vec![7u8; BUFFER_SIZE + 100]).unwrap();
        match executor(&dir).get("big.bin").await {
            Reply::FileChunk(chunk) => assert_eq!(chunk.len(), BUFFER_SIZE),
            other => panic!("expected a file chunk, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_succeeds_once_then_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("gone.txt"), b"x").unwrap();
        let exec = executor(&dir);

        assert_eq!(
            exec.delete("gone.txt").await,
            Reply::Status(protocol::DELETE_OK.into())
        );
        assert!(!dir.path().join("gone.txt").exists());

        assert_eq!(
            exec.delete("gone.txt").await,
            Reply::Status(protocol::DELETE_FAILED.into())
        );
    }

    #[tokio::test]
    async fn list_of_empty_directory_is_just_the_sentinel() {
        let dir = TempDir::new().unwrap();
        assert_eq!(executor(&dir).list().await, vec![Reply::ListEnd]);
    }

    #[tokio::test]
    async fn list_ends_with_exactly_one_sentinel() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"").unwrap();

        let replies = executor(&dir).list().await;
        assert_eq!(replies.last(), Some(&Reply::ListEnd));
        let sentinels = replies.iter().filter(|r| **r == Reply::ListEnd).count();
        assert_eq!(sentinels, 1);

        let mut names: Vec<_> = replies
            .iter()
            .filter_map(|r| match r {
                Reply::ListEntry(name) => Some(name.as_str()),
                _ => None,
            })
            .collect();
        names.sort_unstable();
        assert_eq!(names, ["a.txt", "b.txt"]);
    }
}
