/* How a session works
 * -------------------
 * Every message is one UDP datagram. The client sends a single text line
 * terminated by '\n':
 *
 *   get <name>\n      request the file <name>
 *   put <name>\n      announce an upload; the raw payload bytes follow
 *                     in the next datagram
 *   delete <name>\n   remove the file <name>
 *   ls\n              request a directory listing
 *   exit\n            stop the server's command loop
 *
 * The server answers with, depending on the command: one datagram of raw
 * file bytes, a human-readable status line, a sequence of listing lines
 * closed by the END_OF_LIST sentinel, or an echo of the command itself.
 * A `put` gets no reply at all.
 *
 * Delivery is best effort. Nothing is retransmitted, acknowledged or
 * reordered; a lost datagram is simply lost.
 */

// Protocol configuration constants
pub const BUFFER_SIZE: usize = 4096;

pub const END_OF_LIST: &str = "END_OF_LIST\n";
pub const GET_FAILED: &str = "File not found or unable to open.\n";
pub const DELETE_OK: &str = "File deleted successfully.\n";
pub const DELETE_FAILED: &str = "File not found or unable to delete.\n";
pub const NOT_UNDERSTOOD: &str = "Command not understood.\n";

/// One client request, classified from a single datagram.
///
/// `Unrecognized` keeps the raw line so the server can still answer it;
/// there is no silent fallthrough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Get(String),
    Put(String),
    Delete(String),
    List,
    Exit,
    Unrecognized(String),
}

impl Command {
    /// Classify one received datagram.
    ///
    /// Match order is part of the wire protocol: the three prefixes are
    /// tried first, then the exact lines. Filenames are whatever follows
    /// the prefix, with at most one trailing newline stripped. A filename
    /// therefore never contains a newline itself.
    pub fn parse(datagram: &[u8]) -> Command {
        let line = String::from_utf8_lossy(datagram);
        if let Some(name) = line.strip_prefix("get ") {
            Command::Get(strip_newline(name))
        } else if let Some(name) = line.strip_prefix("put ") {
            Command::Put(strip_newline(name))
        } else if let Some(name) = line.strip_prefix("delete ") {
            Command::Delete(strip_newline(name))
        } else if line == "ls\n" {
            Command::List
        } else if line == "exit\n" {
            Command::Exit
        } else {
            Command::Unrecognized(line.into_owned())
        }
    }

    /// Wire bytes for this command, the exact line `parse` accepts.
    /// `Unrecognized` passes its original line through untouched.
    pub fn encode(&self) -> Vec<u8> {
        match self {
            Command::Get(name) => format!("get {name}\n").into_bytes(),
            Command::Put(name) => format!("put {name}\n").into_bytes(),
            Command::Delete(name) => format!("delete {name}\n").into_bytes(),
            Command::List => b"ls\n".to_vec(),
            Command::Exit => b"exit\n".to_vec(),
            Command::Unrecognized(line) => line.clone().into_bytes(),
        }
    }
}

fn strip_newline(name: &str) -> String {
    name.strip_suffix('\n').unwrap_or(name).to_string()
}

/// One server reply, serialized as exactly one datagram.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Human-readable status line, newline included.
    Status(String),
    /// Raw file bytes, at most `BUFFER_SIZE` of them.
    FileChunk(Vec<u8>),
    /// One listing entry, named without a trailing newline.
    ListEntry(String),
    /// The `END_OF_LIST` sentinel closing a listing.
    ListEnd,
    /// Verbatim echo of the client's command bytes.
    Echo(Vec<u8>),
}

impl Reply {
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Reply::Status(text) => text.clone().into_bytes(),
            Reply::FileChunk(bytes) => bytes.clone(),
            Reply::ListEntry(name) => format!("{name}\n").into_bytes(),
            Reply::ListEnd => END_OF_LIST.as_bytes().to_vec(),
            Reply::Echo(bytes) => bytes.clone(),
        }
    }
}
