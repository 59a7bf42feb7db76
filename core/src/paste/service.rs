//! Clients for termbin-style paste services.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("connecting to paste service at {address}: {source}")]
    Connect { address: String, source: io::Error },

    #[error("sending data to paste service: {0}")]
    Write(#[source] io::Error),

    #[error("reading response from paste service: {0}")]
    Read(#[source] io::Error),

    #[error("paste service returned an empty response")]
    EmptyResponse,
}

/// Something that turns a text blob into a shareable locator.
pub trait PasteService: Send + Sync {
    fn submit(&self, content: &str) -> Result<String, PasteError>;
}

/// Plain TCP paste client: connect, write the whole blob, read back one line.
#[derive(Debug, Clone)]
pub struct TcpPasteService {
    address: String,
}

impl TcpPasteService {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

impl PasteService for TcpPasteService {
    fn submit(&self, content: &str) -> Result<String, PasteError> {
        let mut stream =
            TcpStream::connect(self.address.as_str()).map_err(|source| PasteError::Connect {
                address: self.address.clone(),
                source,
            })?;

        stream
            .write_all(content.as_bytes())
            .and_then(|()| stream.flush())
            .map_err(PasteError::Write)?;
        // Signals end of input to services that wait for EOF.
        stream.shutdown(Shutdown::Write).map_err(PasteError::Write)?;

        let mut line = String::new();
        BufReader::new(stream)
            .read_line(&mut line)
            .map_err(PasteError::Read)?;

        let url = line.trim_end_matches(['\r', '\n']);
        if url.is_empty() {
            return Err(PasteError::EmptyResponse);
        }
        Ok(url.to_string())
    }
}
