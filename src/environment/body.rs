use std::io::{self, Cursor, Read, Write};

/// Request body, fully read from the connection before the handler runs.
#[derive(Debug, Clone, Default)]
pub struct RequestBody {
    cursor: Cursor<Vec<u8>>,
}

impl RequestBody {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// Whole body, regardless of how much has been read.
    pub fn as_bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl Read for RequestBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

/// Response body sink. Everything written here is sent after the headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseBody {
    buf: Vec<u8>,
}

impl ResponseBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, data: impl AsRef<[u8]>) {
        self.buf.extend_from_slice(data.as_ref());
    }

    pub fn write_str(&mut self, s: &str) {
        self.extend(s);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

impl Write for ResponseBody {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_reads_like_a_stream() {
        let mut body = RequestBody::from(b"ping pong".to_vec());
        let mut first = [0u8; 4];
        body.read_exact(&mut first).unwrap();
        assert_eq!(&first, b"ping");

        let mut rest = String::new();
        body.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, " pong");
        assert_eq!(body.len(), 9);
        assert_eq!(body.as_bytes(), b"ping pong");
    }

    #[test]
    fn response_body_accepts_strings_bytes_and_fmt() {
        let mut body = ResponseBody::new();
        body.write_str("Hello");
        body.extend(b", ");
        write!(body, "{}!", "world").unwrap();

        assert_eq!(body.as_bytes(), b"Hello, world!");
        assert_eq!(body.len(), 13);
    }
}
