//! Minimal `multipart/form-data` writer for uploads
//!
//! The upload endpoint takes exactly one file part. The transport seam
//! carries an opaque byte body, so the part is assembled here instead of
//! borrowing a concrete HTTP client's form support.

use bytes::{BufMut, Bytes, BytesMut};
use uuid::Uuid;

pub(crate) struct MultipartBody {
    boundary: String,
    buf: BytesMut,
}

impl MultipartBody {
    pub(crate) fn new() -> Self {
        Self {
            boundary: format!("pcloud-{}", Uuid::new_v4().simple()),
            buf: BytesMut::new(),
        }
    }

    pub(crate) fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Open the single file part; content follows via `extend_content`
    pub(crate) fn begin_file_part(&mut self, field: &str, filename: &str) {
        self.buf
            .put_slice(format!("--{}\r\n", self.boundary).as_bytes());
        self.buf.put_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field,
                escape_quotes(filename)
            )
            .as_bytes(),
        );
        self.buf
            .put_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    }

    pub(crate) fn extend_content(&mut self, chunk: &[u8]) {
        self.buf.put_slice(chunk);
    }

    pub(crate) fn finish(mut self) -> Bytes {
        self.buf
            .put_slice(format!("\r\n--{}--\r\n", self.boundary).as_bytes());
        self.buf.freeze()
    }
}

fn escape_quotes(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}
