use byteorder::{ByteOrder, BE};
use std::io::{ErrorKind, Read};

/// Magic bytes opening every patch file.
pub const MAGIC: &[u8; 5] = b"PATCH";

/// Trailer closing a well-formed patch file.
pub const TRAILER: &[u8; 3] = b"EOF";

/// Max size of a whole patch file (3-byte addressing).
pub const FILE_LIMIT: usize = 0x1000000;

/// Max payload size of an individual record (2-byte length field).
pub const RECORD_LIMIT: usize = 0xFFFF;

/// Size of a record header on the wire.
pub const HEAD_SIZE: usize = 5;

/// The trailer bytes when decoded as a 24-bit offset.
pub const EOF_CODE: u32 = 0x454F46;

/// Reserved offset historically used as an alternate end marker.
pub const SENTINEL: u32 = 0xFFFFFF;

/// Splits a record header into (offset, length).
#[inline]
pub fn read_head(head: &[u8; HEAD_SIZE]) -> (u32, u16) {
    (BE::read_u24(&head[..3]), BE::read_u16(&head[3..5]))
}

/// Appends one copy record to the patch buffer.
pub fn write_record(patch: &mut Vec<u8>, offset: u32, data: &[u8]) {
    let mut head = [0u8; HEAD_SIZE];
    BE::write_u24(&mut head[..3], offset);
    BE::write_u16(&mut head[3..5], data.len() as u16);
    patch.extend_from_slice(&head[..]);
    patch.extend_from_slice(data);
}

// Read up to buf.len() bytes, returning the count of bytes readed. Short
// reads and I/O errors other than interruption end the stream quietly.
#[inline]
pub fn read_or_eof<R>(r: &mut R, buf: &mut [u8]) -> usize
where
    R: Read,
{
    let mut cnt = 0;
    while cnt < buf.len() {
        match r.read(&mut buf[cnt..]) {
            Ok(0) => break,
            Ok(n) => cnt += n,
            Err(ref e) if e.kind() == ErrorKind::Interrupted => {}
            Err(_) => break,
        }
    }
    cnt
}
