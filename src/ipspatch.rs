#![forbid(unsafe_code)]
use crate::diag::{self, Severity, Sink};
use crate::utils::*;
use std::io::{Read, Seek, SeekFrom};

/// Applier for IPS patch streams.
///
/// Records are applied strictly in file order; later records may overwrite
/// earlier ones. Records that would write out of bounds of the target are
/// skipped, not errors. Decoding problems never escalate past the call: a
/// missing magic or a truncated stream simply ends processing, and the
/// returned count is the sole signal.
///
/// Patch a buffer in place:
/// ```
/// use std::io;
/// use qips::Ipspatch;
///
/// fn ipspatch(patch: &[u8], data: &mut [u8]) -> u32 {
///     Ipspatch::new(io::Cursor::new(patch)).apply(data)
/// }
///
/// let mut data = [0u8; 4];
/// let n = ipspatch(b"PATCH\x00\x00\x01\x00\x02\xff\xffEOF", &mut data[..]);
/// assert_eq!(n, 1);
/// assert_eq!(data, [0x00, 0xff, 0xff, 0x00]);
/// ```
///
/// Size a buffer before patching:
/// ```
/// use std::io;
/// use qips::Ipspatch;
///
/// let patch = b"PATCH\x00\x00\x10\x00\x02\xaa\xbbEOF";
/// assert_eq!(Ipspatch::new(io::Cursor::new(&patch[..])).measure(), 0x12);
/// ```
pub struct Ipspatch<'d, R> {
    source: R,
    sink: Option<&'d mut dyn Sink>,
}

impl<'d, R: Read + Seek> Ipspatch<'d, R> {
    /// Create a new patcher reading records from `source`.
    ///
    /// The stream is consumed once, start to end; it is opened and closed
    /// by the caller.
    pub fn new(source: R) -> Self {
        Ipspatch { source, sink: None }
    }

    /// Attach a diagnostic sink for per-record events.
    pub fn diagnose(mut self, sink: &'d mut dyn Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Find the smallest buffer length accommodating every record.
    ///
    /// Nothing is bounds-checked and nothing is written; the maximal
    /// `offset + length` seen across the stream is returned, or 0 when the
    /// source does not hold a patch.
    pub fn measure(self) -> u32 {
        Context::new(self.source, None, self.sink).run()
    }

    /// Apply the patch to `target`, returning the count of records applied.
    ///
    /// Out-of-bounds and skipped records are not counted; no byte outside
    /// the slice is ever written.
    pub fn apply(self, target: &mut [u8]) -> u32 {
        Context::new(self.source, Some(target), self.sink).run()
    }
}

/// Record processing context.
struct Context<'d, 't, R> {
    source: R,
    target: Option<&'t mut [u8]>,
    sink: Option<&'d mut dyn Sink>,

    buf: Vec<u8>,
    extent: u32,
    applied: u32,
}

impl<'d, 't, R> Context<'d, 't, R>
where
    R: Read + Seek,
{
    fn new(source: R, target: Option<&'t mut [u8]>, sink: Option<&'d mut dyn Sink>) -> Self {
        Context {
            source,
            target,
            sink,
            buf: vec![0; RECORD_LIMIT],
            extent: 0,
            applied: 0,
        }
    }

    /// Process the whole stream, one record at a time.
    fn run(mut self) -> u32 {
        let mut head = [0u8; HEAD_SIZE];
        if read_or_eof(&mut self.source, &mut head[..]) != HEAD_SIZE || head != *MAGIC {
            return 0;
        }

        let mut num = 0u32;
        loop {
            num += 1;

            // A well-formed file ends with the bare 3-byte trailer, so a
            // short header read is the expected termination, not corruption.
            if read_or_eof(&mut self.source, &mut head[..]) != HEAD_SIZE {
                break;
            }
            let (offset, len) = read_head(&head);
            if offset == SENTINEL || offset == EOF_CODE {
                break;
            }

            let more = if len > 0 {
                self.copy(num, offset, len)
            } else {
                self.fill(num, offset)
            };
            if !more {
                break;
            }
        }

        if self.target.is_some() {
            self.applied
        } else {
            self.extent
        }
    }

    /// Process one copy record. Returns false once the stream is exhausted.
    fn copy(&mut self, num: u32, offset: u32, len: u16) -> bool {
        let n = usize::from(len);
        let end = u64::from(offset) + u64::from(len);

        let size = match self.target.as_deref() {
            Some(data) => data.len() as u64,
            None => {
                self.extent = Ord::max(self.extent, end as u32);
                return self.skip(i64::from(len));
            }
        };

        if end > size {
            self.report(
                Severity::Warn,
                format_args!(
                    "skipped copy record #{} at 0x{:X}..0x{:X} of 0x{:X} bytes",
                    num, offset, end, size
                ),
            );
            return self.skip(i64::from(len));
        }

        // Stage the payload first so a truncated record never lands halfway.
        if read_or_eof(&mut self.source, &mut self.buf[..n]) != n {
            self.report(
                Severity::Warn,
                format_args!("copy record #{} is truncated", num),
            );
            return false;
        }
        if let Some(data) = self.target.as_deref_mut() {
            data[offset as usize..end as usize].copy_from_slice(&self.buf[..n]);
        }
        self.report(
            Severity::Debug,
            format_args!("applied copy record #{} at 0x{:X}..0x{:X}", num, offset, end),
        );
        self.applied += 1;
        true
    }

    /// Process one fill record. Returns false once the stream is exhausted.
    fn fill(&mut self, num: u32, offset: u32) -> bool {
        let mut tail = [0u8; 3];
        if read_or_eof(&mut self.source, &mut tail[..]) != 3 {
            if self.target.is_some() {
                self.report(
                    Severity::Warn,
                    format_args!("fill record #{} is truncated", num),
                );
            }
            return false;
        }
        let run = u16::from_be_bytes([tail[0], tail[1]]);
        let value = tail[2];
        let end = u64::from(offset) + u64::from(run);

        let size = match self.target.as_deref() {
            Some(data) => data.len() as u64,
            None => {
                self.extent = Ord::max(self.extent, end as u32);
                return true;
            }
        };

        if run == 0 || end > size {
            self.report(
                Severity::Warn,
                format_args!(
                    "skipped fill record #{} (0x{:02X}) at 0x{:X}..0x{:X} of 0x{:X} bytes",
                    num, value, offset, end, size
                ),
            );
            return true;
        }

        if let Some(data) = self.target.as_deref_mut() {
            data[offset as usize..end as usize].fill(value);
        }
        self.report(
            Severity::Debug,
            format_args!(
                "applied fill record #{} (0x{:02X}) at 0x{:X}..0x{:X}",
                num, value, offset, end
            ),
        );
        self.applied += 1;
        true
    }

    /// Advance the stream past an unread payload.
    fn skip(&mut self, n: i64) -> bool {
        self.source.seek(SeekFrom::Current(n)).is_ok()
    }

    fn report(&mut self, severity: Severity, message: std::fmt::Arguments<'_>) {
        diag::report(&mut self.sink, severity, message);
    }
}
