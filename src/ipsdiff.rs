#![forbid(unsafe_code)]
use crate::diag::{self, Severity, Sink};
use crate::utils::*;
use std::ops::Range;

/// Initial capacity of the patch buffer.
const PATCH_MIN: usize = 1024;

/// Generator building an IPS patch from two equally sized buffers.
///
/// The scan is a greedy left-to-right diff coalescing contiguous runs of
/// differing bytes into copy records; no fill records are emitted and no
/// lookahead merging is attempted. The whole operation is pure: both inputs
/// are borrowed read-only and ownership of the patch transfers to the
/// caller.
///
/// Compare two buffers and generate the patch:
/// ```
/// use qips::Ipsdiff;
///
/// fn ipsdiff(original: &[u8], modified: &[u8]) -> Option<Vec<u8>> {
///     Ipsdiff::new(original, modified).generate()
/// }
///
/// let patch = ipsdiff(&[0x00; 4], &[0x00, 0xff, 0xff, 0x00]).unwrap();
/// assert_eq!(&patch[..], b"PATCH\x00\x00\x01\x00\x02\xff\xffEOF");
/// ```
pub struct Ipsdiff<'s, 't, 'd> {
    s: &'s [u8],
    t: &'t [u8],
    sink: Option<&'d mut dyn Sink>,
}

impl<'s, 't, 'd> Ipsdiff<'s, 't, 'd> {
    /// Create a new generator comparing `original` against `modified`.
    ///
    /// Panics if the buffers differ in length, or if they are larger than
    /// 16 MiB (beyond the reach of 24-bit record offsets).
    pub fn new(original: &'s [u8], modified: &'t [u8]) -> Self {
        if original.len() != modified.len() {
            panic!("original and modified data must be of the same size");
        }
        if modified.len() > FILE_LIMIT {
            panic!("data is too large to be addressed by the patch format");
        }

        Ipsdiff {
            s: original,
            t: modified,
            sink: None,
        }
    }

    /// Attach a diagnostic sink.
    pub fn diagnose(mut self, sink: &'d mut dyn Sink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Scan the buffers and build the patch.
    ///
    /// Returns `None` if the patch would exceed the 16 MiB format limit;
    /// no partial output is ever handed back.
    pub fn generate(mut self) -> Option<Vec<u8>> {
        let (s, t) = (self.s, self.t);
        let mut patch = Vec::with_capacity(PATCH_MIN);
        patch.extend_from_slice(&MAGIC[..]);

        for run in RunScan::new(s, t) {
            let data = &t[run.clone()];
            if data.len() == RECORD_LIMIT {
                diag::report(
                    &mut self.sink,
                    Severity::Debug,
                    format_args!("splitting overlong run at 0x{:X}", run.start),
                );
            }
            if patch.len() + HEAD_SIZE + data.len() > FILE_LIMIT {
                return None;
            }
            write_record(&mut patch, run.start as u32, data);
        }

        if patch.len() + TRAILER.len() > FILE_LIMIT {
            return None;
        }
        patch.extend_from_slice(&TRAILER[..]);
        Some(patch)
    }
}

/// Greedy scan over runs of differing bytes.
///
/// Yields the target range of each copy record; the record offset is the
/// range start and the payload is the modified data over the range.
struct RunScan<'s, 't> {
    s: &'s [u8],
    t: &'t [u8],
    pos: usize,
}

impl<'s, 't> RunScan<'s, 't> {
    fn new(s: &'s [u8], t: &'t [u8]) -> Self {
        RunScan { s, t, pos: 0 }
    }
}

impl<'s, 't> Iterator for RunScan<'s, 't> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let (s, t) = (self.s, self.t);

        let mut pos = self.pos;
        while pos < t.len() && t[pos] == s[pos] {
            pos += 1;
        }
        if pos >= t.len() {
            self.pos = pos;
            return None;
        }

        // An offset must never spell out a terminator: back it up one byte
        // and let the preceding modified byte ride along in the payload.
        let start = if pos as u32 == EOF_CODE || pos as u32 == SENTINEL {
            pos - 1
        } else {
            pos
        };

        let mut end = pos + 1;
        while end < t.len() && end - start < RECORD_LIMIT - 1 && t[end] != s[end] {
            end += 1;
        }
        // The length field caps a record one byte short of its width; the
        // byte hitting the cap is emitted with the record whether it
        // differs or not, and the scan restarts after it.
        if end < t.len() && end - start == RECORD_LIMIT - 1 {
            end += 1;
        }

        self.pos = end;
        Some(start..end)
    }
}
