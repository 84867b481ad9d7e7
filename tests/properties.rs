use qips::{Ipsdiff, Ipspatch};
use quickcheck_macros::quickcheck;
use std::io::Cursor;

#[quickcheck]
fn patches_invert(original: Vec<u8>, edits: Vec<(u16, u8)>) -> bool {
    let modified = edit(&original[..], &edits[..]);
    let patch = match Ipsdiff::new(&original[..], &modified[..]).generate() {
        Some(patch) => patch,
        None => return false,
    };

    let mut data = original.clone();
    Ipspatch::new(Cursor::new(&patch[..])).apply(&mut data[..]);
    data == modified
}

#[quickcheck]
fn applying_twice_applies_once(original: Vec<u8>, edits: Vec<(u16, u8)>) -> bool {
    let modified = edit(&original[..], &edits[..]);
    let patch = match Ipsdiff::new(&original[..], &modified[..]).generate() {
        Some(patch) => patch,
        None => return false,
    };

    let mut once = original.clone();
    Ipspatch::new(Cursor::new(&patch[..])).apply(&mut once[..]);

    let mut twice = original.clone();
    Ipspatch::new(Cursor::new(&patch[..])).apply(&mut twice[..]);
    Ipspatch::new(Cursor::new(&patch[..])).apply(&mut twice[..]);

    once == twice
}

#[quickcheck]
fn measurement_is_the_smallest_sufficient_size(original: Vec<u8>, edits: Vec<(u16, u8)>) -> bool {
    let modified = edit(&original[..], &edits[..]);
    let patch = match Ipsdiff::new(&original[..], &modified[..]).generate() {
        Some(patch) => patch,
        None => return false,
    };

    let extent = Ipspatch::new(Cursor::new(&patch[..])).measure() as usize;
    if extent > original.len() {
        return false;
    }

    let applied_at = |size: usize| {
        let mut data = vec![0u8; size];
        Ipspatch::new(Cursor::new(&patch[..])).apply(&mut data[..])
    };

    let full = applied_at(original.len());
    applied_at(extent) == full && (extent == 0 || applied_at(extent - 1) < full)
}

#[quickcheck]
fn arbitrary_patches_never_write_outside_the_target(tail: Vec<u8>, size: u8) -> bool {
    let mut patch = b"PATCH".to_vec();
    patch.extend_from_slice(&tail[..]);

    let size = usize::from(size);
    let mut data = vec![0xa5u8; size + 64];
    Ipspatch::new(Cursor::new(&patch[..])).apply(&mut data[..size]);
    data[size..].iter().all(|&byte| byte == 0xa5)
}

#[quickcheck]
fn generated_offsets_never_spell_a_terminator(original: Vec<u8>, edits: Vec<(u16, u8)>) -> bool {
    let modified = edit(&original[..], &edits[..]);
    let patch = match Ipsdiff::new(&original[..], &modified[..]).generate() {
        Some(patch) => patch,
        None => return false,
    };

    let mut pos = 5;
    loop {
        if pos + 3 > patch.len() {
            return false;
        }
        if &patch[pos..pos + 3] == b"EOF" && pos + 3 == patch.len() {
            return true;
        }
        if pos + 5 > patch.len() {
            return false;
        }
        let offset = u32::from_be_bytes([0, patch[pos], patch[pos + 1], patch[pos + 2]]);
        let len = u16::from_be_bytes([patch[pos + 3], patch[pos + 4]]);
        if offset == 0xffffff || offset == 0x454f46 || len == 0 {
            return false;
        }
        pos += 5 + usize::from(len);
    }
}

fn edit(original: &[u8], edits: &[(u16, u8)]) -> Vec<u8> {
    let mut modified = original.to_vec();
    for &(at, value) in edits.iter() {
        if modified.is_empty() {
            break;
        }
        let at = usize::from(at) % modified.len();
        modified[at] = value;
    }
    modified
}
