#![forbid(unsafe_code)]
use std::fs;
use std::io;
use std::io::prelude::*;
use std::process;

use clap::Parser;
use qips::{diag, Ipsdiff};

#[derive(Parser, Debug)]
#[clap(
name = "qipsdiff",
version = "0.2.1",
about = "generate an IPS patch from two equally sized files",
long_about = None,
)]
struct IpsdiffArgs {
    /// original file
    #[clap(value_name = "ORIGINAL")]
    original_path: String,

    /// modified file
    #[clap(value_name = "MODIFIED")]
    modified_path: String,

    /// patch file
    #[clap(value_name = "PATCH")]
    patch_path: String,
}

fn main() {
    env_logger::init();
    let args = IpsdiffArgs::parse();
    if let Err(e) = execute(args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn execute(args: IpsdiffArgs) -> io::Result<()> {
    let mut original;
    if args.original_path == "-" {
        original = Vec::new();
        io::stdin().read_to_end(&mut original)?;
    } else {
        original = fs::read(&args.original_path)?;
    }
    let modified = fs::read(&args.modified_path)?;

    if original.len() != modified.len() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "original and modified files must be of the same size",
        ));
    }
    if modified.len() > 0x1000000 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "files are too large to be addressed by the patch format",
        ));
    }

    let mut sink = diag::Log;
    let patch = Ipsdiff::new(&original[..], &modified[..])
        .diagnose(&mut sink)
        .generate()
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "patch would exceed the 16 MiB format limit",
            )
        })?;

    if args.patch_path == "-" {
        io::stdout().write_all(&patch[..])?;
    } else {
        fs::write(&args.patch_path, &patch[..])?;
    }
    Ok(())
}
