#![forbid(unsafe_code)]
use std::fs;
use std::io;
use std::io::prelude::*;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use qips::{diag, ips_file_name, Ipspatch};

#[derive(Parser, Debug)]
#[clap(
name = "qipspatch",
version = "0.2.1",
about = "apply an IPS patch to a file",
long_about = None,
)]
struct IpspatchArgs {
    /// file to patch
    #[clap(value_name = "SOURCE")]
    source_path: String,

    /// patched output file
    #[clap(value_name = "TARGET")]
    target_path: String,

    /// patch file; derived from the source name when omitted
    #[clap(value_name = "PATCH")]
    patch_path: Option<String>,

    /// grow the buffer to the extent measured from the patch
    #[clap(short = 'g', long = "grow")]
    grow: bool,
}

fn main() {
    env_logger::init();
    let args = IpspatchArgs::parse();
    if let Err(e) = execute(args) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn execute(args: IpspatchArgs) -> io::Result<()> {
    let mut data;
    if args.source_path == "-" {
        data = Vec::new();
        io::stdin().read_to_end(&mut data)?;
    } else {
        data = fs::read(&args.source_path)?;
    }

    let patch_path = match args.patch_path {
        Some(p) => PathBuf::from(p),
        None => ips_file_name(&args.source_path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "cannot derive a patch file name from the source name",
            )
        })?,
    };
    let patch = fs::read(&patch_path)?;

    if args.grow {
        let extent = Ipspatch::new(io::Cursor::new(&patch[..])).measure();
        if data.len() < extent as usize {
            data.resize(extent as usize, 0);
        }
    }

    let mut sink = diag::Log;
    let applied = Ipspatch::new(io::Cursor::new(&patch[..]))
        .diagnose(&mut sink)
        .apply(&mut data[..]);
    if applied == 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "no records applied (missing, empty or invalid patch)",
        ));
    }

    if args.target_path == "-" {
        io::stdout().write_all(&data[..])?;
    } else {
        fs::write(&args.target_path, &data[..])?;
    }
    Ok(())
}
