//! `viewstate-dump`: decode a view-state blob (stdin) and list its nodes.
//!
//! Usage:
//!   viewstate-dump [--raw] [--leaves|--tree|--json]
//!
//! Input is base64 text unless `--raw` is given.

use std::io::{self, Read, Write};

use viewstate::cli::{dump, read_blob, DumpFormat};

const USAGE: &str = "viewstate-dump [--raw] [--leaves|--tree|--json]";

fn main() {
    let mut raw = false;
    let mut format = DumpFormat::default();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--raw" => raw = true,
            "--leaves" => format = DumpFormat::Leaves,
            "--tree" => format = DumpFormat::Tree,
            "--json" => format = DumpFormat::Json,
            other => {
                eprintln!("unknown argument: {other}\nusage: {USAGE}");
                std::process::exit(2);
            }
        }
    }

    let mut input = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut input) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let out = match read_blob(&input, raw).and_then(|blob| dump(&blob, format)) {
        Ok(out) => out,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = io::stdout().write_all(out.as_bytes()) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
