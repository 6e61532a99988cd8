//! `viewstate-patch`: replace one node of a view-state blob (stdin → stdout).
//!
//! Usage:
//!   viewstate-patch --offset N --node SPEC [--raw]
//!
//! SPEC is one of `null`, `true`, `false`, `i16:N`, `i32:N`, `byte:N`,
//! `str:TEXT`, `bools:DECLARED:COUNT`, `strs:N`. Offsets are absolute byte
//! offsets into the decoded blob, as printed by `viewstate-dump`.

use std::io::{self, Read, Write};

use viewstate::cli::{parse_node_spec, patch, read_blob, write_blob, CliError};

const USAGE: &str = "viewstate-patch --offset N --node SPEC [--raw]";

fn usage(msg: &str) -> ! {
    eprintln!("{msg}\nusage: {USAGE}");
    std::process::exit(2);
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut raw = false;
    let mut offset: Option<usize> = None;
    let mut spec: Option<String> = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--raw" => raw = true,
            "--offset" => {
                i += 1;
                match args.get(i).map(|s| s.parse::<usize>()) {
                    Some(Ok(n)) => offset = Some(n),
                    _ => usage("--offset needs a non-negative integer"),
                }
            }
            "--node" => {
                i += 1;
                match args.get(i) {
                    Some(s) => spec = Some(s.clone()),
                    None => usage("--node needs a value"),
                }
            }
            other => usage(&format!("unknown argument: {other}")),
        }
        i += 1;
    }
    let Some(offset) = offset else { usage("missing --offset") };
    let Some(spec) = spec else { usage("missing --node") };

    let node = match parse_node_spec(&spec) {
        Ok(node) => node,
        Err(e @ CliError::BadNodeSpec(_)) => usage(&e.to_string()),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut input = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut input) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }

    let outcome = match read_blob(&input, raw).and_then(|blob| patch(&blob, offset, &node)) {
        Ok(outcome) => outcome,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };
    eprintln!("patched {} at {offset} (delta {:+})", node.kind(), outcome.delta);
    if let Err(e) = &outcome.reparse {
        eprintln!("warning: patched blob no longer decodes: {e}");
    }
    if let Err(e) = io::stdout().write_all(&write_blob(&outcome.blob, raw)) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
