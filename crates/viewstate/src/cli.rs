//! Core logic behind the `viewstate-dump` and `viewstate-patch` binaries.
//!
//! Blobs travel as base64 text unless the caller asks for raw bytes.

use thiserror::Error;

use crate::envelope::{from_base64, parse_blob, to_base64};
use crate::error::ViewStateError;
use crate::node::{ElementType, Node};
use crate::patch::replace_with_report;
use crate::traverse::{leaves, walk};

// ── Errors ────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum CliError {
    #[error("input is not base64 text (use --raw for binary input)")]
    NotText,
    #[error(transparent)]
    Codec(#[from] ViewStateError),
    #[error("bad node spec `{0}`")]
    BadNodeSpec(String),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ── Transport ─────────────────────────────────────────────────────────────

/// Turns stdin bytes into a raw blob.
pub fn read_blob(input: &[u8], raw: bool) -> Result<Vec<u8>, CliError> {
    if raw {
        return Ok(input.to_vec());
    }
    let text = std::str::from_utf8(input).map_err(|_| CliError::NotText)?;
    Ok(from_base64(text)?)
}

/// Turns a raw blob into stdout bytes.
pub fn write_blob(blob: &[u8], raw: bool) -> Vec<u8> {
    if raw {
        blob.to_vec()
    } else {
        let mut text = to_base64(blob);
        text.push('\n');
        text.into_bytes()
    }
}

// ── viewstate-dump ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DumpFormat {
    /// One line per leaf.
    #[default]
    Leaves,
    /// Every node, indented by depth.
    Tree,
    Json,
}

pub fn dump(blob: &[u8], format: DumpFormat) -> Result<String, CliError> {
    let (root, end) = parse_blob(blob)?;
    let trailing = blob.len() - end;
    let mut out = String::new();
    match format {
        DumpFormat::Leaves => {
            for leaf in leaves(&root) {
                out.push_str(&leaf.to_string());
                out.push('\n');
            }
        }
        DumpFormat::Tree => {
            for (depth, node) in walk(&root) {
                out.push_str(&"  ".repeat(depth));
                out.push_str(&node.to_string());
                out.push('\n');
            }
        }
        DumpFormat::Json => {
            let doc = serde_json::json!({
                "root": serde_json::Value::from(&root),
                "end": end,
                "trailing": trailing,
            });
            out = serde_json::to_string_pretty(&doc)?;
            out.push('\n');
            return Ok(out);
        }
    }
    if trailing > 0 {
        out.push_str(&format!("trailing {trailing} bytes at {end}\n"));
    }
    Ok(out)
}

// ── viewstate-patch ───────────────────────────────────────────────────────

/// Parses the compact node notation accepted by `viewstate-patch --node`:
///
/// `null`, `true`, `false`, `i16:N`, `i32:N`, `byte:N`, `str:TEXT`,
/// `bools:DECLARED:COUNT` (Boolean array of COUNT falses) and `strs:N`
/// (string array "A", "AA", ... of N items).
pub fn parse_node_spec(spec: &str) -> Result<Node, CliError> {
    let bad = || CliError::BadNodeSpec(spec.to_string());
    let (head, rest) = match spec.split_once(':') {
        Some((head, rest)) => (head, Some(rest)),
        None => (spec, None),
    };
    let node = match (head, rest) {
        ("null", None) => Node::null(),
        ("true", None) => Node::boolean(true),
        ("false", None) => Node::boolean(false),
        ("i16", Some(n)) => Node::int16(n.parse().map_err(|_| bad())?),
        ("i32", Some(n)) => Node::int32(n.parse().map_err(|_| bad())?),
        ("byte", Some(n)) => Node::byte(n.parse().map_err(|_| bad())?),
        ("str", Some(text)) => Node::string(text),
        ("bools", Some(sizes)) => {
            let (declared, count) = sizes.split_once(':').ok_or_else(bad)?;
            let declared: u32 = declared.parse().map_err(|_| bad())?;
            let count: usize = count.parse().map_err(|_| bad())?;
            Node::array(
                ElementType::Boolean,
                declared,
                vec![Node::boolean(false); count],
            )
        }
        ("strs", Some(n)) => {
            let n: usize = n.parse().map_err(|_| bad())?;
            Node::string_array((1..=n).map(|i| "A".repeat(i)).collect())
        }
        _ => return Err(bad()),
    };
    Ok(node)
}

/// Outcome of [`patch`].
#[derive(Debug)]
pub struct PatchOutcome {
    pub blob: Vec<u8>,
    pub delta: isize,
    /// Re-decoding the patched blob; an error here is reported, not fatal,
    /// since deliberately inconsistent blobs are a legitimate output.
    pub reparse: Result<usize, ViewStateError>,
}

pub fn patch(blob: &[u8], offset: usize, node: &Node) -> Result<PatchOutcome, CliError> {
    let report = replace_with_report(blob, offset, node)?;
    let reparse = parse_blob(&report.buffer).map(|(_, end)| end);
    Ok(PatchOutcome {
        delta: report.delta(),
        blob: report.buffer,
        reparse,
    })
}
