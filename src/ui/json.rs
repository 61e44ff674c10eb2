//! JSON output for `--json`.
//!
//! Every command writes exactly one JSON document to stdout, wrapped in an
//! envelope naming the command.

use std::io::{self, Write};

use serde::Serialize;

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    command: &'a str,
    success: bool,
    #[serde(flatten)]
    data: &'a T,
}

/// Write one envelope, followed by a newline.
pub fn write_document<T: Serialize, W: Write>(
    out: &mut W,
    command: &str,
    success: bool,
    data: &T,
) -> io::Result<()> {
    let envelope = Envelope {
        command,
        success,
        data,
    };
    serde_json::to_writer_pretty(&mut *out, &envelope)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    out.write_all(b"\n")
}

pub fn emit<T: Serialize>(command: &str, success: bool, data: &T) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_document(&mut out, command, success, data)
}
