//! `<literal> <id>` map files.
//!
//! One line per pattern in ascending id order, so reported payloads can be
//! translated back to literals by tools that never load the catalog.

use std::io::{self, Write};

use super::PatternCatalog;

/// Writes every pattern of `catalog` as `<literal bytes> <global id>\n`.
pub fn write_id_map<W: Write>(catalog: &PatternCatalog, mut out: W) -> io::Result<()> {
    for (id, literal) in catalog.iter_literals() {
        out.write_all(&literal)?;
        writeln!(out, " {id}")?;
    }
    out.flush()
}
