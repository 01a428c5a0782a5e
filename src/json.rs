//! Pretty JSON writers for word counts, the inverted index and query results.
//!
//! Output is indented with tabs, one array element or object member per line.
//! Keys are escaped with `serde_json`; scores are written with exactly eight
//! decimals.
//!
//! ```
//! use std::collections::BTreeMap;
//!
//! let mut counts = BTreeMap::new();
//! counts.insert("a.txt".to_string(), 4);
//! counts.insert("b.txt".to_string(), 2);
//!
//! assert_eq!(
//!     scour::json::counts_to_string(&counts),
//!     "{\n\t\"a.txt\": 4,\n\t\"b.txt\": 2\n}"
//! );
//! ```
//!
//! Snapshots are a different thing: [`write_snapshot`] stores a whole
//! [`InvertedIndex`] as compact JSON so it can be restored with
//! [`read_snapshot`].

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::index::InvertedIndex;
use crate::search::result::SearchResult;

fn indent<W: Write>(writer: &mut W, level: usize) -> io::Result<()> {
    for _ in 0..level {
        writer.write_all(b"\t")?;
    }
    Ok(())
}

fn separator(first: bool) -> &'static [u8] {
    if first { b"\n" } else { b",\n" }
}

fn quote<W: Write>(writer: &mut W, key: &str) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, key)?;
    Ok(())
}

/// Write an object whose member values are produced by `member`.
fn members<W, I, K, V, F>(writer: &mut W, entries: I, level: usize, mut member: F) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    F: FnMut(&mut W, V, usize) -> io::Result<()>,
{
    writer.write_all(b"{")?;
    let mut first = true;
    for (key, value) in entries {
        writer.write_all(separator(first))?;
        first = false;
        indent(writer, level + 1)?;
        quote(writer, key.as_ref())?;
        writer.write_all(b": ")?;
        member(writer, value, level + 1)?;
    }
    writer.write_all(b"\n")?;
    indent(writer, level)?;
    writer.write_all(b"}")
}

fn positions<W: Write>(writer: &mut W, positions: &BTreeSet<usize>, level: usize) -> io::Result<()> {
    writer.write_all(b"[")?;
    let mut first = true;
    for position in positions {
        writer.write_all(separator(first))?;
        first = false;
        indent(writer, level + 1)?;
        write!(writer, "{position}")?;
    }
    writer.write_all(b"\n")?;
    indent(writer, level)?;
    writer.write_all(b"]")
}

fn result_list<W: Write>(writer: &mut W, results: &[SearchResult], level: usize) -> io::Result<()> {
    writer.write_all(b"[")?;
    let mut first = true;
    for result in results {
        writer.write_all(separator(first))?;
        first = false;
        indent(writer, level + 1)?;
        writer.write_all(b"{\n")?;
        indent(writer, level + 2)?;
        writer.write_all(b"\"where\": ")?;
        quote(writer, result.location())?;
        writer.write_all(b",\n")?;
        indent(writer, level + 2)?;
        writeln!(writer, "\"count\": {},", result.count())?;
        indent(writer, level + 2)?;
        writeln!(writer, "\"score\": {:.8}", result.score())?;
        indent(writer, level + 1)?;
        writer.write_all(b"}")?;
    }
    writer.write_all(b"\n")?;
    indent(writer, level)?;
    writer.write_all(b"]")
}

/// Write `{location: count}` pairs.
pub fn write_counts_to<W: Write>(writer: &mut W, counts: &BTreeMap<String, usize>) -> io::Result<()> {
    members(writer, counts, 0, |writer, count, _| write!(writer, "{count}"))
}

/// Write `{word: {location: [positions]}}`.
pub fn write_index_to<W: Write>(
    writer: &mut W,
    index: &BTreeMap<String, BTreeMap<String, BTreeSet<usize>>>,
) -> io::Result<()> {
    members(writer, index, 0, |writer, locations, level| {
        members(writer, locations, level, |writer, set, level| {
            positions(writer, set, level)
        })
    })
}

/// Write `{query: [{"where", "count", "score"}]}`.
pub fn write_results_to<W: Write>(
    writer: &mut W,
    results: &BTreeMap<String, Vec<SearchResult>>,
) -> io::Result<()> {
    members(writer, results, 0, |writer, list, level| {
        result_list(writer, list, level)
    })
}

fn render(write: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
    let mut buffer = Vec::new();
    // Writing into a Vec cannot fail and only valid UTF-8 is written.
    let _ = write(&mut buffer);
    String::from_utf8_lossy(&buffer).into_owned()
}

pub fn counts_to_string(counts: &BTreeMap<String, usize>) -> String {
    render(|buffer| write_counts_to(buffer, counts))
}

pub fn index_to_string(index: &BTreeMap<String, BTreeMap<String, BTreeSet<usize>>>) -> String {
    render(|buffer| write_index_to(buffer, index))
}

pub fn results_to_string(results: &BTreeMap<String, Vec<SearchResult>>) -> String {
    render(|buffer| write_results_to(buffer, results))
}

fn write_file(path: &Path, write: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn write_counts<P: AsRef<Path>>(path: P, counts: &BTreeMap<String, usize>) -> Result<()> {
    write_file(path.as_ref(), |writer| write_counts_to(writer, counts))
}

pub fn write_index<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<()> {
    write_file(path.as_ref(), |writer| write_index_to(writer, index.entries()))
}

pub fn write_results<P: AsRef<Path>>(
    path: P,
    results: &BTreeMap<String, Vec<SearchResult>>,
) -> Result<()> {
    write_file(path.as_ref(), |writer| write_results_to(writer, results))
}

/// Store `index` as compact JSON.
pub fn write_snapshot<P: AsRef<Path>>(path: P, index: &InvertedIndex) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer(&mut writer, index)?;
    writer.flush()?;
    Ok(())
}

/// Load an index stored by [`write_snapshot`].
pub fn read_snapshot<P: AsRef<Path>>(path: P) -> Result<InvertedIndex> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(serde_json::from_reader(reader)?)
}
