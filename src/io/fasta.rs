// src/io/fasta.rs
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use flate2::read::MultiGzDecoder;

use crate::error::{Result, WinFreqError};
use crate::window::Sequence;

/// Open a FASTA file for reading, handles gzipped files automatically
pub fn open_fasta(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|source| WinFreqError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Concatenate every content line of a FASTA stream into one sequence.
///
/// Header lines (leading `>`) and blank lines are skipped. Lines are joined
/// with no separator. A trailing `\r` is treated as part of the line ending
/// and dropped, so CRLF files yield the same sequence as LF files; every
/// other byte is kept as-is.
pub fn parse_sequence<R: BufRead>(mut reader: R) -> std::io::Result<Sequence> {
    let mut bytes = Vec::new();
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            break;
        }
        if line.last() == Some(&b'\n') {
            line.pop();
        }
        if line.last() == Some(&b'\r') {
            line.pop();
        }
        if line.is_empty() || line[0] == b'>' {
            continue;
        }
        bytes.extend_from_slice(&line);
    }
    Ok(Sequence::new(bytes))
}

/// Read the sequence stored in the FASTA file at `path`.
pub fn read_sequence(path: &Path) -> Result<Sequence> {
    let reader = open_fasta(path)?;
    let sequence = parse_sequence(reader).map_err(|source| WinFreqError::Input {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Read {} symbols from {}", sequence.len(), path.display());
    Ok(sequence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use flate2::write::GzEncoder;
    use flate2::Compression;

    #[test]
    fn test_skips_headers_and_blank_lines() {
        let data = b">seq1 description\nACGT\n\nTTGA\n>seq2\nCC\n";
        let seq = parse_sequence(Cursor::new(&data[..])).unwrap();
        assert_eq!(seq.as_bytes(), b"ACGTTTGACC");
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let data = b">h\r\nAC\r\nGT";
        let seq = parse_sequence(Cursor::new(&data[..])).unwrap();
        assert_eq!(seq.as_bytes(), b"ACGT");
    }

    #[test]
    fn test_headers_only_gives_empty_sequence() {
        let seq = parse_sequence(Cursor::new(&b">a\n>b\n\n"[..])).unwrap();
        assert!(seq.is_empty());
    }

    #[test]
    fn test_missing_file_is_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.fasta");
        match read_sequence(&missing) {
            Err(WinFreqError::Input { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected Input error, got {:?}", other),
        }
    }

    #[test]
    fn test_gzipped_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reads.fasta.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b">x\nGATT\nACA\n").unwrap();
        encoder.finish().unwrap();

        let seq = read_sequence(&path).unwrap();
        assert_eq!(seq.as_bytes(), b"GATTACA");
    }
}
