//! Utilities for reading and writing the line-oriented, usually gzip-compressed, text files
//! passed between analysis steps
//!

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};

use camino::Utf8Path;
use flate2::{Compression, read::MultiGzDecoder, write::GzEncoder};
use simple_error::{SimpleResult, try_with};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Open a text file for line reading, transparently decompressing gzip or bgzip content
///
/// * `label` - used to describe the file in any error message
///
pub fn open_text_reader(filename: &Utf8Path, label: &str) -> SimpleResult<Box<dyn BufRead>> {
    let f = try_with!(
        File::open(filename),
        "Unable to open {} file: '{}'",
        label,
        filename
    );
    let mut reader = BufReader::new(f);

    let is_gzip = {
        let buf = try_with!(
            reader.fill_buf(),
            "Unable to read {} file: '{}'",
            label,
            filename
        );
        buf.starts_with(&GZIP_MAGIC)
    };

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(reader))))
    } else {
        Ok(Box::new(reader))
    }
}

pub type GzWriter = BufWriter<GzEncoder<File>>;

/// Create a new gzip-compressed text output file
///
pub fn create_gz_writer(filename: &Utf8Path, label: &str) -> SimpleResult<GzWriter> {
    let f = try_with!(
        File::create(filename),
        "Unable to create {} file: '{}'",
        label,
        filename
    );
    Ok(BufWriter::new(GzEncoder::new(f, Compression::default())))
}

/// Flush and close a gzip output file, writing the gzip trailer
///
pub fn finish_gz_writer(writer: GzWriter, label: &str) -> SimpleResult<()> {
    let encoder = try_with!(
        writer.into_inner().map_err(|e| e.into_error()),
        "Unable to flush {} file",
        label
    );
    let mut f = try_with!(encoder.finish(), "Unable to finish {} file", label);
    try_with!(f.flush(), "Unable to flush {} file", label);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_dir() -> camino::Utf8PathBuf {
        let dir = std::env::temp_dir().join(format!("pecluster_gz_utils_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        camino::Utf8PathBuf::from_path_buf(dir).unwrap()
    }

    #[test]
    fn test_gz_write_then_read() {
        let filename = get_test_dir().join("test.txt.gz");
        let mut w = create_gz_writer(&filename, "test").unwrap();
        writeln!(w, "chr1\t10\t20").unwrap();
        writeln!(w, "chr2\t30\t40").unwrap();
        finish_gz_writer(w, "test").unwrap();

        let reader = open_text_reader(&filename, "test").unwrap();
        let lines = reader.lines().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(lines, vec!["chr1\t10\t20", "chr2\t30\t40"]);
    }

    #[test]
    fn test_plain_text_read() {
        let filename = get_test_dir().join("test.txt");
        std::fs::write(&filename, "chr1 1 5\n").unwrap();

        let reader = open_text_reader(&filename, "test").unwrap();
        let lines = reader.lines().collect::<Result<Vec<_>, _>>().unwrap();
        assert_eq!(lines, vec!["chr1 1 5"]);
    }

    #[test]
    fn test_missing_file() {
        let filename = get_test_dir().join("not_there.txt");
        assert!(open_text_reader(&filename, "test").is_err());
    }
}
