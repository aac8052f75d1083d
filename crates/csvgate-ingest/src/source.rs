//! Lazy CSV record source.
//!
//! Records are pulled one at a time from the file, so a source can only be
//! iterated once. Each record carries the physical line it starts on (the
//! header, when present, is line 1).

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use csvgate_model::{CsvConfig, Encoding};
use tracing::debug;

use crate::error::{IngestError, Result};

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// One data row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// 1-based physical line where the record starts.
    pub line: u64,
    pub values: Vec<String>,
}

impl Record {
    /// Value of the cell at `index`, empty when the row is short.
    pub fn get(&self, index: usize) -> &str {
        self.values.get(index).map_or("", String::as_str)
    }

    /// Value of the cell under a header name.
    pub fn named<'a>(&'a self, header: &[String], name: &str) -> Option<&'a str> {
        let index = header.iter().position(|column| column == name)?;
        Some(self.get(index))
    }
}

pub struct CsvSource {
    path: PathBuf,
    reader: csv::Reader<Box<dyn Read + Send>>,
    header: Option<Vec<String>>,
    had_bom: bool,
    /// Data records consumed so far.
    position: usize,
}

impl CsvSource {
    /// Open a file with the dialect from a schema's `csv` section.
    pub fn open(path: &Path, config: &CsvConfig) -> Result<Self> {
        if config.encoding != Encoding::Utf8 {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: config.encoding.as_str().to_string(),
            });
        }
        let file = File::open(path).map_err(|source| IngestError::open(path, source))?;
        let mut buffered = BufReader::new(file);
        let had_bom = skip_bom(&mut buffered, path)?;

        let mut reader = builder(config, path)?.from_reader(Box::new(buffered) as Box<dyn Read + Send>);
        let header = if config.header {
            let mut record = StringRecord::new();
            let found = reader.read_record(&mut record).map_err(|source| IngestError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
            Some(if found {
                record.iter().map(str::to_string).collect()
            } else {
                Vec::new()
            })
        } else {
            None
        };
        debug!(
            path = %path.display(),
            columns = header.as_ref().map_or(0, Vec::len),
            bom = had_bom,
            "opened csv"
        );
        Ok(Self {
            path: path.to_path_buf(),
            reader,
            header,
            had_bom,
            position: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Header names, or `None` for a headerless dialect. A file with no
    /// lines at all yields an empty header.
    pub fn header(&self) -> Option<&[String]> {
        self.header.as_deref()
    }

    /// Whether a UTF-8 byte order mark was stripped from the file.
    pub fn had_bom(&self) -> bool {
        self.had_bom
    }

    /// Number of data records consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Remaining records, read lazily.
    pub fn records(&mut self) -> impl Iterator<Item = Result<Record>> + '_ {
        let path = &self.path;
        let position = &mut self.position;
        self.reader.records().map(move |result| {
            *position += 1;
            result.map(into_record).map_err(|source| IngestError::Csv {
                path: path.clone(),
                source,
            })
        })
    }

    /// Up to `length` records starting at data record `offset` (0-based).
    ///
    /// The source only moves forward: records before `offset` are skipped,
    /// and an offset behind the current position is an error. An empty chunk
    /// means the file is exhausted.
    pub fn records_chunk(&mut self, offset: usize, length: usize) -> Result<Vec<Record>> {
        if offset < self.position {
            return Err(IngestError::Rewind {
                path: self.path.clone(),
                offset,
                position: self.position,
            });
        }
        let mut record = StringRecord::new();
        while self.position < offset {
            if !self.read_next(&mut record)? {
                return Ok(Vec::new());
            }
        }
        let mut chunk = Vec::with_capacity(length.min(1024));
        while chunk.len() < length && self.read_next(&mut record)? {
            chunk.push(into_record(record.clone()));
        }
        Ok(chunk)
    }

    fn read_next(&mut self, record: &mut StringRecord) -> Result<bool> {
        let found = self
            .reader
            .read_record(record)
            .map_err(|source| IngestError::Csv {
                path: self.path.clone(),
                source,
            })?;
        if found {
            self.position += 1;
        }
        Ok(found)
    }
}

fn into_record(record: StringRecord) -> Record {
    Record {
        line: record.position().map_or(0, |position| position.line()),
        values: record.iter().map(str::to_string).collect(),
    }
}

fn ascii(value: char, what: &str, path: &Path) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| IngestError::InvalidDialect {
            path: path.to_path_buf(),
            message: format!("{what} must be a single ASCII character, got {value:?}"),
        })
}

fn builder(config: &CsvConfig, path: &Path) -> Result<ReaderBuilder> {
    let delimiter = ascii(config.delimiter, "delimiter", path)?;
    let enclosure = ascii(config.enclosure, "enclosure", path)?;
    let escape = ascii(config.quote_char, "quote_char", path)?;
    if delimiter == enclosure {
        return Err(IngestError::InvalidDialect {
            path: path.to_path_buf(),
            message: "delimiter and enclosure must differ".to_string(),
        });
    }
    let mut builder = ReaderBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .quote(enclosure)
        .double_quote(true);
    if escape != enclosure {
        builder.escape(Some(escape));
    }
    Ok(builder)
}

/// Consume a UTF-8 BOM; reject UTF-16 and UTF-32 byte order marks.
fn skip_bom(reader: &mut BufReader<File>, path: &Path) -> Result<bool> {
    let head = reader
        .fill_buf()
        .map_err(|source| IngestError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
    let encoding = match head {
        [0x00, 0x00, 0xFE, 0xFF, ..] => Some("UTF-32 BE"),
        [0xFF, 0xFE, 0x00, 0x00, ..] => Some("UTF-32 LE"),
        [0xFF, 0xFE, ..] => Some("UTF-16 LE"),
        [0xFE, 0xFF, ..] => Some("UTF-16 BE"),
        _ => None,
    };
    if let Some(encoding) = encoding {
        return Err(IngestError::UnsupportedEncoding {
            path: path.to_path_buf(),
            encoding: encoding.to_string(),
        });
    }
    if head.starts_with(&UTF8_BOM) {
        reader.consume(UTF8_BOM.len());
        return Ok(true);
    }
    Ok(false)
}
