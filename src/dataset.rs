//! Shuffled datasets of unique integer keys, stored as text with one key per line.

use crate::error::{Error, Result};
use log::{debug, info};
use rand::{Rng, SeedableRng, XorShiftRng};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const DEFAULT_SIZE: usize = 1_000_000;
const DEFAULT_PATH: &str = "listElementsTree.txt";

/// Parameters of a generated dataset.
///
/// # Examples
/// ```
/// use avl_collections::dataset::Config;
///
/// let config = Config::new(5, "keys.txt").with_seed(7);
/// let keys = config.generate();
///
/// let mut sorted = keys.clone();
/// sorted.sort();
/// assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
/// assert_eq!(config.generate(), keys);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    pub size: usize,
    pub path: PathBuf,
    pub seed: Option<u32>,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(size: usize, path: P) -> Self {
        Config {
            size,
            path: path.into(),
            seed: None,
        }
    }

    /// Makes generation deterministic.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Generates the keys `0..size` in shuffled order.
    pub fn generate(&self) -> Vec<i64> {
        match self.seed {
            // the leading ones keep the xorshift state non-zero
            Some(seed) => shuffled(self.size, &mut XorShiftRng::from_seed([1, 1, 1, seed])),
            None => shuffled(self.size, &mut rand::thread_rng()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DEFAULT_SIZE, DEFAULT_PATH)
    }
}

/// Returns the integers `0..size` in an order chosen by `rng`.
pub fn shuffled<R: Rng>(size: usize, rng: &mut R) -> Vec<i64> {
    let mut keys = (0..size as i64).collect::<Vec<i64>>();
    rng.shuffle(&mut keys);
    keys
}

/// Writes one key per line.
///
/// # Examples
/// ```
/// use avl_collections::dataset;
///
/// let mut buffer = Vec::new();
/// dataset::write_keys(&mut buffer, &[3, 1, 2]).unwrap();
/// assert_eq!(buffer, b"3\n1\n2\n");
/// ```
pub fn write_keys<W: Write>(writer: W, keys: &[i64]) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    for key in keys {
        writeln!(writer, "{}", key)?;
    }
    writer.flush()?;
    Ok(())
}

/// Reads keys written one per line. Blank lines are skipped and surrounding whitespace is ignored.
pub fn read_keys<R: BufRead>(reader: R) -> Result<Vec<i64>> {
    let mut keys = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let key = line.parse::<i64>().map_err(|source| Error::ParseKey {
            line: index + 1,
            source,
        })?;
        keys.push(key);
    }
    debug!("read {} keys", keys.len());
    Ok(keys)
}

/// Writes `keys` to the file at `path`, replacing its contents.
pub fn dump<P: AsRef<Path>>(path: P, keys: &[i64]) -> Result<()> {
    let path = path.as_ref();
    write_keys(File::create(path)?, keys)?;
    info!("wrote {} keys to {}", keys.len(), path.display());
    Ok(())
}

/// Reads the keys stored in the file at `path`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<i64>> {
    let path = path.as_ref();
    let keys = read_keys(BufReader::new(File::open(path)?))?;
    info!("loaded {} keys from {}", keys.len(), path.display());
    Ok(keys)
}

#[cfg(test)]
mod tests {
    use super::{dump, load, read_keys, shuffled, write_keys, Config};
    use crate::error::Error;
    use rand::{SeedableRng, XorShiftRng};
    use std::env;
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.size, 1_000_000);
        assert_eq!(config.path.to_str(), Some("listElementsTree.txt"));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_shuffled_is_permutation() {
        let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
        let mut keys = shuffled(1000, &mut rng);
        assert_eq!(keys.len(), 1000);
        assert_ne!(keys, (0..1000).collect::<Vec<i64>>());
        keys.sort();
        assert_eq!(keys, (0..1000).collect::<Vec<i64>>());
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let config = Config::new(100, "unused").with_seed(42);
        assert_eq!(config.generate(), config.generate());
    }

    #[test]
    fn test_empty_dataset() {
        assert!(Config::new(0, "unused").generate().is_empty());
    }

    #[test]
    fn test_write_read() {
        let mut buffer = Vec::new();
        write_keys(&mut buffer, &[5, -3, 8]).unwrap();
        assert_eq!(read_keys(Cursor::new(buffer)).unwrap(), vec![5, -3, 8]);
    }

    #[test]
    fn test_read_skips_blank_lines() {
        let input = "1\n\n  2 \n3";
        assert_eq!(read_keys(Cursor::new(input)).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_read_reports_line() {
        let input = "1\n2\nthree\n";
        match read_keys(Cursor::new(input)) {
            Err(Error::ParseKey { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_dump_load() {
        let path = env::temp_dir().join(format!("avl-collections-{}.txt", std::process::id()));
        let keys = Config::new(50, path.clone()).with_seed(3).generate();
        dump(&path, &keys).unwrap();
        assert_eq!(load(&path).unwrap(), keys);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_missing_file() {
        let path = env::temp_dir().join("avl-collections-does-not-exist.txt");
        match load(&path) {
            Err(Error::Io(_)) => {},
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
