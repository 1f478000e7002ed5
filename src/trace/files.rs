//src/trace/files.rs

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::csim::cache_configs::Address;
use crate::csim::sim_errors::{SimError, SimResult};

/// Type d'accès mémoire d'une ligne de trace. N'influence pas la simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessType {
    Load,
    Store,
}

impl AccessType {
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "l" | "L" => Some(AccessType::Load),
            "s" | "S" => Some(AccessType::Store),
            _ => None,
        }
    }

    pub fn marker(&self) -> char {
        match self {
            AccessType::Load => 'l',
            AccessType::Store => 's',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceRecord {
    pub access_type: AccessType,
    pub address: Address,
    pub size: u32,
}

impl TraceRecord {
    pub fn new(access_type: AccessType, address: Address, size: u32) -> Self {
        Self {
            access_type,
            address,
            size,
        }
    }

    /// Parse une ligne `<op> <adresse hex> <taille>`, ex: `s 0x1fffff50 1`
    pub fn parse_line(line: &str, line_number: usize) -> SimResult<Self> {
        let mut fields = line.split_whitespace();

        let marker = fields
            .next()
            .ok_or_else(|| SimError::trace_line_error(line_number, "empty record"))?;
        let access_type = AccessType::from_marker(marker).ok_or_else(|| {
            SimError::trace_line_error(line_number, &format!("unknown access type '{}'", marker))
        })?;

        let raw_address = fields
            .next()
            .ok_or_else(|| SimError::trace_line_error(line_number, "missing address"))?;
        let address = parse_hex_address(raw_address).ok_or_else(|| {
            SimError::trace_line_error(
                line_number,
                &format!("invalid 32-bit hex address '{}'", raw_address),
            )
        })?;

        let raw_size = fields
            .next()
            .ok_or_else(|| SimError::trace_line_error(line_number, "missing access size"))?;
        let size = raw_size.parse::<u32>().map_err(|_| {
            SimError::trace_line_error(line_number, &format!("invalid access size '{}'", raw_size))
        })?;

        if fields.next().is_some() {
            return Err(SimError::trace_line_error(line_number, "unexpected trailing fields"));
        }

        Ok(Self::new(access_type, address, size))
    }
}

impl fmt::Display for TraceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} 0x{:08x} {}", self.access_type.marker(), self.address, self.size)
    }
}

fn parse_hex_address(raw: &str) -> Option<Address> {
    let digits = raw
        .strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw);
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

/// Trace complète chargée en mémoire, dans l'ordre du fichier
#[derive(Debug, Clone, Default)]
pub struct TraceFile {
    pub records: Vec<TraceRecord>,
}

impl TraceFile {
    pub fn from_addresses(addresses: &[Address], access_type: AccessType) -> Self {
        Self {
            records: addresses
                .iter()
                .map(|&address| TraceRecord::new(access_type, address, 1))
                .collect(),
        }
    }

    pub fn parse<R: Read>(reader: R) -> SimResult<Self> {
        let mut records = Vec::new();
        for (i, line) in BufReader::new(reader).lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            // Lignes vides et commentaires ignorés
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            records.push(TraceRecord::parse_line(trimmed, i + 1)?);
        }
        Ok(Self { records })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> SimResult<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            SimError::trace_error(&format!("cannot open {}: {}", path.as_ref().display(), e))
        })?;
        Self::parse(file)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> SimResult<()> {
        let mut writer = BufWriter::new(writer);
        for record in &self.records {
            writeln!(writer, "{}", record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> SimResult<()> {
        let file = File::create(path)?;
        self.write_to(file)
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.records.iter().map(|r| r.address).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matches::assert_matches;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_parse_line() {
        let record = TraceRecord::parse_line("s 0x1fffff50 1", 1).unwrap();
        assert_eq!(record.access_type, AccessType::Store);
        assert_eq!(record.address, 0x1fff_ff50);
        assert_eq!(record.size, 1);

        // Préfixe 0x optionnel
        let record = TraceRecord::parse_line("l 1FFFFF58 4", 1).unwrap();
        assert_eq!(record.access_type, AccessType::Load);
        assert_eq!(record.address, 0x1fff_ff58);
    }

    #[test]
    fn test_parse_line_errors() {
        assert_matches!(TraceRecord::parse_line("x 0x10 1", 7), Err(SimError::TraceError(_)));
        assert_matches!(TraceRecord::parse_line("l", 1), Err(SimError::TraceError(_)));
        assert_matches!(TraceRecord::parse_line("l 0x 1", 1), Err(SimError::TraceError(_)));
        assert_matches!(TraceRecord::parse_line("l 0x100000000 1", 1), Err(SimError::TraceError(_)));
        assert_matches!(TraceRecord::parse_line("l 0x10", 1), Err(SimError::TraceError(_)));
        assert_matches!(TraceRecord::parse_line("l 0x10 1 2", 1), Err(SimError::TraceError(_)));

        match TraceRecord::parse_line("x 0x10 1", 7) {
            Err(SimError::TraceError(msg)) => assert!(msg.starts_with("line 7")),
            other => panic!("Résultat inattendu: {:?}", other),
        }
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        let input = "# gcc trace\nl 0x00000000 4\n\ns 0x00000004 1\n";
        let trace = TraceFile::parse(input.as_bytes()).unwrap();
        assert_eq!(trace.len(), 2);
        assert_eq!(trace.addresses(), vec![0x0, 0x4]);
    }

    #[test]
    fn test_parse_reports_file_line_number() {
        let input = "l 0x0 4\n\nl zz 4\n";
        match TraceFile::parse(input.as_bytes()) {
            Err(SimError::TraceError(msg)) => assert!(msg.starts_with("line 3")),
            other => panic!("Résultat inattendu: {:?}", other),
        }
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gcc.trace");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "s 0x1fffff50 1").unwrap();
        writeln!(file, "l 0x1fffff58 1").unwrap();
        writeln!(file, "l 0x1fffff50 1").unwrap();
        drop(file);

        let trace = TraceFile::load(&path).unwrap();
        assert_eq!(trace.addresses(), vec![0x1fff_ff50, 0x1fff_ff58, 0x1fff_ff50]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        assert_matches!(
            TraceFile::load(dir.path().join("absent.trace")),
            Err(SimError::TraceError(_))
        );
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("generated.trace");

        let trace = TraceFile::from_addresses(&[0xdead_beef, 0x10], AccessType::Load);
        trace.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "l 0xdeadbeef 1\nl 0x00000010 1\n");
        assert_eq!(TraceFile::load(&path).unwrap().records, trace.records);
    }
}
