use std::fs::File;
use std::io::{stdin, BufRead, BufReader, Cursor};
use std::path::Path;

use anyhow::Result;
use paste::paste;
use sm_population::Mass;
use sm_population::parse_masses;

// ============================================================
//  Restart dump parser
// ============================================================

/// Read a restart dump: one mass per line, zeros included.
pub fn read_masses<R: BufRead>(mut reader: R) -> Result<Vec<Mass>> {
    let mut data = String::new();
    reader.read_to_string(&mut data)?;
    Ok(parse_masses(&data)?)
}

// ============================================================
//  Macro generating file/string/stdin/input helpers
// ============================================================

/// Generate input adapters for a base parser function `fn base<R: BufRead>(R) -> Result<T>`.
///
/// This expands into:
/// - `base_string(&str)`
/// - `base_file<P: AsRef<Path>>(P)`
/// - `base_stdin()`
/// - `base_input(&str)`  (dispatches "-" → stdin, otherwise → file)
macro_rules! define_input_variants {
    ($base:ident, $ret:ty) => {
        paste! {
            /// Read from a string buffer.
            pub fn [<$base _string>](s: &str) -> $ret {
                $base(Cursor::new(s))
            }

            /// Read from a file path.
            pub fn [<$base _file>]<P: AsRef<Path>>(path: P) -> $ret {
                let reader = BufReader::new(File::open(path)?);
                $base(reader)
            }

            /// Read from stdin.
            pub fn [<$base _stdin>]() -> $ret {
                let reader = BufReader::new(stdin());
                $base(reader)
            }

            /// Read either from stdin ("-") or a file path.
            pub fn [<$base _input>](s: &str) -> $ret {
                if s == "-" {
                    [<$base _stdin>]()
                } else {
                    [<$base _file>](s)
                }
            }
        }
    };
}

type MassesResult = Result<Vec<Mass>>;

define_input_variants!(read_masses, MassesResult);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_masses_string() {
        let masses = read_masses_string("2\n0\n1\n\n1\n").unwrap();
        assert_eq!(masses, vec![2, 0, 1, 1]);
    }

    #[test]
    fn test_read_masses_invalid() {
        let err = read_masses_string("2\n-1\n").unwrap_err();
        assert!(err.to_string().contains("line 2"));
        assert!(read_masses_string("1.5\n").is_err());
    }

    #[test]
    fn test_read_masses_missing_file() {
        assert!(read_masses_input("/nonexistent/restart_dump.dat").is_err());
    }
}
