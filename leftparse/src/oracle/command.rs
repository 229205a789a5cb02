//! Oracle reached as an external program over stdin and stdout

use super::{OracleError, ParseOracle};
use crate::config::compile_time::oracle::MAX_OUTPUT_LENGTH;
use crate::log_debug;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Runs `program` once per parse. Terminal indices go to its stdin
/// space-separated on one line; production indices are read back from
/// stdout.
#[derive(Debug, Clone)]
pub struct CommandOracle {
    program: String,
    args: Vec<String>,
    max_output_length: usize,
}

impl CommandOracle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            max_output_length: MAX_OUTPUT_LENGTH,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Most production indices accepted from one run
    pub fn with_max_output_length(mut self, max_output_length: usize) -> Self {
        self.max_output_length = max_output_length;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn run(&self, input: String) -> Result<String, OracleError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| OracleError::Unavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        // Written from its own thread so a program that prints before it
        // has read everything cannot block on a full pipe.
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || {
                let _ = stdin.write_all(input.as_bytes());
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|e| OracleError::Unavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        if let Some(writer) = writer {
            let _ = writer.join();
        }

        if !output.status.success() {
            return Err(OracleError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout)
            .map_err(|_| OracleError::malformed("output is not valid UTF-8"))
    }
}

impl ParseOracle for CommandOracle {
    fn parse(&self, terminals: &[u32]) -> Result<Vec<u32>, OracleError> {
        let input = format_indices(terminals);

        log_debug!("Invoking oracle program",
            "program" => self.program,
            "terminals" => terminals.len()
        );

        let stdout = self.run(input)?;
        parse_indices(&stdout, self.max_output_length)
    }

    fn name(&self) -> &str {
        &self.program
    }
}

fn format_indices(indices: &[u32]) -> String {
    let mut line = indices
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    line.push('\n');
    line
}

/// Read production indices separated by whitespace or commas. One pair of
/// enclosing brackets is accepted, so `[2, 5]` and `2 5` are equivalent.
pub fn parse_indices(text: &str, max_length: usize) -> Result<Vec<u32>, OracleError> {
    let mut body = text.trim();
    if let Some(inner) = body.strip_prefix('[') {
        body = inner
            .strip_suffix(']')
            .ok_or_else(|| OracleError::malformed("unterminated '[' in output"))?;
    }

    let mut indices = Vec::new();
    for item in body
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|item| !item.is_empty())
    {
        if indices.len() >= max_length {
            return Err(OracleError::malformed(format!(
                "more than {} production indices",
                max_length
            )));
        }
        let index = item.parse::<u32>().map_err(|_| {
            OracleError::malformed(format!("'{}' is not a production index", item))
        })?;
        indices.push(index);
    }

    Ok(indices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_parse_indices_formats() {
        assert_eq!(parse_indices("2 5\n", 10), Ok(vec![2, 5]));
        assert_eq!(parse_indices("[2, 3, 0]", 10), Ok(vec![2, 3, 0]));
        assert_eq!(parse_indices("  2,5 ,\n 1 ", 10), Ok(vec![2, 5, 1]));
        assert_eq!(parse_indices("[]", 10), Ok(vec![]));
        assert_eq!(parse_indices("", 10), Ok(vec![]));
    }

    #[test]
    fn test_parse_indices_rejects_garbage() {
        assert_matches!(
            parse_indices("Sexp2 Sexp5", 10),
            Err(OracleError::MalformedOutput { reason }) if reason.contains("Sexp2")
        );
        assert_matches!(parse_indices("-1", 10), Err(OracleError::MalformedOutput { .. }));
        assert_matches!(parse_indices("[1, 2", 10), Err(OracleError::MalformedOutput { .. }));
        assert_matches!(parse_indices("1 2 3", 2), Err(OracleError::MalformedOutput { .. }));
    }

    #[test]
    fn test_format_indices() {
        assert_eq!(format_indices(&[1, 0, 0, 2]), "1 0 0 2\n");
        assert_eq!(format_indices(&[]), "\n");
    }

    #[test]
    fn test_missing_program_is_unavailable() {
        let oracle = CommandOracle::new("/nonexistent/leftparse-oracle");
        assert_matches!(
            oracle.parse(&[1, 2]),
            Err(OracleError::Unavailable { program, .. }) if program == "/nonexistent/leftparse-oracle"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_program_receives_terminal_indices() {
        let oracle = CommandOracle::new("sh").args(["-c", "read line; echo \"[$line]\""]);
        assert_eq!(oracle.parse(&[1, 0, 0, 2]), Ok(vec![1, 0, 0, 2]));
        assert_eq!(oracle.name(), "sh");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let oracle = CommandOracle::new("sh").args(["-c", "echo 'no parse' >&2; exit 3"]);
        assert_matches!(
            oracle.parse(&[0]),
            Err(OracleError::Failed { stderr, .. }) if stderr == "no parse"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_scripted_oracle_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("oracle.sh");
        std::fs::write(&script, "cat > /dev/null\necho '2, 5'\n").unwrap();

        let oracle = CommandOracle::new("sh").arg(script.display().to_string());
        assert_eq!(oracle.parse(&[1, 2]), Ok(vec![2, 5]));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_length_limit() {
        let oracle = CommandOracle::new("sh")
            .args(["-c", "cat > /dev/null; echo 1 2 3 4"])
            .with_max_output_length(3);
        assert_matches!(oracle.parse(&[]), Err(OracleError::MalformedOutput { .. }));
    }
}
