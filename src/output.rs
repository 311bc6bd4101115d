//! Token record sink and results file management.

use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::token::Token;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab separated records
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "lexi",
            OutputFormat::Json => "jsonl",
        }
    }
}

/// Writes one record per token, in emission order.
pub struct ResultWriter<W: Write> {
    out: W,
    format: OutputFormat,
    written: usize,
}

impl<W: Write> ResultWriter<W> {
    pub fn new(out: W, format: OutputFormat) -> Self {
        Self {
            out,
            format,
            written: 0,
        }
    }

    pub fn write(&mut self, token: &Token) -> io::Result<()> {
        match self.format {
            OutputFormat::Text => writeln!(self.out, "{}", token)?,
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, token)?;
                writeln!(self.out)?;
            }
        }
        self.written += 1;
        Ok(())
    }

    pub fn written(&self) -> usize {
        self.written
    }

    /// Flushes and hands back the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Creates `dir` if needed and a fresh results file named after the current
/// local time, e.g. `2024_03_09_17_05_42.lexi`.
pub fn create_results_file(dir: &Path, format: OutputFormat) -> io::Result<(PathBuf, BufWriter<File>)> {
    fs::create_dir_all(dir)?;
    let name = format!(
        "{}.{}",
        Local::now().format("%Y_%m_%d_%H_%M_%S"),
        format.extension()
    );
    let path = dir.join(name);
    let file = File::create(&path)?;
    debug!(path = %path.display(), "created results file");
    Ok((path, BufWriter::new(file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize_str;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn text_records_one_per_line() {
        let mut writer = ResultWriter::new(Vec::new(), OutputFormat::Text);
        for token in tokenize_str("a+=1;") {
            writer.write(&token).unwrap();
        }
        assert_eq!(writer.written(), 5);
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        assert_eq!(
            out,
            "Identifier\ta\tColuna Inicio: 0 Coluna Fim: 1\tLinha: 1\t\n\
             PlusAssign\t+=\tColuna Inicio: 1 Coluna Fim: 3\tLinha: 1\t\n\
             IntegerConstant\t1\tColuna Inicio: 3 Coluna Fim: 4\tLinha: 1\t\n\
             SemiColon\t;\tColuna Inicio: 4 Coluna Fim: 5\tLinha: 1\t\n\
             EndOfInput\t\tColuna Inicio: 6 Coluna Fim: 6\tLinha: 1\t\n"
        );
    }

    #[test]
    fn json_records_one_per_line() {
        let mut writer = ResultWriter::new(Vec::new(), OutputFormat::Json);
        for token in tokenize_str("x") {
            writer.write(&token).unwrap();
        }
        let out = String::from_utf8(writer.finish().unwrap()).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["kind"], "Identifier");
        assert_eq!(first["lexeme"], "x");
        let last: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(last["kind"], "EndOfInput");
    }

    #[test]
    fn results_file_is_created_with_timestamp_name() {
        let dir = tempdir().unwrap();
        let target = dir.path().join("results");
        let (path, mut file) = create_results_file(&target, OutputFormat::Text).unwrap();
        file.flush().unwrap();

        assert!(path.exists());
        assert_eq!(path.parent(), Some(target.as_path()));
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("lexi"));

        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap();
        let parts: Vec<_> = stem.split('_').collect();
        assert_eq!(parts.len(), 6);
        assert!(parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())));
    }

    #[test]
    fn format_names_in_config() {
        assert_eq!(serde_json::to_string(&OutputFormat::Json).unwrap(), r#""json""#);
        assert_eq!(
            serde_json::from_str::<OutputFormat>(r#""text""#).unwrap(),
            OutputFormat::Text
        );
    }
}
