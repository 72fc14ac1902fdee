//! Built-in document transforms.

use diplo_traits::{SvgTransform, TransformError, TranscriptTransform};
use quick_xml::events::{BytesPI, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;
use std::process::{Command, Stdio};

/// Placeholder in the export command replaced by the source path.
pub const INPUT_PLACEHOLDER: &str = "{input}";

/// Converts transcripts by running an external command.
///
/// Every `{input}` in the argument list is replaced by the page's source
/// path; without a placeholder the path is appended. The command's stdout
/// is the JSON.
#[derive(Debug, Clone)]
pub struct CommandTransform {
    argv: Vec<String>,
}

impl CommandTransform {
    pub fn new(argv: Vec<String>) -> Self {
        Self { argv }
    }

    fn command(&self, source: &Path) -> Result<Command, TransformError> {
        let (program, rest) = self
            .argv
            .split_first()
            .ok_or_else(|| TransformError::InvalidOutput("empty export command".to_string()))?;
        let input = source.to_string_lossy();
        let mut command = Command::new(program);
        if rest.iter().any(|a| a.contains(INPUT_PLACEHOLDER)) {
            command.args(rest.iter().map(|a| a.replace(INPUT_PLACEHOLDER, &input)));
        } else {
            command.args(rest).arg(source);
        }
        Ok(command)
    }
}

impl TranscriptTransform for CommandTransform {
    fn transform(&self, source: &Path) -> Result<Vec<u8>, TransformError> {
        let output = self
            .command(source)?
            .stdin(Stdio::null())
            .output()?;
        if !output.status.success() {
            return Err(TransformError::CommandFailed {
                command: self.argv.join(" "),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(output.stdout)
    }
}

/// Links a CSS stylesheet into SVGs with an `xml-stylesheet` processing
/// instruction in front of the root element.
#[derive(Debug, Clone, Default)]
pub struct StylesheetInjector;

impl StylesheetInjector {
    pub fn new() -> Self {
        Self
    }
}

impl SvgTransform for StylesheetInjector {
    fn prepare(&self, stylesheet: &str) -> Result<(), TransformError> {
        if stylesheet.trim().is_empty() {
            return Err(TransformError::InvalidStylesheet("empty reference".to_string()));
        }
        if stylesheet.contains(['"', '<', '>', '&']) {
            return Err(TransformError::InvalidStylesheet(format!(
                "'{}' contains characters not allowed in a pseudo-attribute",
                stylesheet
            )));
        }
        Ok(())
    }

    fn apply(&self, svg: &[u8], stylesheet: &str) -> Result<Vec<u8>, TransformError> {
        let mut reader = Reader::from_reader(svg);
        let mut writer = Writer::new(Vec::with_capacity(svg.len() + 80));
        let mut buf = Vec::new();
        let mut injected = false;
        let xml_err = |e: &dyn std::fmt::Display| TransformError::Xml(e.to_string());

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| xml_err(&e))?;
            match event {
                Event::Eof => break,
                Event::Start(_) | Event::Empty(_) if !injected => {
                    let pi = format!(r#"xml-stylesheet type="text/css" href="{}""#, stylesheet);
                    writer
                        .write_event(Event::PI(BytesPI::new(pi)))
                        .map_err(|e| xml_err(&e))?;
                    writer
                        .write_event(Event::Text(BytesText::new("\n")))
                        .map_err(|e| xml_err(&e))?;
                    writer.write_event(event).map_err(|e| xml_err(&e))?;
                    injected = true;
                }
                other => writer.write_event(other).map_err(|e| xml_err(&e))?,
            }
            buf.clear();
        }

        if !injected {
            return Err(TransformError::Xml("document has no root element".to_string()));
        }
        Ok(writer.into_inner())
    }
}
