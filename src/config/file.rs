use error::SourceError;
use std::fs;
use std::path::Path;

/// Line oriented configuration split into `[SECTION]` blocks.
///
/// Everything after a `#` is a comment, blank lines are dropped and lines
/// before the first section header are collected in an unnamed section.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    sections: Vec<(String, Vec<String>)>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> ConfigFile {
        let mut sections: Vec<(String, Vec<String>)> = Vec::new();

        for line in text.lines() {
            let line = match line.find('#') {
                Some(comment_start) => &line[..comment_start],
                None => line,
            }.trim();

            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                let name = line[1..line.len() - 1].trim().to_string();
                sections.push((name, Vec::new()));
            } else {
                if sections.is_empty() {
                    sections.push((String::new(), Vec::new()));
                }
                if let Some(section) = sections.last_mut() {
                    section.1.push(line.to_string());
                }
            }
        }

        ConfigFile { sections }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<ConfigFile, SourceError> {
        let text = fs::read_to_string(path)?;
        Ok(Self::parse(&text))
    }

    /// Lines of the first section with the given name.
    pub fn section(&self, name: &str) -> Option<&[String]> {
        self.sections.iter()
            .find(|&&(ref section, _)| section == name)
            .map(|&(_, ref lines)| lines.as_slice())
    }
}
