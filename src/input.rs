use std::fs;

pub enum Source {
    Prompt,
    File(String),
}

pub struct Input {
    pub source: Source,
    pub content: String,
}

impl Input {
    // Err carries the message shown to the user.
    pub fn from_file(path: &str) -> Result<Input, String> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Input {
                source: Source::File(path.into()),
                content,
            }),
            Err(err) => Err(format!("Error reading {}: {}", path, err)),
        }
    }

    pub fn name(&self) -> &str {
        match &self.source {
            Source::Prompt => "<prompt>",
            Source::File(filename) => filename,
        }
    }
}
