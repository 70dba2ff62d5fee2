use std::io::{self, Write};

pub struct REPL {
    prompt: String,
}

impl REPL {
    pub fn new(prompt: &str) -> Self {
        Self {
            prompt: prompt.to_string(),
        }
    }

    /// `None` once stdin is exhausted.
    pub fn read_line(&self) -> Result<Option<String>, io::Error> {
        print!("{}", self.prompt);
        io::stdout().flush()?;
        let mut buffer = String::new();
        let stdin = std::io::stdin();
        if stdin.read_line(&mut buffer)? == 0 {
            return Ok(None);
        }
        let buffer = buffer.trim().to_string();
        Ok(Some(buffer))
    }
}
