// src/commands/types.rs

/// One parsed input line.
///
/// The verb is the first whitespace-delimited word and must match exactly;
/// everything after it (trimmed, inner spaces kept) is the argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    ChangeDir(String),
    Reverse(String),
    DiskUsage,
    RemoveDir(String),
    Exit,
    Unknown(String),
}

impl Command {
    /// Parse a line. Blank lines give `None`.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let command = match verb {
            "ls" if arg.is_empty() => Command::List,
            "du" if arg.is_empty() => Command::DiskUsage,
            "exit" if arg.is_empty() => Command::Exit,
            "cd" => Command::ChangeDir(arg.to_string()),
            "rev" => Command::Reverse(arg.to_string()),
            "rmdir" => Command::RemoveDir(arg.to_string()),
            _ => Command::Unknown(line.to_string()),
        };
        Some(command)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::List => "ls",
            Command::ChangeDir(_) => "cd",
            Command::Reverse(_) => "rev",
            Command::DiskUsage => "du",
            Command::RemoveDir(_) => "rmdir",
            Command::Exit => "exit",
            Command::Unknown(_) => "unknown",
        }
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success(stdout: String) -> Self {
        Self { stdout, stderr: String::new(), exit_code: 0 }
    }

    pub fn error(stderr: String) -> Self {
        Self { stdout: String::new(), stderr, exit_code: 1 }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }

    /// The single string a frontend shows for this result.
    pub fn into_output(self) -> String {
        if self.is_success() {
            self.stdout
        } else {
            self.stderr
        }
    }
}
