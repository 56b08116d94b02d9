use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

/// Line-oriented console used by the interactive shell.
///
/// Reading past the end of input yields `UnexpectedEof` so prompt loops
/// terminate instead of spinning.
pub struct Console<R, W> {
    input: R,
    output: W,
    hide_passwords: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    /// Console over the process' stdin/stdout. Password entry is hidden only
    /// when stdin is a terminal; piped input is read like any other answer.
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let hide_passwords = stdin.is_terminal();
        Console::new(stdin.lock(), io::stdout(), hide_passwords)
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, hide_passwords: bool) -> Self {
        Self {
            input,
            output,
            hide_passwords,
        }
    }

    /// Helper function to read a line. Only the line ending is removed, so
    /// answers reach the caller exactly as typed.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Helper function to print a label and read the answer
    pub fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        self.read_line()
    }

    /// Like `prompt`, but without echo when reading from a terminal
    pub fn prompt_password(&mut self, label: &str) -> io::Result<String> {
        if !self.hide_passwords {
            return self.prompt(label);
        }
        write!(self.output, "{}", label)?;
        self.output.flush()?;
        rpassword::read_password()
    }

    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}
