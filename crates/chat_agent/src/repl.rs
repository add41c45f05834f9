//! Read-evaluate-print loop over one chat session.

use std::io::{self, BufRead, Write};

use docbot::{ChatSession, SessionError};

pub const GREETING: &str =
    "Hey, welcome to ClarkBot! Your one-stop solution to all Clark questions.";
pub const PROMPT: &str = "Ask me a question: ";
pub const EXIT_COMMAND: &str = "exit";

/// Drive the interactive loop until `exit` or end of input.
///
/// Answer fragments are written to `output` as they arrive, followed by a
/// trailing newline once the stream completes. Generation failures are
/// reported inline and the loop continues; only I/O failures on the
/// interactive surface itself terminate the loop early.
pub fn run<R: BufRead, W: Write>(
    session: &mut ChatSession,
    mut input: R,
    mut output: W,
) -> io::Result<()> {
    writeln!(output, "{GREETING}")?;

    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            break;
        }

        let question = line.trim();
        if question.eq_ignore_ascii_case(EXIT_COMMAND) {
            break;
        }
        if question.is_empty() {
            continue;
        }

        let outcome = session.ask(question, &mut |fragment| {
            let _ = write!(output, "{fragment}");
            let _ = output.flush();
        });

        match outcome {
            Ok(_) => writeln!(output)?,
            Err(SessionError::Generate(error)) if error.is_client() => {
                writeln!(output, "API Error: {error}")?;
            }
            Err(error) => {
                writeln!(output, "An unexpected error occurred: {error}")?;
            }
        }
    }

    Ok(())
}
