use search_core::QueryEngine;
use std::io::{self, BufRead, Write};

/// Answer every line of `input` until end of input, one framed block per
/// line, flushing after each so a piped client never waits on a buffer.
/// Lines are decoded lossily; a bad line never ends the session.
pub fn run_session<R: BufRead, W: Write>(engine: &QueryEngine<'_>, mut input: R, mut output: W) -> io::Result<usize> {
    let mut answered = 0;
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let hits = engine.search(line.trim_end_matches(['\n', '\r']));
        hits.render(engine.index(), &mut output)?;
        output.flush()?;
        answered += 1;
    }
    Ok(answered)
}
