use log::info;
use shotcore::prelude::{CoreError, CoreResult};
use shotcore::timer::{Cue, CuePlayer};
use std::io::Write;

/// Rings the terminal bell for drill cues.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalBell;

impl CuePlayer for TerminalBell {
    fn play(&self, cue: Cue) -> CoreResult<()> {
        let label = match cue {
            Cue::Start => "BEEP - start",
            Cue::Par => "BEEP - par",
        };
        let mut stderr = std::io::stderr().lock();
        writeln!(stderr, "\x07{}", label)
            .and_then(|_| stderr.flush())
            .map_err(|err| CoreError::Cue(err.to_string()))?;
        info!("played {:?} cue", cue);
        Ok(())
    }
}
