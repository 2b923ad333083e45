//! Phase-banner console output for `serve` startup. Strictly for humans
//! watching a terminal; `tracing` carries the same events for everything
//! else (log aggregation, JSON mode, headless runs).

use std::sync::OnceLock;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_BOLD: &str = "\x1b[1m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_GREEN: &str = "\x1b[32m";
const ANSI_BLUE: &str = "\x1b[34m";
const ANSI_YELLOW: &str = "\x1b[33m";
const ANSI_CYAN: &str = "\x1b[36m";

fn colors_enabled() -> bool {
    static ENABLED: OnceLock<bool> = OnceLock::new();
    *ENABLED.get_or_init(|| std::env::var("NO_COLOR").is_err())
}

fn color(s: impl AsRef<str>, ansi: &str) -> String {
    if colors_enabled() {
        format!("{ansi}{}{ANSI_RESET}", s.as_ref())
    } else {
        s.as_ref().to_string()
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Phase {
    Banner,
    Initialization,
    Configuration,
    Services,
    Ready,
}

pub struct StartupLogger {
    phase: Phase,
}

impl StartupLogger {
    pub fn new() -> Self {
        Self { phase: Phase::Banner }
    }

    pub fn banner(&mut self) {
        println!();
        println!("{}", color("SelScore", ANSI_BOLD));
        println!("{}", color("SEL skill inference engine", ANSI_DIM));
        println!();
    }

    fn phase_header(&mut self, phase: Phase, label: &str) {
        if self.phase != phase {
            println!("{} {}", color("\u{203a}", ANSI_BOLD), color(label, ANSI_BLUE));
            self.phase = phase;
        }
    }

    pub fn phase_init(&mut self) {
        self.phase_header(Phase::Initialization, "Initialization");
    }

    pub fn phase_config(&mut self) {
        self.phase_header(Phase::Configuration, "Configuration");
    }

    pub fn phase_services(&mut self) {
        self.phase_header(Phase::Services, "Services");
    }

    pub fn phase_ready(&mut self, addr: &str) {
        if self.phase != Phase::Ready {
            println!();
            println!("{} {}", color("\u{2713}", ANSI_GREEN), color("ready", ANSI_BOLD));
            println!("  {}       http://{addr}", color("listening:", ANSI_DIM));
            println!("  {}   http://{addr}/api-docs", color("docs:", ANSI_DIM));
            println!();
            self.phase = Phase::Ready;
        }
    }

    pub fn info(&self, message: &str) {
        println!("  {} {message}", color("\u{25cf}", ANSI_BLUE));
    }

    pub fn warning(&self, message: &str) {
        println!("  {} {message}", color("\u{26a0}", ANSI_YELLOW));
    }
}

impl Default for StartupLogger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_transitions_do_not_panic() {
        let mut logger = StartupLogger::new();
        logger.banner();
        logger.phase_init();
        logger.phase_config();
        logger.phase_services();
        logger.phase_ready("127.0.0.1:8080");
    }
}
