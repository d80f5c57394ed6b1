//! Pre-migration instructions, confirmation prompt and program title.

use std::io;

use console::{Term, style};
use dsomig_log as logger;

const RULE: &str = "──────────────────────────────────────────────────────────────";

const TITLE_ART: [&str; 4] = [
    r" ____   ___  _____  __  __  ____  ____  ____ ",
    r"(  _ \ / __)(  _  )(  \/  )(_  _)(_  _)(_  _)",
    r" )(_) )\__ \ )(_)(  )    (  _)(_   )(   _)(_ ",
    r"(____/ (___/(_____)(_/\/\_)(____) (__) (____)",
];

const AUTHOR: &str = "github.com/Nexriel";

/// Blocks until the user agrees to continue.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<()>;
}

/// Waits for Enter on the controlling terminal.
#[derive(Debug, Clone)]
pub struct TermConfirm {
    term: Term,
}

impl TermConfirm {
    pub fn new(term: Term) -> Self {
        Self { term }
    }
}

impl Confirm for TermConfirm {
    fn confirm(&mut self, prompt: &str) -> io::Result<()> {
        self.term.write_line(prompt)?;
        if self.term.features().is_attended() {
            self.term.read_line()?;
        } else {
            // Piped stdin: one line (or EOF) counts as consent.
            let mut c_line = String::new();
            io::stdin().read_line(&mut c_line)?;
        }
        Ok(())
    }
}

/// Never blocks; used for `--yes` and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _prompt: &str) -> io::Result<()> {
        Ok(())
    }
}

pub const PROMPT_CONTINUE: &str =
    "Click enter to run the script after you followed the instructions above...";
pub const MSG_MIGRATING: &str = "→ Safely migrating your Drakensang Online installation...";
pub const MSG_ABORTED: &str = "Migration aborted by user.";

pub fn render_instructions() -> Vec<String> {
    [
        RULE,
        "BEFORE YOU CONTINUE MAKE SURE YOU DO THESE STEPS FIRST",
        RULE,
        "1. Install Drakensang from the website fully and login one time",
        "2. Install Drakensang on Steam and launch it, then close it",
        "3. When thats done, you can click enter to start the script",
        RULE,
    ]
    .iter()
    .map(|line| line.to_string())
    .collect()
}

/// ASCII title with author and version on the first lines.
pub fn render_title() -> Vec<String> {
    let l_side = [
        format!("Author: {AUTHOR}"),
        format!("Version: v{}", env!("CARGO_PKG_VERSION")),
    ];
    TITLE_ART
        .iter()
        .enumerate()
        .map(|(idx, art)| {
            let art = style(art).cyan().bold();
            match l_side.get(idx) {
                Some(side) => format!("{art}               {}", style(side).dim()),
                None => art.to_string(),
            }
        })
        .collect()
}

/// Clear, show instructions, wait for `confirm`, clear again, show the title.
pub fn run_banner(term: &Term, confirm: &mut dyn Confirm) -> io::Result<()> {
    term.clear_screen()?;
    for line in render_instructions() {
        term.write_line(&line)?;
    }
    confirm.confirm(PROMPT_CONTINUE)?;
    term.write_line(&format!("\n{MSG_MIGRATING}\n"))?;

    term.clear_screen()?;
    term.write_line("")?;
    for line in render_title() {
        term.write_line(&line)?;
    }
    term.write_line("")?;
    Ok(())
}

/// [`run_banner`], treating an interrupted prompt (Ctrl-C while the terminal
/// is waiting for input) as the user backing out. Returns `false` when the
/// migration must not start.
pub fn confirm_start(term: &Term, confirm: &mut dyn Confirm) -> io::Result<bool> {
    match run_banner(term, confirm) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::Interrupted => {
            logger::exception(MSG_ABORTED);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
