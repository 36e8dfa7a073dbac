//! 控制台渠道 - dry-run 时把通知打印到输出流

use std::cell::RefCell;
use std::io::{self, Write};

use crate::config::AppIdentity;
use crate::notification::document::{NotificationDocument, ToastAction};
use crate::notification::presenter::{PresentError, Presenter};

/// 打印通知而不是显示
pub struct ConsolePresenter<W: Write = io::Stdout> {
    out: RefCell<W>,
    json: bool,
}

impl ConsolePresenter<io::Stdout> {
    pub fn stdout(json: bool) -> Self {
        Self::new(io::stdout(), json)
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self {
            out: RefCell::new(out),
            json,
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }

    fn write_text(out: &mut W, document: &NotificationDocument, app: AppIdentity) -> io::Result<()> {
        writeln!(out, "[{}] {} ({})", app, document.header, document.scenario)?;
        for block in &document.blocks {
            writeln!(out, "  {}", block.text)?;
        }
        for action in &document.actions {
            match action {
                ToastAction::Action { label, target } => writeln!(out, "  [{}] -> {}", label, target)?,
                ToastAction::Snooze { label, options, .. } => {
                    let choices: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
                    writeln!(out, "  [{}] {}", label, choices.join(" / "))?
                }
                ToastAction::Dismiss { label } => writeln!(out, "  [{}]", label)?,
            }
        }
        writeln!(out, "  -- {}", document.attribution)
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn name(&self) -> &str {
        "console"
    }

    fn render(&self, document: &NotificationDocument, app: AppIdentity) -> Result<(), PresentError> {
        let mut out = self.out.borrow_mut();
        if self.json {
            let json = serde_json::to_string_pretty(document)
                .map_err(|e| PresentError::Rejected(e.to_string()))?;
            writeln!(out, "{}", json)?;
        } else {
            Self::write_text(&mut out, document, app)?;
        }
        Ok(())
    }

    fn speak(&self, text: &str) {
        let _ = writeln!(self.out.borrow_mut(), "[speak] {}", text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Configuration;
    use crate::facts::EnvironmentFacts;
    use crate::notification::document::assemble;
    use crate::notification::scenario::resolve;

    fn document() -> NotificationDocument {
        let config = Configuration::default();
        assemble(&config, &resolve(&config, &EnvironmentFacts::default()))
    }

    #[test]
    fn test_console_text_output() {
        let presenter = ConsolePresenter::new(Vec::new(), false);
        presenter.render(&document(), AppIdentity::PowerShellHost).unwrap();
        let output = String::from_utf8(presenter.into_inner()).unwrap();
        assert!(output.starts_with("[Windows PowerShell] Helpdesk kindly reminds you... (Default)"));
        assert!(output.contains("[Install now] -> ms-settings:windowsupdate"));
        assert!(output.contains("[Later]"));
    }

    #[test]
    fn test_console_json_output() {
        let presenter = ConsolePresenter::new(Vec::new(), true);
        presenter.render(&document(), AppIdentity::SoftwareCenter).unwrap();
        let output = String::from_utf8(presenter.into_inner()).unwrap();
        let parsed: NotificationDocument = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, document());
    }

    #[test]
    fn test_console_speak() {
        let presenter = ConsolePresenter::new(Vec::new(), false);
        presenter.speak("Restart soon");
        assert_eq!(String::from_utf8(presenter.into_inner()).unwrap(), "[speak] Restart soon\n");
    }
}
