//! 语音播报 - 调用平台自带的 TTS 命令
//!
//! Fire-and-forget: the child process is spawned and never waited on.

use std::process::{Command, Stdio};
use tracing::{debug, warn};

/// 按平台排列的候选 TTS 命令
fn candidates() -> &'static [&'static str] {
    if cfg!(target_os = "macos") {
        &["say"]
    } else if cfg!(windows) {
        &["powershell"]
    } else {
        &["spd-say", "espeak-ng", "espeak"]
    }
}

fn command_for(program: &str, text: &str) -> Command {
    let mut cmd = Command::new(program);
    if program == "powershell" {
        let script = format!(
            "Add-Type -AssemblyName System.Speech; (New-Object System.Speech.Synthesis.SpeechSynthesizer).Speak('{}')",
            text.replace('\'', "''")
        );
        cmd.args(["-NoProfile", "-Command", script.as_str()]);
    } else {
        cmd.arg(text);
    }
    cmd
}

/// 朗读文本；找不到 TTS 命令或启动失败时只记录警告
pub fn speak(text: &str) {
    if text.trim().is_empty() {
        debug!("Empty speech text, nothing to say");
        return;
    }

    let Some(program) = candidates().iter().find(|p| which::which(p).is_ok()) else {
        warn!("No text-to-speech command found");
        return;
    };

    match command_for(program, text)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => debug!(program = *program, "Speaking custom audio text"),
        Err(e) => warn!(program = *program, error = %e, "Failed to start text-to-speech"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_powershell_command_escapes_quotes() {
        let cmd = command_for("powershell", "it's time");
        let args: Vec<String> = cmd.get_args().map(|a| a.to_string_lossy().to_string()).collect();
        assert!(args.last().unwrap().contains("Speak('it''s time')"));
    }

    #[test]
    fn test_plain_command_passes_text() {
        let cmd = command_for("say", "hello");
        let args: Vec<_> = cmd.get_args().collect();
        assert_eq!(args, vec!["hello"]);
    }
}
