//! Shell completion generation.

use clap::{CommandFactory, ValueEnum};
use clap_complete::Shell;
use std::io;

/// Shells we can generate completions for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ShellType {
    /// Bourne Again Shell
    Bash,
    /// Z shell
    Zsh,
    /// Fish shell
    Fish,
    /// `PowerShell`
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl From<ShellType> for Shell {
    fn from(shell: ShellType) -> Self {
        match shell {
            ShellType::Bash => Self::Bash,
            ShellType::Zsh => Self::Zsh,
            ShellType::Fish => Self::Fish,
            ShellType::PowerShell => Self::PowerShell,
            ShellType::Elvish => Self::Elvish,
        }
    }
}

/// Write completions for the command `C` to stdout.
pub fn generate_completions<C: CommandFactory>(shell: ShellType, bin_name: &str) {
    write_completions::<C, _>(shell, bin_name, &mut io::stdout());
}

/// Write completions for the command `C` to the given writer.
pub fn write_completions<C: CommandFactory, W: io::Write>(
    shell: ShellType,
    bin_name: &str,
    writer: &mut W,
) {
    let mut cmd = C::command();
    clap_complete::generate(Shell::from(shell), &mut cmd, bin_name, writer);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    /// Minimal command for exercising completion output.
    #[derive(Parser)]
    #[command(name = "demo")]
    #[allow(dead_code)]
    struct Demo {
        #[arg(long)]
        flag: bool,
    }

    #[test]
    fn test_bash_completions_mention_flags() {
        let mut out = Vec::new();
        write_completions::<Demo, _>(ShellType::Bash, "demo", &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("--flag"));
    }
}
