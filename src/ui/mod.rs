pub mod prompts;

use is_terminal::IsTerminal;

/// Prompts are only shown when a person is at the keyboard
pub fn is_interactive() -> bool {
    std::io::stdin().is_terminal() && std::io::stdout().is_terminal()
}
