use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "AI assistant for security-system installers", long_about = None)]
pub struct Args {
    /// Question to ask in the active chat
    pub query: Option<String>,

    /// Interactive chat with slash commands
    #[arg(short, long)]
    pub chat: bool,

    /// Start a new chat before asking
    #[arg(short, long)]
    pub new: bool,

    /// Whose chat history to use
    #[arg(short, long)]
    pub user: Option<String>,

    /// Provider override [possible values: openai, ollama, flowise]
    #[arg(short, long)]
    pub provider: Option<String>,

    /// Model override (provider-specific)
    #[arg(short, long)]
    pub model: Option<String>,

    /// Debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
