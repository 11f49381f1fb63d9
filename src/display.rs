use crate::providers::{Message, Role};
use crate::session::{ChatSession, SessionStore};
use crate::utils::text::{display_width, truncate_with_ellipsis, wrap_text};
use console::style;

fn box_width() -> usize {
    let term = console::Term::stdout();
    let terminal_width = term.size().1 as usize;
    std::cmp::min(terminal_width.saturating_sub(4), 120).max(60)
}

fn role_label(role: Role) -> String {
    match role {
        Role::System => style("System").bold().dim().to_string(),
        Role::User => style("You").bold().cyan().to_string(),
        Role::Assistant => style("Assistant").bold().magenta().to_string(),
    }
}

fn looks_like_markdown(text: &str) -> bool {
    text.contains("```") || text.contains('*') || text.contains('`') || text.contains('#')
}

/// Render markdown replies with termimad
pub fn display_markdown(text: &str) {
    let skin = termimad::MadSkin::default();
    skin.print_text(text);
}

/// Display an assistant reply in a formatted box
pub fn display_response(response: &str) {
    if looks_like_markdown(response) {
        println!("\n{}", style("🤖 ASSISTANT").bold().blue());
        display_markdown(response);
        return;
    }

    let max_width = box_width();
    let wrapped_lines: Vec<String> = response
        .lines()
        .flat_map(|line| {
            if line.is_empty() {
                vec![String::new()]
            } else {
                wrap_text(line, max_width.saturating_sub(4))
            }
        })
        .collect();

    let content_max_len = wrapped_lines
        .iter()
        .map(|line| display_width(line))
        .max()
        .unwrap_or(0);
    let width = std::cmp::min(max_width, content_max_len + 4);

    let top_border = "┌".to_string() + &"─".repeat(width - 2) + "┐";
    let bottom_border = "└".to_string() + &"─".repeat(width - 2) + "┘";

    println!("\n{}", style("🤖 ASSISTANT").bold().blue());
    println!("{}", style(&top_border).dim().blue());
    for line in wrapped_lines {
        let padding = width.saturating_sub(display_width(&line) + 3);
        println!("│ {}{}│", style(&line).bold().white(), " ".repeat(padding));
    }
    println!("{}", style(&bottom_border).dim().blue());
}

/// Apology replies get a short note on what went wrong
pub fn display_fallback(reply: &str, cause: &str) {
    println!("\n{} {}", style("⚠️").yellow(), style(reply).bold().yellow());
    println!("{}", style(cause).dim());
}

pub fn display_error(message: &str) {
    eprintln!("{} {}", style("❌").bold().red(), style(message).red());
}

pub fn format_message(message: &Message) -> String {
    format!("{}: {}", role_label(message.role), message.content)
}

pub fn format_transcript(session: &ChatSession) -> String {
    let mut lines = vec![style(&session.title).bold().underlined().to_string()];
    if session.messages.is_empty() {
        lines.push(style("(no messages)").dim().to_string());
    }
    lines.extend(session.messages.iter().map(format_message));
    lines.join("\n\n")
}

/// First eight characters of a session id.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

pub fn format_session_list(store: &SessionStore) -> String {
    let active = store.active_session_id();
    store
        .sessions()
        .iter()
        .enumerate()
        .map(|(i, session)| {
            let marker = if Some(session.id.as_str()) == active { "*" } else { " " };
            format!(
                "{} {:>2}. {}  {}  {}",
                style(marker).bold().green(),
                i + 1,
                style(short_id(&session.id)).dim(),
                truncate_with_ellipsis(&session.title, 40),
                style(session.updated_at.format("%Y-%m-%d")).dim(),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
