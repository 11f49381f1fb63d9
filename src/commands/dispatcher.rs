use super::{
    ChatState,
    handler::{
        ClearCommand, DeleteCommand, GreetCommand, ListCommand, NewCommand, QuitCommand,
        ShowCommand, SwitchCommand,
    },
    registry::CommandRegistry,
};
use crate::core::error::AssistError;
use console::style;
use std::sync::Arc;

#[derive(Clone)]
pub struct CommandDispatcher {
    registry: Arc<CommandRegistry>,
}

impl CommandDispatcher {
    pub fn new(registry: Arc<CommandRegistry>) -> Self {
        Self { registry }
    }

    pub fn execute(
        &self,
        command: &str,
        args: &[&str],
        state: &mut ChatState,
    ) -> Result<Option<String>, AssistError> {
        if command == "help" {
            return Ok(Some(self.help_text()));
        }
        self.registry.execute(command, args, state)
    }

    pub fn get_command_names(&self) -> Vec<String> {
        let mut names = self.registry.get_command_names();
        names.push("help".to_string());
        names.sort();
        names
    }

    fn help_text(&self) -> String {
        let mut lines = vec![style("Available Commands").bold().underlined().to_string()];
        lines.push("/help - Show available commands".to_string());
        lines.extend(self.registry.help_lines().into_iter().map(str::to_string));
        lines.join("\n")
    }
}

pub fn create_command_registry() -> CommandDispatcher {
    let mut registry = CommandRegistry::new();

    registry.register("quit", QuitCommand);
    registry.register("new", NewCommand);
    registry.register("list", ListCommand);
    registry.register("switch", SwitchCommand);
    registry.register("delete", DeleteCommand);
    registry.register("clear", ClearCommand);
    registry.register("show", ShowCommand);
    registry.register("greet", GreetCommand);

    CommandDispatcher::new(Arc::new(registry))
}
