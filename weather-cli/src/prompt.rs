use inquire::Text;
use weather_lookup_core::{UserInteraction, WeatherError};

/// Interactive terminal: messages go to stdout, answers come from `inquire`.
#[derive(Debug, Default)]
pub struct TerminalPrompt;

impl UserInteraction for TerminalPrompt {
    fn notify(&mut self, message: &str) {
        println!("{message}");
    }

    fn read_line(&mut self, prompt: &str) -> Result<String, WeatherError> {
        Text::new(prompt).prompt().map_err(|err| WeatherError::Prompt(err.to_string()))
    }
}
