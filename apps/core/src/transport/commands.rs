//! Bot commands shared by all transports.

/// What an incoming text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Status,
    /// Any other `/command`; transports ignore these.
    Unknown(String),
    /// A question for the assistant.
    Text(String),
}

/// Parses `/start`, `/status` (optionally addressed as `/status@botname`) or plain text.
pub fn parse(text: &str) -> Command {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Command::Text(text.to_string());
    };

    let word = rest.split_whitespace().next().unwrap_or("");
    let name = word.split('@').next().unwrap_or("").to_lowercase();
    match name.as_str() {
        "start" => Command::Start,
        "status" => Command::Status,
        _ => Command::Unknown(name),
    }
}

pub fn start_greeting(first_name: &str) -> String {
    format!(
        "👋 Привет, {}!\n\n\
         🧠 **Умный ИИ-помощник**\n\n\
         ✨ *Что я умею:*\n\
         • 🔢 Решать математические задачи\n\
         • 📚 Искать информацию в Wikipedia\n\
         • 💡 Давать ответы с источниками\n\n\
         **Просто задайте вопрос!**\n\n\
         *Примеры:*\n\
         • 'сколько будет 15% от 200'\n\
         • 'что такое искусственный интеллект'\n\
         • 'реши уравнение 2x + 5 = 15'",
        first_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse("/start"), Command::Start);
        assert_eq!(parse("  /status  "), Command::Status);
        assert_eq!(parse("/status@smart_bot"), Command::Status);
        assert_eq!(parse("/START"), Command::Start);
        assert_eq!(parse("/help me"), Command::Unknown("help".to_string()));
    }

    #[test]
    fn test_plain_text_is_kept_verbatim() {
        // The cache keys on exact text, so nothing is trimmed here.
        assert_eq!(parse(" 2+2 "), Command::Text(" 2+2 ".to_string()));
        assert_eq!(parse("10 / 2"), Command::Text("10 / 2".to_string()));
    }

    #[test]
    fn test_greeting_mentions_user() {
        let greeting = start_greeting("Анна");
        assert!(greeting.starts_with("👋 Привет, Анна!"));
        assert!(greeting.contains("реши уравнение 2x + 5 = 15"));
    }
}
