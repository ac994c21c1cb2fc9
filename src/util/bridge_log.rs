// Defines the type of logs
// https://stackoverflow.com/questions/69015213/how-can-i-display-an-enum-in-lowercase
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum (serialize_all = "UPPERCASE")]
pub enum LogTypes {
    Info,
    Warning,
    Error,
    Debug
}

// Defines where the logs can come from
#[derive (Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum (serialize_all = "UPPERCASE")]
pub enum LogSources {
    Bridge,
    Lexer,
    Parser,
    SymbolTable,
    CodeGenerator
}

impl LogSources {
    // The log target used for filtering by the installed logger
    pub fn target(&self) -> &'static str {
        return match self {
            LogSources::Bridge => "javabridge::bridge",
            LogSources::Lexer => "javabridge::lexer",
            LogSources::Parser => "javabridge::parser",
            LogSources::SymbolTable => "javabridge::symbol_table",
            LogSources::CodeGenerator => "javabridge::code_generator"
        };
    }
}

impl From<LogTypes> for log::Level {
    fn from(log_type: LogTypes) -> Self {
        return match log_type {
            LogTypes::Info => log::Level::Info,
            LogTypes::Warning => log::Level::Warn,
            LogTypes::Error => log::Level::Error,
            LogTypes::Debug => log::Level::Debug
        };
    }
}

// Builds the line that gets logged
pub fn format_log(log_type: LogTypes, src: LogSources, msg: &str) -> String {
    return format!("[{} - {}]: {}", log_type, src, msg);
}

// Function that logs a message with the given type and source
pub fn log(log_type: LogTypes, src: LogSources, msg: String) {
    let level: log::Level = log_type.into();

    // Debug output is the verbose mode, so skip building the string when nobody listens
    if log::log_enabled!(target: src.target(), level) {
        log::log!(target: src.target(), level, "{}", format_log(log_type, src, &msg));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_lines_name_type_and_source() {
        assert_eq!(format_log(LogTypes::Warning, LogSources::SymbolTable, "x is unused"), "[WARNING - SYMBOLTABLE]: x is unused");
        assert_eq!(format_log(LogTypes::Info, LogSources::Bridge, "done"), "[INFO - BRIDGE]: done");
    }

    #[test]
    fn log_types_map_to_levels() {
        assert_eq!(log::Level::from(LogTypes::Warning), log::Level::Warn);
        assert_eq!(log::Level::from(LogTypes::Debug), log::Level::Debug);
    }
}
