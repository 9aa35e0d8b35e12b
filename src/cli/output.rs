use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    pub pretty: bool,
    pub use_color: bool,
}

/// Resolve colour use from the configured mode (`auto|always|never`) and the
/// `--no-color` flag.
pub fn detect_color(mode: &str, color_flag: bool) -> bool {
    if !color_flag {
        return false;
    }
    match mode {
        "always" => true,
        "never" => false,
        _ => std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal(),
    }
}
