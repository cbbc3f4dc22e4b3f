//! Input parsing for the text menu.
//!
//! All parsing happens before any catalog call, so rejected input never
//! reaches the store.

use booklog_core::SearchField;

/// Top-level menu entries, numbered as displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    Remove,
    Search,
    List,
    Statistics,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 6] = [
        Self::Add,
        Self::Remove,
        Self::Search,
        Self::List,
        Self::Statistics,
        Self::Exit,
    ];

    pub fn parse(input: &str) -> Option<Self> {
        match input.trim() {
            "1" => Some(Self::Add),
            "2" => Some(Self::Remove),
            "3" => Some(Self::Search),
            "4" => Some(Self::List),
            "5" => Some(Self::Statistics),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            Self::Add => 1,
            Self::Remove => 2,
            Self::Search => 3,
            Self::List => 4,
            Self::Statistics => 5,
            Self::Exit => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Add => "Add a book",
            Self::Remove => "Remove a book",
            Self::Search => "Search for a book",
            Self::List => "Display all books",
            Self::Statistics => "Display statistics",
            Self::Exit => "Exit",
        }
    }

    /// Short name used in log events.
    pub fn action(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Search => "search",
            Self::List => "list",
            Self::Statistics => "statistics",
            Self::Exit => "exit",
        }
    }
}

/// Parses a publication year; any whole number is accepted.
pub fn parse_year(input: &str) -> Result<i64, String> {
    let trimmed = input.trim();
    trimmed
        .parse::<i64>()
        .map_err(|_| format!("Invalid year `{trimmed}`: please enter a whole number."))
}

/// `yes` or `y` (any case) means read; every other answer means unread.
pub fn parse_read_answer(input: &str) -> bool {
    matches!(input.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}

/// `1` selects title search, `2` selects author search.
pub fn parse_search_mode(input: &str) -> Option<SearchField> {
    match input.trim() {
        "1" => Some(SearchField::Title),
        "2" => Some(SearchField::Author),
        _ => None,
    }
}
