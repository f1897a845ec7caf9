//! Commands accepted by the terminal front end, one per input line.

use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Fetch the area directory.
    LoadAreas,
    /// Read the area list from the local store.
    LoadCachedAreas,
    /// Print the current area options.
    ListAreas,
    /// Select an area and fetch its forecast.
    Select(String),
    /// Re-fetch the forecast for the selected area.
    Fetch,
    /// Filter stored forecasts by date; `None` clears the filter.
    Date(Option<String>),
    /// Print stored dates for the selected area.
    Dates,
    /// Print the display text again.
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),
}

pub const HELP: &str = "\
load            地域リストを読み込む
cached          保存済みの地域リストを読み込む
list            地域の一覧を表示
select <code>   地域を選択して天気予報を取得
fetch           選択中の地域の天気予報を再取得
date [date]     保存済みの予報を日付で絞り込む (省略で解除)
dates           保存済みの日付を表示
show            表示内容を再表示
help            このヘルプを表示
quit            終了";

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(CommandError::Empty);
        };
        let arg = parts.next().map(str::to_string);

        match name.to_lowercase().as_str() {
            "load" | "areas" => Ok(Self::LoadAreas),
            "cached" => Ok(Self::LoadCachedAreas),
            "list" | "ls" => Ok(Self::ListAreas),
            "select" | "s" => arg
                .map(Self::Select)
                .ok_or(CommandError::MissingArgument("select")),
            "fetch" | "f" => Ok(Self::Fetch),
            "date" | "d" => Ok(Self::Date(arg)),
            "dates" => Ok(Self::Dates),
            "show" => Ok(Self::Show),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}
