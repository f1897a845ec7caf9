//! Display text for the forecast view.

use tenki_core::AppError;
use tenki_jma::{AreaDirectory, ForecastEntry};

pub const APP_TITLE: &str = "気象庁 天気予報アプリ";
pub const AREA_PROMPT: &str = "地域を選択してください";
pub const LOAD_AREAS_LABEL: &str = "地域リストを読み込む";

/// Prefix for failures while loading the area list.
pub const AREA_LIST_ERROR_LABEL: &str = "地域リストの取得中にエラーが発生しました";
/// Prefix for failures while fetching or reading forecasts.
pub const FORECAST_ERROR_LABEL: &str = "天気予報の取得中にエラーが発生しました";

const FORECAST_HEADER: &str = "天気予報:";
const NO_FORECAST_DATA: &str = "該当する予報はありません";

/// Header line followed by one `date: weather` line per entry.
pub fn render_forecast(entries: &[ForecastEntry]) -> String {
    let mut text = String::from(FORECAST_HEADER);
    text.push('\n');

    if entries.is_empty() {
        text.push_str(NO_FORECAST_DATA);
        text.push('\n');
        return text;
    }

    for entry in entries {
        text.push_str(&format!("{}: {}\n", entry.date, entry.weather));
    }
    text
}

pub fn render_error(label: &str, err: &AppError) -> String {
    format!("{}: {} ({})", label, err.user_message(), err)
}

pub fn render_store_disabled() -> String {
    "ローカル保存が無効のため、保存済みの地域はありません".to_string()
}

pub fn render_areas_loaded(count: usize) -> String {
    format!("{} 件の地域を読み込みました。{}", count, AREA_PROMPT)
}

/// One `code name` line per area, in code order.
pub fn render_area_options(areas: &AreaDirectory) -> String {
    if areas.is_empty() {
        return format!("地域がありません。「{}」を実行してください。\n", LOAD_AREAS_LABEL);
    }

    areas
        .iter()
        .map(|(code, name)| format!("{} {}\n", code, name))
        .collect()
}
