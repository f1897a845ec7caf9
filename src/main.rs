use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use tenki_ui::command::HELP;
use tenki_ui::render::{render_area_options, APP_TITLE, AREA_PROMPT};
use tenki_ui::{Command, ForecastController, ViewState};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tenki_core::init()?;

    let mut app = tenki_core::App::new()?;
    let mut controller = ForecastController::from_config(app.config(), app.store_path())?;

    tracing::info!("Tenki started");

    println!("{}", APP_TITLE);
    println!("Config directory: {}", app.config().config_dir.display());
    if !controller.has_store() {
        println!("(store disabled: forecasts are shown without being saved)");
    }
    println!("\n{}\n", HELP);

    // One command at a time; each runs to completion before the next line is read
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&controller);
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::LoadAreas => {
                controller.load_areas().await;
                println!("{}", controller.display_text());
            }
            Command::LoadCachedAreas => {
                controller.load_cached_areas();
                println!("{}", controller.display_text());
            }
            Command::ListAreas => print!("{}", render_area_options(controller.area_options())),
            Command::Select(code) => {
                controller.select_area(&code).await;
                println!("{}", controller.display_text());
            }
            Command::Fetch => {
                controller.fetch_forecast().await;
                println!("{}", controller.display_text());
            }
            Command::Date(date) => {
                controller.select_date(date.as_deref());
                println!("{}", controller.display_text());
            }
            Command::Dates => {
                let dates = controller.stored_dates();
                if !dates.is_empty() {
                    println!("{}", dates.join("\n"));
                } else if let ViewState::Error(message) = controller.state() {
                    println!("{}", message);
                } else {
                    println!("保存済みの日付はありません");
                }
            }
            Command::Show => println!("{}", controller.display_text()),
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }

    app.shutdown()?;

    Ok(())
}

fn print_prompt(controller: &ForecastController) {
    match controller.selected_area() {
        Some(code) => {
            let name = controller
                .area_options()
                .get(code)
                .map(String::as_str)
                .unwrap_or(code);
            println!("[{}]", name);
        }
        None => println!("[{}]", AREA_PROMPT),
    }
}
