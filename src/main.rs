use std::{
    io::{self, Write},
    path::PathBuf,
};

use clap::Parser;
use eyre::eyre;

use stock_picker::analysis::{analyze, validate_format};
use stock_picker::loader::{SpaceDelimitedLoader, StockDataLoader};
use stock_picker::model::{StockTable, DATE_FORMAT};
use stock_picker::suggest::{CloseMatchSuggester, SymbolSuggester};

/// Process stocks and return insights.
#[derive(Parser)]
struct Args {
    /// Path to the space-delimited data file
    csv_file_path: PathBuf,

    /// Print the result bundle as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn prompt(message: &str) -> eyre::Result<String> {
    print!("{message}");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_owned())
}

fn pick_stock(stocks: &StockTable) -> eyre::Result<String> {
    let suggester = CloseMatchSuggester::default();
    let mut name = prompt("Welcome Agent! Which stock you need to process?:- ")?;

    loop {
        if stocks.contains_key(&name) {
            return Ok(name);
        }

        let candidates = stocks.keys().map(String::as_str).collect::<Vec<_>>();
        match suggester.suggest(&name, &candidates) {
            Some(probable) => {
                let mut response = prompt(&format!("Oops! Do you mean {probable} (y or n) :- "))?;
                while !matches!(response.to_lowercase().as_str(), "y" | "n") {
                    response = prompt("please input (y or n) :- ")?;
                }

                if response.eq_ignore_ascii_case("y") {
                    return Ok(probable);
                }
                name = prompt("Please enter which stock to process:- ")?;
            }
            None => {
                name = prompt("Stock not exists!! Please enter which stock to process:- ")?;
            }
        }
    }
}

fn prompt_date(first: &str, retry: &str) -> eyre::Result<String> {
    let mut date = prompt(first)?;
    while !validate_format(&date) {
        date = prompt(retry)?;
    }
    Ok(date)
}

fn main() -> eyre::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let stocks = SpaceDelimitedLoader::load(&args.csv_file_path)?;
    log::info!(
        "loaded {} stocks from {}",
        stocks.len(),
        args.csv_file_path.display()
    );

    let name = pick_stock(&stocks)?;
    let start = prompt_date(
        "From which date you want to start?(DD-MMM-YYYY):- ",
        "Oops! please put in the correct date or format (DD-MMM-YYYY):- ",
    )?;
    let end = prompt_date(
        "Till which date you want to analyze:- ",
        "Oops! please put in the correct date format (DD-MMM-YYYY):- ",
    )?;

    let records = stocks
        .get(&name)
        .ok_or_else(|| eyre!("unknown stock {name}"))?;

    match analyze(records, &start, &end)? {
        Some(result) if args.json => println!("{}", serde_json::to_string_pretty(&result)?),
        Some(result) => println!(
            "Here is your result:- \nmean: {}\nStd: {}\nBuy date: {}\nSell date: {}\nProfit: {}",
            result.mean,
            result.stdev,
            result.buy_date.format(DATE_FORMAT),
            result.sell_date.format(DATE_FORMAT),
            result.profit
        ),
        None => println!(
            "Sorry, fewer than 2 observations exist in the given date range! Please try again"
        ),
    }

    Ok(())
}
