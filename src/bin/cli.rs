#![cfg(not(tarpaulin_include))]

use querychat::reply::extract_query;
use querychat::state::TableState;
use querychat::table::{
    decode_rows, filter_rows, flatten_rows, paginate, rows_for_export, sort_rows, to_csv,
    FlattenedRow,
};
use serde_json::Value;
use std::env;
use std::fs;
use std::io::{self, Write};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <reply.txt> [rows.json]", args[0]);
        return Ok(());
    }

    // Parse the assistant reply into narrative and SQL
    let reply_text = fs::read_to_string(&args[1])?;
    let parsed = extract_query(&reply_text);

    println!("=== Narrative ===");
    println!(
        "{}",
        if parsed.narrative.is_empty() {
            "(none)"
        } else {
            &parsed.narrative
        }
    );

    if !parsed.query.is_empty() {
        println!("\n=== Executed SQL ===");
        println!("{}", parsed.query);
    }

    // Load and flatten the row payload, if one was given
    let rows: Vec<Value> = match args.get(2) {
        Some(path) => {
            let payload: Value = serde_json::from_str(&fs::read_to_string(path)?)?;
            decode_rows(&payload)?
        }
        None => Vec::new(),
    };

    if rows.is_empty() {
        return Ok(());
    }

    let (flattened, columns) = flatten_rows(&rows);
    let mut state = TableState::new(10);

    println!("\n{} rows, {} columns. Type 'help' for commands.", flattened.len(), columns.len());

    loop {
        let visible = shape(&flattened, &columns, &state);
        let page = paginate(&visible, state.page, state.page_size);
        print_page(&page, &columns, &state);

        print!("({} shown, {} selected) > ", visible.len(), state.selected.len());
        io::stdout().flush()?;

        let mut command = String::new();
        if io::stdin().read_line(&mut command).is_err() {
            break;
        }
        let command = command.trim();

        if command.is_empty() {
            continue;
        }

        let (verb, rest) = match command.split_once(' ') {
            Some((v, r)) => (v, r.trim()),
            None => (command, ""),
        };

        match verb {
            "q" => break,
            "help" => {
                println!("Commands:");
                println!("  q: Quit");
                println!("  search <text>: Filter rows (empty to clear)");
                println!("  sort <column>: Cycle column sort asc/desc/off");
                println!("  page <n>: Go to page n (zero-based)");
                println!("  pagesize <n>: Set rows per page");
                println!("  select <n>: Toggle selection of original row n");
                println!("  selectall: Select every visible row");
                println!("  clear: Clear the selection");
                println!("  export [selected]: Print CSV for all or selected rows");
            }
            "search" => state.set_search(rest),
            "sort" => {
                if columns.iter().any(|c| c == rest) {
                    state.toggle_sort(rest);
                } else {
                    println!("Unknown column: {}", rest);
                }
            }
            "page" => state.set_page(rest.parse().unwrap_or(0)),
            "pagesize" => state.set_page_size(rest.parse().unwrap_or(10)),
            "select" => {
                if let Ok(index) = rest.parse() {
                    state.toggle_row(index);
                }
            }
            "selectall" => {
                let indices: Vec<usize> = visible.iter().map(|r| r.original_index).collect();
                state.select_all(indices);
            }
            "clear" => state.clear_selection(),
            "export" => {
                let selected_only = rest == "selected";
                let export = rows_for_export(&flattened, &visible, &state.selected, selected_only);
                if export.is_empty() {
                    println!("Nothing to export.");
                } else {
                    println!("{}", to_csv(&export, &columns));
                }
            }
            _ => println!("Unknown command (try 'help')"),
        }
    }

    Ok(())
}

// Filter then sort with the current view state.
fn shape(rows: &[FlattenedRow], columns: &[String], state: &TableState) -> Vec<FlattenedRow> {
    let filtered = filter_rows(rows, columns, &state.search);
    sort_rows(
        &filtered,
        state.sort.key.as_deref(),
        state.sort.effective_direction(),
    )
}

fn print_page(page: &[FlattenedRow], columns: &[String], state: &TableState) {
    println!();
    println!("  {}", columns.join(" | "));
    for row in page {
        let marker = if state.is_selected(row.original_index) {
            "*"
        } else {
            " "
        };
        let cells: Vec<String> = columns.iter().map(|c| row.display(c)).collect();
        println!("{} {}", marker, cells.join(" | "));
    }
    if page.is_empty() {
        println!("  (no rows on this page)");
    }
}
