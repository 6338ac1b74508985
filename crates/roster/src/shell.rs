use std::io::Write;

use anyhow::Result;
use roster_client::HttpUserApi;
use roster_config::{get_log_path, Config};
use roster_form::{FormController, FormError};
use roster_output::{format_draft, format_users_page, TableView};
use roster_types::{Field, PageSize, SortColumn, SortDirection, SubmitMode};
use tokio::io::{AsyncBufReadExt, BufReader};

const SHELL_HELP: &str = r#"Commands:
  set FIELD VALUE        Set a draft field (first_name, last_name, email, phone)
  edit ID                Load a user into the draft for editing
  submit                 Add the draft, or update the user being edited
  clear                  Empty the draft and leave edit mode
  draft                  Show the draft
  delete ID              Delete a user
  list [PAGE]            Show the table, optionally jumping to PAGE
  sort COLUMN [asc|desc] Sort by first-name, last-name or email
  page-size N            Rows per page: 5, 10, 20 or 50
  reload                 Fetch the list again
  help                   Show this help
  quit                   Leave the shell"#;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Set(Field, String),
    Edit(String),
    Submit,
    Clear,
    Draft,
    Delete(String),
    List(Option<usize>),
    Sort(SortColumn, SortDirection),
    PageSize(PageSize),
    Reload,
    Help,
    Quit,
}

/// Returns `Ok(None)` for blank lines.
pub fn parse_command(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word {
        "set" => {
            let (field, value) = match rest.split_once(char::is_whitespace) {
                Some((field, value)) => (field, value.trim()),
                None => (rest, ""),
            };
            if field.is_empty() {
                return Err("Usage: set FIELD VALUE".to_string());
            }
            let field: Field = field.parse().map_err(|e| format!("{}", e))?;
            ShellCommand::Set(field, value.to_string())
        }
        "edit" => ShellCommand::Edit(required_arg(rest, "edit ID")?),
        "delete" => ShellCommand::Delete(required_arg(rest, "delete ID")?),
        "submit" => ShellCommand::Submit,
        "clear" => ShellCommand::Clear,
        "draft" => ShellCommand::Draft,
        "list" => {
            if rest.is_empty() {
                ShellCommand::List(None)
            } else {
                let page = rest
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid page number '{}'", rest))?;
                ShellCommand::List(Some(page))
            }
        }
        "sort" => {
            let mut parts = rest.split_whitespace();
            let column: SortColumn = parts
                .next()
                .ok_or_else(|| "Usage: sort COLUMN [asc|desc]".to_string())?
                .parse()
                .map_err(|e| format!("{}", e))?;
            let direction = match parts.next() {
                None | Some("asc") => SortDirection::Asc,
                Some("desc") => SortDirection::Desc,
                Some(other) => return Err(format!("Invalid direction '{}' (asc or desc)", other)),
            };
            ShellCommand::Sort(column, direction)
        }
        "page-size" => {
            let size: PageSize = required_arg(rest, "page-size N")?
                .parse()
                .map_err(|e| format!("{}", e))?;
            ShellCommand::PageSize(size)
        }
        "reload" => ShellCommand::Reload,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("Unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

fn required_arg(rest: &str, usage: &str) -> Result<String, String> {
    if rest.is_empty() {
        Err(format!("Usage: {}", usage))
    } else {
        Ok(rest.to_string())
    }
}

fn validation_message(err: &FormError, mode: SubmitMode) -> String {
    let action = match mode {
        SubmitMode::Create => "add",
        SubmitMode::Update => "update",
    };
    format!("{}. Cannot {} user.", err, action)
}

fn request_failed() {
    eprintln!("Request failed, details in {}", get_log_path().display());
}

pub async fn run(config: &Config, form: &mut FormController<HttpUserApi>) -> Result<()> {
    let mut view = TableView::new(config.table.page_size);

    println!("Connected to {}. Type 'help' for commands.", form.api().base_url());
    if form.load().await.is_err() {
        request_failed();
    }
    println!("{}\n", format_users_page(&view.render(form.users()), view.sort));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}> ", form.draft().mode().button_label().to_lowercase());
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };

        match command {
            ShellCommand::Quit => break,
            ShellCommand::Help => println!("{}", SHELL_HELP),
            ShellCommand::Set(field, value) => form.update_field(field, value),
            ShellCommand::Draft => println!("{}", format_draft(form.draft())),
            ShellCommand::Clear => {
                form.clear_draft();
                println!("{}", format_draft(form.draft()));
            }
            ShellCommand::Edit(id) => match form.begin_edit_by_id(&id) {
                Ok(()) => println!("{}", format_draft(form.draft())),
                Err(e) => eprintln!("{}", e),
            },
            ShellCommand::Submit => {
                let mode = form.draft().mode();
                match form.submit().await {
                    Ok(outcome) => {
                        println!("{}: {}", crate::success_notice(outcome.mode), outcome.id);
                        println!("{}", format_users_page(&view.render(form.users()), view.sort));
                    }
                    Err(FormError::Api(_)) => request_failed(),
                    Err(e) => eprintln!("{}", validation_message(&e, mode)),
                }
            }
            ShellCommand::Delete(id) => match form.delete(&id).await {
                Ok(_) => {
                    println!("User deleted: {}", id);
                    println!("{}", format_users_page(&view.render(form.users()), view.sort));
                }
                Err(FormError::Api(_)) => request_failed(),
                Err(e) => eprintln!("{}", e),
            },
            ShellCommand::List(page) => {
                if let Some(page) = page {
                    view.page = page;
                }
                let rendered = view.render(form.users());
                view.page = rendered.page;
                println!("{}", format_users_page(&rendered, view.sort));
            }
            ShellCommand::Sort(column, direction) => {
                view.sort_by(column, direction);
                println!("{}", format_users_page(&view.render(form.users()), view.sort));
            }
            ShellCommand::PageSize(size) => {
                view.set_page_size(size);
                println!("{}", format_users_page(&view.render(form.users()), view.sort));
            }
            ShellCommand::Reload => {
                if form.load().await.is_err() {
                    request_failed();
                }
                println!("{}", format_users_page(&view.render(form.users()), view.sort));
            }
        }
    }

    Ok(())
}
