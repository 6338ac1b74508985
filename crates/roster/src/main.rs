use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use roster_client::HttpUserApi;
use roster_config::{get_config_path, get_log_path, parse_base_url, Config};
use roster_form::{FormController, FormError, SubmitOutcome};
use roster_output::*;
use roster_types::{Field, PageSize, SortColumn, SortDirection, SubmitMode};
use serde_json::json;
use tracing::info;

mod logging;
mod shell;

const MAIN_HELP: &str = r#"Roster is a command line client for a user-record API. It lists, adds,
edits and deletes users (first name, last name, email, phone).

Before anything is sent, names, emails and phone numbers are checked against
the current list without regard to case, and duplicates are rejected.

`roster list` shows a page of the user table. `roster shell` opens an
interactive form that keeps a draft between commands, like filling in the form
field by field.

Request failures are written to the log file; see `roster config` for paths.

See `roster COMMAND --help` for more documentation and command-specific options."#;

#[derive(Parser)]
#[command(name = "roster")]
#[command(about = MAIN_HELP)]
#[command(version)]
struct Cli {
    #[arg(long, global = true, help = "Output as JSON")]
    json: bool,

    #[arg(
        long,
        global = true,
        env = "ROSTER_API_URL",
        help = "Base URL of the user API (overrides the config file)"
    )]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Show a page of the user table.")]
    List {
        #[arg(short = 'p', long, default_value_t = 1, help = "Page number, starting at 1")]
        page: usize,
        #[arg(short = 's', long, help = "Rows per page: 5, 10, 20 or 50")]
        page_size: Option<PageSize>,
        #[arg(long, help = "Sort by first-name, last-name or email")]
        sort: Option<SortColumn>,
        #[arg(long, requires = "sort", help = "Sort descending")]
        desc: bool,
    },

    #[command(about = "Add a user. All four fields are required.")]
    Add {
        #[command(flatten)]
        fields: FieldArgs,
    },

    #[command(about = "Edit a user. Fields not given keep their current value.")]
    Edit {
        #[arg(help = "Id of the user to edit")]
        id: String,
        #[command(flatten)]
        fields: FieldArgs,
    },

    #[command(about = "Delete a user.")]
    Delete {
        #[arg(help = "Id of the user to delete")]
        id: String,
    },

    #[command(about = "Open an interactive form session.")]
    Shell,

    #[command(about = "Print config file location and contents.")]
    Config,

    #[command(about = "Print help for all commands.")]
    HelpAll,
}

#[derive(Args)]
struct FieldArgs {
    #[arg(long, help = "First name")]
    first_name: Option<String>,
    #[arg(long, help = "Last name")]
    last_name: Option<String>,
    #[arg(long, help = "Email address")]
    email: Option<String>,
    #[arg(long, help = "Phone number")]
    phone: Option<String>,
}

impl FieldArgs {
    fn values(self) -> [(Field, Option<String>); 4] {
        [
            (Field::FirstName, self.first_name),
            (Field::LastName, self.last_name),
            (Field::Email, self.email),
            (Field::Phone, self.phone),
        ]
    }

    fn apply(self, form: &mut FormController<HttpUserApi>) {
        for (field, value) in self.values() {
            if let Some(value) = value {
                form.update_field(field, value);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Config => handle_config(),
        Commands::HelpAll => handle_help_all(),
        command => {
            let config = Config::load()?;
            logging::init(&config)?;
            let mut form = FormController::new(build_api(&config, cli.api_url.as_deref())?);
            info!("Using user API at {}", form.api().base_url());

            match command {
                Commands::List {
                    page,
                    page_size,
                    sort,
                    desc,
                } => handle_list(&config, &mut form, cli.json, page, page_size, sort, desc).await,
                Commands::Add { fields } => handle_add(&mut form, cli.json, fields).await,
                Commands::Edit { id, fields } => handle_edit(&mut form, cli.json, id, fields).await,
                Commands::Delete { id } => handle_delete(&mut form, cli.json, id).await,
                Commands::Shell => shell::run(&config, &mut form).await,
                Commands::Config | Commands::HelpAll => Ok(()),
            }
        }
    }
}

fn build_api(config: &Config, api_url: Option<&str>) -> Result<HttpUserApi> {
    let base_url = match api_url {
        Some(url) => parse_base_url(url)?,
        None => config.base_url()?,
    };
    Ok(HttpUserApi::with_timeout(base_url, config.request_timeout())?)
}

/// API failures are already in the log; point the user there.
fn report(err: FormError) -> anyhow::Error {
    match err {
        FormError::Api(e) => anyhow!(
            "{}\n\nFull logs: {}",
            e,
            get_log_path().display()
        ),
        other => anyhow!("{}", other),
    }
}

fn handle_help_all() -> Result<()> {
    use clap::CommandFactory;

    let mut cmd = Cli::command();

    cmd.write_long_help(&mut std::io::stdout())?;
    println!("\n");

    let subcommands: Vec<_> = cmd
        .get_subcommands()
        .map(|c| c.get_name().to_string())
        .collect();
    for name in subcommands {
        if name == "help-all" || name == "help" {
            continue;
        }
        let mut subcmd = Cli::command();
        if let Some(sub) = subcmd.find_subcommand_mut(&name) {
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
            println!("roster {}", name);
            println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
            sub.write_long_help(&mut std::io::stdout())?;
            println!("\n");
        }
    }

    Ok(())
}

fn handle_config() -> Result<()> {
    let config_path = get_config_path();
    println!("Config file: {}", config_path.display());
    println!("Log file: {}", get_log_path().display());
    println!();

    if config_path.exists() {
        println!("{}", std::fs::read_to_string(&config_path)?);
    } else {
        println!("(file does not exist, using defaults)");
    }
    Ok(())
}

async fn handle_list(
    config: &Config,
    form: &mut FormController<HttpUserApi>,
    json_output: bool,
    page: usize,
    page_size: Option<PageSize>,
    sort: Option<SortColumn>,
    desc: bool,
) -> Result<()> {
    form.load().await.map_err(|e| report(e.into()))?;

    let mut view = TableView::new(page_size.unwrap_or(config.table.page_size));
    view.page = page;
    if let Some(column) = sort {
        let direction = if desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        view.sort_by(column, direction);
    }

    let page = view.render(form.users());
    if json_output {
        println!("{}", serde_json::to_string_pretty(&page)?);
    } else {
        println!("{}", format_users_page(&page, view.sort));
    }
    Ok(())
}

async fn handle_add(
    form: &mut FormController<HttpUserApi>,
    json_output: bool,
    fields: FieldArgs,
) -> Result<()> {
    form.load().await.map_err(|e| report(e.into()))?;
    fields.apply(form);

    let outcome = form.submit().await.map_err(report)?;
    print_outcome(form, json_output, &outcome)
}

async fn handle_edit(
    form: &mut FormController<HttpUserApi>,
    json_output: bool,
    id: String,
    fields: FieldArgs,
) -> Result<()> {
    form.load().await.map_err(|e| report(e.into()))?;
    form.begin_edit_by_id(&id).map_err(report)?;
    fields.apply(form);

    let outcome = form.submit().await.map_err(report)?;
    print_outcome(form, json_output, &outcome)
}

async fn handle_delete(
    form: &mut FormController<HttpUserApi>,
    json_output: bool,
    id: String,
) -> Result<()> {
    let response = form.delete(&id).await.map_err(report)?;
    if json_output {
        let result = json!({"deleted": id, "response": response});
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("User deleted: {}", id);
    }
    Ok(())
}

fn print_outcome(
    form: &FormController<HttpUserApi>,
    json_output: bool,
    outcome: &SubmitOutcome,
) -> Result<()> {
    if json_output {
        let result = json!({
            "mode": outcome.mode,
            "id": outcome.id,
            "user": form.find(&outcome.id),
            "response": outcome.response,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", success_notice(outcome.mode));
    if let Some(user) = form.find(&outcome.id) {
        println!("{}", format_user(user));
    } else {
        println!("ID  {}", outcome.id);
    }
    Ok(())
}

pub(crate) fn success_notice(mode: SubmitMode) -> &'static str {
    match mode {
        SubmitMode::Create => "User added",
        SubmitMode::Update => "User updated",
    }
}
