use api_client::{BillingApi, HttpBillingClient};
use clap::{Args, Parser, Subcommand};
use configuration::LogLevel;
use form::{ClientForm, FieldChanges};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

mod form;
mod render;
#[cfg(test)]
mod testing;

/// The main entry point for the billdesk admin tool.
#[tokio::main]
async fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Billing and invoicing admin tool: serves the REST API and drives it from the terminal.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (default: ./billdesk.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the billing API, overriding `client.api_url`.
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Overrides the configured log level.
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the REST API server.
    Serve,
    /// List all clients.
    Clients,
    /// Look a client up by id and print it as JSON.
    Show {
        /// The client id.
        id: String,
    },
    /// Register a new client.
    Create(CreateArgs),
    /// Edit a client; fields that are not given keep their current value.
    Edit {
        id: i32,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete a client after confirmation.
    Delete {
        id: i32,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// List invoices with an outstanding balance.
    Invoices,
    /// Show the client list and the pending invoices together.
    Dashboard,
    /// Total amount paid by each customer.
    Totals,
    /// Transactions settled through a payment platform (e.g. "Nequi").
    Platform { name: String },
}

#[derive(Args)]
struct CreateArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    identification: String,
    #[arg(long, default_value = "")]
    address: String,
    #[arg(long, default_value = "")]
    phone: String,
    #[arg(long, default_value = "")]
    email: String,
}

#[derive(Args)]
struct EditArgs {
    #[arg(long)]
    name: Option<String>,
    #[arg(long)]
    identification: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl From<CreateArgs> for FieldChanges {
    fn from(args: CreateArgs) -> Self {
        FieldChanges {
            customer_name: Some(args.name),
            identification: Some(args.identification),
            address: Some(args.address),
            phone_number: Some(args.phone),
            email: Some(args.email),
        }
    }
}

impl From<EditArgs> for FieldChanges {
    fn from(args: EditArgs) -> Self {
        FieldChanges {
            customer_name: args.name,
            identification: args.identification,
            address: args.address,
            phone_number: args.phone,
            email: args.email,
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = configuration::load_config(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    if let Some(api_url) = cli.api_url {
        config.client.api_url = api_url;
    }
    let _guard = configuration::init_tracing(&config.logging)?;

    if let Commands::Serve = cli.command {
        return web_server::run_server(&config).await;
    }

    let api = HttpBillingClient::new(&config.client)?;
    tracing::debug!(api_url = %config.client.api_url, "Using billing API.");
    let output = execute(cli.command, &api, &mut confirm_on_stdin).await?;
    println!("{output}");
    Ok(())
}

fn confirm_on_stdin(prompt: &str) -> bool {
    eprint!("{prompt} [y/N] ");
    let _ = std::io::stderr().flush();
    let mut answer = String::new();
    if std::io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim(), "y" | "Y" | "yes")
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Runs one admin command against `api` and returns what should be printed.
async fn execute(
    command: Commands,
    api: &dyn BillingApi,
    confirm: &mut dyn FnMut(&str) -> bool,
) -> anyhow::Result<String> {
    match command {
        Commands::Serve => anyhow::bail!("`serve` does not talk to the API"),
        Commands::Clients => Ok(render::clients(&api.list_clients().await?)),
        Commands::Show { id } => search_client(api, &id).await,
        Commands::Create(args) => {
            let mut form = ClientForm::new();
            form.apply(args.into());
            submit_and_refresh(&mut form, api).await
        }
        Commands::Edit { id, changes } => {
            let Some(client) = api.get_client(id).await? else {
                anyhow::bail!("Client not found.");
            };
            let mut form = ClientForm::new();
            form.load(&client);
            form.apply(changes.into());
            submit_and_refresh(&mut form, api).await
        }
        Commands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete customer {id}?")) {
                return Ok("Deletion cancelled.".to_string());
            }
            let deleted = api.delete_client(id).await?;
            let clients = api.list_clients().await?;
            Ok(format!("{}\n{}", deleted.message, render::clients(&clients)))
        }
        Commands::Invoices => Ok(render::pending_invoices(&api.pending_invoices().await?)),
        Commands::Dashboard => dashboard(api).await,
        Commands::Totals => Ok(render::totals(&api.total_paid_by_customer().await?)),
        Commands::Platform { name } => Ok(render::platform_transactions(
            &api.transactions_by_platform(&name).await?,
        )),
    }
}

async fn search_client(api: &dyn BillingApi, id: &str) -> anyhow::Result<String> {
    let Ok(id) = id.trim().parse::<i32>() else {
        return Ok("Please enter a valid ID.".to_string());
    };
    match api.get_client(id).await? {
        Some(client) => Ok(serde_json::to_string_pretty(&client)?),
        None => Ok("Client not found.".to_string()),
    }
}

async fn submit_and_refresh(form: &mut ClientForm, api: &dyn BillingApi) -> anyhow::Result<String> {
    let outcome = form.submit(api).await?;
    let clients = api.list_clients().await?;
    Ok(format!(
        "{} (id {})\n{}",
        outcome.message(),
        outcome.id_client(),
        render::clients(&clients)
    ))
}

/// Both lists are fetched concurrently; a failure in one does not hide the other.
/// Fails only when neither list could be fetched.
async fn dashboard(api: &dyn BillingApi) -> anyhow::Result<String> {
    let (clients, invoices) = tokio::join!(api.list_clients(), api.pending_invoices());
    if let (Err(clients_err), Err(invoices_err)) = (&clients, &invoices) {
        anyhow::bail!(
            "Error fetching clients: {clients_err}; error fetching pending invoices: {invoices_err}"
        );
    }
    let clients = match clients {
        Ok(clients) => render::clients(&clients),
        Err(e) => format!("Error fetching clients: {e}"),
    };
    let invoices = match invoices {
        Ok(invoices) => render::pending_invoices(&invoices),
        Err(e) => format!("Error fetching pending invoices: {e}"),
    };
    Ok(format!("Clients\n{clients}\n\nPending invoices\n{invoices}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockApi;
    use core_types::{Client, PendingInvoice};
    use rust_decimal_macros::dec;

    fn ana() -> Client {
        Client {
            id_client: 1,
            customer_name: "Ana".to_string(),
            identification: "123".to_string(),
            address: String::new(),
            phone_number: String::new(),
            email: String::new(),
        }
    }

    async fn run_command(command: Commands, api: &MockApi) -> String {
        execute(command, api, &mut |_| false).await.unwrap()
    }

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn create_requires_name_and_identification() {
        assert!(Cli::try_parse_from(["billdesk", "create", "--name", "Ana"]).is_err());
        assert!(
            Cli::try_parse_from(["billdesk", "create", "--name", "Ana", "--identification", "1"])
                .is_ok()
        );
    }

    #[tokio::test]
    async fn search_rejects_blank_and_non_numeric_ids() {
        let api = MockApi::default();
        for id in ["", "   ", "abc"] {
            let out = run_command(Commands::Show { id: id.to_string() }, &api).await;
            assert_eq!(out, "Please enter a valid ID.");
        }
    }

    #[tokio::test]
    async fn search_prints_json_or_not_found() {
        let api = MockApi::with_clients(vec![ana()]);
        let found = run_command(Commands::Show { id: " 1 ".to_string() }, &api).await;
        let json: serde_json::Value = serde_json::from_str(&found).unwrap();
        assert_eq!(json["customer_name"], "Ana");

        let missing = run_command(Commands::Show { id: "2".to_string() }, &api).await;
        assert_eq!(missing, "Client not found.");
    }

    #[tokio::test]
    async fn create_reports_and_refreshes_the_list() {
        let api = MockApi::default();
        let out = run_command(
            Commands::Create(CreateArgs {
                name: "Luis".to_string(),
                identification: "456".to_string(),
                address: String::new(),
                phone: String::new(),
                email: String::new(),
            }),
            &api,
        )
        .await;
        assert!(out.starts_with("Customer created successfully (id 1)"));
        assert!(out.contains("Luis"));
    }

    #[tokio::test]
    async fn edit_keeps_fields_that_were_not_given() {
        let api = MockApi::with_clients(vec![ana()]);
        run_command(
            Commands::Edit {
                id: 1,
                changes: EditArgs {
                    name: None,
                    identification: None,
                    address: None,
                    phone: None,
                    email: Some("ana@example.com".to_string()),
                },
            },
            &api,
        )
        .await;
        let client = &api.clients().await[0];
        assert_eq!(client.email, "ana@example.com");
        assert_eq!(client.identification, "123");
    }

    #[tokio::test]
    async fn edit_of_unknown_client_fails() {
        let api = MockApi::default();
        let err = execute(
            Commands::Edit {
                id: 5,
                changes: EditArgs {
                    name: Some("X".to_string()),
                    identification: None,
                    address: None,
                    phone: None,
                    email: None,
                },
            },
            &api,
            &mut |_| true,
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Client not found.");
    }

    #[tokio::test]
    async fn declined_delete_leaves_the_client() {
        let api = MockApi::with_clients(vec![ana()]);
        let mut asked = Vec::new();
        let out = execute(
            Commands::Delete { id: 1, yes: false },
            &api,
            &mut |prompt| {
                asked.push(prompt.to_string());
                false
            },
        )
        .await
        .unwrap();
        assert_eq!(out, "Deletion cancelled.");
        assert_eq!(asked, ["Delete customer 1?"]);
        assert_eq!(api.clients().await.len(), 1);
    }

    #[tokio::test]
    async fn confirmed_delete_refreshes_the_list() {
        let api = MockApi::with_clients(vec![ana()]);
        let out = run_command(Commands::Delete { id: 1, yes: true }, &api).await;
        assert_eq!(out, format!("Customer deleted\n{}", render::NO_CLIENTS));
    }

    #[tokio::test]
    async fn dashboard_shows_each_list_independently() {
        let api = MockApi {
            invoices_down: true,
            ..MockApi::with_clients(vec![ana()])
        };
        let out = run_command(Commands::Dashboard, &api).await;
        assert!(out.contains("Ana"));
        assert!(out.contains("Error fetching pending invoices"));
    }

    #[tokio::test]
    async fn dashboard_fails_when_both_lists_are_down() {
        let api = MockApi {
            clients_down: true,
            invoices_down: true,
            ..MockApi::default()
        };
        let err = execute(Commands::Dashboard, &api, &mut |_| false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Error fetching clients"));
        assert!(err.to_string().contains("pending invoices"));
    }

    #[tokio::test]
    async fn invoices_render_pending_amounts() {
        let api = MockApi {
            invoices: vec![PendingInvoice {
                id_billing: 9,
                customer_name: "Ana".to_string(),
                identification: "123".to_string(),
                phone_number: String::new(),
                email: String::new(),
                id_transaction: 2,
                date_time: chrono::NaiveDate::from_ymd_opt(2024, 6, 3)
                    .unwrap()
                    .and_hms_opt(8, 0, 0)
                    .unwrap(),
                transaction_amount: dec!(80),
                invoice_amount: dec!(80),
                amount_paid: dec!(30),
                pending_amount: dec!(50),
            }],
            ..MockApi::default()
        };
        let out = run_command(Commands::Invoices, &api).await;
        assert!(out.contains("$50.00"));

        let empty = run_command(Commands::Platform { name: "none".to_string() }, &api).await;
        assert_eq!(empty, render::NO_TRANSACTIONS);
    }
}
