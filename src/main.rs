use anyhow::{Result, bail};
use clap::Parser;
use std::time::Duration;
use todoist_tools::{
    auth::RuntimeContext,
    http::{ClientConfig, DEFAULT_BASE_URL},
    oauth::{StateStore, authorize_url_from_env},
    retry::{RetryPolicy, with_retry},
    runtime::{RealRuntime, Runtime},
    tools::{NewTask, TaskFilter, Toolkit},
};

/// todoist - Todoist tools from the command line
///
/// Credentials are resolved per command: an OAuth token (--oauth-token or
/// TODOIST_OAUTH_TOKEN) wins, otherwise TODOIST_API_TOKEN is used.
///
/// Examples:
///   todoist projects list
///   todoist tasks add "Book flights" --due "tomorrow 5pm" --priority 4
#[derive(Parser, Debug)]
#[command(author, version = env!("TODOIST_TOOLS_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Todoist REST API URL
    #[arg(long = "api-url", value_name = "URL", default_value = DEFAULT_BASE_URL, global = true)]
    api_url: String,

    /// Request timeout in seconds
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    timeout: u64,

    /// Delegated OAuth access token (takes precedence over TODOIST_API_TOKEN)
    #[arg(
        long = "oauth-token",
        env = "TODOIST_OAUTH_TOKEN",
        value_name = "TOKEN",
        hide_env_values = true,
        global = true
    )]
    oauth_token: Option<String>,

    /// Retry transient failures (timeouts, 502/503/504) up to N times
    /// [default: TODOIST_RETRY_MAX_ATTEMPTS, or no retries]
    #[arg(long, value_name = "N", global = true)]
    retries: Option<usize>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Manage projects
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Manage tasks
    #[command(subcommand)]
    Tasks(TaskCommands),

    /// OAuth authorization helpers
    #[command(subcommand)]
    Auth(AuthCommands),
}

#[derive(clap::Subcommand, Debug)]
enum ProjectCommands {
    /// List all projects
    List,
    /// Create a project and print it as JSON
    Create {
        /// Project name
        name: String,
    },
    /// Delete a project
    Delete {
        /// Project ID
        id: String,
    },
}

#[derive(clap::Subcommand, Debug)]
enum TaskCommands {
    /// List active tasks
    List(ListTasksArgs),
    /// Create a task and print it as JSON
    Add(AddTaskArgs),
    /// Mark a task complete
    Close {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

#[derive(clap::Args, Debug)]
struct ListTasksArgs {
    /// Filter by project ID
    #[arg(long)]
    project_id: Option<String>,
    /// Todoist filter (e.g. "today" or "p1"); takes precedence over other filters
    #[arg(long)]
    filter: Option<String>,
    /// Filter by label name
    #[arg(long)]
    label: Option<String>,
    /// IETF language tag for filter parsing
    #[arg(long)]
    lang: Option<String>,
}

#[derive(clap::Args, Debug)]
struct AddTaskArgs {
    /// Task content
    content: String,
    /// Project ID
    #[arg(long)]
    project_id: Option<String>,
    /// Natural language due date (e.g. "tomorrow 5pm")
    #[arg(long = "due")]
    due_string: Option<String>,
    /// Priority from 1 (normal) to 4 (urgent)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    priority: Option<u8>,
    /// Order of the task within its project
    #[arg(long)]
    order: Option<i64>,
}

#[derive(clap::Subcommand, Debug)]
enum AuthCommands {
    /// Print an authorization URL and remember its state
    Url {
        /// OAuth scope (repeatable)
        #[arg(long = "scope", value_name = "SCOPE")]
        scopes: Vec<String>,
    },
    /// Check a state value returned by the OAuth redirect
    CheckState {
        state: String,
    },
}

impl From<ListTasksArgs> for TaskFilter {
    fn from(args: ListTasksArgs) -> Self {
        Self {
            project_id: args.project_id,
            filter: args.filter,
            label: args.label,
            lang: args.lang,
        }
    }
}

impl From<AddTaskArgs> for NewTask {
    fn from(args: AddTaskArgs) -> Self {
        Self {
            content: args.content,
            project_id: args.project_id,
            due_string: args.due_string,
            priority: args.priority,
            order: args.order,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let policy = RetryPolicy::for_command(&runtime, cli.retries);

    let toolkit = || {
        let config = ClientConfig::new(
            Some(cli.api_url.clone()),
            Some(Duration::from_secs(cli.timeout)),
        );
        Toolkit::new(RuntimeContext::new(RealRuntime, cli.oauth_token.clone()), config)
    };

    match cli.command {
        Commands::Projects(command) => run_projects(&toolkit(), &policy, command).await,
        Commands::Tasks(command) => run_tasks(&toolkit(), &policy, command).await,
        Commands::Auth(command) => run_auth(runtime, command),
    }
}

async fn run_projects<R: Runtime>(
    toolkit: &Toolkit<RuntimeContext<R>>,
    policy: &RetryPolicy,
    command: ProjectCommands,
) -> Result<()> {
    match command {
        ProjectCommands::List => {
            let listing = with_retry(policy, "list_projects", || toolkit.list_projects()).await?;
            println!("{}", listing);
        }
        ProjectCommands::Create { name } => {
            let project =
                with_retry(policy, "create_project", || toolkit.create_project(&name)).await?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectCommands::Delete { id } => {
            with_retry(policy, "delete_project", || toolkit.delete_project(&id)).await?;
            println!("Deleted project {}", id);
        }
    }
    Ok(())
}

async fn run_tasks<R: Runtime>(
    toolkit: &Toolkit<RuntimeContext<R>>,
    policy: &RetryPolicy,
    command: TaskCommands,
) -> Result<()> {
    match command {
        TaskCommands::List(args) => {
            let filter = TaskFilter::from(args);
            let listing = with_retry(policy, "list_tasks", || toolkit.list_tasks(&filter)).await?;
            println!("{}", listing);
        }
        TaskCommands::Add(args) => {
            let task = NewTask::from(args);
            let created = with_retry(policy, "add_task", || toolkit.add_task(&task)).await?;
            println!("{}", serde_json::to_string_pretty(&created)?);
        }
        TaskCommands::Close { id } => {
            with_retry(policy, "close_task", || toolkit.close_task(&id)).await?;
            println!("Closed task {}", id);
        }
        TaskCommands::Delete { id } => {
            with_retry(policy, "delete_task", || toolkit.delete_task(&id)).await?;
            println!("Deleted task {}", id);
        }
    }
    Ok(())
}

fn run_auth<R: Runtime>(runtime: R, command: AuthCommands) -> Result<()> {
    match command {
        AuthCommands::Url { scopes } => {
            let scopes: Vec<&str> = scopes.iter().map(String::as_str).collect();
            let scopes = (!scopes.is_empty()).then_some(scopes.as_slice());
            let (url, state) = authorize_url_from_env(&runtime, scopes)?;
            StateStore::from_env(runtime).persist(&state)?;
            println!("{}", url);
        }
        AuthCommands::CheckState { state } => {
            if !StateStore::from_env(runtime).verify(&state)? {
                bail!("OAuth state mismatch; restart the authorization flow");
            }
            println!("OAuth state verified");
        }
    }
    Ok(())
}
