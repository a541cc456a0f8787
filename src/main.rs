use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};

use userdash::api::{HttpUsersClient, SortOrder};
use userdash::config::Config;
use userdash::logging::init_tracing;
use userdash::session::Session;
use userdash::store::Theme;
use userdash::ui::render::{render_activity, render_user_detail, render_users};
use userdash::ui::table::CompanyFilter;
use userdash::ui::{TableIntent, UserForm};

#[derive(Parser, Debug)]
#[command(name = "userdash", version, about = "Users dashboard client")]
struct Cli {
    /// Config file (default: the user config directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List one page of users.
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show a single user.
    Show { id: u64 },

    /// Create a user.
    Create(UserFields),

    /// Update a user.
    Update {
        id: u64,
        #[command(flatten)]
        fields: UserFields,
    },

    /// Delete a user.
    #[command(alias = "rm")]
    Delete { id: u64 },

    /// List company names for filtering.
    Companies,

    /// Show recent activity.
    Activity {
        /// Clear the log instead of showing it.
        #[arg(long)]
        clear: bool,
    },

    /// Show or change the theme: `toggle`, `light`, or `dark`.
    Theme { value: Option<String> },

    /// Show the signed-in user.
    Whoami,
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Only names containing this text.
    #[arg(long)]
    search: Option<String>,

    /// Email sort order: `asc` or `desc`.
    #[arg(long, value_parser = parse_sort)]
    sort: Option<SortOrder>,

    /// Only users at this company (`all` for everyone).
    #[arg(long)]
    company: Option<String>,
}

#[derive(Args, Debug)]
struct UserFields {
    #[arg(long)]
    name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    company: String,
}

impl From<UserFields> for UserForm {
    fn from(fields: UserFields) -> Self {
        UserForm {
            name: fields.name,
            email: fields.email,
            phone: fields.phone,
            company: fields.company,
        }
    }
}

fn parse_sort(value: &str) -> Result<SortOrder, String> {
    SortOrder::parse(value).ok_or_else(|| format!("expected asc or desc, got '{value}'"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(Config::config_path);
    let config = Config::load_from(&path)
        .with_context(|| format!("loading config from {}", path.display()))?;

    let session = Session::start(config).context("starting session")?;
    let result = execute(cli.command, session).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Command failed");
    }
    result
}

/// Run one command, then end the session whether or not it succeeded.
async fn execute(command: Command, mut session: Session<HttpUsersClient>) -> anyhow::Result<()> {
    let result = run(command, &mut session).await;
    session.shutdown();
    result
}

async fn run(command: Command, session: &mut Session<HttpUsersClient>) -> anyhow::Result<()> {
    match command {
        Command::List(args) => {
            let mut table = session.user_table();
            if let Some(search) = args.search {
                table.dispatch(TableIntent::SetSearch(search));
            }
            if let Some(sort) = args.sort {
                table.dispatch(TableIntent::SetSort(sort));
            }
            if let Some(company) = args.company {
                table.dispatch(TableIntent::SetCompanyFilter(CompanyFilter::parse(&company)));
            }
            table.dispatch(TableIntent::GoToPage(args.page));
            let view = table.load().await;
            print!("{}", render_users(&view));
        }
        Command::Show { id } => {
            let view = session.user_detail(id).await;
            match (view.user, view.error) {
                (Some(user), _) => print!("{}", render_user_detail(&user)),
                (None, Some(error)) => bail!(error),
                (None, None) => bail!("User #{id} not found."),
            }
        }
        Command::Create(fields) => {
            let mut table = session.user_table();
            let user = table
                .submit_create(&fields.into())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Created user #{} {}", user.id, user.name);
        }
        Command::Update { id, fields } => {
            let mut table = session.user_table();
            table
                .submit_update(id, &fields.into())
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Updated user #{id}");
        }
        Command::Delete { id } => {
            let mut table = session.user_table();
            table
                .delete(id)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message()))?;
            println!("Deleted user #{id}");
        }
        Command::Companies => {
            let table = session.user_table();
            let companies = table
                .companies()
                .await
                .context("Failed to load companies.")?;
            for name in companies {
                println!("{name}");
            }
        }
        Command::Activity { clear } => {
            if clear {
                session.activity().clear();
                println!("Activity cleared.");
            } else {
                print!("{}", render_activity(&session.activity().entries()));
            }
        }
        Command::Theme { value } => {
            let theme = match value.as_deref() {
                None => session.theme().theme(),
                Some("toggle") => session.theme_mut().toggle()?,
                Some(other) => {
                    let Some(theme) = Theme::parse(other) else {
                        bail!("Unknown theme '{other}'. Use light, dark, or toggle.");
                    };
                    session.theme_mut().set(theme)?;
                    theme
                }
            };
            println!("{}", theme.as_str());
        }
        Command::Whoami => match session.auth().user() {
            Some(user) => println!("{} <{}> (#{})", user.name, user.email, user.id),
            None => println!("Not signed in."),
        },
    }

    Ok(())
}
