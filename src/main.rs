use std::process::ExitCode;

use clap::{ArgAction, Parser};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use release_checker::action::{
    ActionError, ActionInputs, GitHubConsole, OutputSink, ReleaseCheck, RunOutcome,
};
use release_checker::existence::ExistenceService;
use release_checker::github::{GITHUB_API_BASE, OctocrabClient, RetryConfig, RetryPolicy};

/// Checks whether a release exists for a GitHub repository.
#[derive(Parser, Debug)]
#[command(name = "release-checker", version)]
struct Cli {
    /// The owner of the repository. May be an organization.
    #[arg(long)]
    repo_owner: String,

    /// The name of the repository.
    #[arg(long)]
    repo_name: String,

    /// The name of the release.
    #[arg(long)]
    release_name: String,

    /// Fail the workflow when the owner, repository or release is not found.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    fail_when_not_found: bool,

    /// Only count the release if it is marked as a pre-release.
    #[arg(long, default_value_t = false, action = ArgAction::Set)]
    check_pre_releases: bool,

    /// Token used to authenticate with the GitHub API.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    github_token: Option<String>,

    /// Root URL of the GitHub REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = GITHUB_API_BASE)]
    api_url: String,

    /// Do not retry transient GitHub API failures.
    #[arg(long)]
    no_retry: bool,
}

impl Cli {
    fn inputs(&self) -> ActionInputs {
        ActionInputs::new(&self.repo_owner, &self.repo_name, &self.release_name)
            .with_fail_when_not_found(self.fail_when_not_found)
            .with_pre_releases(self.check_pre_releases)
    }

    fn retry_policy(&self) -> RetryPolicy {
        if self.no_retry {
            RetryPolicy::NoRetry
        } else {
            RetryPolicy::RetryTransient
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "release_checker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let console = GitHubConsole::from_env();

    match run(&cli, &console).await {
        Ok(release_exists) => {
            tracing::info!(release_exists, "done");
            ExitCode::SUCCESS
        }
        Err(err) => {
            console.write_error(&err.to_string());
            let code = err
                .downcast_ref::<ActionError>()
                .map(ActionError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code)
        }
    }
}

async fn run(cli: &Cli, console: &GitHubConsole) -> anyhow::Result<bool> {
    let client = OctocrabClient::connect(&cli.api_url, cli.github_token.clone())?
        .with_retry(RetryConfig::DEFAULT, cli.retry_policy());
    let mut service = ExistenceService::new(client);

    let outcome = ReleaseCheck::new(&service, console)
        .run(&cli.inputs())
        .await
        .and_then(RunOutcome::into_result);
    service.dispose();

    Ok(outcome?)
}
