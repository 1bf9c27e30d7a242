mod analysis;
mod config;
mod git;
mod github;
mod pr;
mod report;
mod reviewers;
mod template;
mod title;

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};
use tracing_subscriber::EnvFilter;

use crate::git::{GitCli, RepoContext};
use crate::github::{GitHubClient, HostingApi};
use crate::template::{TemplateOptions, TemplateStyle};

/// prflow: analyze the current branch and open or refresh its GitHub
/// Pull Request with an inferred title, description and reviewers.
#[derive(Parser, Debug)]
#[command(name = "prflow", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize commits and file changes against the base branch
    Analyze {
        #[arg(short, long)]
        base: Option<String>,

        /// Also scan the full diff for breaking changes and test files
        #[arg(long)]
        detailed: bool,

        #[arg(long)]
        json: bool,

        /// Write a markdown PR description to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print a conventional-commit title for the branch
    Title {
        #[arg(short, long)]
        base: Option<String>,

        #[arg(long)]
        max_length: Option<usize>,
    },

    /// Suggest reviewers from the history of the modified files
    Reviewers {
        #[arg(short, long)]
        base: Option<String>,

        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        json: bool,
    },

    /// Create, update or reopen the Pull Request for the current branch
    Pr(PrArgs),
}

#[derive(Args, Debug)]
struct PrArgs {
    #[arg(short, long)]
    base: Option<String>,

    /// Use this title instead of inferring one
    #[arg(long)]
    title: Option<String>,

    /// Use this description instead of generating one
    #[arg(long, conflicts_with = "description_file")]
    description: Option<String>,

    #[arg(long)]
    description_file: Option<PathBuf>,

    /// Review notes added as their own section of the description
    #[arg(long, conflicts_with = "review_file")]
    review: Option<String>,

    #[arg(long)]
    review_file: Option<PathBuf>,

    #[arg(long)]
    draft: bool,

    /// GitHub token; defaults to the config file, then GITHUB_TOKEN / GH_TOKEN
    #[arg(long)]
    token: Option<String>,

    #[arg(long, value_enum, default_value_t = TemplateStyle::Standard)]
    template: TemplateStyle,

    /// Language of the description headings (en, es, fr, de)
    #[arg(long, default_value = "en")]
    language: String,

    /// Leave the statistics table out of the description
    #[arg(long)]
    no_stats: bool,

    #[arg(long)]
    max_title_length: Option<usize>,

    /// Do not request reviewers
    #[arg(long)]
    no_reviewers: bool,

    #[arg(long)]
    reviewer_limit: Option<usize>,

    /// Image or recording embedded in the description
    #[arg(long)]
    media_url: Option<String>,

    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!("loading configuration");
    let config = config::Config::load()?;

    let repo = GitCli::open(&std::env::current_dir()?).await?;
    debug!(root = %repo.root().display(), "opened repository");
    let ctx = RepoContext::new(repo, config.base_branch_override().map(str::to_string));

    match cli.command {
        Command::Analyze {
            base,
            detailed,
            json,
            output,
        } => {
            let _span = info_span!("analyze", base = ?base, detailed).entered();
            let summary = analysis::analyze(&ctx, base.as_deref(), detailed).await?;

            if json {
                println!("{}", report::to_json(&summary)?);
            } else {
                print!("{}", report::render_summary(&summary));
            }

            if let Some(path) = output {
                let title = title::title_for(&summary, config.title.max_length);
                let options = TemplateOptions {
                    style: if detailed {
                        TemplateStyle::Detailed
                    } else {
                        TemplateStyle::Standard
                    },
                    ..TemplateOptions::default()
                };
                let description = template::render_description(&summary, &title.rendered, &options);
                report::write_markdown(&format!("# {title}\n\n{description}"), &path)?;
                info!(path = %path.display(), "wrote description");
            }
        }

        Command::Title { base, max_length } => {
            let summary = analysis::analyze(&ctx, base.as_deref(), false).await?;
            let title = title::title_for(&summary, max_length.or(config.title.max_length));
            println!("{title}");
        }

        Command::Reviewers { base, limit, json } => {
            let limit = limit.unwrap_or(config.reviewers.limit);
            let suggestions = reviewers::suggest_reviewers(&ctx, limit, base.as_deref()).await;
            if json {
                println!("{}", report::to_json(&suggestions)?);
            } else {
                print!("{}", report::render_reviewers(&suggestions));
            }
        }

        Command::Pr(args) => {
            let json = args.json;
            let options = pr_options(args, &config)?;
            let api_url = config.github.api_url.clone();

            let result = pr::create_or_update_pr(&ctx, &options, |remote, token| {
                let api_url = api_url.unwrap_or_else(|| github::api_url_for(remote));
                debug!(api_url = %api_url, "connecting to GitHub");
                Ok(Box::new(GitHubClient::new(token, &api_url)?) as Box<dyn HostingApi>)
            })
            .await?;

            if json {
                println!("{}", report::to_json(&result)?);
            } else {
                print!("{}", report::render_pr_result(&result));
            }
        }
    }

    Ok(())
}

/// Merge CLI flags over the configuration file.
fn pr_options(args: PrArgs, config: &config::Config) -> Result<pr::PrOptions, std::io::Error> {
    let description = match (args.description, args.description_file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(read_text(&path)?),
        (None, None) => None,
    };
    let review = match (args.review, args.review_file) {
        (Some(text), _) => Some(text),
        (None, Some(path)) => Some(read_text(&path)?),
        (None, None) => None,
    };

    Ok(pr::PrOptions {
        base_branch: args.base,
        template: TemplateOptions {
            style: args.template,
            language: args.language,
            include_stats: !args.no_stats,
            media_url: args.media_url,
        },
        max_title_length: args.max_title_length.or(config.title.max_length),
        title: args.title,
        description,
        review,
        draft: args.draft,
        token: args.token.or_else(|| config.github_token()),
        assign_reviewers: config.reviewers.assign && !args.no_reviewers,
        reviewer_limit: args.reviewer_limit.unwrap_or(config.reviewers.limit),
    })
}

fn read_text(path: &Path) -> Result<String, std::io::Error> {
    debug!(path = %path.display(), "reading text file");
    std::fs::read_to_string(path)
}
