use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use wfhub::config::Config;
use wfhub::credentials::ApiToken;
use wfhub::cwl::{self, CwltoolValidator, DocumentValidator};
use wfhub::deposit::{preflight, Deposition, DepositionRequest};
use wfhub::hub::Submission;
use wfhub::pipeline;
use wfhub::Error;

#[derive(Parser)]
#[command(name = "wfhub")]
#[command(about = "Deposit executed cryo-EM pipeline runs to WorkflowHub", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Package a run export and upload it to WorkflowHub
    Deposit {
        /// Path to the run export JSON file
        project: PathBuf,
        /// Entry title
        #[arg(long)]
        title: String,
        /// Entry description
        #[arg(long)]
        description: String,
        /// Comma-separated keywords (i.e: cryoem, spa, 3d refinement)
        #[arg(long)]
        keywords: String,
        /// Entry publisher (i.e: John Doe)
        #[arg(long)]
        publisher: String,
        /// Comma-separated authors apart from the publisher
        #[arg(long, default_value = "")]
        authors: String,
        /// WorkflowHub team ID owning the entry
        #[arg(long)]
        team: String,
        /// Existing workflow ID; when set, a new version is created instead
        /// of a new entry
        #[arg(long)]
        workflow_id: Option<String>,
        /// Directory for the CWL document and crate zip
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Translate a run export to a CWL document without uploading
    Translate {
        /// Path to the run export JSON file
        project: PathBuf,
        /// Workflow label
        #[arg(long, default_value = "Workflow")]
        title: String,
        /// Workflow doc string
        #[arg(long, default_value = "")]
        description: String,
        /// Write the document here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a CWL document with cwltool
    Validate {
        /// Path to the CWL document
        file: PathBuf,
    },
    /// Check the deposition setup (dot executable, API token)
    Check,
    /// List the cryo-EM ontology table
    Ontology,
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::from_default_env()),
        )
        .init();

    if let Err(e) = run(Cli::parse()).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> wfhub::Result<()> {
    match cli.command {
        Commands::Deposit {
            project,
            title,
            description,
            keywords,
            publisher,
            authors,
            team,
            workflow_id,
            output_dir,
        } => {
            let mut config = Config::load();
            if output_dir.is_some() {
                config.output.dir = output_dir;
            }

            for issue in preflight(&config) {
                eprintln!("Warning: {}", issue);
            }

            let request = DepositionRequest {
                title,
                description,
                keywords: split_list(&keywords),
                publisher,
                authors: split_list(&authors),
                team_id: team,
                submission: match workflow_id {
                    Some(id) => Submission::NewVersion(id),
                    None => Submission::New,
                },
            };

            let outcome = Deposition::new(config).run(&project, &request).await?;
            println!("Crate: {}", outcome.crate_path.display());
            println!("Workflow URL: {}", outcome.receipt.url);
            Ok(())
        }
        Commands::Translate {
            project,
            title,
            description,
            output,
        } => {
            let graph = pipeline::parse_run_graph_file(&project)?;
            let records = pipeline::translate(&graph);
            let document = cwl::build_document(&records, &title, &description);
            let yaml = cwl::to_yaml(&document)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, yaml)?;
                    println!("Wrote {}", path.display());
                }
                None => print!("{}", yaml),
            }
            Ok(())
        }
        Commands::Validate { file } => {
            let config = Config::load();
            let validator = CwltoolValidator::new(config.tools.cwltool);
            if validator.validate(&file).await? {
                println!("{} is valid CWL", file.display());
                Ok(())
            } else {
                Err(Error::Validation(format!(
                    "{} is not valid CWL",
                    file.display()
                )))
            }
        }
        Commands::Check => {
            let config = Config::load();
            let issues = preflight(&config);
            if issues.is_empty() {
                let token = ApiToken::from_env()?;
                println!("Setup looks good (token {}).", token.masked());
            } else {
                for issue in &issues {
                    println!("- {}", issue);
                }
                return Err(Error::Config(format!(
                    "{} setup issue(s) found",
                    issues.len()
                )));
            }
            Ok(())
        }
        Commands::Ontology => {
            for (class_name, code) in cwl::ontology::entries() {
                println!("{:<22} {}", class_name, code);
            }
            Ok(())
        }
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}

/// Split a comma-separated operator input, dropping empty segments.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
