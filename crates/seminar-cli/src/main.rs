//! seminar CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

use seminar_core::config::ReportFormat;
use seminar_core::model::{AwardCategory, PresentationType, Role};

mod commands;

#[derive(Parser)]
#[command(name = "seminar", version, about = "Research seminar management")]
struct Cli {
    /// Snapshot file (overrides the configured data_file)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter seminar.toml
    Init,

    /// Register a user and print the new id
    Register {
        /// student, evaluator or coordinator
        #[arg(long)]
        role: Role,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long)]
        password: String,

        /// Supervisor (students), expertise (evaluators) or department (coordinators)
        #[arg(long, default_value = "")]
        detail: String,
    },

    /// Check credentials
    Login {
        #[arg(long)]
        id: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        role: Role,
    },

    /// List users
    Users {
        /// Only users with this role
        #[arg(long)]
        role: Option<Role>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Register a submission for a student and print its id
    Submit {
        #[arg(long)]
        student: String,

        #[arg(long)]
        title: String,

        #[arg(long = "abstract", default_value = "")]
        abstract_text: String,

        /// oral or poster
        #[arg(long = "type")]
        presentation_type: PresentationType,

        /// Supervisor for this submission; becomes the student's default
        #[arg(long)]
        supervisor: Option<String>,

        /// Presentation material
        #[arg(long)]
        file: Option<String>,
    },

    /// Attach presentation material to a submission
    Upload {
        #[arg(long)]
        student: String,

        #[arg(long)]
        submission: String,

        #[arg(long)]
        path: String,
    },

    /// Remove a submission and its evaluations
    Withdraw {
        #[arg(long)]
        submission: String,
    },

    /// List submissions
    Submissions {
        /// Only submissions in sessions this evaluator sits on
        #[arg(long)]
        evaluator: Option<String>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Manage sessions
    #[command(subcommand)]
    Session(SessionCommand),

    /// Place a submission or evaluator into a session
    #[command(subcommand)]
    Assign(MembershipCommand),

    /// Take a submission or evaluator out of a session
    #[command(subcommand)]
    Unassign(MembershipCommand),

    /// Score a submission
    Evaluate {
        #[arg(long)]
        evaluator: String,

        #[arg(long)]
        submission: String,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        clarity: u8,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        methodology: u8,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        results: u8,

        #[arg(long, value_parser = clap::value_parser!(u8).range(0..=10))]
        presentation: u8,

        #[arg(long, default_value = "")]
        comments: String,
    },

    /// List the evaluations an evaluator has written
    Evaluations {
        #[arg(long)]
        evaluator: String,

        /// Print each evaluation in full instead of a table
        #[arg(long)]
        details: bool,

        /// Print JSON instead of a table
        #[arg(long, conflicts_with = "details")]
        json: bool,
    },

    /// Delete an evaluation so it can be redone
    Retract {
        #[arg(long)]
        evaluation: String,
    },

    /// Compute award winners
    Awards {
        /// Categories to compute (default: all)
        #[arg(long = "category")]
        categories: Vec<AwardCategory>,

        /// Store the results, replacing earlier awards of the same categories
        #[arg(long)]
        record: bool,

        /// Show the full ranking for each category
        #[arg(long)]
        rank: bool,
    },

    /// Generate reports
    #[command(subcommand)]
    Report(ReportCommand),
}

#[derive(Subcommand)]
enum SessionCommand {
    /// Create a session and print its id
    Create {
        /// Managing coordinator
        #[arg(long)]
        coordinator: String,

        #[arg(long)]
        date: String,

        #[arg(long, default_value = "")]
        time: String,

        #[arg(long)]
        venue: String,

        /// oral or poster
        #[arg(long = "type")]
        session_type: PresentationType,
    },

    /// Delete a session, releasing its members
    Delete {
        #[arg(long)]
        id: String,
    },

    /// List sessions
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one session in detail
    Show {
        #[arg(long)]
        id: String,
    },
}

#[derive(Subcommand)]
enum MembershipCommand {
    Submission {
        #[arg(long)]
        session: String,

        #[arg(long)]
        submission: String,
    },
    Evaluator {
        #[arg(long)]
        session: String,

        #[arg(long)]
        evaluator: String,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Sessions with their presentations and evaluators
    Schedule(ReportArgs),
    /// Scores per session and submission
    Evaluation(ReportArgs),
    /// Award winners (stored awards, or freshly computed if none)
    Awards(ReportArgs),
    /// Seminar statistics
    Stats(ReportArgs),
}

#[derive(Args)]
struct ReportArgs {
    /// text or html (default from config)
    #[arg(long)]
    format: Option<ReportFormat>,

    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Write into the configured report directory
    #[arg(long, conflicts_with = "output")]
    export: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("seminar=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let data = cli.data.as_deref();
    let config = cli.config.as_deref();

    let result = match cli.command {
        Commands::Init => commands::init::execute(config),
        Commands::Register {
            role,
            name,
            email,
            password,
            detail,
        } => commands::users::register(data, config, role, name, email, password, detail),
        Commands::Login { id, password, role } => {
            commands::users::login(data, config, &id, &password, role)
        }
        Commands::Users { role, json } => commands::users::list(data, config, role, json),
        Commands::Submit {
            student,
            title,
            abstract_text,
            presentation_type,
            supervisor,
            file,
        } => commands::submission::submit(
            data,
            config,
            &student,
            title,
            abstract_text,
            presentation_type,
            supervisor,
            file,
        ),
        Commands::Upload {
            student,
            submission,
            path,
        } => commands::submission::upload(data, config, &student, &submission, &path),
        Commands::Withdraw { submission } => {
            commands::submission::withdraw(data, config, &submission)
        }
        Commands::Submissions { evaluator, json } => {
            commands::submission::list(data, config, evaluator.as_deref(), json)
        }
        Commands::Session(cmd) => match cmd {
            SessionCommand::Create {
                coordinator,
                date,
                time,
                venue,
                session_type,
            } => commands::session::create(
                data,
                config,
                &coordinator,
                date,
                time,
                venue,
                session_type,
            ),
            SessionCommand::Delete { id } => commands::session::delete(data, config, &id),
            SessionCommand::List { json } => commands::session::list(data, config, json),
            SessionCommand::Show { id } => commands::session::show(data, config, &id),
        },
        Commands::Assign(cmd) => match cmd {
            MembershipCommand::Submission {
                session,
                submission,
            } => commands::assign::submission(data, config, &session, &submission, true),
            MembershipCommand::Evaluator { session, evaluator } => {
                commands::assign::evaluator(data, config, &session, &evaluator, true)
            }
        },
        Commands::Unassign(cmd) => match cmd {
            MembershipCommand::Submission {
                session,
                submission,
            } => commands::assign::submission(data, config, &session, &submission, false),
            MembershipCommand::Evaluator { session, evaluator } => {
                commands::assign::evaluator(data, config, &session, &evaluator, false)
            }
        },
        Commands::Evaluate {
            evaluator,
            submission,
            clarity,
            methodology,
            results,
            presentation,
            comments,
        } => commands::evaluate::execute(
            data,
            config,
            &evaluator,
            &submission,
            [clarity, methodology, results, presentation],
            &comments,
        ),
        Commands::Evaluations {
            evaluator,
            details,
            json,
        } => commands::evaluate::list(data, config, &evaluator, details, json),
        Commands::Retract { evaluation } => commands::evaluate::retract(data, config, &evaluation),
        Commands::Awards {
            categories,
            record,
            rank,
        } => commands::awards::execute(data, config, categories, record, rank),
        Commands::Report(cmd) => {
            let (kind, args) = match cmd {
                ReportCommand::Schedule(args) => (commands::report::Kind::Schedule, args),
                ReportCommand::Evaluation(args) => (commands::report::Kind::Evaluation, args),
                ReportCommand::Awards(args) => (commands::report::Kind::Awards, args),
                ReportCommand::Stats(args) => (commands::report::Kind::Stats, args),
            };
            commands::report::execute(data, config, kind, args.format, args.output, args.export)
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
