//! `tutor` – command-line front end for tutor-server.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tutor_client::views::{EntryRole, GradingOutcome, HomeView, TranscriptEntry};
use tutor_client::{ApiClient, App, ClientConfig};
use tutor_types::Student;

#[derive(Debug, Parser)]
#[command(name = "tutor", version, about = "Teaching assistant: chat, paper grading and roster")]
struct Cli {
    /// API root; defaults to `TUTOR_API_URL` or http://localhost:3001/api.
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Check that the server is reachable.
    Health,
    /// Ask the assistant. Without MESSAGE, starts an interactive session.
    Chat { message: Option<String> },
    /// Grade a paper and record the grade on the student.
    Grade {
        #[arg(long)]
        student: i64,
        #[command(flatten)]
        paper: PaperSource,
    },
    /// Manage the roster.
    #[command(subcommand)]
    Students(StudentsCommand),
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct PaperSource {
    /// Read the paper from a file.
    #[arg(long)]
    file: Option<PathBuf>,
    /// Paper text given inline.
    #[arg(long)]
    text: Option<String>,
}

#[derive(Debug, Subcommand)]
enum StudentsCommand {
    List,
    Show {
        id: i64,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        age: i64,
        #[arg(long)]
        class: String,
        #[arg(long, default_value = "N/A")]
        grade: String,
    },
    /// Change the given fields; the rest keep their values.
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        age: Option<i64>,
        #[arg(long)]
        class: Option<String>,
        #[arg(long)]
        grade: Option<String>,
    },
    Delete {
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(long, short)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let env_filter = tracing_subscriber::EnvFilter::try_from_env("TUTOR_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_url = cli
        .api_url
        .unwrap_or_else(|| ClientConfig::from_env().api_base_url);
    let api = ApiClient::new(base_url);

    match cli.command {
        Command::Health => {
            let health = api.health().await?;
            println!("{}: {}", health.status, health.message);
        }
        Command::Chat { message: Some(message) } => {
            let mut home = HomeView::default();
            match home.send(&api, &message).await {
                Some(entry) => print_entry(entry)?,
                None => bail!("Message is required"),
            }
        }
        Command::Chat { message: None } => interactive_chat(&api).await?,
        Command::Grade { student, paper } => {
            let text = match (paper.file, paper.text) {
                (Some(path), _) => tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("reading {}", path.display()))?,
                (None, text) => text.unwrap_or_default(),
            };
            grade(api, student, text).await?;
        }
        Command::Students(command) => students(api, command).await?,
    }
    Ok(())
}

fn print_entry(entry: &TranscriptEntry) -> anyhow::Result<()> {
    match entry.role {
        EntryRole::Assistant => println!("{}", entry.content),
        EntryRole::Error => bail!("{}", entry.content),
        EntryRole::User => {}
    }
    Ok(())
}

async fn interactive_chat(api: &ApiClient) -> anyhow::Result<()> {
    println!("Chatting with the assistant. Type `exit` to leave.");
    let mut home = HomeView::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }
        if let Some(entry) = home.send(api, &line).await {
            if let Err(e) = print_entry(entry) {
                eprintln!("{e}");
            }
        }
    }
    Ok(())
}

async fn grade(api: ApiClient, student: i64, text: String) -> anyhow::Result<()> {
    let mut app = App::start(api).await;
    app.grading.select_student(Some(student));
    app.grading.set_paper_text(text);

    match app.grade_paper().await {
        Some(GradingOutcome::Graded(result)) => {
            println!("Grade for {}: {}\n", result.student_name, result.grade);
            println!("{}", result.response);
        }
        Some(GradingOutcome::Failed(message)) => bail!("{message}"),
        None => bail!("Student ID and paper text are required"),
    }
    Ok(())
}

async fn students(api: ApiClient, command: StudentsCommand) -> anyhow::Result<()> {
    match command {
        StudentsCommand::List => {
            let students = api.list_students().await?;
            if students.is_empty() {
                println!("No students yet.");
            } else {
                print_table(&students);
            }
        }
        StudentsCommand::Show { id } => print_table(&[api.get_student(id).await?]),
        StudentsCommand::Add {
            name,
            age,
            class,
            grade,
        } => {
            let mut app = App::start(api).await;
            app.roster.open_add();
            if let Some(form) = app.roster.form_mut() {
                form.name = name;
                form.age = age.to_string();
                form.class = class;
                form.overall_grade = grade;
            }
            if let Some(student) = app.submit_student_form().await? {
                print_table(&[student]);
            }
        }
        StudentsCommand::Edit {
            id,
            name,
            age,
            class,
            grade,
        } => {
            let mut app = App::start(api).await;
            let current = match app.student(id) {
                Some(student) => student.clone(),
                None => app.api().get_student(id).await?,
            };
            app.roster.open_edit(&current);
            if let Some(form) = app.roster.form_mut() {
                if let Some(name) = name {
                    form.name = name;
                }
                if let Some(age) = age {
                    form.age = age.to_string();
                }
                if let Some(class) = class {
                    form.class = class;
                }
                if let Some(grade) = grade {
                    form.overall_grade = grade;
                }
            }
            if let Some(student) = app.submit_student_form().await? {
                print_table(&[student]);
            }
        }
        StudentsCommand::Delete { id, yes } => {
            let mut app = App::start(api).await;
            let deleted = app
                .delete_student(id, |prompt| yes || confirm_on_stdin(prompt))
                .await?;
            if deleted {
                println!("Student deleted successfully");
            } else {
                println!("Cancelled.");
            }
        }
    }
    Ok(())
}

fn confirm_on_stdin(prompt: &str) -> bool {
    print!("{prompt} [y/N] ");
    if std::io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if std::io::stdin().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn print_table(students: &[Student]) {
    println!("{:>5}  {:<24} {:>4}  {:<12} {:<5} CREATED", "ID", "NAME", "AGE", "CLASS", "GRADE");
    for s in students {
        println!(
            "{:>5}  {:<24} {:>4}  {:<12} {:<5} {}",
            s.id,
            s.name,
            s.age,
            s.class,
            s.overall_grade,
            s.created_at.format("%Y-%m-%d")
        );
    }
}
