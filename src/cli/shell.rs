//! Interactive shell
//!
//! A line-oriented front end over the screens in [`crate::views`]. Every
//! command reads the selected session from the [`SessionProvider`], so the
//! shell behaves like the web client's sidebar plus routed pages.

use super::output::Output;
use crate::api::FileUpload;
use crate::auth::AuthProvider;
use crate::session::{SelectionPolicy, SessionProvider};
use crate::types::{ClientError, Homework, Material, Message, MindMap, Result, Session};
use crate::views::{
    failure_message, ChatScreen, Difficulty, GenerationForm, HomeworkDetailScreen,
    HomeworkListScreen, MaterialsScreen, MindMapsScreen, ScreenState,
};
use chrono::{DateTime, Utc};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// One parsed line of shell input.
#[derive(Debug, Clone, PartialEq)]
pub enum ShellCommand {
    Help,
    Sessions,
    New(String),
    Use(String),
    Chat,
    Say(String),
    Materials,
    Upload(PathBuf),
    Homework,
    Generate {
        topic: String,
        difficulty: Difficulty,
        materials: Vec<String>,
    },
    Open(String),
    Solve {
        task: String,
        path: PathBuf,
    },
    Submit,
    MindMaps,
    MindMap,
    WhoAmI,
    Logout,
    Quit,
}

const GENERATE_USAGE: &str = "usage: generate <topic> [--difficulty d] [--material id]...";

impl ShellCommand {
    /// Parse a line. Blank lines yield `Ok(None)`.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "help" | "?" => ShellCommand::Help,
            "sessions" => ShellCommand::Sessions,
            "new" => ShellCommand::New(required(rest, "usage: new <title>")?),
            "use" => ShellCommand::Use(single(rest, "usage: use <id|#n>")?),
            "chat" => ShellCommand::Chat,
            "say" => ShellCommand::Say(required(rest, "usage: say <text>")?),
            "materials" => ShellCommand::Materials,
            "upload" => ShellCommand::Upload(PathBuf::from(required(rest, "usage: upload <path>")?)),
            "homework" => ShellCommand::Homework,
            "generate" => parse_generate(rest)?,
            "open" => ShellCommand::Open(single(rest, "usage: open <homework-id>")?),
            "solve" => {
                let usage = "usage: solve <task-number|task-id> <path>";
                let (task, path) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| ClientError::InvalidInput(usage.to_string()))?;
                ShellCommand::Solve {
                    task: task.to_string(),
                    path: PathBuf::from(required(path, usage)?),
                }
            }
            "submit" => ShellCommand::Submit,
            "mindmaps" => ShellCommand::MindMaps,
            "mindmap" => ShellCommand::MindMap,
            "whoami" => ShellCommand::WhoAmI,
            "logout" => ShellCommand::Logout,
            "quit" | "exit" => ShellCommand::Quit,
            other => {
                return Err(ClientError::InvalidInput(format!(
                    "unknown command '{}' (type 'help')",
                    other
                )))
            }
        };
        Ok(Some(command))
    }
}

fn required(rest: &str, usage: &str) -> Result<String> {
    let rest = rest.trim();
    if rest.is_empty() {
        return Err(ClientError::InvalidInput(usage.to_string()));
    }
    Ok(rest.to_string())
}

fn single(rest: &str, usage: &str) -> Result<String> {
    let mut words = rest.split_whitespace();
    match (words.next(), words.next()) {
        (Some(word), None) => Ok(word.to_string()),
        _ => Err(ClientError::InvalidInput(usage.to_string())),
    }
}

fn parse_generate(rest: &str) -> Result<ShellCommand> {
    let mut topic = Vec::new();
    let mut difficulty = Difficulty::default();
    let mut materials = Vec::new();

    let mut words = rest.split_whitespace();
    while let Some(word) = words.next() {
        match word {
            "--difficulty" | "-d" => {
                let value = words
                    .next()
                    .ok_or_else(|| ClientError::InvalidInput(GENERATE_USAGE.to_string()))?;
                difficulty = value.parse()?;
            }
            "--material" | "-m" => {
                let value = words
                    .next()
                    .ok_or_else(|| ClientError::InvalidInput(GENERATE_USAGE.to_string()))?;
                materials.push(value.to_string());
            }
            word => topic.push(word),
        }
    }

    if topic.is_empty() {
        return Err(ClientError::InvalidInput(GENERATE_USAGE.to_string()));
    }
    Ok(ShellCommand::Generate {
        topic: topic.join(" "),
        difficulty,
        materials,
    })
}

/// Whether the shell keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The interactive shell for one signed-in user.
pub struct Shell<'a> {
    auth: &'a AuthProvider,
    output: &'a Output,
    sessions: SessionProvider,
    chat: ChatScreen,
    materials: MaterialsScreen,
    homework: HomeworkListScreen,
    form: GenerationForm,
    detail: Option<HomeworkDetailScreen>,
    mind_maps: MindMapsScreen,
}

impl<'a> Shell<'a> {
    /// Connect the session provider. Fails with
    /// [`ClientError::NotAuthenticated`] when nobody is signed in.
    pub async fn start(
        auth: &'a AuthProvider,
        policy: SelectionPolicy,
        output: &'a Output,
    ) -> Result<Shell<'a>> {
        let sessions = SessionProvider::connect(auth, policy).await?;
        let api = auth.api().clone();

        Ok(Self {
            auth,
            output,
            sessions,
            chat: ChatScreen::new(api.clone()),
            materials: MaterialsScreen::new(api.clone()),
            homework: HomeworkListScreen::new(api.clone()),
            form: GenerationForm::new(api.clone()),
            detail: None,
            mind_maps: MindMapsScreen::new(api),
        })
    }

    /// Read commands from stdin until `quit`, `logout` or end of input.
    pub async fn run(&mut self) -> Result<()> {
        self.output.banner();
        if let Some(user) = self.auth.user() {
            self.output
                .info(&format!("Signed in as {} <{}>", user.display_name(), user.email));
        }
        self.show_sessions();

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            self.print_prompt();
            let Some(line) = lines.next_line().await? else {
                self.output.newline();
                break;
            };

            let command = match ShellCommand::parse(&line) {
                Ok(Some(command)) => command,
                Ok(None) => continue,
                Err(e) => {
                    self.output.error(&e.to_string());
                    continue;
                }
            };

            debug!("Shell command: {:?}", command);
            if self.execute(command).await == Flow::Exit {
                break;
            }
        }
        Ok(())
    }

    pub async fn execute(&mut self, command: ShellCommand) -> Flow {
        let output = self.output;
        let current = self.sessions.current_session_id();
        let session = current.as_deref();

        match command {
            ShellCommand::Help => print_help(output),
            ShellCommand::Sessions => {
                if self.sessions.refresh_sessions().await.is_err() {
                    output.warning("Could not refresh sessions; showing the cached list.");
                }
                self.show_sessions();
            }
            ShellCommand::New(title) => match self.sessions.create_new_session(&title).await {
                Ok(created) => {
                    output.success(&format!("Created session '{}'", created.title));
                    self.show_sessions();
                }
                Err(e) => output.error(&failure_message("create session", &e)),
            },
            ShellCommand::Use(key) => self.select_session(&key),
            ShellCommand::Chat => {
                let state = self.chat.load(session).await;
                report(output, state, ChatScreen::EMPTY_PROMPT);
                render_messages(output, self.chat.messages());
            }
            ShellCommand::Say(text) => {
                if session.is_none() {
                    output.info(ChatScreen::EMPTY_PROMPT);
                } else if let Some(reply) = self.chat.send(session, &text, output).await {
                    output.message(&reply.role.to_string(), &reply.content);
                }
            }
            ShellCommand::Materials => {
                let state = self.materials.load(session).await;
                report(output, state, MaterialsScreen::EMPTY_PROMPT);
                if state != ScreenState::NoSession {
                    render_materials(output, self.materials.materials());
                }
            }
            ShellCommand::Upload(path) => {
                if session.is_none() {
                    output.info(MaterialsScreen::EMPTY_PROMPT);
                    return Flow::Continue;
                }
                let Some(file) = read_upload(output, path).await else {
                    return Flow::Continue;
                };
                output.info(&format!("Uploading {} ({})...", file.file_name, format_size(file.len() as u64)));
                if let Some(material) = self.materials.upload(session, file, output).await {
                    output.success(&format!("Uploaded {}", material.name));
                    render_materials(output, self.materials.materials());
                }
            }
            ShellCommand::Homework => {
                let state = self.homework.load(session).await;
                report(output, state, HomeworkListScreen::EMPTY_PROMPT);
                if state != ScreenState::NoSession {
                    render_homework_list(output, self.homework.homeworks());
                }
            }
            ShellCommand::Generate {
                topic,
                difficulty,
                materials,
            } => {
                if session.is_none() {
                    output.info(HomeworkListScreen::EMPTY_PROMPT);
                    return Flow::Continue;
                }
                self.prepare_form(session, topic, difficulty, &materials).await;
                output.info("Generating homework...");
                if let Some(created) = self.homework.create(session, &mut self.form, output).await {
                    output.success(&format!(
                        "Generated '{}' with {} tasks",
                        created.title,
                        created.tasks.len()
                    ));
                    output.hint(&format!("Open it with: open {}", created.id));
                    render_homework_list(output, self.homework.homeworks());
                }
            }
            ShellCommand::Open(homework_id) => {
                let mut screen = HomeworkDetailScreen::new(self.auth.api().clone(), homework_id);
                screen.load().await;
                let Some(homework) = screen.homework() else {
                    output.error(&format!("Could not load homework {}", screen.homework_id()));
                    return Flow::Continue;
                };
                render_homework(output, homework, screen.can_submit());
                self.detail = Some(screen);
            }
            ShellCommand::Solve { task, path } => {
                let Some(detail) = self.detail.as_mut() else {
                    output.error("Open a homework first: open <homework-id>");
                    return Flow::Continue;
                };
                let Some(file) = read_upload(output, path).await else {
                    return Flow::Continue;
                };
                if let Some(updated) = detail.upload_task_solution(&task, file, output).await {
                    output.success(&format!("Uploaded solution for task {}", updated.task_number));
                    if let Some(homework) = detail.homework() {
                        render_homework(output, homework, detail.can_submit());
                    }
                }
            }
            ShellCommand::Submit => {
                let Some(detail) = self.detail.as_mut() else {
                    output.error("Open a homework first: open <homework-id>");
                    return Flow::Continue;
                };
                if detail.submit(output).await.is_some() {
                    if let Some(homework) = detail.homework() {
                        render_homework(output, homework, detail.can_submit());
                    }
                }
            }
            ShellCommand::MindMaps => {
                let state = self.mind_maps.load(session).await;
                report(output, state, MindMapsScreen::EMPTY_PROMPT);
                if state != ScreenState::NoSession {
                    render_mind_maps(output, self.mind_maps.mind_maps());
                }
            }
            ShellCommand::MindMap => {
                if session.is_none() {
                    output.info(MindMapsScreen::EMPTY_PROMPT);
                    return Flow::Continue;
                }
                output.info("Generating mind map...");
                if let Some(mind_map) = self.mind_maps.generate(session, output).await {
                    output.success(&format!("Generated '{}'", mind_map.title));
                    render_mind_maps(output, self.mind_maps.mind_maps());
                }
            }
            ShellCommand::WhoAmI => self.show_status(),
            ShellCommand::Logout => {
                if let Err(e) = self.auth.logout() {
                    output.warning(&format!("Stored credentials could not be removed: {}", e));
                }
                output.success("Logged out");
                return Flow::Exit;
            }
            ShellCommand::Quit => return Flow::Exit,
        }

        Flow::Continue
    }

    fn select_session(&mut self, key: &str) {
        let sessions = self.sessions.sessions();
        let id = match key.strip_prefix('#') {
            Some(index) => {
                let found = index
                    .parse::<usize>()
                    .ok()
                    .and_then(|n| n.checked_sub(1))
                    .and_then(|n| sessions.get(n));
                match found {
                    Some(session) => session.id.clone(),
                    None => {
                        self.output.error(&format!("No session {} in the list", key));
                        return;
                    }
                }
            }
            None => key.to_string(),
        };

        match sessions.iter().find(|s| s.id == id) {
            Some(session) => self.output.success(&format!("Switched to '{}'", session.title)),
            None => self
                .output
                .warning(&format!("Session {} is not in the cached list; selecting it anyway", id)),
        }
        self.sessions.set_current_session_id(id);
    }

    async fn prepare_form(
        &mut self,
        session: Option<&str>,
        topic: String,
        difficulty: Difficulty,
        materials: &[String],
    ) {
        self.form.open(session).await;
        self.form.reset();
        self.form.topic = topic;
        self.form.difficulty = difficulty;

        for id in materials {
            if !self.form.available_materials().iter().any(|m| &m.id == id) {
                self.output
                    .warning(&format!("Material {} is not in this session's list", id));
            }
            if !self.form.selected_materials().contains(id) {
                self.form.toggle_material(id);
            }
        }
    }

    fn show_sessions(&self) {
        render_sessions(
            self.output,
            &self.sessions.sessions(),
            self.sessions.current_session_id().as_deref(),
        );
    }

    fn show_status(&self) {
        let output = self.output;
        output.header("Status");
        match self.auth.user() {
            Some(user) => {
                output.kv("User", &user.display_name());
                output.kv("Email", &user.email);
            }
            None => output.kv("User", "not signed in"),
        }
        output.kv("Backend", self.auth.api().base_url());
        let current = self
            .sessions
            .current_session()
            .map(|s| s.title)
            .or_else(|| self.sessions.current_session_id())
            .unwrap_or_else(|| "none".to_string());
        output.kv("Session", &current);
    }

    fn print_prompt(&self) {
        let label = self
            .sessions
            .current_session()
            .map(|s| s.title)
            .unwrap_or_default();
        if label.is_empty() {
            print!("study> ");
        } else {
            print!("study [{}]> ", label);
        }
        std::io::stdout().flush().ok();
    }
}

async fn read_upload(output: &Output, path: PathBuf) -> Option<FileUpload> {
    match FileUpload::from_path(&path).await {
        Ok(file) => Some(file),
        Err(e) => {
            output.error(&format!("Cannot read {}: {}", path.display(), e));
            None
        }
    }
}

fn report(output: &Output, state: ScreenState, empty_prompt: &str) {
    match state {
        ScreenState::NoSession => output.info(empty_prompt),
        ScreenState::Stale => output.warning("Could not refresh; showing previous data."),
        ScreenState::Ready => {}
    }
}

fn print_help(output: &Output) {
    output.header("Commands");
    let commands = [
        ("sessions", "list sessions (* marks the selected one)"),
        ("new <title>", "create a session and select it"),
        ("use <id|#n>", "select a session by id or list position"),
        ("chat", "show the selected session's messages"),
        ("say <text>", "send a message"),
        ("materials", "list study materials"),
        ("upload <path>", "upload a study material"),
        ("homework", "list homework"),
        ("generate <topic> [--difficulty d] [--material id]...", "generate homework"),
        ("open <homework-id>", "show one homework"),
        ("solve <task> <path>", "upload a solution for a task of the open homework"),
        ("submit", "submit the open homework for review"),
        ("mindmaps", "list mind maps"),
        ("mindmap", "generate a mind map from the conversation"),
        ("whoami", "show the signed-in user"),
        ("logout", "sign out and leave the shell"),
        ("quit", "leave the shell"),
    ];
    for (usage, description) in commands {
        output.kv(usage, description);
    }
}

fn render_sessions(output: &Output, sessions: &[Session], current: Option<&str>) {
    output.header("Sessions");
    if sessions.is_empty() {
        output.info("No sessions yet. Create one with: new <title>");
        return;
    }
    for (i, session) in sessions.iter().enumerate() {
        let marker = if current == Some(session.id.as_str()) { "*" } else { " " };
        output.list_item(&format!(
            "{} #{} {} ({})",
            marker,
            i + 1,
            session.title,
            format_time(&session.created_at)
        ));
    }
}

fn render_messages(output: &Output, messages: &[Message]) {
    if messages.is_empty() {
        return;
    }
    output.newline();
    for message in messages {
        output.message(&message.role.to_string(), &message.content);
    }
}

fn render_materials(output: &Output, materials: &[Material]) {
    output.header("Materials");
    if materials.is_empty() {
        output.info("No materials uploaded yet.");
        return;
    }
    output.table_header(&["Name", "Type", "Size", "Uploaded"]);
    for material in materials {
        output.table_row(&[
            &material.name,
            &material.file_type.to_string(),
            &format_size(material.size),
            &format_time(&material.uploaded_at),
        ]);
    }
}

fn render_homework_list(output: &Output, homeworks: &[Homework]) {
    output.header("Homework");
    if homeworks.is_empty() {
        output.info("No homework yet. Generate some with: generate <topic>");
        return;
    }
    for homework in homeworks {
        let grade = homework
            .latest_review()
            .and_then(|r| r.grade)
            .map(|g| format!(", grade {}", g))
            .unwrap_or_default();
        output.list_item(&format!(
            "{} [{}] {} tasks{} ({})",
            homework.title,
            homework.status,
            homework.tasks.len(),
            grade,
            homework.id
        ));
    }
}

fn render_homework(output: &Output, homework: &Homework, can_submit: bool) {
    output.header(&homework.title);
    output.kv("Status", homework.status.label());
    output.kv("Generated", &format_time(&homework.generated_at));
    if let Some(submitted_at) = &homework.submitted_at {
        output.kv("Submitted", &format_time(submitted_at));
    }

    if let Some(review) = homework.latest_review() {
        output.subheader("Review");
        if let Some(grade) = review.grade {
            output.kv("Grade", &grade.to_string());
        }
        if let Some(feedback) = &review.overall_feedback {
            output.kv("Feedback", feedback);
        }
    }

    for task in &homework.tasks {
        output.subheader(&format!("Task {}", task.task_number));
        output.info(&task.description);
        match &task.uploaded_file_url {
            Some(url) => output.kv("Solution", url),
            None => output.kv("Solution", "not uploaded"),
        }
        if let Some(review) = task.latest_review() {
            if let Some(feedback) = &review.task_feedback {
                output.kv("Feedback", feedback);
            }
            if let Some(score) = review.score {
                output.kv("Score", &score.to_string());
            }
        }
    }

    if can_submit {
        output.hint("Upload solutions with 'solve <task> <path>', then 'submit'.");
    }
}

fn render_mind_maps(output: &Output, mind_maps: &[MindMap]) {
    output.header("Mind maps");
    if mind_maps.is_empty() {
        output.info("No mind maps yet. Generate one with: mindmap");
        return;
    }
    for mind_map in mind_maps {
        output.list_item(&format!(
            "{} ({} nodes, {})",
            mind_map.title,
            mind_map.node_count,
            format_time(&mind_map.created_at)
        ));
    }
}

fn format_time(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M").to_string()
}

fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
