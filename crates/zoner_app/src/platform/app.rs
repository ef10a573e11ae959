use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use chrono::Local;
use zoner_core::{Dispatcher, DispatchOutcome, DocumentForm, DocumentStatus, Msg, QueryId, QueryState};
use zoner_engine::{EngineEvent, EngineEvents, EngineHandle};
use zoner_logging::{zoner_debug, zoner_info, zoner_warn, LogDestination};

use super::config::{load_config, ZonerConfig};
use super::effects::{EngineRequests, EngineTimers};
use super::input::{parse_line, Command, HELP};
use super::render;

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    let destination = if config.log_to_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    zoner_logging::initialize(destination, config.verbose);
    zoner_info!("Starting zoner client against {}", config.api_base);

    let (engine, events) = EngineHandle::new(config.client_settings())?;
    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbox>();
    spawn_stdin_reader(inbox_tx.clone());
    spawn_event_pump(events, inbox_tx);

    let mut app = App::new(&config, engine, io::stdout());
    app.say(&format!("Zoner client ({}). Type :help for commands.", config.api_base));
    while let Ok(item) = inbox_rx.recv() {
        if app.handle(item) == Flow::Quit {
            break;
        }
    }
    zoner_info!("Exiting");
    Ok(())
}

/// Everything the event loop reacts to, in delivery order.
enum Inbox {
    Line(String),
    Engine(EngineEvent),
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

fn spawn_stdin_reader(tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(Inbox::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    zoner_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(Inbox::InputClosed);
    });
}

fn spawn_event_pump(events: EngineEvents, tx: mpsc::Sender<Inbox>) {
    thread::spawn(move || {
        while let Some(event) = events.recv() {
            if tx.send(Inbox::Engine(event)).is_err() {
                break;
            }
        }
    });
}

/// Owns the dispatcher; only the event-loop thread touches it.
struct App<W: Write> {
    dispatcher: Dispatcher<EngineTimers, EngineRequests>,
    engine: EngineHandle,
    form: DocumentForm,
    /// Query text as typed so far; `:newline` makes the next line append.
    draft: String,
    continue_line: bool,
    latest_query_id: QueryId,
    out: W,
}

impl<W: Write> App<W> {
    fn new(config: &ZonerConfig, engine: EngineHandle, out: W) -> Self {
        let dispatcher = Dispatcher::with_state(
            QueryState::with_quiet_period(config.quiet_period()),
            EngineTimers::new(engine.clone()),
            EngineRequests::new(engine.clone()),
        );
        Self {
            dispatcher,
            engine,
            form: DocumentForm {
                document_type: config.default_document_type.clone(),
                ..DocumentForm::default()
            },
            draft: String::new(),
            continue_line: false,
            latest_query_id: 0,
            out,
        }
    }

    fn handle(&mut self, item: Inbox) -> Flow {
        let flow = match item {
            Inbox::Line(line) => self.handle_command(parse_line(&line)),
            Inbox::Engine(event) => {
                self.handle_engine_event(event);
                Flow::Continue
            }
            Inbox::InputClosed => Flow::Quit,
        };
        if self.dispatcher.consume_dirty() {
            zoner_debug!("view: {:?}", self.dispatcher.view());
        }
        flow
    }

    fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Edit(text) => {
                if self.continue_line && !text.is_empty() {
                    self.draft.push('\n');
                    self.draft.push_str(&text);
                } else {
                    self.draft = text;
                }
                self.continue_line = false;
                self.dispatcher.on_input_changed(self.draft.clone());
            }
            Command::Submit => {
                self.continue_line = false;
                self.dispatcher.on_submit_key(false);
                self.report_outcome();
            }
            Command::Newline => {
                self.dispatcher.on_submit_key(true);
                self.continue_line = true;
            }
            Command::SetDocumentType(value) => self.form.document_type = value,
            Command::SetDocumentInfo(value) => self.form.document_info = value,
            Command::SetUploadPath(value) => self.form.upload_path = value,
            Command::AcceptTerms => {
                self.form.terms_accepted = true;
                self.say("Terms accepted.");
            }
            Command::Load => self.load_document(),
            Command::Regenerate => {
                self.dispatcher.regenerate();
                self.report_outcome();
            }
            Command::Report => {
                self.dispatcher.report_issue();
                self.say("Reporting...");
            }
            Command::Reset => {
                self.dispatcher.reset();
                self.draft.clear();
                self.continue_line = false;
                self.say("Cleared.");
            }
            Command::Ping => self.engine.check_connection(),
            Command::Status => {
                let text = render::status(&self.dispatcher.view(), &self.form);
                self.say(&text);
            }
            Command::Help => self.say(HELP),
            Command::Quit => return Flow::Quit,
            Command::Unknown(name) => {
                self.say(&format!("Unknown command :{name}. Type :help for the list."));
            }
        }
        Flow::Continue
    }

    fn load_document(&mut self) {
        let was_loading = self.dispatcher.view().document_status == DocumentStatus::Loading;
        self.dispatcher.load_document(self.form.clone());
        let view = self.dispatcher.view();
        if was_loading {
            self.say("A document load is already in progress.");
        } else if let Some(error) = view.form_error {
            self.say(&format!("Cannot load document: {error}."));
        } else {
            self.say("Loading document...");
        }
    }

    fn handle_engine_event(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimerFired(timer) => {
                let before = self.dispatcher.view().last_outcome;
                self.dispatcher.on_quiet_period_elapsed(timer);
                if self.dispatcher.view().last_outcome != before {
                    self.report_outcome();
                }
            }
            EngineEvent::DocumentLoaded(Ok(document)) => {
                self.say(&render::loaded_document(&document));
                self.draft.clear();
                self.continue_line = false;
                self.dispatcher.handle(Msg::DocumentLoaded);
            }
            EngineEvent::DocumentLoaded(Err(error)) => {
                zoner_warn!("Load document error: {}", error);
                self.say(&render::load_failed(&error));
                self.dispatcher
                    .handle(Msg::DocumentLoadFailed(error.to_string()));
            }
            EngineEvent::QueryCompleted {
                query_id,
                kind,
                result,
            } => {
                let superseded_by =
                    (self.latest_query_id > query_id).then_some(self.latest_query_id);
                let text = match result {
                    Ok(answer) => {
                        render::answer(query_id, kind, &answer, superseded_by, Local::now())
                    }
                    Err(error) => {
                        zoner_warn!("Query {} failed: {}", query_id, error);
                        render::query_failed(query_id, kind, &error)
                    }
                };
                self.say(&text);
            }
            EngineEvent::IssueReported(result) => {
                let text = match result {
                    Ok(ticket) => render::ticket(&ticket),
                    Err(error) => render::report_failed(&error),
                };
                self.say(&text);
            }
            EngineEvent::ConnectionChecked(result) => {
                let text = match result {
                    Ok(check) => render::connection(&check),
                    Err(error) => render::connection_failed(&error),
                };
                self.say(&text);
            }
        }
    }

    fn report_outcome(&mut self) {
        let Some(outcome) = self.dispatcher.view().last_outcome else {
            return;
        };
        if let DispatchOutcome::Dispatched { query_id, .. }
        | DispatchOutcome::Regenerated { query_id, .. } = &outcome
        {
            self.latest_query_id = self.latest_query_id.max(*query_id);
        }
        self.say(&render::outcome(&outcome));
    }

    fn say(&mut self, text: &str) {
        let _ = writeln!(self.out, "{text}");
        let _ = self.out.flush();
    }
}
