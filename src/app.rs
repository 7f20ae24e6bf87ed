use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use crate::ai::{DiscoverClient, DiscoveredSource};
use crate::api::{ApiClient, QueryOutcome};
use crate::config::Config;
use crate::discover::{DiscoverWizard, WizardStep};
use crate::error::Result;
use crate::models::{Block, Conversation, MessageItem, NewNotebook, Notebook};
use crate::sync::notices;
use crate::sync::{ConversationList, Mirror, NoteList, Notice, NoticeLevel, NoticeSender, SourceList};
use crate::tui::AppAction;

// How long a notice stays on the status line.
const NOTICE_TTL: Duration = Duration::from_secs(5);
const MAX_NOTICES: usize = 4;

// Message for a completed chat answer
pub struct AskResult {
    pub conversation_id: String,
    pub result: std::result::Result<QueryOutcome, String>,
}

// Message for a completed discover search
pub struct SearchResult {
    pub generation: u64,
    pub result: std::result::Result<Vec<DiscoveredSource>, String>,
}

// Message for a completed file upload
pub struct UploadResult {
    pub notebook_id: String,
    pub result: std::result::Result<Vec<crate::models::SourceFile>, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Sources,
    History,
    Chat,
    Notes,
}

impl Pane {
    pub fn next(self) -> Self {
        match self {
            Pane::Sources => Pane::History,
            Pane::History => Pane::Chat,
            Pane::Chat => Pane::Notes,
            Pane::Notes => Pane::Sources,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Pane::Sources => Pane::Notes,
            Pane::History => Pane::Sources,
            Pane::Chat => Pane::History,
            Pane::Notes => Pane::Chat,
        }
    }
}

#[derive(Debug, Clone)]
pub enum PromptKind {
    NewNotebook,
    RenameNotebook { id: String },
    UploadPaths,
    RenameSource { id: String },
    NewNote,
    RenameNote { id: String },
    RenameConversation { id: String },
    AddParagraph { note_id: String },
}

/// A modal one-line text prompt.
#[derive(Debug, Clone)]
pub struct Prompt {
    pub kind: PromptKind,
    pub value: String,
}

impl Prompt {
    fn new(kind: PromptKind) -> Self {
        Self {
            kind,
            value: String::new(),
        }
    }

    fn with_value(kind: PromptKind, value: String) -> Self {
        Self { kind, value }
    }

    pub fn label(&self) -> &'static str {
        match self.kind {
            PromptKind::NewNotebook => "New notebook title",
            PromptKind::RenameNotebook { .. } => "Rename notebook",
            PromptKind::UploadPaths => "File paths (space separated)",
            PromptKind::RenameSource { .. } => "Rename source",
            PromptKind::NewNote => "New note title",
            PromptKind::RenameNote { .. } => "Rename note",
            PromptKind::RenameConversation { .. } => "Rename conversation",
            PromptKind::AddParagraph { .. } => "Add paragraph",
        }
    }
}

/// Everything scoped to the currently open notebook. Dropped wholesale
/// when the user goes back home, which also invalidates any in-flight
/// results tagged with this notebook's ids.
pub struct Workspace {
    pub notebook_id: String,
    pub title: String,
    pub sources: SourceList,
    pub conversations: ConversationList,
    pub notes: NoteList,
    pub chat: Conversation,
    pub open_note: Option<crate::models::Note>,
    pub wizard: Option<DiscoverWizard>,
    pub pane: Pane,
    pub source_cursor: usize,
    pub history_cursor: usize,
    pub note_cursor: usize,
    pub chat_input: String,
    pub chat_input_active: bool,
}

fn clamp(cursor: &mut usize, len: usize) {
    if *cursor >= len {
        *cursor = len.saturating_sub(1);
    }
}

impl Workspace {
    pub fn selected_source_id(&self) -> Option<String> {
        self.sources
            .files()
            .get(self.source_cursor)
            .map(|f| f.public_id.clone())
    }

    pub fn selected_history_id(&self) -> Option<String> {
        self.conversations
            .conversations()
            .get(self.history_cursor)
            .map(|c| c.id.clone())
    }

    pub fn selected_note_id(&self) -> Option<String> {
        self.notes.notes().get(self.note_cursor).map(|n| n.id.clone())
    }

    pub fn move_up(&mut self) {
        match self.pane {
            Pane::Sources => self.source_cursor = self.source_cursor.saturating_sub(1),
            Pane::History => self.history_cursor = self.history_cursor.saturating_sub(1),
            Pane::Notes => self.note_cursor = self.note_cursor.saturating_sub(1),
            Pane::Chat => {}
        }
    }

    pub fn move_down(&mut self) {
        match self.pane {
            Pane::Sources => {
                let len = self.sources.len();
                if len > 0 && self.source_cursor < len - 1 {
                    self.source_cursor += 1;
                }
            }
            Pane::History => {
                let len = self.conversations.conversations().len();
                if len > 0 && self.history_cursor < len - 1 {
                    self.history_cursor += 1;
                }
            }
            Pane::Notes => {
                let len = self.notes.len();
                if len > 0 && self.note_cursor < len - 1 {
                    self.note_cursor += 1;
                }
            }
            Pane::Chat => {}
        }
    }

    fn clamp_cursors(&mut self) {
        clamp(&mut self.source_cursor, self.sources.len());
        clamp(&mut self.history_cursor, self.conversations.conversations().len());
        clamp(&mut self.note_cursor, self.notes.len());
    }
}

pub struct App {
    // Data
    pub notebooks: Mirror<Notebook>,
    pub workspace: Option<Workspace>,

    // UI state
    pub home_cursor: usize,
    pub show_help: bool,
    pub prompt: Option<Prompt>,
    pub spinner_frame: usize,
    notices: VecDeque<(Notice, Instant)>,

    // Async state
    pending_ask: Option<String>,
    pending_upload: Option<String>,
    ask_rx: mpsc::Receiver<AskResult>,
    ask_tx: mpsc::Sender<AskResult>,
    search_rx: mpsc::Receiver<SearchResult>,
    search_tx: mpsc::Sender<SearchResult>,
    upload_rx: mpsc::Receiver<UploadResult>,
    upload_tx: mpsc::Sender<UploadResult>,
    notice_rx: mpsc::UnboundedReceiver<Notice>,
    notice_tx: NoticeSender,

    // Services
    api: ApiClient,
    discover: Option<Arc<DiscoverClient>>,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let api = ApiClient::new(config)?;

        let discover = config
            .claude_api_key
            .as_ref()
            .map(|key| Arc::new(DiscoverClient::new(key.clone(), config.discover_timeout_secs)));

        let notebooks = api.list_notebooks().await?;

        let (notice_tx, notice_rx) = notices::channel();
        let (ask_tx, ask_rx) = mpsc::channel(1);
        let (search_tx, search_rx) = mpsc::channel(1);
        let (upload_tx, upload_rx) = mpsc::channel(1);

        Ok(Self {
            notebooks: Mirror::new(notebooks),
            workspace: None,
            home_cursor: 0,
            show_help: false,
            prompt: None,
            spinner_frame: 0,
            notices: VecDeque::new(),
            pending_ask: None,
            pending_upload: None,
            ask_rx,
            ask_tx,
            search_rx,
            search_tx,
            upload_rx,
            upload_tx,
            notice_rx,
            notice_tx,
            api,
            discover,
        })
    }

    pub fn latest_notice(&self) -> Option<&Notice> {
        self.notices.back().map(|(notice, _)| notice)
    }

    /// True while the open conversation waits for an answer.
    pub fn asking(&self) -> bool {
        match (&self.pending_ask, &self.workspace) {
            (Some(id), Some(ws)) => ws.conversations.selected() == Some(id.as_str()),
            _ => false,
        }
    }

    /// True while the open notebook has an upload in flight.
    pub fn uploading(&self) -> bool {
        match (&self.pending_upload, &self.workspace) {
            (Some(id), Some(ws)) => ws.notebook_id == *id,
            _ => false,
        }
    }

    pub fn wizard_step(&self) -> Option<WizardStep> {
        self.workspace
            .as_ref()?
            .wizard
            .as_ref()
            .map(|wizard| wizard.step)
    }

    pub fn chat_input_active(&self) -> bool {
        self.workspace
            .as_ref()
            .map(|ws| ws.chat_input_active)
            .unwrap_or(false)
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::MoveUp => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.move_up();
                } else if self.home_cursor > 0 {
                    self.home_cursor -= 1;
                }
            }

            AppAction::MoveDown => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.move_down();
                } else {
                    let len = self.notebooks.len();
                    if len > 0 && self.home_cursor < len - 1 {
                        self.home_cursor += 1;
                    }
                }
            }

            AppAction::FocusNext => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.pane = ws.pane.next();
                }
            }

            AppAction::FocusPrev => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.pane = ws.pane.prev();
                }
            }

            AppAction::Select => {
                self.select_current().await;
            }

            AppAction::Back => {
                let mut leave = false;
                if let Some(ws) = self.workspace.as_mut() {
                    if ws.open_note.is_some() {
                        ws.open_note = None;
                    } else {
                        leave = true;
                    }
                }
                if leave {
                    self.workspace = None;
                    self.refresh_notebooks().await;
                }
            }

            AppAction::New => {
                self.create_in_context().await;
            }

            AppAction::Delete => {
                if self.workspace.is_some() {
                    self.delete_in_workspace().await;
                } else {
                    self.delete_selected_notebook().await;
                }
            }

            AppAction::Rename => {
                self.start_rename();
            }

            AppAction::ToggleChecked => {
                if let Some(ws) = self.workspace.as_mut() {
                    if ws.pane == Pane::Sources {
                        if let Some(id) = ws.selected_source_id() {
                            ws.sources.toggle_checked(&id).await;
                        }
                    }
                }
            }

            AppAction::ToggleAllChecked => {
                if let Some(ws) = self.workspace.as_mut() {
                    if ws.pane == Pane::Sources {
                        ws.sources.toggle_all().await;
                    }
                }
            }

            AppAction::Download => {
                if let Some(ws) = self.workspace.as_mut() {
                    if ws.pane == Pane::Sources {
                        if let Some(id) = ws.selected_source_id() {
                            ws.sources.download(&id);
                        }
                    }
                }
            }

            AppAction::Upload => {
                if self.workspace.is_some() {
                    self.prompt = Some(Prompt::new(PromptKind::UploadPaths));
                }
            }

            AppAction::Discover => {
                self.open_discover();
            }

            AppAction::AddParagraph => {
                if let Some(ws) = self.workspace.as_ref() {
                    if let Some(note) = ws.open_note.as_ref() {
                        self.prompt = Some(Prompt::new(PromptKind::AddParagraph {
                            note_id: note.id.clone(),
                        }));
                    }
                }
            }

            AppAction::StartChatInput => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.pane = Pane::Chat;
                    ws.chat_input_active = true;
                }
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }

            AppAction::ChatInputChar(c) => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.chat_input.push(c);
                }
            }

            AppAction::ChatInputBackspace => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.chat_input.pop();
                }
            }

            AppAction::ChatInputConfirm => {
                self.send_chat_message();
            }

            AppAction::ChatInputCancel => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.chat_input_active = false;
                }
            }

            AppAction::PromptChar(c) => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.value.push(c);
                }
            }

            AppAction::PromptBackspace => {
                if let Some(prompt) = self.prompt.as_mut() {
                    prompt.value.pop();
                }
            }

            AppAction::PromptConfirm => {
                self.confirm_prompt().await;
            }

            AppAction::PromptCancel => {
                self.prompt = None;
            }

            AppAction::TopicChar(c) => {
                if let Some(wizard) = self.wizard_mut() {
                    wizard.topic.push(c);
                }
            }

            AppAction::TopicBackspace => {
                if let Some(wizard) = self.wizard_mut() {
                    wizard.topic.pop();
                }
            }

            AppAction::TopicConfirm => {
                self.start_discover_search();
            }

            AppAction::TopicCancel => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.wizard = None;
                }
            }

            AppAction::WizardUp => {
                if let Some(wizard) = self.wizard_mut() {
                    wizard.move_up();
                }
            }

            AppAction::WizardDown => {
                if let Some(wizard) = self.wizard_mut() {
                    wizard.move_down();
                }
            }

            AppAction::WizardToggle => {
                if let Some(wizard) = self.wizard_mut() {
                    wizard.toggle_candidate();
                }
            }

            AppAction::WizardToggleAll => {
                if let Some(wizard) = self.wizard_mut() {
                    wizard.toggle_all_candidates();
                }
            }

            AppAction::WizardConfirm => {
                self.import_discovered().await;
            }

            AppAction::WizardBack => {
                if let Some(wizard) = self.wizard_mut() {
                    wizard.back();
                }
            }
        }

        Ok(false)
    }

    fn wizard_mut(&mut self) -> Option<&mut DiscoverWizard> {
        self.workspace.as_mut()?.wizard.as_mut()
    }

    async fn select_current(&mut self) {
        if self.workspace.is_none() {
            let Some(notebook) = self.notebooks.items().get(self.home_cursor) else {
                return;
            };
            let id = notebook.id.clone();
            let title = notebook.title.clone();
            self.open_notebook(id, title).await;
            return;
        }

        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        match ws.pane {
            Pane::Sources => {
                if let Some(id) = ws.selected_source_id() {
                    ws.sources.download(&id);
                }
            }
            Pane::History => {
                if let Some(id) = ws.selected_history_id() {
                    ws.conversations.select(&id);
                    let title = ws
                        .conversations
                        .conversations()
                        .iter()
                        .find(|c| c.id == id)
                        .map(|c| c.title.clone())
                        .unwrap_or_else(|| "New chat".to_string());
                    match ws.conversations.load_selected().await {
                        Some(chat) => ws.chat = chat,
                        None => {
                            ws.chat = Conversation {
                                title,
                                messages: Vec::new(),
                            }
                        }
                    }
                }
            }
            Pane::Notes => {
                if let Some(id) = ws.selected_note_id() {
                    if let Some(note) = ws.notes.open(&id).await {
                        ws.open_note = Some(note);
                    }
                }
            }
            Pane::Chat => {
                ws.chat_input_active = true;
            }
        }
    }

    async fn create_in_context(&mut self) {
        if self.workspace.is_none() {
            self.prompt = Some(Prompt::new(PromptKind::NewNotebook));
            return;
        }
        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        match ws.pane {
            Pane::Sources => {
                self.prompt = Some(Prompt::new(PromptKind::UploadPaths));
            }
            Pane::Notes => {
                self.prompt = Some(Prompt::new(PromptKind::NewNote));
            }
            Pane::History | Pane::Chat => {
                if ws.conversations.create().await.is_some() {
                    ws.chat = Conversation {
                        title: "New chat".to_string(),
                        messages: Vec::new(),
                    };
                    ws.history_cursor = 0;
                }
            }
        }
    }

    async fn delete_in_workspace(&mut self) {
        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        match ws.pane {
            Pane::Sources => {
                if let Some(id) = ws.selected_source_id() {
                    ws.sources.delete(&id).await;
                }
            }
            Pane::History => {
                if let Some(id) = ws.selected_history_id() {
                    let before = ws.conversations.selected().map(String::from);
                    ws.conversations.remove(&id).await;
                    if before.as_deref() != ws.conversations.selected() {
                        match ws.conversations.load_selected().await {
                            Some(chat) => ws.chat = chat,
                            None => {
                                ws.chat = Conversation {
                                    title: "New chat".to_string(),
                                    messages: Vec::new(),
                                }
                            }
                        }
                        ws.history_cursor = 0;
                    }
                }
            }
            Pane::Notes => {
                if let Some(id) = ws.selected_note_id() {
                    ws.notes.remove(&id).await;
                    let still_there = ws.notes.notes().iter().any(|n| n.id == id);
                    if !still_there
                        && ws.open_note.as_ref().map(|n| n.id.as_str()) == Some(id.as_str())
                    {
                        ws.open_note = None;
                    }
                }
            }
            Pane::Chat => {}
        }
        ws.clamp_cursors();
    }

    async fn delete_selected_notebook(&mut self) {
        let Some(notebook) = self.notebooks.items().get(self.home_cursor) else {
            return;
        };
        let id = notebook.id.clone();
        let avatar_id = notebook.id_avatar.clone();
        match self.api.delete_notebook(&id, avatar_id.as_deref()).await {
            Ok(()) => {
                self.notebooks.remove(&id);
                clamp(&mut self.home_cursor, self.notebooks.len());
            }
            Err(e) => {
                tracing::error!("Failed to delete notebook {}: {}", id, e);
                self.push_notice(NoticeLevel::Error, "Failed to delete notebook");
            }
        }
    }

    fn start_rename(&mut self) {
        let Some(ws) = self.workspace.as_ref() else {
            if let Some(notebook) = self.notebooks.items().get(self.home_cursor) {
                self.prompt = Some(Prompt::with_value(
                    PromptKind::RenameNotebook {
                        id: notebook.id.clone(),
                    },
                    notebook.title.clone(),
                ));
            }
            return;
        };
        match ws.pane {
            Pane::Sources => {
                if let Some(file) = ws.sources.files().get(ws.source_cursor) {
                    self.prompt = Some(Prompt::with_value(
                        PromptKind::RenameSource {
                            id: file.public_id.clone(),
                        },
                        file.title.clone(),
                    ));
                }
            }
            Pane::History => {
                if let Some(conversation) = ws.conversations.conversations().get(ws.history_cursor)
                {
                    self.prompt = Some(Prompt::with_value(
                        PromptKind::RenameConversation {
                            id: conversation.id.clone(),
                        },
                        conversation.title.clone(),
                    ));
                }
            }
            Pane::Notes => {
                if let Some(note) = ws.notes.notes().get(ws.note_cursor) {
                    self.prompt = Some(Prompt::with_value(
                        PromptKind::RenameNote {
                            id: note.id.clone(),
                        },
                        note.title.clone(),
                    ));
                }
            }
            Pane::Chat => {}
        }
    }

    async fn confirm_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let value = prompt.value.trim().to_string();
        if value.is_empty() {
            return;
        }

        match prompt.kind {
            PromptKind::NewNotebook => {
                self.create_notebook(value).await;
            }
            PromptKind::RenameNotebook { id } => {
                match self.api.rename_notebook(&id, &value).await {
                    Ok(()) => {
                        let title = value.clone();
                        self.notebooks.patch(&id, move |n| n.title = title);
                    }
                    Err(e) => {
                        tracing::error!("Failed to rename notebook {}: {}", id, e);
                        self.push_notice(NoticeLevel::Error, "Failed to rename notebook");
                    }
                }
            }
            PromptKind::UploadPaths => {
                let paths: Vec<PathBuf> = value.split_whitespace().map(PathBuf::from).collect();
                self.start_upload(paths);
            }
            PromptKind::RenameSource { id } => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.sources.rename(&id, &value).await;
                }
            }
            PromptKind::NewNote => {
                if let Some(ws) = self.workspace.as_mut() {
                    if let Some(note) = ws.notes.create(&value, Vec::new()).await {
                        ws.open_note = Some(note);
                        ws.note_cursor = 0;
                    }
                }
            }
            PromptKind::RenameNote { id } => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.notes.rename(&id, &value).await;
                    let renamed = ws
                        .notes
                        .notes()
                        .iter()
                        .any(|n| n.id == id && n.title == value);
                    if renamed {
                        if let Some(note) = ws.open_note.as_mut() {
                            if note.id == id {
                                note.title = value;
                            }
                        }
                    }
                }
            }
            PromptKind::RenameConversation { id } => {
                if let Some(ws) = self.workspace.as_mut() {
                    ws.conversations.rename(&id, &value).await;
                    let renamed = ws
                        .conversations
                        .conversations()
                        .iter()
                        .any(|c| c.id == id && c.title == value);
                    if renamed && ws.conversations.selected() == Some(id.as_str()) {
                        ws.chat.title = value;
                    }
                }
            }
            PromptKind::AddParagraph { note_id } => {
                if let Some(ws) = self.workspace.as_mut() {
                    let Some(note) = ws.open_note.as_ref() else {
                        return;
                    };
                    if note.id != note_id {
                        return;
                    }
                    let title = note.title.clone();
                    let mut blocks = note.blocks.clone();
                    blocks.push(Block::paragraph(&value));
                    if let Some(updated) = ws.notes.save(&note_id, &title, blocks).await {
                        ws.open_note = Some(updated);
                    }
                }
            }
        }
    }

    async fn create_notebook(&mut self, title: String) {
        let payload = NewNotebook::new(title);
        match self.api.create_notebook(&payload).await {
            Ok(created) => {
                self.notebooks.prepend(Notebook {
                    id: created.notebook_id.clone(),
                    title: payload.title.clone(),
                    avatar: payload.avatar.clone(),
                    bgcolor: payload.bgcolor.clone(),
                    id_avatar: None,
                    created_at: None,
                    updated_at: None,
                });
                self.home_cursor = 0;
                self.enter_workspace(created.notebook_id, payload.title, created.conversation_id)
                    .await;
            }
            Err(e) => {
                tracing::error!("Failed to create notebook: {}", e);
                self.push_notice(NoticeLevel::Error, "Failed to create notebook");
            }
        }
    }

    async fn open_notebook(&mut self, notebook_id: String, title: String) {
        match self.api.open_notebook(&notebook_id).await {
            Ok(entry) => {
                self.enter_workspace(notebook_id, title, entry.conversation_id)
                    .await;
            }
            Err(e) => {
                tracing::error!("Cannot open notebook {}: {}", notebook_id, e);
                self.push_notice(NoticeLevel::Error, "Cannot open notebook");
            }
        }
    }

    /// Seed the three collections and the current transcript, then
    /// swap in the workspace. Each seed degrades to empty on failure;
    /// the collections stay independently synchronized afterwards.
    async fn enter_workspace(
        &mut self,
        notebook_id: String,
        title: String,
        conversation_id: String,
    ) {
        let (files, conversations, notes) = tokio::join!(
            self.api.list_files(&notebook_id),
            self.api.list_conversations(&notebook_id),
            self.api.list_notes(&notebook_id),
        );
        let files = self.seed_or_empty(files, "Failed to load sources");
        let conversations = self.seed_or_empty(conversations, "Failed to load conversations");
        let notes = self.seed_or_empty(notes, "Failed to load notes");

        let chat = match self.api.get_conversation(&conversation_id).await {
            Ok(chat) => chat,
            Err(e) => {
                tracing::error!("Failed to load conversation {}: {}", conversation_id, e);
                self.push_notice(NoticeLevel::Error, "Failed to load conversation");
                Conversation {
                    title: "New chat".to_string(),
                    messages: Vec::new(),
                }
            }
        };

        let sources = SourceList::new(
            self.api.clone(),
            notebook_id.clone(),
            files,
            self.notice_tx.clone(),
        );
        let conversations = ConversationList::new(
            self.api.clone(),
            notebook_id.clone(),
            conversations,
            Some(conversation_id),
            self.notice_tx.clone(),
        );
        let notes = NoteList::new(
            self.api.clone(),
            notebook_id.clone(),
            notes,
            self.notice_tx.clone(),
        );

        self.workspace = Some(Workspace {
            notebook_id,
            title,
            sources,
            conversations,
            notes,
            chat,
            open_note: None,
            wizard: None,
            pane: Pane::Sources,
            source_cursor: 0,
            history_cursor: 0,
            note_cursor: 0,
            chat_input: String::new(),
            chat_input_active: false,
        });
    }

    fn seed_or_empty<T>(&mut self, result: Result<Vec<T>>, context: &'static str) -> Vec<T> {
        match result {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("{}: {}", context, e);
                self.push_notice(NoticeLevel::Error, context);
                Vec::new()
            }
        }
    }

    async fn refresh_notebooks(&mut self) {
        match self.api.list_notebooks().await {
            Ok(notebooks) => {
                self.notebooks.replace_all(notebooks);
                clamp(&mut self.home_cursor, self.notebooks.len());
            }
            Err(e) => {
                tracing::warn!("Failed to refresh notebooks: {}", e);
            }
        }
    }

    /// Send the chat input as a question. The user's turn is appended
    /// to the transcript right away; the answer arrives through the
    /// ask channel. Only one question can be in flight.
    fn send_chat_message(&mut self) {
        if self.pending_ask.is_some() {
            return;
        }
        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        let text = ws.chat_input.trim().to_string();
        if text.is_empty() {
            return;
        }
        let Some(conversation_id) = ws.conversations.selected().map(String::from) else {
            return;
        };

        let message = MessageItem::user(&text);
        ws.chat.messages.push(message.clone());
        ws.chat_input.clear();

        let checked = ws.sources.checked_ids();
        let file_filters = if checked.is_empty() {
            None
        } else {
            Some(checked)
        };

        self.pending_ask = Some(conversation_id.clone());
        let api = self.api.clone();
        let tx = self.ask_tx.clone();

        tokio::spawn(async move {
            let result = api
                .query_conversation(&conversation_id, &message, &text, file_filters.as_deref())
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(AskResult {
                conversation_id,
                result,
            })
            .await;
        });
    }

    fn open_discover(&mut self) {
        if self.workspace.is_none() {
            return;
        }
        if self.discover.is_none() {
            self.push_notice(
                NoticeLevel::Error,
                "Discover needs claude_api_key in the config",
            );
            return;
        }
        if let Some(ws) = self.workspace.as_mut() {
            ws.wizard = Some(DiscoverWizard::new());
        }
    }

    fn start_discover_search(&mut self) {
        let Some(discover) = self.discover.clone() else {
            return;
        };
        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        let Some(wizard) = ws.wizard.as_mut() else {
            return;
        };
        if wizard.searching {
            return;
        }
        let topic = wizard.topic.trim().to_string();
        if topic.is_empty() {
            return;
        }

        let generation = wizard.begin_search();
        let tx = self.search_tx.clone();

        tokio::spawn(async move {
            let result = discover.search(&topic).await.map_err(|e| e.to_string());
            let _ = tx.send(SearchResult { generation, result }).await;
        });
    }

    async fn import_discovered(&mut self) {
        let Some(ws) = self.workspace.as_mut() else {
            return;
        };
        // The wizard closes whether or not the import goes through.
        let Some(wizard) = ws.wizard.take() else {
            return;
        };
        let payload = wizard.import_payload();
        ws.sources.import(&payload).await;
    }

    fn start_upload(&mut self, paths: Vec<PathBuf>) {
        if paths.is_empty() || self.pending_upload.is_some() {
            return;
        }
        let Some(ws) = self.workspace.as_ref() else {
            return;
        };
        let notebook_id = ws.notebook_id.clone();
        self.pending_upload = Some(notebook_id.clone());
        let api = self.api.clone();
        let tx = self.upload_tx.clone();

        tokio::spawn(async move {
            let result = SourceList::upload(&api, &notebook_id, &paths)
                .await
                .map_err(|e| e.to_string());
            let _ = tx.send(UploadResult {
                notebook_id,
                result,
            })
            .await;
        });
    }

    /// Poll for a completed chat answer (non-blocking). Answers for a
    /// conversation that is no longer open are dropped.
    pub fn poll_ask_result(&mut self) {
        let Ok(result) = self.ask_rx.try_recv() else {
            return;
        };
        if self.pending_ask.as_deref() == Some(result.conversation_id.as_str()) {
            self.pending_ask = None;
        }
        let mut failed = false;
        if let Some(ws) = self.workspace.as_mut() {
            if ws.conversations.selected() == Some(result.conversation_id.as_str()) {
                match result.result {
                    Ok(outcome) => {
                        ws.chat.messages.push(outcome.message);
                    }
                    Err(e) => {
                        tracing::error!("Failed to get an answer: {}", e);
                        failed = true;
                    }
                }
            }
        }
        if failed {
            self.push_notice(NoticeLevel::Error, "Failed to get an answer");
        }
    }

    /// Poll for completed discover searches (non-blocking). The wizard
    /// drops results from a superseded search by generation.
    pub fn poll_search_result(&mut self) {
        let Ok(result) = self.search_rx.try_recv() else {
            return;
        };
        let mut failed = false;
        if let Some(ws) = self.workspace.as_mut() {
            if let Some(wizard) = ws.wizard.as_mut() {
                match result.result {
                    Ok(candidates) => {
                        wizard.apply_results(result.generation, candidates);
                    }
                    Err(e) => {
                        tracing::error!("Discover search failed: {}", e);
                        failed = wizard.search_failed(result.generation);
                    }
                }
            }
        }
        if failed {
            self.push_notice(NoticeLevel::Error, "Discover search failed");
        }
    }

    /// Poll for a completed upload (non-blocking). Results for a
    /// notebook that is no longer open are dropped.
    pub fn poll_upload_result(&mut self) {
        let Ok(result) = self.upload_rx.try_recv() else {
            return;
        };
        if self.pending_upload.as_deref() == Some(result.notebook_id.as_str()) {
            self.pending_upload = None;
        }
        let mut failed = false;
        if let Some(ws) = self.workspace.as_mut() {
            if ws.notebook_id == result.notebook_id {
                match result.result {
                    Ok(files) => {
                        ws.sources.apply_uploaded(files);
                    }
                    Err(e) => {
                        tracing::error!("Failed to upload files: {}", e);
                        failed = true;
                    }
                }
            }
        }
        if failed {
            self.push_notice(NoticeLevel::Error, "Failed to upload files");
        }
    }

    /// Drain notices raised by the collection mirrors.
    pub fn poll_notices(&mut self) {
        while let Ok(notice) = self.notice_rx.try_recv() {
            self.notices.push_back((notice, Instant::now()));
        }
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push_back((
            Notice {
                level,
                text: text.into(),
            },
            Instant::now(),
        ));
        while self.notices.len() > MAX_NOTICES {
            self.notices.pop_front();
        }
    }

    /// Advance animations and expire stale transient state.
    pub fn tick(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        if let Some(ws) = self.workspace.as_mut() {
            ws.sources.tick();
        }
        self.notices.retain(|(_, at)| at.elapsed() < NOTICE_TTL);
    }
}
