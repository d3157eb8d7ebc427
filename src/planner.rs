//! The planner controller.
//!
//! [`StudyPlanner`] is the one owner of the document. Every mutation goes
//! through a reducer, the full resulting document is written to storage, and
//! only after the write succeeds does the in-memory copy change. Outcomes are
//! reported on the notification channel; destructive operations wait behind
//! the confirmation gate until [`StudyPlanner::confirm`] is called.

use std::time::Instant;

use chrono::{Local, NaiveDate, Utc};
use log::{debug, error, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::attachment::Attachment;
use crate::backup::{self, BackupFile};
use crate::config::PlannerConfig;
use crate::confirmation::{ConfirmationGate, Prompt};
use crate::countdown::DDay;
use crate::error::{PlannerError, Result, StorageError};
use crate::ids::IdGenerator;
use crate::local_db_state::LocalDbState;
use crate::notification::{Notification, NotificationChannel, Phase};
use crate::planner_model::{Document, ExamSlot, Note, Theme, VocabularyWord};
use crate::pomodoro::PomodoroTimer;
use crate::reducers::{self, Action, NoteAction, Reduction, SubjectAction, TodoAction, WordAction};
use crate::stats::{self, StudyStats};
use crate::store::{self, KeyValueStore};
use crate::vocabulary::{self, FlashCard};

const SAVE_FAILED: &str = "데이터를 저장하지 못했습니다.";
const RESTORE_FAILED: &str = "데이터 복구에 실패했습니다. 유효한 파일인지 확인해주세요.";

/// Operations waiting on the confirmation gate.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    DeleteSubject { id: String },
    DeleteNote { id: String },
    DeleteWord { id: String },
    ClearAll,
    Restore(Box<Document>),
}

/// A user intent as sent by the UI shell.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Command {
    AddSubject { name: String },
    RenameSubject { id: String, name: String },
    DeleteSubject { id: String },
    IncrementSubject { id: String },
    DecrementSubject { id: String },
    AddTodo { text: String },
    ToggleTodo { id: String },
    DeleteTodo { id: String },
    AddNote {
        subject_id: String,
        content: String,
        #[serde(default)]
        image: Option<String>,
    },
    UpdateNote {
        id: String,
        subject_id: String,
        content: String,
        #[serde(default)]
        image: Option<String>,
    },
    DeleteNote { id: String },
    AddWord { eng: String, kor: String },
    DeleteWord { id: String },
    SetExamDate { slot: ExamSlot, date: Option<NaiveDate> },
    ToggleTheme,
    ClearAll,
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Outcome {
    Applied,
    /// Nothing matched (for example an unknown id).
    Unchanged,
    /// The confirmation gate is open; call `confirm` or `cancel`.
    AwaitingConfirmation,
}

pub struct StudyPlanner {
    store: Box<dyn KeyValueStore>,
    config: PlannerConfig,
    document: Document,
    theme: Theme,
    gate: ConfirmationGate<PendingAction>,
    notices: NotificationChannel,
    ids: IdGenerator,
    card: FlashCard,
    timer: PomodoroTimer,
}

impl StudyPlanner {
    /// Opens the LMDB-backed planner described by `config`.
    pub fn open(config: PlannerConfig) -> Result<Self> {
        let state = LocalDbState::init(&config.db_path, config.map_size)?;
        Ok(Self::with_store(Box::new(state), config))
    }

    /// Builds a planner over any store, loading the document and theme or
    /// falling back to empty defaults.
    pub fn with_store(store: Box<dyn KeyValueStore>, config: PlannerConfig) -> Self {
        let document = store::load(&*store, &config.document_key, Document::default());
        let theme = store::load(&*store, &config.theme_key, Theme::default());
        info!(
            "Planner loaded: {} subjects, {} todos, {} notes, {} custom words",
            document.subjects.len(),
            document.todos.len(),
            document.notes.len(),
            document.custom_words.len()
        );
        let notices = NotificationChannel::new(config.notification_visible, config.notification_dismiss);
        Self {
            store,
            config,
            document,
            theme,
            gate: ConfirmationGate::new(),
            notices,
            ids: IdGenerator::new(),
            card: FlashCard::default(),
            timer: PomodoroTimer::default(),
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Re-reads the document from storage, discarding the in-memory copy.
    /// Hosts call this when another writer may have changed the store.
    pub fn reload(&mut self) {
        self.document = store::load(&*self.store, &self.config.document_key, Document::default());
        self.theme = store::load(&*self.store, &self.config.theme_key, Theme::default());
        debug!("Planner state reloaded from storage");
    }

    // ==================== Commands ====================

    pub fn dispatch(&mut self, command: Command) -> Result<Outcome> {
        match command {
            Command::AddSubject { name } => self.add_subject(&name),
            Command::RenameSubject { id, name } => self.rename_subject(&id, &name),
            Command::DeleteSubject { id } => Ok(self.request_delete_subject(&id)),
            Command::IncrementSubject { id } => self.increment_subject(&id),
            Command::DecrementSubject { id } => self.decrement_subject(&id),
            Command::AddTodo { text } => self.add_todo(&text),
            Command::ToggleTodo { id } => self.toggle_todo(&id),
            Command::DeleteTodo { id } => self.delete_todo(&id),
            Command::AddNote { subject_id, content, image } => self.add_note(&subject_id, &content, image),
            Command::UpdateNote { id, subject_id, content, image } => {
                self.update_note(&id, &subject_id, &content, image)
            }
            Command::DeleteNote { id } => Ok(self.request_delete_note(&id)),
            Command::AddWord { eng, kor } => self.add_word(&eng, &kor),
            Command::DeleteWord { id } => Ok(self.request_delete_word(&id)),
            Command::SetExamDate { slot, date } => self.set_exam_date(slot, date),
            Command::ToggleTheme => self.toggle_theme().map(|_| Outcome::Applied),
            Command::ClearAll => Ok(self.request_clear_all()),
        }
    }

    pub fn add_subject(&mut self, name: &str) -> Result<Outcome> {
        let id = self.ids.next_id(Utc::now());
        self.apply(Action::Subject(SubjectAction::Add {
            id,
            name: name.to_string(),
        }))
    }

    pub fn rename_subject(&mut self, id: &str, name: &str) -> Result<Outcome> {
        self.apply(Action::Subject(SubjectAction::Rename {
            id: id.to_string(),
            name: name.to_string(),
        }))
    }

    pub fn increment_subject(&mut self, id: &str) -> Result<Outcome> {
        self.apply(Action::Subject(SubjectAction::Increment { id: id.to_string() }))
    }

    pub fn decrement_subject(&mut self, id: &str) -> Result<Outcome> {
        self.apply(Action::Subject(SubjectAction::Decrement { id: id.to_string() }))
    }

    pub fn add_todo(&mut self, text: &str) -> Result<Outcome> {
        let id = self.ids.next_id(Utc::now());
        self.apply(Action::Todo(TodoAction::Add {
            id,
            text: text.to_string(),
        }))
    }

    pub fn toggle_todo(&mut self, id: &str) -> Result<Outcome> {
        self.apply(Action::Todo(TodoAction::Toggle { id: id.to_string() }))
    }

    pub fn delete_todo(&mut self, id: &str) -> Result<Outcome> {
        self.apply(Action::Todo(TodoAction::Delete { id: id.to_string() }))
    }

    pub fn add_note(&mut self, subject_id: &str, content: &str, image: Option<String>) -> Result<Outcome> {
        let now = Utc::now();
        let id = self.ids.next_id(now);
        self.apply(Action::Note(NoteAction::Add {
            id,
            subject_id: subject_id.to_string(),
            content: content.to_string(),
            image,
            created_at: now,
        }))
    }

    pub fn update_note(&mut self, id: &str, subject_id: &str, content: &str, image: Option<String>) -> Result<Outcome> {
        self.apply(Action::Note(NoteAction::Update {
            id: id.to_string(),
            subject_id: subject_id.to_string(),
            content: content.to_string(),
            image,
        }))
    }

    pub fn add_word(&mut self, eng: &str, kor: &str) -> Result<Outcome> {
        let id = self.ids.next_id(Utc::now());
        self.apply(Action::Word(WordAction::Add {
            id,
            eng: eng.to_string(),
            kor: kor.to_string(),
        }))
    }

    /// Encodes a picked image for a note, rejecting files over the size
    /// limit.
    pub fn attach_image(&mut self, mime: &str, bytes: Vec<u8>) -> Result<String> {
        match Attachment::new(mime, bytes) {
            Ok(attachment) => Ok(attachment.to_data_uri()),
            Err(e) => {
                self.notices.error(e.to_string(), Instant::now());
                Err(e.into())
            }
        }
    }

    pub fn set_exam_date(&mut self, slot: ExamSlot, date: Option<NaiveDate>) -> Result<Outcome> {
        if self.document.exam_date(slot) == date {
            return Ok(Outcome::Unchanged);
        }
        let mut next = self.document.clone();
        next.set_exam_date(slot, date);
        let notice = date.map(|_| format!("{} D-Day가 설정되었습니다.", slot.label()));
        self.commit(next, notice)?;
        Ok(Outcome::Applied)
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        let next = self.theme.toggled();
        let key = self.config.theme_key.clone();
        if let Err(e) = store::save(&mut *self.store, &key, &next) {
            return Err(self.storage_failure(e));
        }
        self.theme = next;
        Ok(next)
    }

    // ==================== Confirmation ====================

    pub fn request_delete_subject(&mut self, id: &str) -> Outcome {
        let Some(subject) = self.document.subject(id) else {
            return Outcome::Unchanged;
        };
        let message = format!(
            "'{}' 과목을 삭제하시겠습니까? 관련 오답노트도 모두 삭제됩니다.",
            subject.name
        );
        self.gate.open("과목 삭제", message, PendingAction::DeleteSubject { id: id.to_string() });
        Outcome::AwaitingConfirmation
    }

    pub fn request_delete_note(&mut self, id: &str) -> Outcome {
        if !self.document.notes.iter().any(|n| n.id == id) {
            return Outcome::Unchanged;
        }
        self.gate.open(
            "노트 삭제",
            "이 오답노트를 삭제하시겠습니까?",
            PendingAction::DeleteNote { id: id.to_string() },
        );
        Outcome::AwaitingConfirmation
    }

    pub fn request_delete_word(&mut self, id: &str) -> Outcome {
        if !self.document.custom_words.iter().any(|w| w.id == id) {
            return Outcome::Unchanged;
        }
        self.gate.open(
            "단어 삭제",
            "이 단어를 삭제하시겠습니까?",
            PendingAction::DeleteWord { id: id.to_string() },
        );
        Outcome::AwaitingConfirmation
    }

    pub fn request_clear_all(&mut self) -> Outcome {
        self.gate.open(
            "모든 데이터 삭제",
            "정말로 모든 데이터를 삭제하시겠습니까? 이 작업은 되돌릴 수 없습니다.",
            PendingAction::ClearAll,
        );
        Outcome::AwaitingConfirmation
    }

    /// Validates an uploaded backup and, if it is well formed, asks for
    /// confirmation before replacing the document.
    pub fn request_import(&mut self, bytes: &[u8]) -> Result<Outcome> {
        match backup::parse_backup(bytes) {
            Ok(document) => {
                self.gate.open(
                    "데이터 복구",
                    "데이터를 복구하시겠습니까? 현재 데이터는 백업 파일로 덮어쓰여집니다.",
                    PendingAction::Restore(Box::new(document)),
                );
                Ok(Outcome::AwaitingConfirmation)
            }
            Err(e) => {
                debug!("Backup rejected: {e}");
                self.notices.error(RESTORE_FAILED, Instant::now());
                Err(e.into())
            }
        }
    }

    pub fn pending_confirmation(&self) -> Option<&Prompt<PendingAction>> {
        self.gate.prompt()
    }

    /// Runs the pending operation and closes the gate.
    pub fn confirm(&mut self) -> Result<Outcome> {
        let pending = self.gate.confirm().ok_or(PlannerError::NothingPending)?;
        match pending {
            PendingAction::DeleteSubject { id } => self.apply(Action::Subject(SubjectAction::Delete { id })),
            PendingAction::DeleteNote { id } => self.apply(Action::Note(NoteAction::Delete { id })),
            PendingAction::DeleteWord { id } => self.apply(Action::Word(WordAction::Delete { id })),
            PendingAction::ClearAll => {
                self.commit(Document::default(), Some("모든 데이터가 삭제되었습니다.".to_string()))?;
                info!("All planner data cleared");
                Ok(Outcome::Applied)
            }
            PendingAction::Restore(document) => {
                self.commit(*document, Some("데이터가 성공적으로 복구되었습니다.".to_string()))?;
                info!("Planner data restored from backup");
                Ok(Outcome::Applied)
            }
        }
    }

    /// Closes the gate without running anything.
    pub fn cancel(&mut self) -> bool {
        self.gate.cancel()
    }

    // ==================== Backup ====================

    pub fn export_backup(&mut self, today: NaiveDate) -> Result<BackupFile> {
        match backup::export(&self.document, &self.config.app_name, today) {
            Ok(file) => {
                self.notices.success("데이터가 성공적으로 백업되었습니다.", Instant::now());
                Ok(file)
            }
            Err(e) => {
                error!("Backup failed: {e}");
                self.notices.error("데이터 백업에 실패했습니다.", Instant::now());
                Err(StorageError::Json(e).into())
            }
        }
    }

    /// Export named with the local calendar date.
    pub fn export_backup_today(&mut self) -> Result<BackupFile> {
        self.export_backup(Local::now().date_naive())
    }

    // ==================== Views ====================

    pub fn stats(&self) -> StudyStats {
        stats::compute(&self.document)
    }

    pub fn d_day(&self, slot: ExamSlot, today: NaiveDate) -> DDay {
        DDay::between(self.document.exam_date(slot), today)
    }

    pub fn notes_newest_first(&self) -> Vec<&Note> {
        reducers::notes::newest_first(&self.document.notes)
    }

    pub fn search_notes(&self, term: &str) -> Vec<&Note> {
        reducers::notes::search(&self.document, term)
    }

    pub fn word_pool(&self) -> Vec<VocabularyWord> {
        vocabulary::word_pool(&self.document.custom_words)
    }

    /// Puts a new random word on the card, front side up.
    pub fn draw_word<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &FlashCard {
        self.card = FlashCard::draw(&self.word_pool(), rng);
        &self.card
    }

    pub fn flip_card(&mut self) -> &FlashCard {
        self.card.flip();
        &self.card
    }

    pub fn card(&self) -> &FlashCard {
        &self.card
    }

    pub fn timer(&self) -> &PomodoroTimer {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut PomodoroTimer {
        &mut self.timer
    }

    // ==================== Notifications ====================

    pub fn notification(&self, now: Instant) -> Option<&Notification> {
        self.notices.current(now)
    }

    pub fn notification_phase(&self, now: Instant) -> Option<Phase> {
        self.notices.phase(now)
    }

    pub fn dismiss_notification(&mut self) {
        self.notices.dismiss();
    }

    // ==================== Internals ====================

    fn apply(&mut self, action: Action) -> Result<Outcome> {
        let Reduction { value, notice, changed } = match reducers::apply(&self.document, action) {
            Ok(reduction) => reduction,
            Err(e) => {
                debug!("Rejected: {e}");
                self.notices.error(e.to_string(), Instant::now());
                return Err(e.into());
            }
        };
        if !changed {
            return Ok(Outcome::Unchanged);
        }
        self.commit(value, notice)?;
        Ok(Outcome::Applied)
    }

    /// Writes `next` in full, then adopts it. On a failed write the
    /// in-memory document is left as it was.
    fn commit(&mut self, next: Document, notice: Option<String>) -> Result<()> {
        let key = self.config.document_key.clone();
        if let Err(e) = store::save(&mut *self.store, &key, &next) {
            return Err(self.storage_failure(e));
        }
        self.document = next;
        if let Some(message) = notice {
            self.notices.success(message, Instant::now());
        }
        Ok(())
    }

    fn storage_failure(&mut self, e: StorageError) -> PlannerError {
        error!("Failed to persist planner state: {e}");
        self.notices.error(SAVE_FAILED, Instant::now());
        e.into()
    }
}
