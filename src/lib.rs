//! # Study Planner Core
//!
//! Local state engine for a personal study planner: subjects with review
//! counters, a to-do list, mistake notes with inline image attachments, a
//! custom vocabulary list, two exam countdowns, a word-of-the-day card, a
//! focus timer and a statistics dashboard. All user data lives in one
//! document persisted to an embedded LMDB environment, next to a separately
//! stored theme preference.
//!
//! ## Features
//!
//! - **Single persisted document**: every mutation writes the whole document back
//! - **Pure reducers**: add, update, delete and count transitions with typed validation errors
//! - **Confirmation gate**: destructive operations wait for an explicit confirm
//! - **Notification channel**: one auto-expiring success or error message at a time
//! - **Backups**: pretty JSON export and schema-checked import
//! - **FFI-ready**: C ABI functions returning JSON envelopes for any UI shell
//!
//! ## Quick Start
//!
//! ```no_run
//! use study_planner_core::{create_planner, dispatch_command, get_document, free_response};
//! use std::ffi::CString;
//!
//! let path = CString::new("my_planner").unwrap();
//! let planner = create_planner(path.as_ptr());
//!
//! let cmd = CString::new(r#"{"type":"addSubject","name":"한국사"}"#).unwrap();
//! free_response(dispatch_command(planner, cmd.as_ptr()));
//!
//! let document = get_document(planner);
//! free_response(document);
//! ```
//!
//! ## FFI Functions
//!
//! - [`create_planner`] / [`close_planner`] - Open and release a planner
//! - [`dispatch_command`] - Run a user command (add, rename, toggle, delete request, ...)
//! - [`confirm_pending`] / [`cancel_pending`] / [`pending_confirmation`] - Confirmation gate
//! - [`get_document`], [`get_stats`], [`get_countdowns`], [`search_notes`] - Read views
//! - [`get_theme`] / [`toggle_theme`] - Theme preference
//! - [`export_backup`] / [`import_backup`] - Backups
//! - [`encode_image`] - Turn picked image bytes into a note attachment
//! - [`draw_word`] / [`flip_word_card`] - Word of the day
//! - [`timer_command`] - Focus timer
//! - [`current_notification`] - The message to show, if any
//! - [`reload_planner`] - Re-read state written by another process
//! - [`free_response`] - Release any string returned by this library

pub mod attachment;
pub mod backup;
pub mod config;
pub mod confirmation;
pub mod countdown;
pub mod error;
pub mod ids;
pub mod local_db_state;
pub mod notification;
pub mod planner;
pub mod planner_model;
pub mod pomodoro;
pub mod reducers;
pub mod stats;
pub mod store;
pub mod vocabulary;
mod app_response;

use std::ffi::{CStr, CString};
use std::os::raw::c_char;
use std::time::Instant;

use chrono::Local;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app_response::AppResponse;
use crate::config::PlannerConfig;
use crate::countdown::DDay;
use crate::planner::{Command, StudyPlanner};
use crate::planner_model::ExamSlot;
use crate::pomodoro::TimerMode;

/// Countdown state for one exam slot, as rendered by the D-Day widget.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CountdownView {
    slot: ExamSlot,
    date: Option<chrono::NaiveDate>,
    label: String,
    progress: f64,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum TimerCommand {
    Toggle,
    Reset,
    Tick,
    SetMode { mode: TimerMode },
}

/// Opens a planner whose LMDB environment lives at `<path>.lmdb`.
///
/// Map size and backup name come from the environment (see
/// [`PlannerConfig::from_env`]); invalid overrides are logged and the
/// defaults used instead.
///
/// # Returns
///
/// A pointer to the [`StudyPlanner`], or null if `path` is null, not UTF-8,
/// or the environment cannot be opened. Release it with [`close_planner`].
///
/// # Examples
///
/// ```no_run
/// use std::ffi::CString;
/// use study_planner_core::create_planner;
///
/// let path = CString::new("planner_data").unwrap();
/// let planner = create_planner(path.as_ptr());
/// assert!(!planner.is_null());
/// ```
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn create_planner(path: *const c_char) -> *mut StudyPlanner {
    if path.is_null() {
        warn!("Null path pointer passed to create_planner");
        return std::ptr::null_mut();
    }

    let path_str = match unsafe { CStr::from_ptr(path).to_str() } {
        Ok(s) => s,
        Err(e) => {
            warn!("Invalid UTF-8 in path parameter: {e}");
            return std::ptr::null_mut();
        }
    };

    let config = match PlannerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring environment overrides: {e}");
            PlannerConfig::default()
        }
    }
    .with_db_path(path_str);

    match StudyPlanner::open(config) {
        Ok(planner) => {
            info!("✅ Planner opened at {path_str}.lmdb");
            Box::into_raw(Box::new(planner))
        }
        Err(e) => {
            warn!("❌ Failed to open planner: {e}");
            warn!("Attempted path: {path_str}.lmdb");
            std::ptr::null_mut()
        }
    }
}

/// Closes the LMDB environment and frees the planner.
///
/// The pointer must not be used afterwards.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn close_planner(state: *mut StudyPlanner) -> *const c_char {
    if state.is_null() {
        let error = AppResponse::BadRequest("Null state pointer passed to close_planner".to_string());
        return response_to_c_string(&error);
    }

    drop(unsafe { Box::from_raw(state) });
    response_to_c_string(&AppResponse::success("Planner closed successfully"))
}

/// Runs one user command.
///
/// # JSON Format
///
/// Commands are tagged by `type`:
///
/// ```json
/// {"type": "addSubject", "name": "행정법"}
/// {"type": "incrementSubject", "id": "1714560000000"}
/// {"type": "addNote", "subjectId": "1714560000000", "content": "판례 정리", "image": null}
/// {"type": "setExamDate", "slot": "first", "date": "2024-12-07"}
/// {"type": "deleteSubject", "id": "1714560000000"}
/// ```
///
/// # Returns
///
/// `Ok` with the outcome (`"applied"`, `"unchanged"` or
/// `"awaitingConfirmation"`), or `ValidationError` carrying the message
/// that was also posted as a notification.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn dispatch_command(state: *mut StudyPlanner, json_ptr: *const c_char) -> *const c_char {
    let planner = match planner_mut(state, "dispatch_command") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let command: Command = match serde_json::from_str(&json_str) {
        Ok(c) => c,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid command: {e}"));
            return response_to_c_string(&error);
        }
    };

    match planner.dispatch(command) {
        Ok(outcome) => response_to_c_string(&AppResponse::json(&outcome)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Runs the operation waiting on the confirmation gate.
///
/// Returns `NotFound` when nothing is pending.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn confirm_pending(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "confirm_pending") {
        Ok(p) => p,
        Err(err) => return err,
    };

    match planner.confirm() {
        Ok(outcome) => response_to_c_string(&AppResponse::json(&outcome)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Closes the confirmation gate without running the pending operation.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn cancel_pending(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "cancel_pending") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let was_open = planner.cancel();
    response_to_c_string(&AppResponse::json(&was_open))
}

/// Title and message of the pending confirmation, or `null`.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn pending_confirmation(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "pending_confirmation") {
        Ok(p) => p,
        Err(err) => return err,
    };

    response_to_c_string(&AppResponse::json(&planner.pending_confirmation()))
}

/// The whole document as JSON, in its persisted layout.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_document(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "get_document") {
        Ok(p) => p,
        Err(err) => return err,
    };

    response_to_c_string(&AppResponse::json(planner.document()))
}

/// Dashboard aggregates computed from the current document.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_stats(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "get_stats") {
        Ok(p) => p,
        Err(err) => return err,
    };

    response_to_c_string(&AppResponse::json(&planner.stats()))
}

/// D-Day label and ring progress for both exam slots, relative to the local
/// calendar date.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_countdowns(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "get_countdowns") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let today = Local::now().date_naive();
    let views: Vec<CountdownView> = [ExamSlot::First, ExamSlot::Second]
        .into_iter()
        .map(|slot| {
            let dday: DDay = planner.d_day(slot, today);
            CountdownView {
                slot,
                date: planner.document().exam_date(slot),
                label: dday.to_string(),
                progress: dday.progress(),
            }
        })
        .collect();
    response_to_c_string(&AppResponse::json(&views))
}

/// Notes matching `term` in their content or subject name, newest first.
/// An empty term lists every note.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn search_notes(state: *mut StudyPlanner, term: *const c_char) -> *const c_char {
    let planner = match planner_mut(state, "search_notes") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let term = match c_ptr_to_string(term, "term") {
        Ok(t) => t,
        Err(err) => return err,
    };

    response_to_c_string(&AppResponse::json(&planner.search_notes(&term)))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn get_theme(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "get_theme") {
        Ok(p) => p,
        Err(err) => return err,
    };

    response_to_c_string(&AppResponse::json(&planner.theme()))
}

/// Switches between light and dark and persists the choice.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn toggle_theme(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "toggle_theme") {
        Ok(p) => p,
        Err(err) => return err,
    };

    match planner.toggle_theme() {
        Ok(theme) => response_to_c_string(&AppResponse::json(&theme)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Builds a backup of the whole document.
///
/// # Returns
///
/// `Ok` with `{"fileName": "...-backup-YYYY-MM-DD.json", "mimeType":
/// "application/json", "contents": "<pretty JSON>"}`; the host offers it as a
/// download.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn export_backup(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "export_backup") {
        Ok(p) => p,
        Err(err) => return err,
    };

    match planner.export_backup_today() {
        Ok(file) => response_to_c_string(&AppResponse::json(&file)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Checks an uploaded backup and opens the confirmation gate for restoring
/// it. Nothing changes until [`confirm_pending`] is called.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn import_backup(state: *mut StudyPlanner, contents: *const c_char) -> *const c_char {
    let planner = match planner_mut(state, "import_backup") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let text = match c_ptr_to_string(contents, "backup") {
        Ok(t) => t,
        Err(err) => return err,
    };

    match planner.request_import(text.as_bytes()) {
        Ok(outcome) => response_to_c_string(&AppResponse::json(&outcome)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Encodes picked image bytes as a `data:` URI for a note's `image` field.
///
/// Images over 2 MiB or with a non-image MIME type are rejected.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn encode_image(
    state: *mut StudyPlanner,
    mime: *const c_char,
    data: *const u8,
    len: usize,
) -> *const c_char {
    let planner = match planner_mut(state, "encode_image") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let mime = match c_ptr_to_string(mime, "mime") {
        Ok(m) => m,
        Err(err) => return err,
    };

    if data.is_null() {
        let error = AppResponse::BadRequest("Null data pointer passed to encode_image".to_string());
        return response_to_c_string(&error);
    }

    let bytes = unsafe { std::slice::from_raw_parts(data, len) }.to_vec();
    match planner.attach_image(&mime, bytes) {
        Ok(uri) => response_to_c_string(&AppResponse::Ok(uri)),
        Err(e) => response_to_c_string(&AppResponse::from(e)),
    }
}

/// Puts a random word from the built-in and custom pool on the card.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn draw_word(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "draw_word") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let card = planner.draw_word(&mut rand::thread_rng());
    response_to_c_string(&AppResponse::json(card))
}

#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn flip_word_card(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "flip_word_card") {
        Ok(p) => p,
        Err(err) => return err,
    };

    response_to_c_string(&AppResponse::json(planner.flip_card()))
}

/// Drives the focus timer: `{"type": "toggle" | "reset" | "tick"}` or
/// `{"type": "setMode", "mode": "work" | "shortBreak" | "longBreak"}`.
///
/// The host sends `tick` once per second while the timer widget is shown.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn timer_command(state: *mut StudyPlanner, json_ptr: *const c_char) -> *const c_char {
    let planner = match planner_mut(state, "timer_command") {
        Ok(p) => p,
        Err(err) => return err,
    };

    let json_str = match c_ptr_to_string(json_ptr, "JSON") {
        Ok(json) => json,
        Err(err) => return err,
    };

    let command: TimerCommand = match serde_json::from_str(&json_str) {
        Ok(c) => c,
        Err(e) => {
            let error = AppResponse::SerializationError(format!("Invalid timer command: {e}"));
            return response_to_c_string(&error);
        }
    };

    let timer = planner.timer_mut();
    match command {
        TimerCommand::Toggle => timer.toggle(),
        TimerCommand::Reset => timer.reset(),
        TimerCommand::Tick => {
            timer.tick();
        }
        TimerCommand::SetMode { mode } => timer.set_mode(mode),
    }
    response_to_c_string(&AppResponse::json(planner.timer()))
}

/// The notification currently on screen, or `null` once it has expired.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn current_notification(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "current_notification") {
        Ok(p) => p,
        Err(err) => return err,
    };

    response_to_c_string(&AppResponse::json(&planner.notification(Instant::now())))
}

/// Re-reads the document and theme from storage.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn reload_planner(state: *mut StudyPlanner) -> *const c_char {
    let planner = match planner_mut(state, "reload_planner") {
        Ok(p) => p,
        Err(err) => return err,
    };

    planner.reload();
    response_to_c_string(&AppResponse::json(planner.document()))
}

/// Frees a string returned by any function in this library.
///
/// Passing null is a no-op. Each string must be freed exactly once.
#[no_mangle]
#[allow(clippy::not_unsafe_ptr_arg_deref)]
pub extern "C" fn free_response(ptr: *const c_char) {
    if ptr.is_null() {
        return;
    }
    drop(unsafe { CString::from_raw(ptr as *mut c_char) });
}

/// Converts an [`AppResponse`] to a C string owned by the caller.
///
/// Returns a null pointer if serialization or C string creation fails.
fn response_to_c_string(response: &AppResponse) -> *const c_char {
    let json = match serde_json::to_string(response) {
        Ok(j) => j,
        Err(e) => {
            warn!("Error serializing response: {e}");
            return std::ptr::null();
        }
    };

    match CString::new(json) {
        Ok(c_str) => c_str.into_raw(),
        Err(e) => {
            warn!("Error creating CString: {e}");
            std::ptr::null()
        }
    }
}

/// Converts a C string pointer to a Rust `String`, or an error response
/// naming `field_name` when the pointer is null or not UTF-8.
fn c_ptr_to_string(ptr: *const c_char, field_name: &str) -> Result<String, *const c_char> {
    if ptr.is_null() {
        let error = AppResponse::BadRequest(format!("Null {field_name} pointer"));
        return Err(response_to_c_string(&error));
    }

    match unsafe { CStr::from_ptr(ptr).to_str() } {
        Ok(s) => Ok(s.to_string()),
        Err(e) => {
            let error = AppResponse::BadRequest(format!("Invalid UTF-8 in {field_name}: {e}"));
            Err(response_to_c_string(&error))
        }
    }
}

fn planner_mut<'a>(state: *mut StudyPlanner, fn_name: &str) -> Result<&'a mut StudyPlanner, *const c_char> {
    match unsafe { state.as_mut() } {
        Some(planner) => Ok(planner),
        None => {
            let error = AppResponse::BadRequest(format!("Null state pointer passed to {fn_name}"));
            Err(response_to_c_string(&error))
        }
    }
}
