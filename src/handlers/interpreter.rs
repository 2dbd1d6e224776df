use chrono::NaiveDateTime;

use crate::business_hours::parse_local_datetime;

pub const CANCEL_DIALOGUE_KEYWORD: &str = "cancel booking";
pub const DEFAULT_SESSION_TYPE: &str = "general session";

const BOOK_PREFIX: &str = "book:";
const CANCEL_PREFIX: &str = "cancel:";

/// What an inbound message asks the bot to do. Exactly one variant
/// applies to any given message, so dispatch can be exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Abort the in-progress dialogue. Only produced while a draft
    /// exists; the keyword wins over every other rule.
    CancelDialogue,
    /// Hand the message to the current dialogue step.
    DialogueInput,
    /// A structured one-shot command, or the usage hint for a malformed one.
    OneShot(Result<OneShotCommand, UsageError>),
    Menu(MenuSelection),
    Freeform,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OneShotCommand {
    Book(BookCommand),
    Cancel(CancelCommand),
    ListAppointments,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BookCommand {
    pub start: NaiveDateTime,
    pub session_type: String,
    /// `None` means "use the sender id as the contact phone".
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CancelCommand {
    pub start: NaiveDateTime,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageError {
    Book,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuSelection {
    Greeting,
    StudioServices,
    EventPackages,
    PhotoPrinting,
    OrderStatus,
    StartBooking,
}

pub fn classify(text: &str, has_draft: bool) -> Action {
    let trimmed = text.trim();
    let lower = trimmed.to_lowercase();

    if has_draft {
        if lower == CANCEL_DIALOGUE_KEYWORD {
            return Action::CancelDialogue;
        }
        return Action::DialogueInput;
    }

    if let Some(rest) = strip_prefix_ci(trimmed, BOOK_PREFIX) {
        return Action::OneShot(parse_book(rest));
    }
    if let Some(rest) = strip_prefix_ci(trimmed, CANCEL_PREFIX) {
        return Action::OneShot(parse_cancel(rest));
    }
    if lower == "my appointments" || lower.contains("see my appointments") {
        return Action::OneShot(Ok(OneShotCommand::ListAppointments));
    }
    if let Some(selection) = match_menu(&lower) {
        return Action::Menu(selection);
    }

    Action::Freeform
}

fn strip_prefix_ci<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &text[prefix.len()..])
}

/// `book: <YYYY-MM-DD HH:mm>; <session type>; <phone>` - the last two
/// fields are optional and keep their positional order.
fn parse_book(rest: &str) -> Result<OneShotCommand, UsageError> {
    let parts: Vec<&str> = rest.split(';').map(str::trim).collect();
    if parts.len() > 3 {
        return Err(UsageError::Book);
    }

    let start = parse_local_datetime(parts[0]).ok_or(UsageError::Book)?;
    let session_type = parts
        .get(1)
        .copied()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SESSION_TYPE)
        .to_string();
    let phone = parts
        .get(2)
        .copied()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(OneShotCommand::Book(BookCommand { start, session_type, phone }))
}

/// `cancel: <YYYY-MM-DD HH:mm>; <phone>` - the phone is optional.
fn parse_cancel(rest: &str) -> Result<OneShotCommand, UsageError> {
    let parts: Vec<&str> = rest.split(';').map(str::trim).collect();
    if parts.len() > 2 {
        return Err(UsageError::Cancel);
    }

    let start = parse_local_datetime(parts[0]).ok_or(UsageError::Cancel)?;
    let phone = parts
        .get(1)
        .copied()
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(OneShotCommand::Cancel(CancelCommand { start, phone }))
}

fn match_menu(lower: &str) -> Option<MenuSelection> {
    // Exact tokens are the most specific match and are tried first.
    match lower {
        "1" => return Some(MenuSelection::StudioServices),
        "2" => return Some(MenuSelection::EventPackages),
        "3" => return Some(MenuSelection::PhotoPrinting),
        "4" => return Some(MenuSelection::OrderStatus),
        "5" => return Some(MenuSelection::StartBooking),
        "hello" | "hi" | "hey" => return Some(MenuSelection::Greeting),
        _ => {}
    }

    let contains_any = |needles: &[&str]| needles.iter().any(|n| lower.contains(n));

    if contains_any(&[
        "book an appointment",
        "book appointment",
        "schedule an appointment",
        "book a session",
        "schedule a session",
    ]) {
        Some(MenuSelection::StartBooking)
    } else if contains_any(&["photo studio", "studio service"]) {
        Some(MenuSelection::StudioServices)
    } else if contains_any(&["event package", "wedding", "baptism", "sweet fifteen"]) {
        Some(MenuSelection::EventPackages)
    } else if contains_any(&["photo printing", "print photos", "print my photos"]) {
        Some(MenuSelection::PhotoPrinting)
    } else if contains_any(&["order status", "check my order"]) {
        Some(MenuSelection::OrderStatus)
    } else if contains_any(&["good morning", "good afternoon", "good evening", "how are you"]) {
        Some(MenuSelection::Greeting)
    } else {
        None
    }
}
