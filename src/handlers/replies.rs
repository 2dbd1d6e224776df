use crate::handlers::interpreter::CANCEL_DIALOGUE_KEYWORD;
use crate::models::Appointment;

// User-facing reply texts. WhatsApp renders *single asterisks* as bold.

pub fn hours_table() -> &'static str {
    "Mon-Fri: 8:00-12:30 and 14:00-18:00\nSat: 8:00-12:30"
}

pub fn closed_now(sunday: bool) -> String {
    if sunday {
        format!(
            "📸 *Thank you for contacting the studio.*\n\n\
             Today is *Sunday* and we are *closed* so the team can rest.\n\n\
             🕓 *Opening hours:*\n{}\n\n\
             Leave us your message and we will reply as soon as we open. 😊",
            hours_table()
        )
    } else {
        format!(
            "📸 *Thank you for contacting the studio.*\n\n\
             We are *outside opening hours* right now; we will get back to you \
             as soon as we are back. 😊\n\n\
             🕓 *Opening hours:*\n{}",
            hours_table()
        )
    }
}

pub fn menu() -> String {
    "👋 Hello! Thank you for contacting the photo studio 📸\n\
     I am a virtual assistant.\n\
     How can I help you today?\n\n\
     Pick an option 👇\n\
     1️⃣ STUDIO PHOTO SERVICES\n\
     2️⃣ EVENT PACKAGE QUOTES\n\
     3️⃣ PHOTO PRINTING\n\
     4️⃣ ORDER STATUS\n\
     5️⃣ BOOK YOUR APPOINTMENT"
        .to_string()
}

pub fn studio_services() -> String {
    "📷 *STUDIO PHOTO SERVICES*\n\n\
     🔸 *Documents and diplomas* (graduation portraits, certificates, ID cards...)\n\
     🔸 *Immigration photos* (US visa 2x2, Canada 3.5x4.5, Mexico 3.2x2.6)\n\
     🔸 *Photo sessions* (individual, couples, family, babies, portfolio, graduates, holiday...)\n\n\
     Which service would you like to know more about?"
        .to_string()
}

pub fn event_packages() -> String {
    "💍 *EVENT PACKAGE QUOTES*\n\n\
     Weddings, sweet fifteens, baptisms, communions, baby showers, kids' parties and outdoor shoots.\n\
     Tell me the *type of event, date and venue* and I will put a quote together (pricing is personalised). \
     I can also hand you over to a member of staff if you prefer."
        .to_string()
}

pub fn photo_printing() -> String {
    "🖨️ *PHOTO PRINTING*\n\n\
     We offer an amateur and a professional printing line. What size would you like to print?"
        .to_string()
}

pub fn order_status() -> String {
    "📦 *ORDER STATUS*\n\n\
     Send me your *order number* or *full name* and I will check with the team."
        .to_string()
}

pub fn start_booking() -> String {
    format!(
        "🗓️ *Book an appointment*\n\n\
         Great, let me help you reserve a slot.\n\
         1️⃣ First, tell me your *full name*.\n\n\
         You can write *{CANCEL_DIALOGUE_KEYWORD}* at any time to stop."
    )
}

pub fn ask_name() -> String {
    "Please tell me your *full name* so we can continue.".to_string()
}

pub fn ask_datetime(name: &str) -> String {
    format!(
        "📅 Thanks, *{name}*.\n\n\
         Now send me the *date and time* in this format:\n⭐ 2025-11-15 15:00"
    )
}

pub fn bad_datetime() -> String {
    "⚠️ Invalid format. Use *YYYY-MM-DD HH:mm* (e.g. 2025-11-15 15:00).".to_string()
}

pub fn outside_hours() -> String {
    format!(
        "⏰ That time is *outside opening hours*.\n{}\n\
         Send me another *date and time* within opening hours. 😊",
        hours_table()
    )
}

pub fn ask_session_type() -> String {
    "📸 Perfect. What *type of session* would you like? (e.g. family session, graduation photos...)"
        .to_string()
}

pub fn ask_phone() -> String {
    "📞 Great. Finally, send me your *contact number* (e.g. 5037XXXXXXX).".to_string()
}

pub fn booking_confirmed(name: &str, datetime: &str, session_type: &str, phone: &str) -> String {
    format!(
        "✅ Appointment booked.\n👤 *{name}*\n📅 *{datetime}*\n📸 *{session_type}*\n📞 *{phone}*"
    )
}

pub fn booking_failed() -> String {
    "❌ I could not book the appointment. Please check the details or ask a member of staff."
        .to_string()
}

pub fn dialogue_cancelled() -> String {
    "❌ Booking cancelled. Send *5* or write \"book appointment\" to start over.".to_string()
}

pub fn book_usage() -> String {
    "⚠️ Invalid format.\nUse: *book: 2025-11-15 15:00; family session; 50370000000*".to_string()
}

pub fn cancel_usage() -> String {
    "⚠️ Invalid format. Use: *cancel: 2025-11-15 15:00; 50370000000*".to_string()
}

pub fn one_shot_booked(datetime: &str, session_type: &str, phone: &str) -> String {
    format!("✅ Appointment booked.\n📅 *{datetime}*\n📸 *{session_type}*\n📞 *{phone}*")
}

pub fn one_shot_failed() -> String {
    "❌ There was a problem booking the appointment. Please try again.".to_string()
}

pub fn cancel_confirmed(datetime: &str, phone: &str) -> String {
    format!("✅ The appointment has been cancelled.\n📅 *{datetime}*\n📞 *{phone}*")
}

pub fn cancel_not_found() -> String {
    "❌ I could not find an appointment with that date/time and phone number.".to_string()
}

pub fn cancel_unavailable() -> String {
    "❌ I could not reach the calendar to cancel. Please try again later.".to_string()
}

pub fn appointments(items: &[Appointment]) -> String {
    let lines = items
        .iter()
        .enumerate()
        .map(|(i, a)| format!("{}. {} — {}", i + 1, a.datetime, a.summary))
        .collect::<Vec<_>>()
        .join("\n");
    format!("📅 *Your upcoming appointments:*\n\n{lines}")
}

pub fn no_appointments() -> String {
    "📅 I did not find any upcoming appointments for your number in the next 30 days.".to_string()
}

pub fn list_unavailable() -> String {
    "📅 I could not check your appointments right now. Please try again later.".to_string()
}

pub fn fallback() -> String {
    "Thank you for your message. Could you give me a little more detail so I can help you better?"
        .to_string()
}
