use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::calendar::CalendarApi;
use crate::database::Database;
use crate::models::BookingDraft;

type DraftStore = Arc<RwLock<HashMap<String, BookingDraft>>>;

/// Shared per-process state: at most one in-progress booking draft per
/// sender, plus handles to the collaborators the handlers talk to.
/// Cloning is cheap and every clone sees the same draft store. Drafts
/// live only in memory; a restart forgets unfinished dialogues.
#[derive(Clone)]
pub struct BotState {
    drafts: DraftStore,
    pub calendar: Arc<dyn CalendarApi>,
    pub db: Option<Database>,
}

impl BotState {
    pub fn new(calendar: Arc<dyn CalendarApi>, db: Option<Database>) -> Self {
        Self {
            drafts: Arc::new(RwLock::new(HashMap::new())),
            calendar,
            db,
        }
    }

    pub async fn get_draft(&self, sender: &str) -> Option<BookingDraft> {
        let drafts = self.drafts.read().await;
        drafts.get(sender).cloned()
    }

    pub async fn set_draft(&self, sender: &str, draft: BookingDraft) {
        let mut drafts = self.drafts.write().await;
        drafts.insert(sender.to_string(), draft);
    }

    /// Removing the draft is how a dialogue terminates, completed or
    /// cancelled alike.
    pub async fn remove_draft(&self, sender: &str) {
        let mut drafts = self.drafts.write().await;
        drafts.remove(sender);
    }
}
