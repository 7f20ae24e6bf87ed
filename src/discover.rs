use crate::ai::DiscoveredSource;
use crate::models::ImportSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Topic,
    Results,
}

/// Two-step discover wizard: type a topic, review the candidates,
/// import the checked ones.
///
/// Candidate selection here is plain client state, unlike the durable
/// per-file selection on imported sources. Searches are tagged with a
/// generation so an answer that arrives after the user restarted the
/// wizard is dropped on the floor.
pub struct DiscoverWizard {
    pub step: WizardStep,
    pub topic: String,
    pub candidates: Vec<DiscoveredSource>,
    pub cursor: usize,
    pub searching: bool,
    generation: u64,
}

impl DiscoverWizard {
    pub fn new() -> Self {
        Self {
            step: WizardStep::Topic,
            topic: String::new(),
            candidates: Vec::new(),
            cursor: 0,
            searching: false,
            generation: 0,
        }
    }

    /// Mark a search as in flight and return its generation tag.
    pub fn begin_search(&mut self) -> u64 {
        self.generation += 1;
        self.searching = true;
        self.generation
    }

    pub fn apply_results(&mut self, generation: u64, results: Vec<DiscoveredSource>) {
        if generation != self.generation {
            return;
        }
        self.searching = false;
        self.candidates = results;
        self.cursor = 0;
        self.step = WizardStep::Results;
    }

    /// Returns false when the failure belongs to a superseded search.
    pub fn search_failed(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.searching = false;
        true
    }

    /// Back from the results to the topic prompt, keeping the topic
    /// for editing.
    pub fn back(&mut self) {
        self.step = WizardStep::Topic;
        self.candidates.clear();
        self.cursor = 0;
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.candidates.len() {
            self.cursor += 1;
        }
    }

    pub fn toggle_candidate(&mut self) {
        if let Some(candidate) = self.candidates.get_mut(self.cursor) {
            candidate.checked = !candidate.checked;
        }
    }

    /// Select-all over the candidates. No round trip: nothing is
    /// durable until import.
    pub fn toggle_all_candidates(&mut self) {
        let all_checked =
            !self.candidates.is_empty() && self.candidates.iter().all(|c| c.checked);
        for candidate in &mut self.candidates {
            candidate.checked = !all_checked;
        }
    }

    pub fn selected_count(&self) -> usize {
        self.candidates.iter().filter(|c| c.checked).count()
    }

    /// The import payload: checked candidates only, descriptions
    /// dropped on the way out.
    pub fn import_payload(&self) -> Vec<ImportSource> {
        self.candidates
            .iter()
            .filter(|c| c.checked)
            .map(|c| ImportSource {
                public_id: c.public_id.clone(),
                title: c.title.clone(),
                url: c.url.clone(),
                format: c.format.clone(),
                checked: c.checked,
                created_at: None,
                updated_at: None,
            })
            .collect()
    }
}

impl Default for DiscoverWizard {
    fn default() -> Self {
        Self::new()
    }
}
