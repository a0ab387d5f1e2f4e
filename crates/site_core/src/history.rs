/// Browser session history as seen by the router.
pub trait BrowserHistory: Send {
    /// Current address: path plus optional query and fragment.
    fn location(&self) -> String;
    /// Adds an entry without reloading the page.
    fn push(&mut self, address: &str);
}

/// History stack kept in memory, with back/forward cursors.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn back(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn forward(&mut self) -> bool {
        if self.index + 1 >= self.entries.len() {
            return false;
        }
        self.index += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl BrowserHistory for MemoryHistory {
    fn location(&self) -> String {
        self.entries[self.index].clone()
    }

    fn push(&mut self, address: &str) {
        self.entries.truncate(self.index + 1);
        self.entries.push(address.to_string());
        self.index = self.entries.len() - 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_discards_forward_entries() {
        let mut history = MemoryHistory::default();
        history.push("/about");
        history.push("/blog");
        assert!(history.back());
        assert_eq!(history.location(), "/about");

        history.push("/contact");
        assert!(!history.forward());
        assert_eq!(history.len(), 3);
        assert_eq!(history.location(), "/contact");
    }

    #[test]
    fn back_stops_at_first_entry() {
        let mut history = MemoryHistory::new("/podcast");
        assert!(!history.back());
        assert_eq!(history.location(), "/podcast");
    }
}
