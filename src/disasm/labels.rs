//! Jump-target labels shared across decompiles.

use serde::Serialize;
use std::collections::HashMap;

/// A symbolic name for one jump-target address
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Label {
    /// Sequential id, in first-seen order
    pub id: usize,

    /// Output line where the label is defined, once rendered
    pub line: Option<usize>,

    /// Number of jumps to this address
    pub jump_count: u32,

    /// Output lines of jumps that were rewritten to this label
    pub referenced_at: Vec<usize>,

    /// Name set by the user, overriding the deduced one
    pub user_label: Option<String>,

    /// Document the label was created for
    pub context: String,

    /// Reached by a jump from a higher address
    pub backward: bool,

    /// Reached by a jump from a lower address
    pub forward: bool,
}

impl Label {
    fn new(id: usize, context: &str) -> Self {
        Self {
            id,
            line: None,
            jump_count: 0,
            referenced_at: Vec::new(),
            user_label: None,
            context: context.to_string(),
            backward: false,
            forward: false,
        }
    }

    /// Name used in rendered code
    ///
    /// A user label wins; otherwise the name is deduced from how the address
    /// is reached: a single backward jump is a `loop`, only backward jumps a
    /// `reentry`, only forward jumps a `skip`.
    pub fn display_name(&self) -> String {
        if let Some(user_label) = &self.user_label {
            return user_label.clone();
        }

        match (self.backward, self.forward) {
            (true, false) if self.jump_count == 1 => format!("loop{}", self.id),
            (true, false) => format!("reentry{}", self.id),
            (false, true) => format!("skip{}", self.id),
            _ => format!("label{}", self.id),
        }
    }

    /// Whether `line` defines or references this label
    pub fn touches_line(&self, line: usize) -> bool {
        self.line == Some(line) || self.referenced_at.contains(&line)
    }
}

/// Labels by target address
///
/// Owned by the caller and kept across decompiles until [`LabelCache::clear`],
/// so jump statistics of a block decompiled twice accumulate. Ids restart at
/// zero on every decompile; labels created earlier keep theirs.
#[derive(Debug, Clone, Default)]
pub struct LabelCache {
    labels: HashMap<String, Label>,
    next_id: usize,
}

impl LabelCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Drop every label and restart ids at zero
    pub fn clear(&mut self) {
        self.labels.clear();
        self.next_id = 0;
    }

    /// Number new labels from zero again
    pub(crate) fn restart_ids(&mut self) {
        self.next_id = 0;
    }

    /// Forget jump statistics and positions of a context's labels
    ///
    /// Ids and user labels survive, so decompiling the same block again
    /// renders the same names instead of accumulating jump counts.
    pub fn reset_statistics(&mut self, context: &str) {
        for label in self.labels.values_mut().filter(|l| l.context == context) {
            label.line = None;
            label.jump_count = 0;
            label.referenced_at.clear();
            label.backward = false;
            label.forward = false;
        }
    }

    pub fn get(&self, address: &str) -> Option<&Label> {
        self.labels.get(address)
    }

    pub(crate) fn get_mut(&mut self, address: &str) -> Option<&mut Label> {
        self.labels.get_mut(address)
    }

    /// Label for `address`, creating it with the next id if needed
    pub(crate) fn get_or_insert(&mut self, address: &str, context: &str) -> &mut Label {
        let next_id = &mut self.next_id;
        self.labels.entry(address.to_string()).or_insert_with(|| {
            let label = Label::new(*next_id, context);
            *next_id += 1;
            label
        })
    }

    /// Label defined or referenced on an output line of `context`
    pub fn label_at_line(&self, context: &str, line: usize) -> Option<&Label> {
        let address = self.address_at_line(context, line)?;
        self.labels.get(address)
    }

    /// Target address of the label on an output line
    ///
    /// Ids repeat across decompiles, so ties are broken by address.
    fn address_at_line(&self, context: &str, line: usize) -> Option<&str> {
        self.labels
            .iter()
            .filter(|(_, label)| label.context == context && label.touches_line(line))
            .min_by_key(|&(address, label)| (label.id, address))
            .map(|(address, _)| address.as_str())
    }

    /// Give the label on `line` a user-chosen name
    ///
    /// Returns the previous display name, or `None` if no label is on that line.
    pub fn rename_label(&mut self, context: &str, line: usize, name: &str) -> Option<String> {
        let address = self.address_at_line(context, line)?.to_string();
        let label = self.labels.get_mut(&address)?;
        let previous = label.display_name();
        label.user_label = Some(name.to_string());
        Some(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(jump_count: u32, backward: bool, forward: bool) -> Label {
        Label {
            jump_count,
            backward,
            forward,
            ..Label::new(3, "ctx")
        }
    }

    #[test]
    fn test_deduced_names() {
        assert_eq!(label(1, true, false).display_name(), "loop3");
        assert_eq!(label(2, true, false).display_name(), "reentry3");
        assert_eq!(label(2, false, true).display_name(), "skip3");
        assert_eq!(label(1, false, true).display_name(), "skip3");
        assert_eq!(label(2, true, true).display_name(), "label3");
        assert_eq!(label(0, false, false).display_name(), "label3");
    }

    #[test]
    fn test_user_label_wins() {
        let mut l = label(1, true, false);
        l.user_label = Some("retry".to_string());
        assert_eq!(l.display_name(), "retry");
    }

    #[test]
    fn test_ids_are_sequential_and_stable() {
        let mut cache = LabelCache::new();
        assert_eq!(cache.get_or_insert("0x20", "a").id, 0);
        assert_eq!(cache.get_or_insert("0x10", "a").id, 1);
        assert_eq!(cache.get_or_insert("0x20", "a").id, 0);
        assert_eq!(cache.len(), 2);

        cache.restart_ids();
        assert_eq!(cache.get_or_insert("0x30", "b").id, 0);
        assert_eq!(cache.get("0x10").unwrap().id, 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get_or_insert("0x10", "a").id, 0);
    }

    #[test]
    fn test_rename_by_line() {
        let mut cache = LabelCache::new();
        {
            let l = cache.get_or_insert("0x20", "a");
            l.forward = true;
            l.jump_count = 1;
            l.line = Some(4);
            l.referenced_at.push(1);
        }

        assert!(cache.label_at_line("b", 4).is_none());
        assert!(cache.rename_label("a", 2, "x").is_none());
        assert_eq!(cache.rename_label("a", 1, "done").as_deref(), Some("skip0"));
        assert_eq!(cache.get("0x20").unwrap().display_name(), "done");
    }
}
